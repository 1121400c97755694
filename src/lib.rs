//! # Hedera Gateway
//!
//! A uniform transfer and query surface over the Hedera network for a
//! multi-chain payments platform.
//!
//! - Account id validation and explorer links
//! - Operator balances and token association checks
//! - Native and token transfers with normalized receipts
//! - Transaction lookups through a ledger node or the mirror REST service
//!
//! ## Quick Start
//!
//! ```rust
//! use hedera_gateway::prelude::*;
//!
//! let registry = NetworkRegistry::default();
//! assert_eq!(registry.resolve("main").network_name, "mainnet");
//! assert_eq!(registry.resolve("anything else").network_name, "testnet");
//!
//! assert!(is_valid_wallet_address("0.0.1234"));
//! assert_eq!(
//!     to_canonical("0.0.1234@1662631612.548883749"),
//!     "0.0.1234-1662631612-548883749"
//! );
//! ```
//!
//! ## Architecture
//!
//! - [`core`] - account, token and transaction identifiers; amount conversion
//! - [`config`] - network registry and TOML settings
//! - [`rpc_client`] - ledger session seam, mirror client and the
//!   [`GatewayClient`](rpc_client::GatewayClient) facade

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use hedera_config as config;
pub use hedera_core as core;
pub use hedera_rpc_client as rpc_client;

/// Common imports for gateway integrations
pub mod prelude {
    pub use crate::config::{GatewaySettings, LookupMode, NetworkConfig, NetworkRegistry};
    pub use crate::core::{
        is_valid_wallet_address, to_canonical, AccountId, TokenAmount, TokenId, TransactionId,
    };
    pub use crate::rpc_client::{
        GatewayClient, GatewayError, GatewayResult, GetTransactionResult, LedgerSession,
        OperatorCredentials, Receipt, SendTransactionParams, SendTransactionResult,
        SessionConnector,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
