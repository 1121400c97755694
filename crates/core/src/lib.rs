//! # Hedera Core
//!
//! Value types shared by every part of the gateway:
//!
//! - [`AccountId`] / [`TokenId`] and the structural wallet-address check
//! - [`TokenAmount`] with exact decimal <-> smallest-unit conversion
//! - [`TransactionId`] and the query-form / canonical-form codec
//!
//! Everything here is pure and synchronous; nothing touches the network.

pub mod address;
pub mod amount;
pub mod error;
pub mod transaction_id;

pub use address::{is_valid_wallet_address, AccountId, EntityId, TokenId};
pub use amount::{to_decimal, to_smallest_unit, TokenAmount, NATIVE_DECIMALS};
pub use error::{AccountIdError, AmountError, TransactionIdError};
pub use transaction_id::{to_canonical, to_canonical_strict, Timestamp, TransactionId};

/// Ticker reported as the fee currency on every receipt.
pub const NATIVE_SYMBOL: &str = "HBAR";
