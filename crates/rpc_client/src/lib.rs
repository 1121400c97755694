//! Ledger access for the Hedera gateway.
//!
//! [`GatewayClient`] is the entry point: it validates caller input, resolves
//! the network, opens a [`LedgerSession`] through a [`SessionConnector`] for
//! balance queries and transfers, and serves transaction lookups either from
//! a ledger record or from the mirror REST service.

pub mod client;
pub mod credentials;
pub mod error;
pub mod mirror;
pub mod orchestrator;
pub mod receipt;
pub mod session;
pub mod transfer;

pub use client::{
    GatewayClient, GetTransactionResult, SendTransactionParams, SendTransactionResult,
    TransactionData,
};
pub use credentials::OperatorCredentials;
pub use error::{GatewayError, GatewayResult, MirrorError, TransferBuildError, ValidationError};
pub use mirror::{MirrorClient, MirrorClientBuilder, MirrorTokenTransfer, MirrorTransaction, MirrorTransfer};
pub use orchestrator::TransferRequest;
pub use receipt::{payer_amount, QueryReceipt, Receipt, ReceiptCore, ReceiptNormalizer, SubmissionReceipt};
pub use session::{
    AccountBalance, ConfirmedReceipt, LedgerSession, SessionConnector, SessionError,
    SubmissionResult, TransactionRecord, TransferLeg,
};
pub use transfer::{AssetKind, TransferEntry, TransferTransaction};
