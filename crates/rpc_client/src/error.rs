//! Error types for gateway operations.

use crate::session::SessionError;
use hedera_core::{AccountIdError, AmountError, TransactionIdError};
use thiserror::Error;

/// Caller input rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account id is not `shard.realm.num[-checksum]`.
    #[error("Invalid account id")]
    InvalidAddress(#[source] AccountIdError),

    /// Token id is not `shard.realm.num[-checksum]`.
    #[error("Invalid token id")]
    InvalidTokenId(#[source] AccountIdError),

    /// Operator id or private key is empty.
    #[error("Operator account id and private key must be present")]
    MissingCredentials,

    /// Transaction id is in neither query nor canonical form.
    #[error(transparent)]
    InvalidTransactionId(#[from] TransactionIdError),

    /// Amount text or value is unusable.
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}

/// Local failure while assembling a transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferBuildError {
    /// Entries cannot be added once the transaction is frozen.
    #[error("Transaction is frozen")]
    Frozen,

    /// Signing requires a frozen transaction.
    #[error("Transaction must be frozen before signing")]
    NotFrozen,

    /// Entries for one asset do not sum to zero.
    #[error("Unbalanced transfer for {asset}: entries sum to {sum}")]
    Unbalanced {
        /// `HBAR` or the token id.
        asset: String,
        /// Net sum in smallest units.
        sum: i128,
    },

    /// The transaction carries no entries.
    #[error("Transfer has no entries")]
    Empty,
}

/// Mirror REST service failure.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// No mirror URL is configured for the network.
    #[error("No mirror URL configured for {network}")]
    NotConfigured {
        /// Ledger environment name.
        network: String,
    },

    /// HTTP request could not be completed.
    #[error("Mirror request failed")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Mirror returned status {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Configured header value is not valid HTTP header text.
    #[error("Invalid {name} header value: {value:?}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Rejected value.
        value: String,
    },

    /// Body is not the expected document.
    #[error("Failed to decode mirror response: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },
}

impl MirrorError {
    /// Create an invalid-header error.
    pub fn invalid_header<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a decode error.
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`GatewayClient`](crate::GatewayClient).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Caller input is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Session could not be opened or a query failed.
    #[error("Ledger query failed")]
    Transport(#[source] SessionError),

    /// Session failed while submitting or confirming a transfer.
    #[error("Transfer submission failed")]
    SubmissionFailed(#[source] SessionError),

    /// Transfer could not be assembled.
    #[error("Failed to build transfer")]
    Build(#[from] TransferBuildError),

    /// Mirror client could not be constructed.
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

impl From<AmountError> for GatewayError {
    fn from(err: AmountError) -> Self {
        Self::Validation(ValidationError::InvalidAmount(err))
    }
}

impl From<TransactionIdError> for GatewayError {
    fn from(err: TransactionIdError) -> Self {
        Self::Validation(ValidationError::InvalidTransactionId(err))
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
