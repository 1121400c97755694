//! Error types for the core value types.

use thiserror::Error;

/// Errors produced while parsing an account or token identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountIdError {
    /// Input does not match `shard.realm.num[-checksum]`.
    #[error("Invalid entity id: {input}")]
    Malformed {
        /// Offending input.
        input: String,
    },

    /// A component is structurally valid but does not fit in 64 bits.
    #[error("Entity id component out of range: {input}")]
    OutOfRange {
        /// Offending input.
        input: String,
    },
}

impl AccountIdError {
    /// Create a malformed-input error.
    pub fn malformed<S: Into<String>>(input: S) -> Self {
        Self::Malformed {
            input: input.into(),
        }
    }
}

/// Errors produced by decimal <-> smallest-unit conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Text is not a decimal number.
    #[error("Invalid amount: {input}")]
    Invalid {
        /// Offending input.
        input: String,
    },

    /// Value does not fit the ledger's signed 64-bit amount.
    #[error("Amount out of range: {value}")]
    OutOfRange {
        /// Offending value in smallest units.
        value: String,
    },

    /// Transfers move strictly positive amounts.
    #[error("Amount must be positive: {value}")]
    NotPositive {
        /// Offending value.
        value: String,
    },
}

impl AmountError {
    /// Create an invalid-input error.
    pub fn invalid<S: Into<String>>(input: S) -> Self {
        Self::Invalid {
            input: input.into(),
        }
    }
}

/// Errors produced by the strict transaction-identifier parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionIdError {
    /// Input is neither `account@seconds.nanos` nor `account-seconds-nanos`.
    #[error("Invalid transaction id: {input}")]
    Malformed {
        /// Offending input.
        input: String,
    },

    /// Payer part is not a valid account id.
    #[error(transparent)]
    Account(#[from] AccountIdError),
}

impl TransactionIdError {
    /// Create a malformed-input error.
    pub fn malformed<S: Into<String>>(input: S) -> Self {
        Self::Malformed {
            input: input.into(),
        }
    }
}
