//! Operator credentials.

use crate::error::ValidationError;
use hedera_core::AccountId;
use std::fmt;
use zeroize::Zeroizing;

/// Operator account and private key used to open a session.
///
/// The key is wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct OperatorCredentials {
    /// Operator account id.
    pub account_id: String,
    /// Operator private key, in whatever encoding the session binding expects.
    pub private_key: Zeroizing<String>,
}

impl OperatorCredentials {
    /// Creates credentials.
    pub fn new<A: Into<String>, K: Into<String>>(account_id: A, private_key: K) -> Self {
        Self {
            account_id: account_id.into(),
            private_key: Zeroizing::new(private_key.into()),
        }
    }

    /// Checks both fields are present and returns the parsed operator id.
    pub fn validate(&self) -> Result<AccountId, ValidationError> {
        if self.account_id.is_empty() || self.private_key.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        self.account_id
            .parse()
            .map_err(ValidationError::InvalidAddress)
    }
}

impl fmt::Debug for OperatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorCredentials")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
