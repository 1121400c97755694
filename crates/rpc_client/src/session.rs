//! The ledger session seam.
//!
//! A [`LedgerSession`] is an authenticated connection to a ledger node,
//! bound to one operator account. Concrete sessions come from a vendor SDK
//! binding and are opened per operation through a [`SessionConnector`].

use crate::credentials::OperatorCredentials;
use crate::transfer::TransferEntry;
use async_trait::async_trait;
use hedera_config::NetworkConfig;
use hedera_core::{AccountId, Timestamp, TokenId, TransactionId};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure reported by a session. Passed through untranslated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request did not reach the node or the reply was lost.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Node rejected the request with a status code.
    #[error("Rejected by node: {status}")]
    Rejected {
        /// Ledger status name, for example `TOKEN_NOT_ASSOCIATED_TO_ACCOUNT`.
        status: String,
    },

    /// Anything else the binding reports.
    #[error("{0}")]
    Other(String),
}

impl SessionError {
    /// Create a rejection error.
    pub fn rejected<S: Into<String>>(status: S) -> Self {
        Self::Rejected {
            status: status.into(),
        }
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// Balances held by an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    /// Native balance in tinybars.
    pub hbars: i64,
    /// Associated tokens and their balances in smallest units.
    pub tokens: BTreeMap<TokenId, u64>,
}

/// Node acknowledgement of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    /// Id assigned to the transaction.
    pub transaction_id: TransactionId,
    /// Hash of the signed transaction bytes.
    #[serde(serialize_with = "serialize_hex")]
    pub transaction_hash: Vec<u8>,
    /// Node that accepted the submission.
    pub node_id: AccountId,
}

/// Consensus outcome of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedReceipt {
    /// Ledger status name; `SUCCESS` on success.
    pub status: String,
}

/// One leg of a recorded transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferLeg {
    /// Account debited or credited.
    pub account: AccountId,
    /// Signed amount in smallest units.
    pub amount: i64,
    /// Token moved, `None` for the native currency.
    pub token_id: Option<TokenId>,
    /// Decimals declared for the token, if known.
    pub decimals: Option<u8>,
}

/// Consensus record of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Id of the recorded transaction.
    pub transaction_id: TransactionId,
    /// Consensus time.
    pub consensus_timestamp: Timestamp,
    /// Hash of the transaction.
    #[serde(serialize_with = "serialize_hex")]
    pub transaction_hash: Vec<u8>,
    /// Ledger status name.
    pub status: String,
    /// Fee charged, in tinybars.
    pub transaction_fee: u64,
    /// Native legs.
    pub transfers: Vec<TransferLeg>,
    /// Token legs.
    pub token_transfers: Vec<TransferLeg>,
    /// Records of duplicate submissions, when requested.
    pub duplicates: Vec<TransactionRecord>,
}

/// An authenticated connection to a ledger node.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerSession: Send + Sync {
    /// Operator account that pays for and signs submissions.
    fn operator_id(&self) -> &AccountId;

    /// Balances of `account`.
    async fn query_balance(&self, account: &AccountId) -> Result<AccountBalance, SessionError>;

    /// Submits a transfer and returns the node acknowledgement.
    ///
    /// `signing_required` is set when the entries were frozen and signed
    /// explicitly with the operator key before submission.
    async fn submit_transfer(
        &self,
        entries: &[TransferEntry],
        signing_required: bool,
    ) -> Result<SubmissionResult, SessionError>;

    /// Waits for consensus on a submitted transaction.
    async fn await_receipt(
        &self,
        submission: &SubmissionResult,
    ) -> Result<ConfirmedReceipt, SessionError>;

    /// Fetches the consensus record of a transaction.
    async fn query_record(
        &self,
        id: &TransactionId,
        include_duplicates: bool,
    ) -> Result<TransactionRecord, SessionError>;
}

/// Opens ledger sessions for a network and operator.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Session type produced by this connector.
    type Session: LedgerSession;

    /// Opens a session on `network` operating as `credentials`.
    async fn connect(
        &self,
        network: &NetworkConfig,
        credentials: &OperatorCredentials,
    ) -> Result<Self::Session, SessionError>;
}
