//! Subcommand execution.

use crate::args::{CliArgs, Command};
use anyhow::{Context, Result};
use async_trait::async_trait;
use hedera_config::{GatewaySettings, LookupMode, NetworkConfig};
use hedera_core::{to_canonical, to_canonical_strict, AccountId, TransactionId};
use hedera_rpc_client::{
    AccountBalance, ConfirmedReceipt, GatewayClient, LedgerSession, OperatorCredentials,
    SessionConnector, SessionError, SubmissionResult, TransactionRecord, TransferEntry,
};
use tracing::debug;

/// Session type with no values; the CLI never opens a ledger session.
pub enum NoSession {}

#[async_trait]
impl LedgerSession for NoSession {
    fn operator_id(&self) -> &AccountId {
        match *self {}
    }

    async fn query_balance(&self, _account: &AccountId) -> Result<AccountBalance, SessionError> {
        match *self {}
    }

    async fn submit_transfer(
        &self,
        _entries: &[TransferEntry],
        _signing_required: bool,
    ) -> Result<SubmissionResult, SessionError> {
        match *self {}
    }

    async fn await_receipt(
        &self,
        _submission: &SubmissionResult,
    ) -> Result<ConfirmedReceipt, SessionError> {
        match *self {}
    }

    async fn query_record(
        &self,
        _id: &TransactionId,
        _include_duplicates: bool,
    ) -> Result<TransactionRecord, SessionError> {
        match *self {}
    }
}

/// Connector for builds without a ledger SDK binding.
pub struct OfflineConnector;

#[async_trait]
impl SessionConnector for OfflineConnector {
    type Session = NoSession;

    async fn connect(
        &self,
        network: &NetworkConfig,
        _credentials: &OperatorCredentials,
    ) -> Result<Self::Session, SessionError> {
        Err(SessionError::Connect(format!(
            "no ledger binding available for {}",
            network.network_name
        )))
    }
}

/// Loads settings from `--config`, or the built-ins when absent.
pub fn load_settings(args: &CliArgs) -> Result<GatewaySettings> {
    match &args.config {
        Some(path) => GatewaySettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(GatewaySettings::default()),
    }
}

/// Runs one subcommand and returns its stdout text.
pub async fn run(args: &CliArgs, settings: &GatewaySettings) -> Result<String> {
    let client = GatewayClient::from_settings(settings, OfflineConnector)?
        .with_lookup_mode(LookupMode::Mirror);
    let network = args.network.as_str();
    debug!(network, command = ?args.command, "running command");

    match &args.command {
        Command::Validate { address } => Ok(client.is_valid_wallet_address(address).to_string()),
        Command::Links {
            transaction,
            account,
        } => {
            let mut lines = Vec::new();
            if let Some(transaction) = transaction {
                lines.push(client.transaction_link(&to_canonical(transaction), network));
            }
            if let Some(account) = account {
                lines.push(client.wallet_link(account, network));
            }
            Ok(lines.join("\n"))
        }
        Command::Lookup { transaction_id } => {
            let result = client.get_transaction(transaction_id, network, None).await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Canonical {
            transaction_id,
            strict,
        } => {
            if *strict {
                Ok(to_canonical_strict(transaction_id)?)
            } else {
                Ok(to_canonical(transaction_id))
            }
        }
    }
}
