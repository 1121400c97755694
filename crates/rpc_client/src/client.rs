//! The gateway facade.

use crate::credentials::OperatorCredentials;
use crate::error::{GatewayError, GatewayResult, MirrorError, ValidationError};
use crate::mirror::MirrorClient;
use crate::orchestrator::{self, TransferRequest};
use crate::receipt::{QueryReceipt, Receipt, ReceiptNormalizer, SubmissionReceipt};
use crate::session::{LedgerSession, SessionConnector, SubmissionResult, TransactionRecord};
use hedera_config::{GatewaySettings, LookupMode, NetworkConfig, NetworkRegistry};
use hedera_core::{to_canonical, AccountId, TokenAmount, TokenId, TransactionId};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parameters of a single-payee transfer.
#[derive(Debug, Clone)]
pub struct SendTransactionParams {
    /// Payee account id.
    pub to: String,
    /// Decimal amount, e.g. `"0.000005"`.
    pub amount: String,
    /// Network key; only `"main"` selects mainnet.
    pub network: String,
    /// Decimals used to scale `amount`.
    pub decimals: u8,
    /// Operator paying for and sending the transfer.
    pub credentials: OperatorCredentials,
    /// Token to move; `None` moves HBAR.
    pub token_id: Option<String>,
}

/// Outcome of [`GatewayClient::send_transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResult {
    /// Node acknowledgement.
    pub transaction_data: SubmissionResult,
    /// Normalized receipt.
    pub receipt: SubmissionReceipt,
}

impl SendTransactionResult {
    /// The receipt as the shared union type.
    pub fn into_receipt(self) -> Receipt {
        self.receipt.into()
    }
}

/// Raw payload behind a lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionData {
    /// Ledger record from a direct lookup.
    Record(Box<TransactionRecord>),
    /// Mirror document as served.
    Mirror(Value),
}

/// Outcome of [`GatewayClient::get_transaction`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResult {
    /// Collaborator payload.
    pub transaction_data: TransactionData,
    /// Normalized receipt.
    pub receipt: QueryReceipt,
}

impl GetTransactionResult {
    /// The receipt as the shared union type.
    pub fn into_receipt(self) -> Receipt {
        self.receipt.into()
    }
}

/// Transfer and query operations against a Hedera network.
///
/// Stateless between calls: each operation resolves its network, opens a
/// fresh session through the connector when it needs one and drops it on
/// return.
pub struct GatewayClient<C> {
    registry: Arc<NetworkRegistry>,
    connector: C,
    mirror: MirrorClient,
    lookup_mode: LookupMode,
}

impl<C: SessionConnector> GatewayClient<C> {
    /// Creates a client in the default (mirror) lookup mode.
    pub fn new(registry: Arc<NetworkRegistry>, connector: C, mirror: MirrorClient) -> Self {
        Self {
            registry,
            connector,
            mirror,
            lookup_mode: LookupMode::default(),
        }
    }

    /// Creates a client from loaded settings.
    pub fn from_settings(settings: &GatewaySettings, connector: C) -> GatewayResult<Self> {
        let mirror = MirrorClient::from_settings(&settings.mirror)?;
        Ok(Self::new(Arc::new(settings.registry()), connector, mirror)
            .with_lookup_mode(settings.lookup_mode))
    }

    /// Selects how `get_transaction` is served.
    #[must_use]
    pub fn with_lookup_mode(mut self, lookup_mode: LookupMode) -> Self {
        self.lookup_mode = lookup_mode;
        self
    }

    /// Active lookup mode.
    pub fn lookup_mode(&self) -> LookupMode {
        self.lookup_mode
    }

    /// Network table in use.
    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    /// Structural account id check; never touches the network.
    pub fn is_valid_wallet_address(&self, address: &str) -> bool {
        hedera_core::is_valid_wallet_address(address)
    }

    /// Explorer page for a transaction id, passed through verbatim.
    pub fn transaction_link(&self, transaction_id: &str, network: &str) -> String {
        self.registry.resolve(network).transaction_link(transaction_id)
    }

    /// Explorer page for an account.
    pub fn wallet_link(&self, address: &str, network: &str) -> String {
        self.registry.resolve(network).wallet_link(address)
    }

    async fn open_session(
        &self,
        network: &str,
        credentials: &OperatorCredentials,
    ) -> GatewayResult<(C::Session, &NetworkConfig)> {
        credentials.validate()?;
        let config = self.registry.resolve(network);
        debug!(
            network,
            network_name = %config.network_name,
            operator = %credentials.account_id,
            "opening session"
        );
        let session = self
            .connector
            .connect(config, credentials)
            .await
            .map_err(GatewayError::Transport)?;
        Ok((session, config))
    }

    /// Operator balance: token balance when `token_id` is given, else HBAR.
    ///
    /// A token the operator is not associated with reads as zero.
    pub async fn get_balance(
        &self,
        network: &str,
        decimals: u8,
        credentials: &OperatorCredentials,
        token_id: Option<&str>,
    ) -> GatewayResult<TokenAmount> {
        let token_id = token_id.map(parse_token_id).transpose()?;
        let (session, _) = self.open_session(network, credentials).await?;

        let balance = session
            .query_balance(session.operator_id())
            .await
            .map_err(GatewayError::Transport)?;

        let units = match &token_id {
            Some(token_id) => {
                TokenAmount::new(balance.tokens.get(token_id).copied().unwrap_or(0), decimals)
            }
            None => TokenAmount::new(balance.hbars, decimals),
        };
        debug!(
            network,
            token_id = ?token_id.as_ref().map(ToString::to_string),
            balance = %units,
            "queried balance"
        );
        Ok(units)
    }

    /// Whether `account_id` holds an association with `token_id`.
    pub async fn is_token_associated(
        &self,
        network: &str,
        credentials: &OperatorCredentials,
        account_id: &str,
        token_id: &str,
    ) -> GatewayResult<bool> {
        let account = parse_account_id(account_id)?;
        let token_id = parse_token_id(token_id)?;
        let (session, _) = self.open_session(network, credentials).await?;

        let balance = session
            .query_balance(&account)
            .await
            .map_err(GatewayError::Transport)?;
        Ok(balance.tokens.contains_key(&token_id))
    }

    /// Transfers `amount` from the operator to `to` and waits for consensus.
    pub async fn send_transaction(
        &self,
        params: SendTransactionParams,
    ) -> GatewayResult<SendTransactionResult> {
        let to = parse_account_id(&params.to)?;
        let token_id = params.token_id.as_deref().map(parse_token_id).transpose()?;
        let amount = TokenAmount::parse(&params.amount, params.decimals)?;
        let request = TransferRequest::new(to, amount, token_id)?;

        let (session, config) = self.open_session(&params.network, &params.credentials).await?;
        let (submission, confirmed) = orchestrator::submit(&request, &session).await?;

        let receipt = ReceiptNormalizer::new(&params.network, config).from_submission(
            session.operator_id(),
            &request.to,
            &request.amount,
            &submission,
            &confirmed,
        );
        Ok(SendTransactionResult {
            transaction_data: submission,
            receipt,
        })
    }

    /// Looks a transaction up by id, in either textual form.
    ///
    /// In mirror mode every failure is logged and reported as `Ok(None)`,
    /// and `credentials` are not consulted. In direct mode the id must parse
    /// and session failures surface as [`GatewayError::Transport`].
    pub async fn get_transaction(
        &self,
        transaction_id: &str,
        network: &str,
        credentials: Option<&OperatorCredentials>,
    ) -> GatewayResult<Option<GetTransactionResult>> {
        match self.lookup_mode {
            LookupMode::Direct => {
                let credentials = credentials.ok_or(ValidationError::MissingCredentials)?;
                self.get_transaction_direct(transaction_id, network, credentials)
                    .await
                    .map(Some)
            }
            LookupMode::Mirror => Ok(self.get_transaction_mirror(transaction_id, network).await),
        }
    }

    async fn get_transaction_direct(
        &self,
        transaction_id: &str,
        network: &str,
        credentials: &OperatorCredentials,
    ) -> GatewayResult<GetTransactionResult> {
        let id: TransactionId = transaction_id.parse()?;
        let (session, config) = self.open_session(network, credentials).await?;

        let record = session
            .query_record(&id, true)
            .await
            .map_err(GatewayError::Transport)?;
        debug!(transaction_id = %id, status = %record.status, "fetched transaction record");

        let receipt = ReceiptNormalizer::new(network, config).from_record(&record);
        Ok(GetTransactionResult {
            transaction_data: TransactionData::Record(Box::new(record)),
            receipt,
        })
    }

    async fn get_transaction_mirror(
        &self,
        transaction_id: &str,
        network: &str,
    ) -> Option<GetTransactionResult> {
        let canonical = to_canonical(transaction_id);
        match self.lookup_mirror(&canonical, network).await {
            Ok(Some(result)) => Some(result),
            Ok(None) => {
                debug!(transaction_id = %canonical, network, "mirror has no such transaction");
                None
            }
            Err(error) => {
                warn!(transaction_id = %canonical, network, %error, "mirror lookup failed");
                None
            }
        }
    }

    async fn lookup_mirror(
        &self,
        canonical: &str,
        network: &str,
    ) -> Result<Option<GetTransactionResult>, MirrorError> {
        let config = self.registry.resolve(network);
        let base_url = config
            .mirror_url()
            .ok_or_else(|| MirrorError::NotConfigured {
                network: config.network_name.clone(),
            })?;

        let Some(transaction) = self.mirror.transaction(base_url, canonical).await? else {
            return Ok(None);
        };
        let receipt = ReceiptNormalizer::new(network, config).from_mirror(&transaction)?;
        Ok(Some(GetTransactionResult {
            transaction_data: TransactionData::Mirror(transaction.raw().clone()),
            receipt,
        }))
    }
}

fn parse_account_id(text: &str) -> Result<AccountId, ValidationError> {
    text.parse().map_err(ValidationError::InvalidAddress)
}

fn parse_token_id(text: &str) -> Result<TokenId, ValidationError> {
    text.parse().map_err(ValidationError::InvalidTokenId)
}
