//! Mirror REST client for transaction lookups.

use crate::error::MirrorError;
use hedera_config::MirrorSettings;
use hedera_core::{AccountId, TokenId};
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Accepts a JSON number or a string holding one.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

/// Native leg as reported by the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorTransfer {
    /// Account debited or credited.
    pub account: AccountId,
    /// Signed tinybars.
    #[serde(deserialize_with = "number_or_string")]
    pub amount: i64,
    /// Whether an allowance was used.
    #[serde(default)]
    pub is_approval: bool,
}

/// Token leg as reported by the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorTokenTransfer {
    /// Token moved.
    pub token_id: TokenId,
    /// Account debited or credited.
    pub account: AccountId,
    /// Signed smallest units.
    #[serde(deserialize_with = "number_or_string")]
    pub amount: i64,
    /// Whether an allowance was used.
    #[serde(default)]
    pub is_approval: bool,
}

/// One element of the mirror `transactions` collection.
///
/// Typed fields cover what receipts need; [`raw`](Self::raw) keeps the
/// document exactly as served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorTransaction {
    /// Canonical transaction id.
    pub transaction_id: String,
    /// `seconds.nanos` consensus time.
    pub consensus_timestamp: String,
    /// Base64 transaction hash.
    #[serde(default)]
    pub transaction_hash: String,
    /// Ledger status name.
    pub result: String,
    /// Fee charged, in tinybars.
    #[serde(deserialize_with = "number_or_string")]
    pub charged_tx_fee: u64,
    /// Fee ceiling set by the payer, in tinybars.
    #[serde(deserialize_with = "number_or_string")]
    pub max_fee: u64,
    /// Child transaction nonce.
    #[serde(default)]
    pub nonce: u32,
    /// Whether this is a scheduled execution.
    #[serde(default)]
    pub scheduled: bool,
    /// Transaction type name.
    #[serde(default)]
    pub name: Option<String>,
    /// Native legs.
    #[serde(default)]
    pub transfers: Vec<MirrorTransfer>,
    /// Token legs.
    #[serde(default)]
    pub token_transfers: Vec<MirrorTokenTransfer>,
    #[serde(skip)]
    raw: Value,
}

impl MirrorTransaction {
    /// Decodes one collection element, keeping the raw document.
    pub fn from_value(value: Value) -> Result<Self, MirrorError> {
        let mut transaction: Self =
            serde_json::from_value(value.clone()).map_err(|e| MirrorError::decode(e.to_string()))?;
        transaction.raw = value;
        Ok(transaction)
    }

    /// The element as served by the mirror.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[derive(Debug, Deserialize)]
struct TransactionsPage {
    #[serde(default)]
    transactions: Vec<Value>,
}

/// Builder for [`MirrorClient`].
#[derive(Debug, Clone, Default)]
pub struct MirrorClientBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MirrorClientBuilder {
    /// Request timeout applied to every lookup.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` header value.
    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<MirrorClient, MirrorError> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            let value = HeaderValue::from_str(&user_agent)
                .map_err(|_| MirrorError::invalid_header(USER_AGENT.as_str(), &user_agent))?;
            builder = builder.user_agent(value);
        }
        Ok(MirrorClient::with_client(builder.build()?))
    }
}

/// HTTP client for the mirror `transactions` endpoint.
#[derive(Debug, Clone, Default)]
pub struct MirrorClient {
    http_client: Client,
}

impl MirrorClient {
    /// Creates a configurable builder.
    #[must_use]
    pub fn builder() -> MirrorClientBuilder {
        MirrorClientBuilder::default()
    }

    /// Creates a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Creates a client from gateway settings.
    pub fn from_settings(settings: &MirrorSettings) -> Result<Self, MirrorError> {
        let mut builder = Self::builder();
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(user_agent) = &settings.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    /// Fetches `{base_url}{canonical_id}` and returns the first transaction.
    ///
    /// An absent or empty `transactions` collection is `Ok(None)`.
    pub async fn transaction(
        &self,
        base_url: &str,
        canonical_id: &str,
    ) -> Result<Option<MirrorTransaction>, MirrorError> {
        let url = format!("{base_url}{canonical_id}");
        debug!(%url, "requesting mirror transaction");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let content = response.text().await?;
        let page: TransactionsPage =
            serde_json::from_str(&content).map_err(|e| MirrorError::decode(e.to_string()))?;

        page.transactions
            .into_iter()
            .next()
            .map(MirrorTransaction::from_value)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn localhost_binding_permitted() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn sample_transaction() -> Value {
        json!({
            "consensus_timestamp": "1662631620.123456789",
            "charged_tx_fee": 84650,
            "max_fee": "100000000",
            "memo_base64": "",
            "name": "CRYPTOTRANSFER",
            "nonce": 0,
            "result": "SUCCESS",
            "scheduled": false,
            "transaction_hash": "3q2+7w==",
            "transaction_id": "0.0.1234-1662631612-548883749",
            "transfers": [
                {"account": "0.0.3", "amount": 4000, "is_approval": false},
                {"account": "0.0.1234", "amount": -88650, "is_approval": false},
                {"account": "0.0.98", "amount": 80650, "is_approval": false},
                {"account": "0.0.5678", "amount": 4000, "is_approval": false}
            ],
            "token_transfers": []
        })
    }

    #[test]
    fn test_decode_accepts_numbers_and_strings() {
        let transaction = MirrorTransaction::from_value(sample_transaction()).unwrap();
        assert_eq!(transaction.charged_tx_fee, 84650);
        assert_eq!(transaction.max_fee, 100_000_000);
        assert_eq!(transaction.transfers.len(), 4);
        assert_eq!(transaction.transfers[1].account, AccountId::new(0, 0, 1234));
        assert_eq!(transaction.raw()["memo_base64"], "");
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let err = MirrorTransaction::from_value(json!({"transaction_id": "0.0.1-1-1"})).unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }));

        let err = MirrorTransaction::from_value(json!({
            "transaction_id": "0.0.1-1-1",
            "consensus_timestamp": "1.1",
            "result": "SUCCESS",
            "charged_tx_fee": "lots",
            "max_fee": 1
        }))
        .unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_transaction_returns_first_element() {
        if !localhost_binding_permitted() {
            return;
        }

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v1/transactions/0.0.1234-1662631612-548883749")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "transactions": [sample_transaction()] }).to_string())
            .create();

        let base = format!("{}/api/v1/transactions/", server.url());
        let client = MirrorClient::default();
        let transaction = client
            .transaction(&base, "0.0.1234-1662631612-548883749")
            .await
            .unwrap()
            .expect("transaction present");

        assert_eq!(transaction.transaction_id, "0.0.1234-1662631612-548883749");
        assert_eq!(transaction.result, "SUCCESS");
    }

    #[tokio::test]
    async fn test_empty_collection_is_none() {
        if !localhost_binding_permitted() {
            return;
        }

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"transactions":[],"links":{"next":null}}"#)
            .create();

        let base = format!("{}/", server.url());
        let client = MirrorClient::default();
        assert!(client.transaction(&base, "0.0.1-1-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        if !localhost_binding_permitted() {
            return;
        }

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(404)
            .with_body(r#"{"_status":{"messages":[{"message":"Not found"}]}}"#)
            .create();

        let base = format!("{}/", server.url());
        let err = MirrorClient::default()
            .transaction(&base, "0.0.1-1-1")
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        if !localhost_binding_permitted() {
            return;
        }

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway timeout</html>")
            .create();

        let base = format!("{}/", server.url());
        let err = MirrorClient::default()
            .transaction(&base, "0.0.1-1-1")
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        if !localhost_binding_permitted() {
            return;
        }

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .match_header("user-agent", "gateway-test/1")
            .with_status(200)
            .with_body(r#"{"transactions":[]}"#)
            .create();

        let client = MirrorClient::from_settings(&MirrorSettings {
            timeout_ms: Some(5_000),
            user_agent: Some("gateway-test/1".to_string()),
        })
        .unwrap();
        let base = format!("{}/", server.url());
        assert!(client.transaction(&base, "0.0.1-1-1").await.unwrap().is_none());
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let err = MirrorClient::builder()
            .user_agent("gateway\nbroken")
            .build()
            .unwrap_err();
        match err {
            MirrorError::InvalidHeader { name, value } => {
                assert_eq!(name, "user-agent");
                assert_eq!(value, "gateway\nbroken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
