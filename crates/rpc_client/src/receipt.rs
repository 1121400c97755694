//! Receipt normalization.
//!
//! Submissions, ledger records and mirror documents each describe a
//! transaction differently; the normalizer maps all three onto one
//! [`ReceiptCore`] plus a shape-specific extension.

use crate::error::MirrorError;
use crate::mirror::MirrorTransaction;
use crate::session::{ConfirmedReceipt, SubmissionResult, TransactionRecord, TransferLeg};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use hedera_config::NetworkConfig;
use hedera_core::{
    to_canonical, AccountId, Timestamp, TokenAmount, TransactionId, NATIVE_DECIMALS, NATIVE_SYMBOL,
};
use serde::Serialize;

/// Ledger status of a successful transaction.
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// `gas_limit` reported for record lookups, which carry no fee ceiling.
const RECORD_GAS_LIMIT: i64 = 1;

/// Fields shared by every receipt shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptCore {
    /// Valid start for submissions, consensus time for lookups.
    pub date: Option<DateTime<Utc>>,
    /// Paying account.
    pub from: String,
    /// Currency fees are paid in.
    pub gas_cost_crypto_currency: String,
    /// Network key supplied by the caller.
    pub network: String,
    /// Child transaction nonce.
    pub nonce: u32,
    /// Hex transaction hash.
    pub transaction_hash: String,
    /// Canonical transaction id.
    pub transaction_id: String,
    /// Explorer page for the transaction.
    pub transaction_link: String,
}

/// Receipt of a transfer submitted by this gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Shared fields.
    #[serde(flatten)]
    pub core: ReceiptCore,
    /// Amount requested.
    pub amount: TokenAmount,
    /// Payee.
    pub to: String,
    /// Consensus status of the transfer.
    pub receipt_status: String,
}

/// Receipt of a transaction looked up after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReceipt {
    /// Shared fields.
    #[serde(flatten)]
    pub core: ReceiptCore,
    /// Magnitude of the payer's own leg.
    pub amount: TokenAmount,
    /// Fee charged, in HBAR.
    pub gas_cost_in_crypto: TokenAmount,
    /// Fee ceiling in HBAR, or the record sentinel.
    pub gas_limit: TokenAmount,
    /// Always `false`: lookups only see finalized transactions.
    pub is_pending: bool,
    /// Always `true`.
    pub is_executed: bool,
    /// Status is `SUCCESS`.
    pub is_successful: bool,
    /// Negation of `is_successful`.
    pub is_failed: bool,
    /// Same as `is_failed`.
    pub is_invalid: bool,
}

/// Either receipt shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Receipt {
    /// From [`GatewayClient::send_transaction`](crate::GatewayClient::send_transaction).
    Submitted(SubmissionReceipt),
    /// From [`GatewayClient::get_transaction`](crate::GatewayClient::get_transaction).
    Queried(QueryReceipt),
}

impl Receipt {
    /// Shared fields.
    pub fn core(&self) -> &ReceiptCore {
        match self {
            Self::Submitted(receipt) => &receipt.core,
            Self::Queried(receipt) => &receipt.core,
        }
    }

    /// Amount moved or requested.
    pub fn amount(&self) -> &TokenAmount {
        match self {
            Self::Submitted(receipt) => &receipt.amount,
            Self::Queried(receipt) => &receipt.amount,
        }
    }
}

impl From<SubmissionReceipt> for Receipt {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self::Submitted(receipt)
    }
}

impl From<QueryReceipt> for Receipt {
    fn from(receipt: QueryReceipt) -> Self {
        Self::Queried(receipt)
    }
}

/// Magnitude of `payer`'s leg, matched by account.
///
/// Token legs take precedence over native legs; with no match the amount is
/// zero at native precision.
pub fn payer_amount(
    payer: &AccountId,
    transfers: &[TransferLeg],
    token_transfers: &[TransferLeg],
) -> TokenAmount {
    let leg = token_transfers
        .iter()
        .find(|leg| &leg.account == payer)
        .or_else(|| transfers.iter().find(|leg| &leg.account == payer));

    match leg {
        Some(leg) => {
            let decimals = match (&leg.token_id, leg.decimals) {
                (None, _) => NATIVE_DECIMALS,
                (Some(_), declared) => declared.unwrap_or(0),
            };
            TokenAmount::new(leg.amount, decimals).abs()
        }
        None => TokenAmount::zero(NATIVE_DECIMALS),
    }
}

fn flags(status: &str) -> (bool, bool, bool) {
    let is_successful = status == SUCCESS_STATUS;
    (is_successful, !is_successful, !is_successful)
}

/// Maps collaborator results onto receipts for one network.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptNormalizer<'a> {
    network: &'a str,
    config: &'a NetworkConfig,
}

impl<'a> ReceiptNormalizer<'a> {
    /// `network` is the caller's key, echoed into receipts.
    pub fn new(network: &'a str, config: &'a NetworkConfig) -> Self {
        Self { network, config }
    }

    fn core(
        &self,
        id: &TransactionId,
        from: &AccountId,
        date: Option<DateTime<Utc>>,
        transaction_hash: String,
    ) -> ReceiptCore {
        let transaction_id = id.to_canonical_string();
        ReceiptCore {
            date,
            from: from.to_string(),
            gas_cost_crypto_currency: NATIVE_SYMBOL.to_string(),
            network: self.network.to_string(),
            nonce: id.nonce,
            transaction_hash,
            transaction_link: self.config.transaction_link(&transaction_id),
            transaction_id,
        }
    }

    /// Receipt for a transfer this gateway submitted; `from` is the session operator.
    pub fn from_submission(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: &TokenAmount,
        submission: &SubmissionResult,
        receipt: &ConfirmedReceipt,
    ) -> SubmissionReceipt {
        let id = &submission.transaction_id;
        SubmissionReceipt {
            core: self.core(
                id,
                from,
                id.valid_start_datetime(),
                hex::encode(&submission.transaction_hash),
            ),
            amount: amount.clone(),
            to: to.to_string(),
            receipt_status: receipt.status.clone(),
        }
    }

    /// Receipt for a ledger record.
    pub fn from_record(&self, record: &TransactionRecord) -> QueryReceipt {
        let id = &record.transaction_id;
        let (is_successful, is_failed, is_invalid) = flags(&record.status);
        QueryReceipt {
            core: self.core(
                id,
                &id.account_id,
                record.consensus_timestamp.to_datetime(),
                hex::encode(&record.transaction_hash),
            ),
            amount: payer_amount(&id.account_id, &record.transfers, &record.token_transfers),
            gas_cost_in_crypto: TokenAmount::new(record.transaction_fee, NATIVE_DECIMALS),
            gas_limit: TokenAmount::new(RECORD_GAS_LIMIT, 0),
            is_pending: false,
            is_executed: true,
            is_successful,
            is_failed,
            is_invalid,
        }
    }

    /// Receipt for a mirror document.
    pub fn from_mirror(&self, transaction: &MirrorTransaction) -> Result<QueryReceipt, MirrorError> {
        let mut id: TransactionId = to_canonical(&transaction.transaction_id)
            .parse()
            .map_err(|e| MirrorError::decode(format!("transaction_id: {e}")))?;
        id.nonce = transaction.nonce;
        id.scheduled = transaction.scheduled;

        let consensus: Timestamp = transaction
            .consensus_timestamp
            .parse()
            .map_err(|e| MirrorError::decode(format!("consensus_timestamp: {e}")))?;

        let transaction_hash = general_purpose::STANDARD
            .decode(&transaction.transaction_hash)
            .map(hex::encode)
            .unwrap_or_else(|_| transaction.transaction_hash.clone());

        let transfers: Vec<TransferLeg> = transaction
            .transfers
            .iter()
            .map(|t| TransferLeg {
                account: t.account.clone(),
                amount: t.amount,
                token_id: None,
                decimals: None,
            })
            .collect();
        let token_transfers: Vec<TransferLeg> = transaction
            .token_transfers
            .iter()
            .map(|t| TransferLeg {
                account: t.account.clone(),
                amount: t.amount,
                token_id: Some(t.token_id.clone()),
                decimals: None,
            })
            .collect();

        let (is_successful, is_failed, is_invalid) = flags(&transaction.result);
        Ok(QueryReceipt {
            core: self.core(&id, &id.account_id, consensus.to_datetime(), transaction_hash),
            amount: payer_amount(&id.account_id, &transfers, &token_transfers),
            gas_cost_in_crypto: TokenAmount::new(transaction.charged_tx_fee, NATIVE_DECIMALS),
            gas_limit: TokenAmount::new(transaction.max_fee, NATIVE_DECIMALS),
            is_pending: false,
            is_executed: true,
            is_successful,
            is_failed,
            is_invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedera_config::NetworkType;
    use hedera_core::TokenId;
    use num_bigint::BigInt;
    use proptest::prelude::*;
    use serde_json::json;

    fn payer() -> AccountId {
        AccountId::new(0, 0, 1234)
    }

    fn other() -> AccountId {
        AccountId::new(0, 0, 5678)
    }

    fn native_leg(account: AccountId, amount: i64) -> TransferLeg {
        TransferLeg {
            account,
            amount,
            token_id: None,
            decimals: None,
        }
    }

    fn record(
        status: &str,
        transfers: Vec<TransferLeg>,
        token_transfers: Vec<TransferLeg>,
    ) -> TransactionRecord {
        TransactionRecord {
            transaction_id: TransactionId::new(payer(), Timestamp::new(1662631612, 548883749)),
            consensus_timestamp: Timestamp::new(1662631620, 123456789),
            transaction_hash: vec![0xab, 0xcd],
            status: status.to_string(),
            transaction_fee: 84650,
            transfers,
            token_transfers,
            duplicates: Vec::new(),
        }
    }

    #[test]
    fn test_payer_amount_matches_by_account() {
        let legs = vec![native_leg(other(), 500), native_leg(payer(), -500)];
        let amount = payer_amount(&payer(), &legs, &[]);
        assert_eq!(amount.value(), &BigInt::from(500));
        assert_eq!(amount.decimals(), NATIVE_DECIMALS);
    }

    #[test]
    fn test_payer_amount_prefers_token_legs() {
        let legs = vec![native_leg(payer(), -88650)];
        let token_legs = vec![
            TransferLeg {
                account: other(),
                amount: 150,
                token_id: Some(TokenId::new(0, 0, 456858)),
                decimals: Some(2),
            },
            TransferLeg {
                account: payer(),
                amount: -150,
                token_id: Some(TokenId::new(0, 0, 456858)),
                decimals: Some(2),
            },
        ];
        let amount = payer_amount(&payer(), &legs, &token_legs);
        assert_eq!(amount.value(), &BigInt::from(150));
        assert_eq!(amount.to_string(), "1.5");
    }

    #[test]
    fn test_payer_amount_without_match_is_zero() {
        let legs = vec![native_leg(other(), 500)];
        assert_eq!(payer_amount(&payer(), &legs, &[]), TokenAmount::zero(0));
    }

    #[test]
    fn test_from_record() {
        let config = NetworkConfig::for_network(NetworkType::TestNet);
        let normalizer = ReceiptNormalizer::new("test", &config);
        let receipt = normalizer.from_record(&record(
            "SUCCESS",
            vec![native_leg(other(), 500), native_leg(payer(), -500)],
            Vec::new(),
        ));

        assert_eq!(receipt.core.transaction_id, "0.0.1234-1662631612-548883749");
        assert_eq!(receipt.core.from, "0.0.1234");
        assert_eq!(receipt.core.transaction_hash, "abcd");
        assert_eq!(receipt.core.gas_cost_crypto_currency, "HBAR");
        assert_eq!(receipt.core.network, "test");
        assert_eq!(
            receipt.core.transaction_link,
            "https://testnet.hederaexplorer.io/search-details/transaction/0.0.1234-1662631612-548883749"
        );
        assert_eq!(receipt.core.date.unwrap().timestamp(), 1662631620);
        assert_eq!(receipt.amount.value(), &BigInt::from(500));
        assert_eq!(receipt.gas_cost_in_crypto.to_string(), "0.0008465");
        assert_eq!(receipt.gas_limit.to_string(), "1");
        assert!(!receipt.is_pending);
        assert!(receipt.is_executed);
        assert!(receipt.is_successful);
        assert!(!receipt.is_failed);
    }

    #[test]
    fn test_from_mirror() {
        let config = NetworkConfig::for_network(NetworkType::MainNet);
        let normalizer = ReceiptNormalizer::new("main", &config);
        let transaction = MirrorTransaction::from_value(json!({
            "consensus_timestamp": "1662631620.123456789",
            "charged_tx_fee": 84650,
            "max_fee": "200000000",
            "nonce": 0,
            "result": "INSUFFICIENT_PAYER_BALANCE",
            "transaction_hash": "3q2+7w==",
            "transaction_id": "0.0.1234-1662631612-548883749",
            "transfers": [
                {"account": "0.0.5678", "amount": 4000},
                {"account": "0.0.1234", "amount": "-4000"}
            ]
        }))
        .unwrap();

        let receipt = normalizer.from_mirror(&transaction).unwrap();
        assert_eq!(receipt.core.transaction_hash, "deadbeef");
        assert_eq!(receipt.core.transaction_id, "0.0.1234-1662631612-548883749");
        assert!(receipt.core.transaction_link.starts_with("https://hederaexplorer.io/"));
        assert_eq!(receipt.amount.value(), &BigInt::from(4000));
        assert_eq!(receipt.gas_limit.to_string(), "2");
        assert!(!receipt.is_successful);
        assert!(receipt.is_failed);
        assert!(receipt.is_invalid);
    }

    #[test]
    fn test_from_mirror_rejects_bad_timestamp() {
        let config = NetworkConfig::default();
        let transaction = MirrorTransaction::from_value(json!({
            "consensus_timestamp": "yesterday",
            "charged_tx_fee": 1,
            "max_fee": 1,
            "result": "SUCCESS",
            "transaction_id": "0.0.1234-1662631612-548883749"
        }))
        .unwrap();
        assert!(ReceiptNormalizer::new("test", &config)
            .from_mirror(&transaction)
            .is_err());
    }

    #[test]
    fn test_from_submission() {
        let config = NetworkConfig::for_network(NetworkType::TestNet);
        let submission = SubmissionResult {
            transaction_id: TransactionId::new(payer(), Timestamp::new(1662631612, 548883749)),
            transaction_hash: vec![0x01, 0xff],
            node_id: AccountId::new(0, 0, 3),
        };
        let receipt = ReceiptNormalizer::new("test", &config).from_submission(
            &payer(),
            &other(),
            &TokenAmount::parse("0.000005", 8).unwrap(),
            &submission,
            &ConfirmedReceipt {
                status: "SUCCESS".to_string(),
            },
        );

        assert_eq!(receipt.core.transaction_hash, "01ff");
        assert_eq!(receipt.core.nonce, 0);
        assert_eq!(receipt.core.date.unwrap().timestamp(), 1662631612);
        assert_eq!(receipt.to, "0.0.5678");
        assert_eq!(receipt.receipt_status, "SUCCESS");

        let json = serde_json::to_value(Receipt::from(receipt)).unwrap();
        assert_eq!(json["transactionId"], "0.0.1234-1662631612-548883749");
        assert_eq!(json["amount"], "0.000005");
        assert_eq!(json["gasCostCryptoCurrency"], "HBAR");
    }

    #[test]
    fn test_from_submission_without_valid_start_date() {
        let config = NetworkConfig::for_network(NetworkType::MainNet);
        let submission = SubmissionResult {
            transaction_id: TransactionId::new(payer(), Timestamp::new(i64::MAX, 0)),
            transaction_hash: vec![0xaa],
            node_id: AccountId::new(0, 0, 3),
        };
        let receipt = ReceiptNormalizer::new("main", &config).from_submission(
            &payer(),
            &other(),
            &TokenAmount::new(500, 8),
            &submission,
            &ConfirmedReceipt {
                status: "SUCCESS".to_string(),
            },
        );

        assert!(receipt.core.date.is_none());
        assert_eq!(receipt.core.from, "0.0.1234");
        assert_eq!(receipt.core.network, "main");
        assert_eq!(receipt.core.transaction_hash, "aa");
        assert_eq!(
            receipt.core.transaction_id,
            format!("0.0.1234-{}-000000000", i64::MAX)
        );
        assert!(receipt
            .core
            .transaction_link
            .starts_with("https://hederaexplorer.io/search-details/transaction/"));
        assert_eq!(receipt.amount.to_string(), "0.000005");
        assert_eq!(receipt.receipt_status, "SUCCESS");
    }

    #[test]
    fn test_from_submission_reports_operator_as_sender() {
        let config = NetworkConfig::for_network(NetworkType::TestNet);
        let operator = AccountId::new(0, 0, 9999);
        let submission = SubmissionResult {
            transaction_id: TransactionId::new(payer(), Timestamp::new(1662631612, 1)),
            transaction_hash: Vec::new(),
            node_id: AccountId::new(0, 0, 3),
        };
        let receipt = ReceiptNormalizer::new("test", &config).from_submission(
            &operator,
            &other(),
            &TokenAmount::new(1, 8),
            &submission,
            &ConfirmedReceipt {
                status: "SUCCESS".to_string(),
            },
        );

        assert_eq!(receipt.core.from, "0.0.9999");
        assert_eq!(receipt.core.transaction_id, "0.0.1234-1662631612-000000001");
    }

    proptest! {
        #[test]
        fn failure_flags_are_symmetric(status in "[A-Z_]{0,24}") {
            let config = NetworkConfig::default();
            let receipt = ReceiptNormalizer::new("test", &config)
                .from_record(&record(&status, Vec::new(), Vec::new()));
            prop_assert_eq!(receipt.is_failed, receipt.is_invalid);
            prop_assert_eq!(receipt.is_failed, !receipt.is_successful);
        }

        #[test]
        fn payer_leg_position_does_not_matter(amount in 1i64..i64::MAX, payer_first in any::<bool>()) {
            let mut legs = vec![native_leg(other(), amount), native_leg(payer(), -amount)];
            if payer_first {
                legs.reverse();
            }
            let paid = payer_amount(&payer(), &legs, &[]);
            prop_assert_eq!(paid.value(), &BigInt::from(amount));
        }
    }
}
