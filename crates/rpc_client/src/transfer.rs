//! Transfer transaction assembly.

use crate::error::TransferBuildError;
use hedera_core::{AccountId, TokenId, NATIVE_SYMBOL};
use serde::Serialize;
use std::collections::BTreeMap;

/// Asset moved by a transfer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AssetKind {
    /// The native currency, in tinybars.
    Native,
    /// A fungible token, in its smallest unit.
    Token {
        /// Token being moved.
        token_id: TokenId,
        /// Decimals the sender asserts for the token.
        decimals: u8,
    },
}

/// One signed leg of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEntry {
    /// Account debited (negative) or credited (positive).
    pub account: AccountId,
    /// Signed amount in smallest units.
    pub amount: i64,
    /// Asset moved.
    pub asset: AssetKind,
}

impl TransferEntry {
    /// Native leg.
    pub fn native(account: AccountId, amount: i64) -> Self {
        Self {
            account,
            amount,
            asset: AssetKind::Native,
        }
    }

    /// Token leg tagged with the sender's decimals.
    pub fn token(token_id: TokenId, account: AccountId, amount: i64, decimals: u8) -> Self {
        Self {
            account,
            amount,
            asset: AssetKind::Token { token_id, decimals },
        }
    }

    /// Token id when this is a token leg.
    pub fn token_id(&self) -> Option<&TokenId> {
        match &self.asset {
            AssetKind::Native => None,
            AssetKind::Token { token_id, .. } => Some(token_id),
        }
    }
}

/// A transfer under construction.
///
/// Entries may be added until [`freeze`](Self::freeze) is called; after that
/// the entry list is fixed and the operator signature can be attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferTransaction {
    entries: Vec<TransferEntry>,
    frozen: bool,
    operator_signed: bool,
}

impl TransferTransaction {
    /// Empty, unfrozen transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a native leg.
    pub fn add_native_transfer(
        &mut self,
        account: AccountId,
        amount: i64,
    ) -> Result<&mut Self, TransferBuildError> {
        self.push(TransferEntry::native(account, amount))
    }

    /// Adds a token leg carrying the token's decimals.
    pub fn add_token_transfer_with_decimals(
        &mut self,
        token_id: TokenId,
        account: AccountId,
        amount: i64,
        decimals: u8,
    ) -> Result<&mut Self, TransferBuildError> {
        self.push(TransferEntry::token(token_id, account, amount, decimals))
    }

    fn push(&mut self, entry: TransferEntry) -> Result<&mut Self, TransferBuildError> {
        if self.frozen {
            return Err(TransferBuildError::Frozen);
        }
        self.entries.push(entry);
        Ok(self)
    }

    /// Fixes the entry list after checking it balances.
    pub fn freeze(&mut self) -> Result<&mut Self, TransferBuildError> {
        self.check_balanced()?;
        self.frozen = true;
        Ok(self)
    }

    /// Marks the frozen transaction as signed by the session operator.
    pub fn sign_with_operator(&mut self) -> Result<&mut Self, TransferBuildError> {
        if !self.frozen {
            return Err(TransferBuildError::NotFrozen);
        }
        self.operator_signed = true;
        Ok(self)
    }

    /// Verifies that entries net to zero for every asset.
    pub fn check_balanced(&self) -> Result<(), TransferBuildError> {
        if self.entries.is_empty() {
            return Err(TransferBuildError::Empty);
        }

        let mut sums: BTreeMap<Option<&TokenId>, i128> = BTreeMap::new();
        for entry in &self.entries {
            *sums.entry(entry.token_id()).or_default() += i128::from(entry.amount);
        }

        match sums.into_iter().find(|(_, sum)| *sum != 0) {
            Some((asset, sum)) => Err(TransferBuildError::Unbalanced {
                asset: asset.map_or_else(|| NATIVE_SYMBOL.to_string(), ToString::to_string),
                sum,
            }),
            None => Ok(()),
        }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[TransferEntry] {
        &self.entries
    }

    /// Whether the entry list is fixed.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether the operator signature is attached.
    pub fn is_operator_signed(&self) -> bool {
        self.operator_signed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payer() -> AccountId {
        AccountId::new(0, 0, 1001)
    }

    fn payee() -> AccountId {
        AccountId::new(0, 0, 2002)
    }

    #[test]
    fn test_native_pair_balances() {
        let mut tx = TransferTransaction::new();
        tx.add_native_transfer(payer(), -500)
            .unwrap()
            .add_native_transfer(payee(), 500)
            .unwrap();

        assert!(tx.check_balanced().is_ok());
        assert_eq!(tx.entries().iter().map(|e| e.amount).sum::<i64>(), 0);
        assert!(!tx.is_frozen());
    }

    #[test]
    fn test_unbalanced_is_rejected() {
        let token = TokenId::new(0, 0, 456858);
        let mut tx = TransferTransaction::new();
        tx.add_native_transfer(payer(), -500).unwrap();
        tx.add_native_transfer(payee(), 500).unwrap();
        tx.add_token_transfer_with_decimals(token.clone(), payer(), -10, 2)
            .unwrap();
        tx.add_token_transfer_with_decimals(token, payee(), 9, 2)
            .unwrap();

        assert_eq!(
            tx.freeze().unwrap_err(),
            TransferBuildError::Unbalanced {
                asset: "0.0.456858".to_string(),
                sum: -1,
            }
        );
        assert!(!tx.is_frozen());
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(
            TransferTransaction::new().check_balanced(),
            Err(TransferBuildError::Empty)
        );
    }

    #[test]
    fn test_frozen_rejects_entries() {
        let token = TokenId::new(0, 0, 7);
        let mut tx = TransferTransaction::new();
        tx.add_token_transfer_with_decimals(token.clone(), payer(), -1, 0)
            .unwrap();
        tx.add_token_transfer_with_decimals(token.clone(), payee(), 1, 0)
            .unwrap();
        tx.freeze().unwrap().sign_with_operator().unwrap();

        assert!(tx.is_frozen());
        assert!(tx.is_operator_signed());
        assert_eq!(
            tx.add_token_transfer_with_decimals(token, payee(), 1, 0)
                .unwrap_err(),
            TransferBuildError::Frozen
        );
        assert_eq!(tx.entries().len(), 2);
    }

    #[test]
    fn test_sign_requires_freeze() {
        let mut tx = TransferTransaction::new();
        tx.add_native_transfer(payer(), -1).unwrap();
        tx.add_native_transfer(payee(), 1).unwrap();
        assert_eq!(
            tx.sign_with_operator().unwrap_err(),
            TransferBuildError::NotFrozen
        );
    }

    #[test]
    fn test_extreme_amounts_do_not_overflow_balance_check() {
        let mut tx = TransferTransaction::new();
        tx.add_native_transfer(payer(), i64::MIN).unwrap();
        tx.add_native_transfer(payee(), i64::MIN).unwrap();
        assert!(matches!(
            tx.check_balanced(),
            Err(TransferBuildError::Unbalanced { .. })
        ));
    }
}
