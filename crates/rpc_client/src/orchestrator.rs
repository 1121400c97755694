//! Builds, submits and confirms single-payee transfers.

use crate::error::{GatewayError, GatewayResult};
use crate::session::{ConfirmedReceipt, LedgerSession, SubmissionResult};
use crate::transfer::TransferTransaction;
use hedera_core::{AccountId, AmountError, TokenAmount, TokenId};
use tracing::{debug, info};

/// A validated transfer from the session operator to one payee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Payee.
    pub to: AccountId,
    /// Positive amount; its decimals tag token legs.
    pub amount: TokenAmount,
    /// Token moved, `None` for the native currency.
    pub token_id: Option<TokenId>,
}

impl TransferRequest {
    /// Creates a request, rejecting amounts the ledger cannot carry.
    pub fn new(
        to: AccountId,
        amount: TokenAmount,
        token_id: Option<TokenId>,
    ) -> Result<Self, AmountError> {
        let request = Self {
            to,
            amount,
            token_id,
        };
        request.units()?;
        Ok(request)
    }

    /// Amount in smallest units; strictly positive and within `i64`.
    pub fn units(&self) -> Result<i64, AmountError> {
        if !self.amount.is_positive() {
            return Err(AmountError::NotPositive {
                value: self.amount.to_string(),
            });
        }
        self.amount.to_i64()
    }

    /// Builds the debit/credit pair paid by `from`.
    ///
    /// Token transfers are frozen and operator-signed here; native ones are
    /// left open for the session to finalize.
    pub fn build_transaction(&self, from: &AccountId) -> GatewayResult<TransferTransaction> {
        let units = self.units()?;

        let mut transaction = TransferTransaction::new();
        match &self.token_id {
            None => {
                transaction
                    .add_native_transfer(from.clone(), -units)?
                    .add_native_transfer(self.to.clone(), units)?;
            }
            Some(token_id) => {
                let decimals = self.amount.decimals();
                transaction
                    .add_token_transfer_with_decimals(
                        token_id.clone(),
                        from.clone(),
                        -units,
                        decimals,
                    )?
                    .add_token_transfer_with_decimals(
                        token_id.clone(),
                        self.to.clone(),
                        units,
                        decimals,
                    )?
                    .freeze()?
                    .sign_with_operator()?;
            }
        }
        transaction.check_balanced()?;
        Ok(transaction)
    }
}

/// Runs a transfer through a session: build, submit, await the receipt.
///
/// Session failures surface unchanged as [`GatewayError::SubmissionFailed`];
/// nothing is retried.
pub async fn submit<S>(
    request: &TransferRequest,
    session: &S,
) -> GatewayResult<(SubmissionResult, ConfirmedReceipt)>
where
    S: LedgerSession + ?Sized,
{
    let transaction = request.build_transaction(session.operator_id())?;
    let signing_required = transaction.is_operator_signed();
    debug!(
        to = %request.to,
        token_id = ?request.token_id.as_ref().map(ToString::to_string),
        signing_required,
        "submitting transfer"
    );

    let submission = session
        .submit_transfer(transaction.entries(), signing_required)
        .await
        .map_err(GatewayError::SubmissionFailed)?;
    info!(transaction_id = %submission.transaction_id, "transfer submitted");

    let receipt = session
        .await_receipt(&submission)
        .await
        .map_err(GatewayError::SubmissionFailed)?;
    info!(
        transaction_id = %submission.transaction_id,
        status = %receipt.status,
        "transfer confirmed"
    );

    Ok((submission, receipt))
}
