//! Operation service - deposits, withdrawals, transfers and history
//!
//! Every money movement is validated locally for shape (positive amount,
//! plausible destination number) and then left entirely to the backend,
//! which owns balances and account state.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::adapters::http::{path_with_query, ApiClient};
use crate::domain::requests::{
    DepositRequest, ExportFormat, HistoryQuery, TransferRequest, WithdrawalRequest,
};
use crate::domain::responses::{BalanceUpdate, HistoryPage, OperationResponse, TransferReceipt};
use crate::domain::result::Result;
use crate::domain::validation::validate_date_range;
use crate::domain::Operation;

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Clone)]
pub struct OperationService {
    api: Arc<ApiClient>,
}

impl OperationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn deposit(&self, request: DepositRequest) -> Result<BalanceUpdate> {
        let response: OperationResponse = self.api.post("/operations/depot", Some(&request)).await?;
        let update = response.into_balance_update()?;
        info!(
            account_id = request.account_id(),
            amount = %request.amount(),
            operation_id = update.operation_id,
            "deposit recorded"
        );
        Ok(update)
    }

    /// Debit an account
    ///
    /// An insufficient balance comes back as a domain error whose
    /// [`kind`](crate::domain::result::ApiError::kind) is `InsufficientFunds`.
    pub async fn withdraw(&self, request: WithdrawalRequest) -> Result<BalanceUpdate> {
        let response: OperationResponse =
            self.api.post("/operations/retrait", Some(&request)).await?;
        let update = response.into_balance_update()?;
        info!(
            account_id = request.account_id(),
            amount = %request.amount(),
            operation_id = update.operation_id,
            "withdrawal recorded"
        );
        Ok(update)
    }

    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        let response: OperationResponse =
            self.api.post("/operations/virement", Some(&request)).await?;
        let receipt = response.into_transfer_receipt()?;
        info!(
            source_account_id = request.source_account_id(),
            amount = %request.amount(),
            operation_id = receipt.operation_id,
            "transfer recorded"
        );
        Ok(receipt)
    }

    /// One page of an account's history; only the filters that are set are sent
    pub async fn history(&self, account_id: i64, query: &HistoryQuery) -> Result<HistoryPage> {
        query.validate()?;
        let path = path_with_query(
            &format!("/operations/historique/{}", account_id),
            &query.to_query_pairs(),
        );
        self.api.get(&path).await
    }

    pub async fn get(&self, operation_id: i64) -> Result<Operation> {
        self.api.get(&format!("/operations/{}", operation_id)).await
    }

    /// PDF statement for a date range
    pub async fn statement(&self, account_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<u8>> {
        validate_date_range(Some(from), Some(to))?;
        let path = path_with_query(
            &format!("/operations/releve/{}", account_id),
            &[("dateDebut", date_param(from)), ("dateFin", date_param(to))],
        );
        self.api.get_bytes(&path).await
    }

    /// History export as CSV or Excel
    pub async fn export(
        &self,
        account_id: i64,
        format: ExportFormat,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<u8>> {
        validate_date_range(from, to)?;
        let mut query = vec![("format", format.as_str().to_string())];
        if let Some(from) = from {
            query.push(("dateDebut", date_param(from)));
        }
        if let Some(to) = to {
            query.push(("dateFin", date_param(to)));
        }
        let path = path_with_query(&format!("/operations/export/{}", account_id), &query);
        self.api.get_bytes(&path).await
    }
}
