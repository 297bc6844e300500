//! Account service - bank account lookup and administration

use std::sync::Arc;

use tracing::info;

use crate::adapters::http::{path_with_query, ApiClient};
use crate::domain::requests::{CreateAccountRequest, UpdateAccountStatusRequest};
use crate::domain::responses::{BalanceResponse, MessageResponse, StatusChangeResponse, WithMessage};
use crate::domain::result::Result;
use crate::domain::{Account, AccountStatus};

#[derive(Clone)]
pub struct AccountService {
    api: Arc<ApiClient>,
}

impl AccountService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Accounts visible to the caller, optionally narrowed to one client
    pub async fn list(&self, client_id: Option<i64>) -> Result<Vec<Account>> {
        let query: Vec<(&str, String)> = client_id
            .map(|id| vec![("clientId", id.to_string())])
            .unwrap_or_default();
        self.api.get(&path_with_query("/comptes", &query)).await
    }

    pub async fn get(&self, account_id: i64) -> Result<Account> {
        self.api.get(&format!("/comptes/{}", account_id)).await
    }

    /// Fresh balance straight from the ledger
    pub async fn balance(&self, account_id: i64) -> Result<BalanceResponse> {
        self.api.get(&format!("/comptes/{}/solde", account_id)).await
    }

    pub async fn create(&self, request: CreateAccountRequest) -> Result<WithMessage<Account>> {
        let created: WithMessage<Account> = self.api.post("/comptes", Some(&request)).await?;
        info!(
            account_id = created.record.id,
            account_type = created.record.account_type.as_str(),
            "account created"
        );
        Ok(created)
    }

    pub async fn update_status(
        &self,
        account_id: i64,
        status: AccountStatus,
    ) -> Result<StatusChangeResponse> {
        let request = UpdateAccountStatusRequest::new(status);
        let response: StatusChangeResponse = self
            .api
            .patch(&format!("/comptes/{}/statut", account_id), Some(&request))
            .await?;
        info!(account_id, status = response.new_status.as_str(), "account status changed");
        Ok(response)
    }

    pub async fn delete(&self, account_id: i64) -> Result<MessageResponse> {
        let response: MessageResponse = self.api.delete(&format!("/comptes/{}", account_id)).await?;
        info!(account_id, "account deleted");
        Ok(response)
    }
}
