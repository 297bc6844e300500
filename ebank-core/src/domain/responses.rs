//! Response payloads returned by the backend

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountStatus;
use super::operation::{Operation, OperationType};
use super::result::{Error, Result};
use super::user::User;
use super::wire;

/// Successful `/auth/login` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// `/auth/refresh` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Bare `{message}` acknowledgement (deletes and the like)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// A created or updated record, plus the backend's confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithMessage<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /comptes/{id}/solde`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    #[serde(rename = "compteId")]
    pub account_id: i64,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "solde", with = "wire::amount")]
    pub balance: Decimal,
    #[serde(rename = "devise")]
    pub currency: String,
    #[serde(rename = "dateConsultation", with = "wire::datetime")]
    pub checked_at: NaiveDateTime,
}

/// `PATCH /comptes/{id}/statut`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "nouveauStatut")]
    pub new_status: AccountStatus,
}

/// One page of `GET /operations/historique/{compteId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub content: Vec<Operation>,
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    pub size: u32,
}

impl HistoryPage {
    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }
}

/// Raw result of a deposit, withdrawal or transfer
///
/// Which balance fields are set depends on the operation; the typed
/// conversions below pick the ones they need.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub operation_id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<OperationType>,
    #[serde(default)]
    pub compte_id: Option<i64>,
    #[serde(default)]
    pub compte_source_id: Option<i64>,
    #[serde(default)]
    pub compte_dest_id: Option<i64>,
    #[serde(default, with = "wire::amount_opt")]
    pub montant: Option<Decimal>,
    #[serde(default, with = "wire::amount_opt")]
    pub nouveau_solde: Option<Decimal>,
    #[serde(default, with = "wire::amount_opt")]
    pub nouveau_solde_source: Option<Decimal>,
    #[serde(default, with = "wire::amount_opt")]
    pub nouveau_solde_dest: Option<Decimal>,
    #[serde(default, with = "wire::datetime_opt")]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a single-account operation (deposit or withdrawal)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    pub operation_id: i64,
    #[serde(with = "wire::amount")]
    pub new_balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a transfer: balances of both sides after the move
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub operation_id: i64,
    #[serde(with = "wire::amount")]
    pub new_source_balance: Decimal,
    #[serde(with = "wire::amount")]
    pub new_destination_balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationResponse {
    pub fn into_balance_update(self) -> Result<BalanceUpdate> {
        let new_balance = self
            .nouveau_solde
            .ok_or_else(|| Error::unexpected_response("nouveauSolde"))?;
        Ok(BalanceUpdate {
            operation_id: self.operation_id,
            new_balance,
            message: self.message,
        })
    }

    pub fn into_transfer_receipt(self) -> Result<TransferReceipt> {
        let new_source_balance = self
            .nouveau_solde_source
            .ok_or_else(|| Error::unexpected_response("nouveauSoldeSource"))?;
        let new_destination_balance = self
            .nouveau_solde_dest
            .ok_or_else(|| Error::unexpected_response("nouveauSoldeDest"))?;
        Ok(TransferReceipt {
            operation_id: self.operation_id,
            new_source_balance,
            new_destination_balance,
            message: self.message,
        })
    }
}
