//! Request payloads sent to the backend
//!
//! Every payload is built through a constructor that runs the validation
//! rules, so a value of one of these types is always well formed. Fields are
//! private; the types only exist to be serialized.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::account::{AccountStatus, AccountType};
use super::operation::OperationType;
use super::validation::{
    validate_account_number, validate_amount, validate_date_range, validate_description,
    validate_email, validate_initial_balance, validate_phone, validate_required, ValidationError,
    ValidationResult,
};
use super::wire;

/// Blank descriptions are dropped, long ones rejected
fn normalize_description(description: Option<String>) -> ValidationResult<Option<String>> {
    match description {
        Some(d) if d.trim().is_empty() => Ok(None),
        Some(d) => {
            validate_description(&d)?;
            Ok(Some(d))
        }
        None => Ok(None),
    }
}

/// Blank optional text is treated as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Authentication
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> ValidationResult<Self> {
        let username = username.into();
        let password = password.into();
        validate_required("username", &username)?;
        validate_required("password", &password)?;
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Fields of a self-service registration
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
    email: String,
    #[serde(rename = "nom")]
    last_name: String,
    #[serde(rename = "prenom")]
    first_name: String,
    #[serde(rename = "telephone")]
    phone: String,
}

impl RegisterRequest {
    pub fn new(form: Registration) -> ValidationResult<Self> {
        validate_required("username", &form.username)?;
        validate_required("password", &form.password)?;
        validate_required("nom", &form.last_name)?;
        validate_required("prenom", &form.first_name)?;
        validate_email(&form.email)?;
        validate_phone(&form.phone)?;
        Ok(Self {
            username: form.username,
            password: form.password,
            email: form.email,
            last_name: form.last_name,
            first_name: form.first_name,
            phone: form.phone,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

impl ChangePasswordRequest {
    pub fn new(
        old_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> ValidationResult<Self> {
        let old_password = old_password.into();
        let new_password = new_password.into();
        validate_required("oldPassword", &old_password)?;
        validate_required("newPassword", &new_password)?;
        Ok(Self {
            old_password,
            new_password,
        })
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Credit an account (`POST /operations/depot`)
#[derive(Debug, Clone, Serialize)]
pub struct DepositRequest {
    #[serde(rename = "compteId")]
    account_id: i64,
    #[serde(rename = "montant", with = "wire::amount")]
    amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl DepositRequest {
    pub fn new(
        account_id: i64,
        amount: Decimal,
        description: Option<String>,
    ) -> ValidationResult<Self> {
        validate_amount(amount)?;
        Ok(Self {
            account_id,
            amount,
            description: normalize_description(description)?,
        })
    }

    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Debit an account (`POST /operations/retrait`)
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalRequest {
    #[serde(rename = "compteId")]
    account_id: i64,
    #[serde(rename = "montant", with = "wire::amount")]
    amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl WithdrawalRequest {
    pub fn new(
        account_id: i64,
        amount: Decimal,
        description: Option<String>,
    ) -> ValidationResult<Self> {
        validate_amount(amount)?;
        Ok(Self {
            account_id,
            amount,
            description: normalize_description(description)?,
        })
    }

    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Move money to another account, identified by its number
/// (`POST /operations/virement`)
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    #[serde(rename = "compteSourceId")]
    source_account_id: i64,
    #[serde(rename = "compteDestinationNumero")]
    destination_number: String,
    #[serde(rename = "montant", with = "wire::amount")]
    amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TransferRequest {
    pub fn new(
        source_account_id: i64,
        destination_number: impl Into<String>,
        amount: Decimal,
        description: Option<String>,
    ) -> ValidationResult<Self> {
        let destination_number = destination_number.into();
        validate_account_number(&destination_number)?;
        validate_amount(amount)?;
        Ok(Self {
            source_account_id,
            destination_number,
            amount,
            description: normalize_description(description)?,
        })
    }

    pub fn source_account_id(&self) -> i64 {
        self.source_account_id
    }

    pub fn destination_number(&self) -> &str {
        &self.destination_number
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Filters for `GET /operations/historique/{compteId}`
///
/// Only the filters that are set end up in the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub kind: Option<OperationType>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl HistoryQuery {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_date_range(self.date_from, self.date_to)?;
        if self.size == Some(0) {
            return Err(ValidationError::new(
                "size",
                "La taille de page doit être supérieure à 0",
            ));
        }
        Ok(())
    }

    /// Query parameters in backend naming, in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.date_from {
            pairs.push(("dateDebut", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateFin", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs
    }
}

/// File format for history exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "EXCEL",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CSV" => Ok(ExportFormat::Csv),
            "EXCEL" | "XLSX" => Ok(ExportFormat::Excel),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest {
    #[serde(rename = "clientId")]
    client_id: i64,
    #[serde(rename = "type")]
    account_type: AccountType,
    #[serde(
        rename = "soldeInitial",
        with = "wire::amount_opt",
        skip_serializing_if = "Option::is_none"
    )]
    initial_balance: Option<Decimal>,
}

impl CreateAccountRequest {
    pub fn new(
        client_id: i64,
        account_type: AccountType,
        initial_balance: Option<Decimal>,
    ) -> ValidationResult<Self> {
        if let Some(balance) = initial_balance {
            validate_initial_balance(balance)?;
        }
        Ok(Self {
            client_id,
            account_type,
            initial_balance,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAccountStatusRequest {
    #[serde(rename = "statut")]
    status: AccountStatus,
}

impl UpdateAccountStatusRequest {
    pub fn new(status: AccountStatus) -> Self {
        Self { status }
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }
}

// =============================================================================
// Clients
// =============================================================================

/// Fields of a new client record, with the credentials of its portal user
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateClientRequest {
    #[serde(rename = "nom")]
    last_name: String,
    #[serde(rename = "prenom")]
    first_name: String,
    email: String,
    #[serde(rename = "telephone")]
    phone: String,
    #[serde(rename = "adresse", skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(
        rename = "dateNaissance",
        with = "wire::date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    birth_date: Option<NaiveDate>,
    #[serde(rename = "cin", skip_serializing_if = "Option::is_none")]
    national_id: Option<String>,
    username: String,
    password: String,
}

impl CreateClientRequest {
    pub fn new(client: NewClient) -> ValidationResult<Self> {
        validate_required("nom", &client.last_name)?;
        validate_required("prenom", &client.first_name)?;
        validate_email(&client.email)?;
        validate_phone(&client.phone)?;
        validate_required("username", &client.username)?;
        validate_required("password", &client.password)?;
        Ok(Self {
            last_name: client.last_name,
            first_name: client.first_name,
            email: client.email,
            phone: client.phone,
            address: non_blank(client.address),
            birth_date: client.birth_date,
            national_id: non_blank(client.national_id),
            username: client.username,
            password: client.password,
        })
    }
}

/// Partial update of a client; unset fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateClientRequest {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(rename = "prenom", skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(rename = "telephone", skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(rename = "adresse", skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl UpdateClientRequest {
    pub fn new(update: ClientUpdate) -> ValidationResult<Self> {
        if let Some(last_name) = &update.last_name {
            validate_required("nom", last_name)?;
        }
        if let Some(first_name) = &update.first_name {
            validate_required("prenom", first_name)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
        }

        let request = Self {
            last_name: update.last_name,
            first_name: update.first_name,
            email: update.email,
            phone: update.phone,
            address: update.address,
        };
        if request.is_empty() {
            return Err(ValidationError::new(
                "client",
                "Aucune modification à enregistrer",
            ));
        }
        Ok(request)
    }

    fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}
