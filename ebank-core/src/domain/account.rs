//! Bank account domain model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "COURANT")]
    Current,
    #[serde(rename = "EPARGNE")]
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Current => "COURANT",
            AccountType::Savings => "EPARGNE",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COURANT" | "CURRENT" => Ok(AccountType::Current),
            "EPARGNE" | "SAVINGS" => Ok(AccountType::Savings),
            other => Err(format!("unknown account type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "ACTIF")]
    Active,
    #[serde(rename = "BLOQUE")]
    Blocked,
    #[serde(rename = "FERME")]
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIF",
            AccountStatus::Blocked => "BLOQUE",
            AccountStatus::Closed => "FERME",
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIF" | "ACTIVE" => Ok(AccountStatus::Active),
            "BLOQUE" | "BLOCKED" => Ok(AccountStatus::Blocked),
            "FERME" | "CLOSED" => Ok(AccountStatus::Closed),
            other => Err(format!("unknown account status: {}", other)),
        }
    }
}

/// A bank account (`CompteBancaire`)
///
/// `balance` is a snapshot taken when the record was fetched; the backend
/// stays authoritative and the value may already be stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(rename = "solde", with = "wire::amount")]
    pub balance: Decimal,
    #[serde(rename = "dateCreation", with = "wire::datetime")]
    pub created_at: NaiveDateTime,
    #[serde(
        rename = "dateModification",
        default,
        with = "wire::datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(rename = "statut")]
    pub status: AccountStatus,
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(rename = "clientNom", default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

impl Account {
    /// Account number reduced to its last four characters, e.g. `****4521`
    pub fn masked_number(&self) -> String {
        mask_account_number(&self.number)
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Mask an account number for display
pub fn mask_account_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() < 4 {
        return "****0000".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
