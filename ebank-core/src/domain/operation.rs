//! Banking operation domain model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    #[serde(rename = "DEPOT")]
    Deposit,
    #[serde(rename = "RETRAIT")]
    Withdrawal,
    #[serde(rename = "VIREMENT")]
    Transfer,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "DEPOT",
            OperationType::Withdrawal => "RETRAIT",
            OperationType::Transfer => "VIREMENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationType::Deposit => "Dépôt",
            OperationType::Withdrawal => "Retrait",
            OperationType::Transfer => "Virement",
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEPOT" | "DEPOSIT" => Ok(OperationType::Deposit),
            "RETRAIT" | "WITHDRAWAL" => Ok(OperationType::Withdrawal),
            "VIREMENT" | "TRANSFER" => Ok(OperationType::Transfer),
            other => Err(format!("unknown operation type: {}", other)),
        }
    }
}

/// A deposit, withdrawal or transfer. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: OperationType,
    #[serde(rename = "montant", with = "wire::amount")]
    pub amount: Decimal,
    #[serde(with = "wire::datetime")]
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "soldeAvant",
        default,
        with = "wire::amount_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_before: Option<Decimal>,
    #[serde(
        rename = "soldeApres",
        default,
        with = "wire::amount_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_after: Option<Decimal>,
    #[serde(rename = "statut", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Source account number
    #[serde(rename = "compteSource", default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
    /// Destination account number
    #[serde(rename = "compteDestination", default, skip_serializing_if = "Option::is_none")]
    pub destination_account: Option<String>,
    #[serde(rename = "compteSourceId", default, skip_serializing_if = "Option::is_none")]
    pub source_account_id: Option<i64>,
    #[serde(rename = "compteDestId", default, skip_serializing_if = "Option::is_none")]
    pub destination_account_id: Option<i64>,
}

impl Operation {
    /// Signed effect of this operation on `account_id`: credits are
    /// positive, debits negative
    pub fn signed_amount_for(&self, account_id: i64) -> Decimal {
        match self.kind {
            OperationType::Deposit => self.amount,
            OperationType::Withdrawal => -self.amount,
            OperationType::Transfer => {
                if self.destination_account_id == Some(account_id) {
                    self.amount
                } else {
                    -self.amount
                }
            }
        }
    }
}
