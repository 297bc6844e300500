//! Client (bank customer) domain model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::user::User;
use super::wire;

/// A bank customer's identity record. Owned by the backend; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: String,
    #[serde(rename = "telephone")]
    pub phone: String,
    #[serde(rename = "adresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        rename = "dateNaissance",
        default,
        with = "wire::date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<NaiveDate>,
    /// National identity card number
    #[serde(rename = "cin", default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(rename = "dateCreation", with = "wire::datetime")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "nombreComptes", default, skip_serializing_if = "Option::is_none")]
    pub account_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(rename = "comptes", default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Account>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
