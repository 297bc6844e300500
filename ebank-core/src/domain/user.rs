//! User domain model

use serde::{Deserialize, Serialize};

/// Portal role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Agent,
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Agent => "AGENT",
            UserRole::Client => "CLIENT",
        }
    }

    /// Staff roles see the back-office screens
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Agent)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an authenticated user, as returned by `/auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(default, rename = "nom", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, rename = "prenom", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
            role,
            last_name: None,
            first_name: None,
        }
    }

    /// "Prénom Nom" when known, the username otherwise
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }
}
