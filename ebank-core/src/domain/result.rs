//! Result and error types for the core library

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::ValidationError;

/// Generic failure message shown when the backend gives nothing better
pub const GENERIC_ERROR_MESSAGE: &str = "Une erreur est survenue";

/// Message used for 401/403 responses without a readable body
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expirée, veuillez vous reconnecter";

/// Error codes the backend uses for an insufficient balance
const INSUFFICIENT_FUNDS_CODES: &[&str] = &["SOLDE_INSUFFISANT", "INSUFFICIENT_FUNDS"];

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// Local shape-rule failure; the request never left the client
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Network failure, unreadable or unexpected response
    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// Business failure reported by the backend
    #[error("{0}")]
    Domain(ApiError),

    /// Missing, expired or rejected token
    #[error("{0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error without an HTTP status
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            status: None,
        }
    }

    /// Create an unexpected-response error for a missing field
    pub fn unexpected_response(missing: &str) -> Self {
        Self::transport(format!("Réponse inattendue du serveur: champ '{}' manquant", missing))
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True for errors the caller should answer by re-authenticating
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The backend error payload, if this is a domain error
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Domain(api) => Some(api),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error payload as sent by the backend on non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, with = "super::wire::amount_opt")]
    pub solde_actuel: Option<Decimal>,
    #[serde(default, with = "super::wire::amount_opt")]
    pub montant_demande: Option<Decimal>,
}

/// Classification of a backend business failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    InsufficientFunds,
    NotFound,
    Other,
}

/// Backend-reported business failure, message kept verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub code: Option<String>,
    pub current_balance: Option<Decimal>,
    pub requested_amount: Option<Decimal>,
}

impl ApiError {
    pub fn from_body(status: u16, body: ApiErrorBody) -> Self {
        Self {
            status,
            message: body.message,
            code: body.code,
            current_balance: body.solde_actuel,
            requested_amount: body.montant_demande,
        }
    }

    pub fn kind(&self) -> DomainErrorKind {
        let code_matches = self
            .code
            .as_deref()
            .map(|c| INSUFFICIENT_FUNDS_CODES.iter().any(|k| c.eq_ignore_ascii_case(k)))
            .unwrap_or(false);

        if code_matches || (self.current_balance.is_some() && self.requested_amount.is_some()) {
            DomainErrorKind::InsufficientFunds
        } else if self.status == 404 {
            DomainErrorKind::NotFound
        } else {
            DomainErrorKind::Other
        }
    }

    pub fn is_insufficient_funds(&self) -> bool {
        self.kind() == DomainErrorKind::InsufficientFunds
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
