//! CLI command implementations

pub mod accounts;
pub mod auth;
pub mod clients;
pub mod config;
pub mod operations;
pub mod stats;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use ebank_core::domain::is_authorized;
use ebank_core::ports::SessionReader;
use ebank_core::{Capability, EbankContext, User};

/// Get the eBank directory from environment or default
pub fn get_ebank_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("EBANK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".ebank"))
        .ok_or_else(|| anyhow!("Could not find home directory; set EBANK_DIR"))
}

/// Get or create the eBank context
pub fn get_context() -> Result<EbankContext> {
    let ebank_dir = get_ebank_dir()?;

    std::fs::create_dir_all(&ebank_dir)
        .with_context(|| format!("Failed to create eBank directory: {:?}", ebank_dir))?;

    tracing::debug!(dir = %ebank_dir.display(), "using eBank directory");
    EbankContext::new(&ebank_dir).context("Failed to initialize eBank context")
}

/// The logged-in user, provided their role grants one of `capabilities`
pub fn require(ctx: &EbankContext, capabilities: &[Capability]) -> Result<User> {
    let user = ctx
        .session
        .user()
        .ok_or_else(|| anyhow!("Vous n'êtes pas connecté. Lancez `ebank login`."))?;

    if !capabilities.iter().any(|c| is_authorized(user.role, *c)) {
        let labels: Vec<_> = capabilities.iter().map(|c| c.label()).collect();
        bail!(
            "Accès refusé: le rôle {} n'a pas accès à {}",
            user.role,
            labels.join(" / ")
        );
    }
    Ok(user)
}

/// Parse a `YYYY-MM-DD` command-line date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Date invalide '{}' (format attendu: AAAA-MM-JJ)", raw))
}

pub fn parse_date_opt(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2024").is_err());
        assert_eq!(parse_date_opt(None).unwrap(), None);
    }
}
