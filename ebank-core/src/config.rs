//! Configuration management
//!
//! Settings live in `<ebank_dir>/settings.json`:
//! ```json
//! { "apiUrl": "https://ebank.example.ma/api" }
//! ```
//! Fields this crate doesn't manage are preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the configured backend URL
pub const API_URL_ENV: &str = "EBANK_API_URL";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// eBank client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Effective backend base URL (environment override applied)
    pub api_url: String,
    // What settings.json holds, so an env override is never written back
    stored_api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            stored_api_url: None,
        }
    }
}

impl Config {
    /// Load config from the eBank directory
    ///
    /// The backend URL comes from, in order: `EBANK_API_URL`, the settings
    /// file, [`DEFAULT_API_URL`].
    pub fn load(ebank_dir: &Path) -> Result<Self> {
        let env_url = std::env::var(API_URL_ENV).ok();
        Self::load_with_override(ebank_dir, env_url)
    }

    fn load_with_override(ebank_dir: &Path, override_url: Option<String>) -> Result<Self> {
        let raw = read_settings(ebank_dir)?;
        let stored_api_url = raw.api_url.filter(|u| !u.trim().is_empty());

        let api_url = override_url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| stored_api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_url,
            stored_api_url,
        })
    }

    /// Save config to the eBank directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, ebank_dir: &Path) -> Result<()> {
        let mut settings = read_settings(ebank_dir).unwrap_or_default();
        settings.api_url = self.stored_api_url.clone();

        std::fs::create_dir_all(ebank_dir)
            .with_context(|| format!("Failed to create {}", ebank_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(ebank_dir.join(SETTINGS_FILE), content)
            .context("Failed to write settings.json")?;
        Ok(())
    }

    /// Point the client at another backend; only http(s) URLs are accepted
    pub fn set_api_url(&mut self, raw: &str) -> Result<()> {
        let parsed = url::Url::parse(raw.trim())
            .with_context(|| format!("Invalid backend URL: {}", raw))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("Backend URL must use http or https, got {}", parsed.scheme());
        }

        let normalized = parsed.as_str().trim_end_matches('/').to_string();
        self.api_url = normalized.clone();
        self.stored_api_url = Some(normalized);
        Ok(())
    }

    /// Forget the configured URL and fall back to the default
    pub fn reset_api_url(&mut self) {
        self.api_url = DEFAULT_API_URL.to_string();
        self.stored_api_url = None;
    }
}

fn read_settings(ebank_dir: &Path) -> Result<SettingsFile> {
    let settings_path = ebank_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}
