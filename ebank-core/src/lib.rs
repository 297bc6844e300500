//! eBank Core - typed client for the eBank banking backend
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Records, request payloads, validation and permission rules
//! - **ports**: Trait definitions for external dependencies (SessionStorage, SessionReader)
//! - **services**: Banking operations and the session store
//! - **adapters**: Concrete implementations (reqwest HTTP facade, JSON session file)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::http::ApiClient;
use adapters::storage::FileSessionStorage;
use config::Config;
use ports::{SessionReader, SessionStorage};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{ApiError, DomainErrorKind, Error};
pub use domain::{
    Account, AccountStatus, AccountType, Capability, Client, ClientStats, GlobalStats, Operation,
    OperationType, User, UserRole,
};
pub use ports::Session;

/// Main context for eBank operations
///
/// Entry point for all client logic: holds the configuration, the session
/// store, the shared HTTP facade and one instance of every service.
pub struct EbankContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub operation_service: OperationService,
    pub client_service: ClientService,
    pub stats_service: StatsService,
    pub dashboard_service: DashboardService,
}

impl EbankContext {
    /// Create a context whose session is persisted under `ebank_dir`
    pub fn new(ebank_dir: &Path) -> Result<Self> {
        let config = Config::load(ebank_dir)?;
        let storage = Arc::new(FileSessionStorage::new(ebank_dir));
        Self::with_storage(config, storage)
    }

    /// Create a context over any session storage backend
    pub fn with_storage(config: Config, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let session = Arc::new(SessionStore::hydrate(storage));
        let reader: Arc<dyn SessionReader> = session.clone();
        let api = Arc::new(ApiClient::new(&config.api_url, reader)?);

        let auth_service = AuthService::new(Arc::clone(&api), Arc::clone(&session));
        let account_service = AccountService::new(Arc::clone(&api));
        let operation_service = OperationService::new(Arc::clone(&api));
        let client_service = ClientService::new(Arc::clone(&api));
        let stats_service = StatsService::new(Arc::clone(&api));
        let dashboard_service =
            DashboardService::new(account_service.clone(), stats_service.clone());

        Ok(Self {
            config,
            session,
            api,
            auth_service,
            account_service,
            operation_service,
            client_service,
            stats_service,
            dashboard_service,
        })
    }

    /// The logged-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.session.user()
    }
}
