//! Service layer - typed banking operations
//!
//! Each service wraps one area of the backend API: it builds validated
//! request payloads, calls the HTTP facade and returns typed results.
//! The session store is the one stateful service.

mod account;
mod auth;
mod client;
mod dashboard;
mod operation;
pub mod session;
mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::AccountService;
pub use auth::AuthService;
pub use client::ClientService;
pub use dashboard::{ClientDashboard, DashboardService};
pub use operation::OperationService;
pub use session::SessionStore;
pub use stats::StatsService;
