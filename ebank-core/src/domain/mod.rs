//! Core domain entities
//!
//! Records exchanged with the banking backend, the request payloads sent to
//! it, and the pure rules (validation, permissions) applied before anything
//! leaves the client. No I/O happens here.

mod account;
mod client;
mod operation;
mod stats;
mod user;
pub mod permission;
pub mod requests;
pub mod responses;
pub mod result;
pub mod validation;
pub mod wire;

pub use account::{mask_account_number, Account, AccountStatus, AccountType};
pub use client::Client;
pub use operation::{Operation, OperationType};
pub use permission::{capabilities_for, is_authorized, Capability};
pub use stats::{ClientStats, GlobalStats};
pub use user::{User, UserRole};
