//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services and the
//! HTTP facade depend only on these traits, not on concrete implementations.

mod session_reader;
mod session_storage;

pub use session_reader::{Session, SessionReader};
pub use session_storage::SessionStorage;
