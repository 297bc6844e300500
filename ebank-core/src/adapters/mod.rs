//! Adapter implementations
//!
//! Adapters implement the ports with concrete technologies:
//! - reqwest HTTP client for the eBank REST backend
//! - JSON file and in-memory backends for session storage

pub mod http;
pub mod storage;

#[cfg(test)]
pub mod mock_backend;
