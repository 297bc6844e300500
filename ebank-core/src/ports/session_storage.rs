//! Session storage port - client-local persistent key/value strings

use crate::domain::result::Result;

/// Persistent string storage for session state
///
/// Holds a handful of small values under fixed keys and must survive a
/// process restart (the file adapter) or at least the store's lifetime
/// (the in-memory adapter).
pub trait SessionStorage: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never set or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several values at once; either all of them land or none do
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several values at once
    fn remove_many(&self, keys: &[&str]) -> Result<()>;
}
