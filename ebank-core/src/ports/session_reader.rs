//! Read-only view of the authenticated session

use serde::{Deserialize, Serialize};

use crate::domain::User;

/// An authenticated identity and its bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Read capability over the current session
///
/// Handed to every consumer that needs to know who is logged in (the HTTP
/// facade, the CLI). Writing is reserved to the session store's login and
/// logout transitions.
pub trait SessionReader: Send + Sync {
    fn current(&self) -> Option<Session>;

    fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    fn user(&self) -> Option<User> {
        self.current().map(|s| s.user)
    }

    fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}
