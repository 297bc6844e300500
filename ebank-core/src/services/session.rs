//! Session store - the authenticated identity of the running client
//!
//! Anonymous until a login succeeds, then holds the bearer token and user
//! until logout. Every transition is mirrored to a [`SessionStorage`] so a
//! restarted client picks the session back up through [`SessionStore::hydrate`].

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::domain::responses::AuthResponse;
use crate::domain::result::Result;
use crate::domain::User;
use crate::ports::{Session, SessionReader, SessionStorage};

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "ebank_token";

/// Storage key of the JSON-encoded user
pub const USER_KEY: &str = "ebank_user";

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Start anonymous without reading storage
    pub fn anonymous(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(None),
        }
    }

    /// Restore the persisted session, if any
    ///
    /// Never fails: unreadable storage, a missing key or a malformed user
    /// record all yield an anonymous store.
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let session = read_persisted(storage.as_ref());
        match &session {
            Some(s) => debug!(user = %s.user.username, "session restored"),
            None => debug!("no persisted session"),
        }
        Self {
            storage,
            state: RwLock::new(session),
        }
    }

    /// Enter the authenticated state and persist it
    ///
    /// When persisting fails the in-memory state is left as it was.
    pub fn login(&self, auth: AuthResponse) -> Result<Session> {
        let user_json = serde_json::to_string(&auth.user)?;

        // Held across persistence so concurrent transitions can't interleave
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.storage.set_many(&[
            (TOKEN_KEY, auth.token.as_str()),
            (USER_KEY, user_json.as_str()),
        ])?;

        let session = Session {
            token: auth.token,
            user: auth.user,
        };
        info!(
            user = %session.user.username,
            role = %session.user.role,
            "session opened"
        );
        *state = Some(session.clone());
        Ok(session)
    }

    /// Drop the session and its persisted keys
    ///
    /// The store is anonymous afterwards even if clearing storage fails.
    pub fn logout(&self) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = state.take() {
            info!(user = %session.user.username, "session closed");
        }

        self.storage.remove_many(&[TOKEN_KEY, USER_KEY])
    }
}

impl SessionReader for SessionStore {
    fn current(&self) -> Option<Session> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn read_persisted(storage: &dyn SessionStorage) -> Option<Session> {
    let token = match storage.get(TOKEN_KEY) {
        Ok(Some(token)) if !token.is_empty() => token,
        Ok(_) => return None,
        Err(e) => {
            warn!(error = %e, "could not read persisted session");
            return None;
        }
    };
    let raw_user = storage.get(USER_KEY).ok().flatten()?;
    match serde_json::from_str::<User>(&raw_user) {
        Ok(user) => Some(Session { token, user }),
        Err(e) => {
            warn!(error = %e, "ignoring malformed persisted user");
            None
        }
    }
}
