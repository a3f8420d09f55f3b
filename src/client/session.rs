//! Session state.
//!
//! The single owner of the in-memory session and of its persisted mirror.
//! Consumers read or subscribe; only the guard commits and clears.

use std::sync::Arc;

use tokio::sync::watch;

use super::storage::{SessionStorage, AUTH_TOKEN_KEY, CURRENT_USER_KEY};
use super::{ClientError, ClientResult};
use crate::domain::SessionUser;

/// A credential token the server has accepted, with its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// What the persisted entries currently hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    /// Neither entry present.
    Absent,
    /// Both entries present and the user record parses.
    Present { token: String, user: SessionUser },
    /// Only one entry present, or the user record is unreadable.
    Broken,
}

/// Shared session state. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct SessionState {
    current: Arc<watch::Sender<Option<Session>>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionState {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
            storage,
        }
    }

    /// The verified session, if any.
    pub fn read(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Watch the verified session for changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Inspect the persisted pair without trusting it.
    pub fn stored(&self) -> StoredSession {
        let token = self.storage.get(AUTH_TOKEN_KEY);
        let user = self.storage.get(CURRENT_USER_KEY);

        match (token, user) {
            (None, None) => StoredSession::Absent,
            (Some(token), Some(user)) if !token.is_empty() => {
                match serde_json::from_str::<SessionUser>(&user) {
                    Ok(user) => StoredSession::Present { token, user },
                    Err(e) => {
                        tracing::debug!(error = %e, "Stored user record unreadable");
                        StoredSession::Broken
                    }
                }
            }
            _ => StoredSession::Broken,
        }
    }

    /// Persist and publish a session the server has just accepted.
    pub(crate) fn commit(&self, session: Session) -> ClientResult<()> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        self.storage.set_all(&[
            (AUTH_TOKEN_KEY, session.token.as_str()),
            (CURRENT_USER_KEY, user.as_str()),
        ])?;
        self.current.send_replace(Some(session));
        Ok(())
    }

    /// Drop the in-memory session and both persisted entries.
    ///
    /// Safe to call with no session. The in-memory session is cleared even
    /// when the storage write fails.
    pub(crate) fn clear(&self) -> ClientResult<()> {
        self.current.send_if_modified(|current| current.take().is_some());
        self.storage.remove_all(&[AUTH_TOKEN_KEY, CURRENT_USER_KEY])
    }
}
