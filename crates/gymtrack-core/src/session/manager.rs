//! SessionManager - the heart of authentication state.
//!
//! Orchestrates restore-on-launch, sign-in, sign-up, sign-out, and profile
//! updates across three collaborators: the remote API, the session store,
//! and the shared Authorization header. Two ordering rules are load-bearing:
//!
//! - **Sign-in: durability before visibility.** The session is written to
//!   storage before it becomes the in-memory authenticated state. A session
//!   live in memory but not on disk would silently vanish on the next
//!   restore.
//! - **Sign-out: visibility before durability.** The anonymous state is
//!   published before storage is cleared. A failed clear must not resurrect
//!   a session the user explicitly terminated.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::state::{AuthStatus, SessionState, User};
use super::subscribers::{SubscriberId, SubscriberRegistry};
use crate::api::{ApiError, AuthApi, AuthorizationContext};
use crate::persistence::{SessionStore, StorageError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("no authenticated user")]
    NotAuthenticated,
}

/// Orchestrates the authenticated session across restarts.
///
/// The manager is the only writer of the in-memory state, the stored
/// session records, and the Authorization header. All state mutations
/// publish the resulting [`SessionState`] to subscribers synchronously,
/// outside the state lock.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
    authorization: AuthorizationContext,
    state: Mutex<SessionState>,
    subscribers: SubscriberRegistry,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: SessionStore,
        authorization: AuthorizationContext,
    ) -> Self {
        Self {
            api,
            store,
            authorization,
            state: Mutex::new(SessionState::default()),
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.state.lock().unwrap().clone()
    }

    /// Current authentication status.
    pub fn status(&self) -> AuthStatus {
        self.state.lock().unwrap().status
    }

    /// The authenticated user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    /// Register a listener for every subsequent state publish.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SessionState) + Send + Sync + 'static,
    ) -> SubscriberId {
        self.subscribers.subscribe(listener)
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&self, id: &SubscriberId) {
        self.subscribers.unsubscribe(id);
    }

    /// Mutate the state under the lock, then publish the result outside it.
    fn publish(&self, mutate: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.state.lock().unwrap();
            mutate(&mut state);
            state.clone()
        };
        self.subscribers.notify(&snapshot);
    }

    /// Reconstruct the session from durable storage. Run once, at startup,
    /// before any interactive call.
    ///
    /// Never fails outward: read faults and corrupt records degrade to the
    /// anonymous state. The loading flag is cleared on every path.
    pub fn restore(&self) -> AuthStatus {
        if self.status() != AuthStatus::Unknown {
            log::warn!("restore() called more than once; ignoring");
            return self.status();
        }

        self.publish(|state| state.is_loading = true);

        let user = self.store.load_user().unwrap_or_else(|e| {
            log::warn!("Could not read stored user: {}", e);
            None
        });
        let token = self.store.load_token().unwrap_or_else(|e| {
            log::warn!("Could not read stored token: {}", e);
            None
        });

        // Both records or nothing. A lone record is ignored rather than
        // loaded, and the other record is left in place: a transient read
        // fault must not wipe valid data.
        match (user, token) {
            (Some(user), Some(token)) => {
                self.authorization.set_token(&token);
                self.publish(|state| {
                    state.status = AuthStatus::Authenticated;
                    state.user = Some(user);
                    state.is_loading = false;
                });
                AuthStatus::Authenticated
            }
            _ => {
                self.publish(|state| {
                    state.status = AuthStatus::Anonymous;
                    state.user = None;
                    state.is_loading = false;
                });
                AuthStatus::Anonymous
            }
        }
    }

    /// Exchange credentials for a durable authenticated session.
    ///
    /// On failure the in-memory state, the stored records, and the
    /// Authorization header are all left as they were; only the loading
    /// flag is touched.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User, SessionError> {
        self.publish(|state| state.is_loading = true);

        match self.establish_session(email, password) {
            Ok(user) => {
                self.publish(|state| {
                    state.status = AuthStatus::Authenticated;
                    state.user = Some(user.clone());
                    state.is_loading = false;
                });
                Ok(user)
            }
            Err(e) => {
                self.publish(|state| state.is_loading = false);
                Err(e)
            }
        }
    }

    /// Durability before visibility: persist the session, then set the
    /// header. Nothing in memory changes until both records are written.
    fn establish_session(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let session = self.api.create_session(email, password)?;

        self.store.save_user(&session.user)?;
        if let Err(e) = self.store.save_token(&session.token) {
            // Keep the records paired: a lone user record must not survive
            if let Err(cleanup) = self.store.remove_user() {
                log::warn!(
                    "Could not remove user record after failed token write: {}",
                    cleanup
                );
            }
            return Err(e.into());
        }

        self.authorization.set_token(&session.token);
        Ok(session.user)
    }

    /// Register a new account, then sign it in.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, SessionError> {
        self.api.create_account(name, email, password)?;
        self.sign_in(email, password)
    }

    /// Terminate the session.
    ///
    /// The anonymous state is published before storage is touched, so the
    /// UI never shows a stale authenticated state during the clear. A
    /// storage failure is reported but does not roll the state back; both
    /// records are attempted regardless.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.publish(|state| {
            state.status = AuthStatus::Anonymous;
            state.user = None;
            state.is_loading = true;
        });
        self.authorization.clear();

        let user_result = self.store.remove_user();
        let token_result = self.store.remove_token();

        self.publish(|state| state.is_loading = false);

        user_result.and(token_result)?;
        Ok(())
    }

    /// Replace the authenticated user's profile.
    ///
    /// Optimistic: the new user is published before it is persisted, and a
    /// persistence failure propagates without rolling it back. The
    /// in-memory value is the source of truth for what the user intended;
    /// callers may retry the write independently.
    pub fn update_profile(&self, user: User) -> Result<(), SessionError> {
        if self.status() != AuthStatus::Authenticated {
            return Err(SessionError::NotAuthenticated);
        }

        self.publish(|state| state.user = Some(user.clone()));
        self.store.save_user(&user)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
