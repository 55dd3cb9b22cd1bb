//! Session state types.

use serde::{Deserialize, Serialize};

/// The authenticated account's profile.
///
/// Mutable only through explicit profile updates, which replace the whole
/// in-memory record at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,

    /// Stored avatar identifier, if one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Authentication status.
///
/// `Unknown` exists only before [`restore`](super::SessionManager::restore)
/// has run; the surrounding application must await restore before enabling
/// interactive sign-in/out. `Anonymous` and `Authenticated` are the two
/// stable states, and neither is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStatus {
    Unknown,
    Anonymous,
    Authenticated,
}

/// The published session state.
///
/// Consumers must treat `user` as read-only; `user` is `Some` exactly when
/// `status` is [`AuthStatus::Authenticated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub status: AuthStatus,
    pub user: Option<User>,
    pub is_loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: AuthStatus::Unknown,
            user: None,
            is_loading: false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
