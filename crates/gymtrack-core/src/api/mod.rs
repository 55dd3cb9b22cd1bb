//! Remote authentication API.
//!
//! # Overview
//!
//! - **AuthApi** - the trait seam the session manager calls through, so
//!   tests can substitute a mock for the network
//! - **HttpApiClient** - the real client over the GymTrack HTTP API
//! - **AuthorizationContext** - the shared default Authorization header,
//!   injected into every collaborator that makes authenticated calls and
//!   mutated only by the session manager

mod authorization;
mod client;

pub use authorization::AuthorizationContext;
pub use client::HttpApiClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::User;

/// Shown when the server rejected a request without declaring a message.
pub const DEFAULT_SERVER_MESSAGE: &str = "The server could not handle the request. Try again later.";

/// Error type for API operations.
///
/// Server-declared messages are surfaced unchanged; [`DEFAULT_SERVER_MESSAGE`]
/// is used only when the response body carried none.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the credentials (HTTP 401).
    #[error("{0}")]
    InvalidCredentials(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Any other server-side rejection.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response parsed, but lacks the fields a session needs.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A freshly issued session: the account's profile plus its bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSession {
    pub user: User,
    pub token: String,
}

/// Fields accepted by the profile update endpoint.
///
/// Password fields are optional: a plain rename sends only `name`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// The remote authentication API as consumed by the session manager.
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session (`POST /sessions`).
    fn create_session(&self, email: &str, password: &str) -> Result<CreatedSession, ApiError>;

    /// Register a new account (`POST /users`). Sign-up is account creation
    /// followed by a normal sign-in of the new account.
    fn create_account(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError>;

    /// Update the authenticated account's profile (`PUT /users`).
    fn update_user(&self, update: &ProfileUpdate) -> Result<(), ApiError>;

    /// Upload a new avatar (`PATCH /users/avatar`); returns the stored
    /// avatar identifier.
    fn upload_avatar(&self, file_name: &str, bytes: &[u8]) -> Result<String, ApiError>;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod api_error {
        use super::*;

        #[test]
        fn invalid_credentials_shows_server_message_verbatim() {
            let error = ApiError::InvalidCredentials("E-mail or password invalid.".to_string());
            assert_eq!(error.to_string(), "E-mail or password invalid.");
        }

        #[test]
        fn server_error_shows_message_not_status() {
            let error = ApiError::Server {
                status: 500,
                message: DEFAULT_SERVER_MESSAGE.to_string(),
            };
            assert_eq!(error.to_string(), DEFAULT_SERVER_MESSAGE);
        }

        #[test]
        fn network_error_shows_cause() {
            let error = ApiError::Network("connection refused".to_string());
            assert!(error.to_string().contains("connection refused"));
        }
    }

    mod profile_update {
        use super::*;

        #[test]
        fn rename_serializes_only_name() {
            let update = ProfileUpdate {
                name: "Ana Maria".to_string(),
                ..Default::default()
            };

            let json = serde_json::to_value(&update).unwrap();

            assert_eq!(json["name"], "Ana Maria");
            assert!(json.get("password").is_none());
            assert!(json.get("old_password").is_none());
        }

        #[test]
        fn password_change_serializes_both_fields() {
            let update = ProfileUpdate {
                name: "Ana".to_string(),
                old_password: Some("secret".to_string()),
                password: Some("stronger".to_string()),
            };

            let json = serde_json::to_value(&update).unwrap();

            assert_eq!(json["old_password"], "secret");
            assert_eq!(json["password"], "stronger");
        }
    }

    mod created_session {
        use super::*;

        #[test]
        fn deserializes_from_session_response() {
            let json = r#"{
                "user": {"id": "1", "name": "Ana", "email": "a@x.com"},
                "token": "tok123"
            }"#;

            let session: CreatedSession = serde_json::from_str(json).unwrap();

            assert_eq!(session.user.id, "1");
            assert_eq!(session.token, "tok123");
        }
    }
}
