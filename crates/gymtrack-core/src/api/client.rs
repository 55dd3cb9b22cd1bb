//! The HTTP client over the GymTrack API.

use serde::Deserialize;

use super::{ApiError, AuthApi, AuthorizationContext, CreatedSession, ProfileUpdate};
use crate::api::DEFAULT_SERVER_MESSAGE;
use crate::session::User;

/// Blocking client over the GymTrack HTTP API.
///
/// Authenticated endpoints read the current header from the injected
/// [`AuthorizationContext`] on every call, so the client never has to be
/// rebuilt across sign-in and sign-out.
pub struct HttpApiClient {
    base_url: String,
    agent: ureq::Agent,
    authorization: AuthorizationContext,
}

/// Error body shape used by the API for declared failures.
#[derive(Deserialize)]
struct ServerMessage {
    message: Option<String>,
}

/// Session response before validation; either field may be missing.
#[derive(Deserialize)]
struct RawSession {
    user: Option<User>,
    token: Option<String>,
}

/// Avatar upload response.
#[derive(Deserialize)]
struct AvatarResponse {
    avatar: String,
}

impl HttpApiClient {
    /// Create a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, authorization: AuthorizationContext) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: ureq::agent(),
            authorization,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the current Authorization header, if one is set.
    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        match self.authorization.header() {
            Some(header) => request.set("Authorization", &header),
            None => request,
        }
    }
}

impl AuthApi for HttpApiClient {
    fn create_session(&self, email: &str, password: &str) -> Result<CreatedSession, ApiError> {
        let response = self
            .agent
            .post(&self.url("/sessions"))
            .send_json(serde_json::json!({ "email": email, "password": password }))
            .map_err(map_error)?;

        let raw: RawSession = response
            .into_json()
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        validate_session(raw)
    }

    fn create_account(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.agent
            .post(&self.url("/users"))
            .send_json(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .map_err(map_error)?;

        Ok(())
    }

    fn update_user(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.authorized(self.agent.put(&self.url("/users")))
            .send_json(update)
            .map_err(map_error)?;

        Ok(())
    }

    fn upload_avatar(&self, file_name: &str, bytes: &[u8]) -> Result<String, ApiError> {
        let boundary = format!("----gymtrack-{}", uuid::Uuid::new_v4());
        let body = multipart_body(&boundary, "avatar", file_name, bytes);

        let response = self
            .authorized(self.agent.patch(&self.url("/users/avatar")))
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(map_error)?;

        let avatar: AvatarResponse = response
            .into_json()
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        Ok(avatar.avatar)
    }
}

/// Map a transport/status failure to the API error taxonomy.
///
/// The server-declared `message` is surfaced unchanged; the default string
/// is used only when the body carried none.
fn map_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = parse_server_message(&body)
                .unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string());

            if status == 401 {
                ApiError::InvalidCredentials(message)
            } else {
                ApiError::Server { status, message }
            }
        }
        ureq::Error::Transport(transport) => ApiError::Network(transport.to_string()),
    }
}

/// Extract the declared `message` from an error body, if any.
fn parse_server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ServerMessage>(body)
        .ok()
        .and_then(|m| m.message)
        .filter(|m| !m.is_empty())
}

/// A session response must carry both a user and a non-empty token.
fn validate_session(raw: RawSession) -> Result<CreatedSession, ApiError> {
    match (raw.user, raw.token) {
        (Some(user), Some(token)) if !token.is_empty() => Ok(CreatedSession { user, token }),
        (None, _) => Err(ApiError::MalformedResponse(
            "session response missing user".to_string(),
        )),
        _ => Err(ApiError::MalformedResponse(
            "session response missing token".to_string(),
        )),
    }
}

/// Build a single-field multipart/form-data body.
fn multipart_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

// ============================================================================
// TESTS
// ============================================================================
