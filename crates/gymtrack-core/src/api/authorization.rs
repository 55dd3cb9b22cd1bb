//! The shared default Authorization header.
//!
//! Every collaborator that makes authenticated calls holds a clone of the
//! same [`AuthorizationContext`]; only the session manager sets or clears
//! it. This keeps what would otherwise be a hidden process-wide global as
//! an explicit, injected dependency.

use std::sync::{Arc, RwLock};

/// Cheaply clonable handle to the current default Authorization header.
#[derive(Clone, Default)]
pub struct AuthorizationContext {
    header: Arc<RwLock<Option<String>>>,
}

impl AuthorizationContext {
    /// Create an empty (unauthenticated) context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header from a bearer token.
    pub fn set_token(&self, token: &str) {
        *self.header.write().unwrap() = Some(format!("Bearer {token}"));
    }

    /// Clear the header. Subsequent calls go out unauthenticated.
    pub fn clear(&self) {
        *self.header.write().unwrap() = None;
    }

    /// The current `Authorization` header value, if any.
    pub fn header(&self) -> Option<String> {
        self.header.read().unwrap().clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
