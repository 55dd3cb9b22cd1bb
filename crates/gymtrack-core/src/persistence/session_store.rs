//! Serialization of the two session records over the key-value substrate.
//!
//! # Design
//!
//! The store owns exactly two logical records: the user profile (JSON under
//! `session.user`) and the bearer token (raw string under `session.token`).
//! All six operations are independently invocable; the pairing invariant
//! (both present or both absent) is enforced by the session manager, not
//! here.

use crate::persistence::kv::{KeyValueStore, StorageError};
use crate::session::User;

/// Storage key for the serialized user profile.
pub const USER_KEY: &str = "session.user";

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "session.token";

/// Durable read/write/clear of the user and token records.
pub struct SessionStore {
    kv: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a store over the given substrate.
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Serialize and write the user record.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(user).map_err(|e| StorageError::Write(e.to_string()))?;
        self.kv.set(USER_KEY, &json)
    }

    /// Read and deserialize the user record.
    ///
    /// Returns `Ok(None)` if the record was never written. A record that
    /// fails to deserialize is discarded as absent, with a diagnostic log,
    /// so a corrupted profile cannot block re-authentication.
    pub fn load_user(&self) -> Result<Option<User>, StorageError> {
        let Some(json) = self.kv.get(USER_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                log::warn!("Discarding corrupt user record: {}", e);
                Ok(None)
            }
        }
    }

    /// Remove the user record. Removing an absent record is Ok.
    pub fn remove_user(&self) -> Result<(), StorageError> {
        self.kv.remove(USER_KEY)
    }

    /// Write the token record as an opaque string.
    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.kv.set(TOKEN_KEY, token)
    }

    /// Read the token record.
    ///
    /// Returns `Ok(None)` if the record was never written. An empty stored
    /// string is treated as absent.
    pub fn load_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.kv.get(TOKEN_KEY)?.filter(|token| !token.is_empty()))
    }

    /// Remove the token record. Removing an absent record is Ok.
    pub fn remove_token(&self) -> Result<(), StorageError> {
        self.kv.remove(TOKEN_KEY)
    }
}

// ============================================================================
// TESTS
// ============================================================================
