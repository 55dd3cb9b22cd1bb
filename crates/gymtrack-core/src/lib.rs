//! # gymtrack-core
//!
//! Core session and API logic for GymTrack, the gym/exercise tracking client.
//!
//! This crate is framework-agnostic and can be used by:
//! - Mobile shells (via FFI bindings)
//! - Desktop apps (via commands)
//! - A CLI or test harness
//!
//! ## Key Concepts
//!
//! - **Session**: an authenticated [`User`] paired with a bearer token,
//!   mirrored in memory and in durable storage
//! - **Restore**: the startup operation that reconstructs a session from
//!   durable storage
//! - **Publish**: synchronous notification of all registered subscribers
//!   with the current [`SessionState`]

pub mod api;
pub mod paths;
pub mod persistence;
pub mod session;

// Re-export commonly used types
pub use api::{
    ApiError, AuthApi, AuthorizationContext, CreatedSession, HttpApiClient, ProfileUpdate,
};
pub use persistence::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SessionStore, StorageError,
};
pub use session::{AuthStatus, SessionError, SessionManager, SessionState, SubscriberId, User};
