//! Persistence layer for the stored session.
//!
//! # Overview
//!
//! This module handles all durable storage for GymTrack's session state:
//!
//! - **KeyValueStore** - the storage substrate: opaque string-keyed blobs
//! - **SessionStore** - serialization of the two session records over it
//!
//! # File Locations
//!
//! With the file-backed store, all data lives under the app's data
//! directory:
//!
//! ```text
//! ~/.gymtrack/                     (or platform equivalent)
//! ├── session.user                 # Serialized user profile (JSON)
//! └── session.token                # Bearer token (opaque string)
//! ```
//!
//! # Design Principles
//!
//! ## Atomic Writes
//!
//! All save operations use write-then-rename to prevent corruption:
//!
//! 1. Write to `<key>.tmp`
//! 2. Rename to `<key>` (atomic on Unix)
//!
//! ## Corruption Is Not Fatal
//!
//! A stored record that no longer deserializes is discarded and reported
//! as absent, never as a hard error: a corrupted profile must not block
//! the user from re-authenticating.

pub mod kv;
pub mod session_store;

// Re-export commonly used items for convenience
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use session_store::{SessionStore, TOKEN_KEY, USER_KEY};
