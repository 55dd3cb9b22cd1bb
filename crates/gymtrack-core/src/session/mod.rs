//! Authentication session management.
//!
//! The [`SessionManager`] owns the single in-memory source of truth for
//! the current authenticated user, keeps it consistent with the two
//! stored session records and the remote API, and notifies subscribers
//! synchronously on every state change.

mod manager;
mod state;
mod subscribers;

pub use manager::{SessionError, SessionManager};
pub use state::{AuthStatus, SessionState, User};
pub use subscribers::{SubscriberId, SubscriberRegistry};
