//! Subscriber registry for session state changes.
//!
//! An ordered list of listeners with synchronous dispatch. Dispatch runs
//! against a snapshot taken under the lock and invokes listeners outside
//! it, so a listener may subscribe or unsubscribe from inside its own
//! callback without deadlocking or affecting the current pass.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::state::SessionState;

/// Unique identifier for a registered subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// Ordered listener registry with synchronous dispatch.
#[derive(Default)]
pub struct SubscriberRegistry {
    listeners: Mutex<Vec<(SubscriberId, Listener)>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every state published after this call.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SessionState) + Send + Sync + 'static,
    ) -> SubscriberId {
        let id = SubscriberId::new();
        self.listeners
            .lock()
            .unwrap()
            .push((id.clone(), Arc::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are ignored, so unsubscribing twice
    /// is harmless.
    pub fn unsubscribe(&self, id: &SubscriberId) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|(registered, _)| registered != id);
    }

    /// Invoke every registered listener, in registration order, with `state`.
    pub fn notify(&self, state: &SessionState) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(state);
        }
    }

    /// Get the current number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::AuthStatus;

    fn anonymous_state() -> SessionState {
        SessionState {
            status: AuthStatus::Anonymous,
            user: None,
            is_loading: false,
        }
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = SubscriberRegistry::new();
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_increments_count() {
        let registry = SubscriberRegistry::new();

        registry.subscribe(|_| {});
        assert_eq!(registry.subscriber_count(), 1);

        registry.subscribe(|_| {});
        assert_eq!(registry.subscriber_count(), 2);
    }

    #[test]
    fn notify_reaches_all_subscribers() {
        let registry = SubscriberRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            registry.subscribe(move |_| seen.lock().unwrap().push(tag));
        }

        registry.notify(&anonymous_state());

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let registry = SubscriberRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let seen = Arc::clone(&seen);
            registry.subscribe(move |_| seen.lock().unwrap().push(n));
        }

        registry.notify(&anonymous_state());

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribed_listener_is_not_notified() {
        let registry = SubscriberRegistry::new();
        let calls = Arc::new(Mutex::new(0));

        let calls_clone = Arc::clone(&calls);
        let id = registry.subscribe(move |_| *calls_clone.lock().unwrap() += 1);

        registry.notify(&anonymous_state());
        registry.unsubscribe(&id);
        registry.notify(&anonymous_state());

        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_unknown_id_is_a_no_op() {
        let registry = SubscriberRegistry::new();
        registry.subscribe(|_| {});

        registry.unsubscribe(&SubscriberId("nonexistent".to_string()));

        assert_eq!(registry.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_during_dispatch_keeps_current_pass_intact() {
        let registry = Arc::new(SubscriberRegistry::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let victim_id = Arc::new(Mutex::new(None::<SubscriberId>));

        // First listener removes the second mid-dispatch
        {
            let registry_clone = Arc::clone(&registry);
            let seen = Arc::clone(&seen);
            let victim_id = Arc::clone(&victim_id);
            registry.subscribe(move |_| {
                seen.lock().unwrap().push("remover");
                if let Some(id) = victim_id.lock().unwrap().as_ref() {
                    registry_clone.unsubscribe(id);
                }
            });
        }
        {
            let seen = Arc::clone(&seen);
            let id = registry.subscribe(move |_| seen.lock().unwrap().push("victim"));
            *victim_id.lock().unwrap() = Some(id);
        }

        // The pass in flight still delivers to the victim
        registry.notify(&anonymous_state());
        assert_eq!(*seen.lock().unwrap(), vec!["remover", "victim"]);

        // The next pass does not
        registry.notify(&anonymous_state());
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["remover", "victim", "remover"]
        );
    }

    #[test]
    fn subscribe_during_dispatch_does_not_deadlock() {
        let registry = Arc::new(SubscriberRegistry::new());

        {
            let registry_clone = Arc::clone(&registry);
            registry.subscribe(move |_| {
                registry_clone.subscribe(|_| {});
            });
        }

        registry.notify(&anonymous_state());

        assert_eq!(registry.subscriber_count(), 2);
    }

    #[test]
    fn listener_receives_published_state() {
        let registry = SubscriberRegistry::new();
        let observed = Arc::new(Mutex::new(None));

        let observed_clone = Arc::clone(&observed);
        registry.subscribe(move |state| {
            *observed_clone.lock().unwrap() = Some(state.clone());
        });

        registry.notify(&anonymous_state());

        let state = observed.lock().unwrap().clone().unwrap();
        assert_eq!(state.status, AuthStatus::Anonymous);
        assert!(!state.is_loading);
    }
}
