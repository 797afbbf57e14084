//! The process-wide authenticated-session context.
//!
//! Every protected page reads the signed-in user from one [`SessionContext`]
//! instead of fetching and holding its own copy. Interested parties (the CLI's
//! session file, for one) subscribe to changes and are notified after every
//! sign-in or sign-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use crate::models::Session;
use crate::{Error, Result};

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    current: RwLock<Option<Session>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
}

/// A cheaply cloneable handle to the current session, if any.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that starts out signed in as `session`.
    pub fn with_session(session: Session) -> Self {
        let context = Self::new();
        *context
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
        context
    }

    /// Returns a copy of the current session.
    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current session, or [`Error::Unauthenticated`] if nobody is signed in.
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or(Error::Unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces the current session and notifies subscribers.
    pub fn set(&self, session: Session) {
        self.replace(Some(session));
    }

    /// Signs the context out, returning the session that was active.
    pub fn clear(&self) -> Option<Session> {
        self.replace(None)
    }

    fn replace(&self, session: Option<Session>) -> Option<Session> {
        let previous = std::mem::replace(
            &mut *self
                .inner
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            session.clone(),
        );

        // Listeners run without any lock held so they may read the context again.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(session.as_ref());
        }

        previous
    }

    /// Registers `listener` to be called with the new session after every change.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));

        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Keeps a [`SessionContext`] listener registered.
pub struct Subscription {
    inner: Weak<Inner>,
    id: u64,
}

impl Subscription {
    /// Removes the listener. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;

    fn session(user_id: &str) -> Session {
        Session {
            token: format!("token-{user_id}"),
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            created_at: NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn starts_signed_out() {
        let context = SessionContext::new();
        assert!(!context.is_authenticated());
        assert!(matches!(context.require(), Err(Error::Unauthenticated)));
    }

    #[test]
    fn clones_share_state() {
        let context = SessionContext::new();
        let other = context.clone();

        context.set(session("u1"));
        assert_eq!(other.require().unwrap().user_id, "u1");

        assert_eq!(other.clear().map(|s| s.user_id), Some("u1".to_string()));
        assert!(!context.is_authenticated());
    }

    #[test]
    fn subscribers_see_every_change() {
        let context = SessionContext::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let _subscription = context.subscribe(move |session| {
            log.lock()
                .unwrap()
                .push(session.map(|s| s.user_id.clone()));
        });

        context.set(session("u1"));
        context.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("u1".to_string()), None]
        );
    }

    #[test]
    fn unsubscribe_and_drop_stop_notifications() {
        let context = SessionContext::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let explicit = context.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&calls);
        let dropped = context.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(context.subscriber_count(), 2);

        context.set(session("u1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        explicit.unsubscribe();
        drop(dropped);
        assert_eq!(context.subscriber_count(), 0);

        context.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_can_read_context() {
        let context = SessionContext::new();
        let observed = Arc::new(Mutex::new(None));

        let reader = context.clone();
        let slot = Arc::clone(&observed);
        let _subscription = context.subscribe(move |_| {
            *slot.lock().unwrap() = reader.current().map(|s| s.user_id);
        });

        context.set(session("u2"));
        assert_eq!(*observed.lock().unwrap(), Some("u2".to_string()));
    }
}
