//! Identity-provider seam and the listener registry behind it.
//!
//! ARCHITECTURE
//! ============
//! The provider pushes session changes to registered listeners. Registration
//! hands back a [`Subscription`] that releases the listener when cancelled or
//! dropped, so a torn-down consumer can never be notified again.
//!
//! Everything here is single-threaded (`Rc`, `?Send` futures); the browser is
//! the only place the provider runs.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use async_trait::async_trait;

use crate::error::AuthError;
use crate::identity::{Identity, Session};

/// Callback invoked with every session change the provider reports.
pub type AuthListener = Rc<dyn Fn(Session)>;

/// External identity provider.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Register a listener for session changes. The provider reports the
    /// current session at least once after registration once it is known.
    fn subscribe(&self, listener: AuthListener) -> Subscription;

    /// Run the interactive sign-in flow. Suspends until the user finishes or
    /// abandons it; there is no timeout.
    async fn sign_in_with_popup(&self) -> Result<Identity, AuthError>;

    /// End the current session. Listeners observe `None` afterwards.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Handle for a listener registration. Released exactly once, either by
/// [`Subscription::cancel`] or on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A handle with nothing to release.
    #[must_use]
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, AuthListener)>,
}

/// Fan-out registry used by provider implementations.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: AuthListener) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, listener));
            id
        };

        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }

    /// Deliver `session` to every registered listener in registration order.
    ///
    /// Each listener is looked up again right before its call so one removed
    /// by an earlier listener in the same pass is skipped. No borrow is held
    /// while a listener runs.
    pub fn notify(&self, session: &Session) {
        let ids: Vec<u64> = self.inner.borrow().listeners.iter().map(|(id, _)| *id).collect();
        for id in ids {
            let listener = self
                .inner
                .borrow()
                .listeners
                .iter()
                .find(|(other, _)| *other == id)
                .map(|(_, listener)| Rc::clone(listener));
            if let Some(listener) = listener {
                listener(session.clone());
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet").field("listeners", &self.len()).finish()
    }
}
