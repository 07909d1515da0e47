//! Auth session holder: bridges provider notifications into one readable value.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider listener is the only writer of [`AuthState`]. Sign-in and
//! sign-out actions go through the provider and never touch the store; the
//! listener picks up whatever the provider reports next.
//!
//! Where the state lives is abstracted by [`AuthStore`] so the same holder
//! drives a plain `Rc<RefCell<_>>` in tests and a reactive signal in the UI.

#[cfg(test)]
#[path = "holder_test.rs"]
mod holder_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::AuthError;
use crate::identity::{Identity, Session};
use crate::provider::{AuthListener, IdentityProvider, Subscription};

/// Current session plus whether the provider has reported at least once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Session,
    /// True until the first provider notification, false for good afterwards.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl AuthState {
    /// State after the provider reported `session`.
    #[must_use]
    pub fn resolved(session: Session) -> Self {
        Self { user: session, loading: false }
    }

    /// Apply a provider notification: last write wins, loading ends.
    pub fn observe(&mut self, session: Session) {
        *self = Self::resolved(session);
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Session-dependent content stays hidden until the first notification.
    #[must_use]
    pub fn should_render_children(&self) -> bool {
        !self.loading
    }
}

/// Destination the holder publishes [`AuthState`] into.
pub trait AuthStore: Clone + 'static {
    fn snapshot(&self) -> AuthState;
    fn replace(&self, state: AuthState);
}

/// Plain shared store for non-reactive consumers.
#[derive(Clone, Debug, Default)]
pub struct SharedAuth(Rc<RefCell<AuthState>>);

impl SharedAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthStore for SharedAuth {
    fn snapshot(&self) -> AuthState {
        self.0.borrow().clone()
    }

    fn replace(&self, state: AuthState) {
        *self.0.borrow_mut() = state;
    }
}

/// Owns the provider registration and exposes sign-in/sign-out.
///
/// Clones share the same registration. It is released by [`teardown`] or
/// when the last clone is dropped, whichever comes first.
///
/// [`teardown`]: SessionHolder::teardown
#[derive(Clone)]
pub struct SessionHolder<S> {
    provider: Rc<dyn IdentityProvider>,
    store: S,
    subscription: Rc<RefCell<Option<Subscription>>>,
}

impl<S: AuthStore> SessionHolder<S> {
    pub fn new(provider: Rc<dyn IdentityProvider>, store: S) -> Self {
        Self { provider, store, subscription: Rc::new(RefCell::new(None)) }
    }

    /// Register the provider listener. Calling it again while active is a no-op.
    pub fn initialize(&self) {
        if self.is_active() {
            return;
        }

        let store = self.store.clone();
        let listener: AuthListener = Rc::new(move |session| {
            log::debug!("auth session changed (signed_in={})", session.is_some());
            store.replace(AuthState::resolved(session));
        });
        let subscription = self.provider.subscribe(listener);
        *self.subscription.borrow_mut() = Some(subscription);
    }

    /// Release the provider listener. Later notifications are not delivered.
    pub fn teardown(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.store.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Interactive sign-in. The published state is updated separately by the
    /// listener, possibly after this returns.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`] after logging it.
    pub async fn sign_in(&self) -> Result<Identity, AuthError> {
        self.provider
            .sign_in_with_popup()
            .await
            .inspect_err(|e| log::error!("sign-in failed ({}): {e}", e.reason()))
    }

    /// # Errors
    ///
    /// Returns the provider's [`AuthError`] after logging it.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider
            .sign_out()
            .await
            .inspect_err(|e| log::error!("sign-out failed ({}): {e}", e.reason()))
    }
}

impl<S> fmt::Debug for SessionHolder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHolder")
            .field("active", &self.subscription.borrow().is_some())
            .finish_non_exhaustive()
    }
}
