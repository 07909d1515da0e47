//! Auth-session context for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AuthContext`] is provided once by `AuthProvider` and read by the route
//! guard and pages. The session signal is written only by the holder's
//! provider listener; pages trigger sign-in/out and react to what the
//! provider reports.
//!
//! The holder and its provider are single-threaded and exist only in the
//! browser build. Server rendering keeps the state in `loading`, which renders
//! nothing session-dependent.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

#[cfg(feature = "hydrate")]
use std::rc::Rc;

use leptos::prelude::*;
use session::{AuthError, AuthState, AuthStore, Identity, ScopeError};
#[cfg(feature = "hydrate")]
use session::{IdentityProvider, SessionHolder};

/// Publishes holder updates into a reactive signal.
///
/// Writes to a disposed signal are dropped, so a notification that races a
/// teardown is harmless.
#[derive(Clone, Copy, Debug)]
pub struct SignalStore(pub RwSignal<AuthState>);

impl AuthStore for SignalStore {
    fn snapshot(&self) -> AuthState {
        self.0.try_get_untracked().unwrap_or_default()
    }

    fn replace(&self, state: AuthState) {
        let _ = self.0.try_set(state);
    }
}

/// Handle to the auth session, cheap to copy into closures.
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    #[cfg(feature = "hydrate")]
    holder: StoredValue<SessionHolder<SignalStore>, LocalStorage>,
}

impl AuthContext {
    /// Context backed by the HTTP identity provider in the browser, and by a
    /// permanently loading state elsewhere.
    pub fn new() -> Self {
        #[cfg(feature = "hydrate")]
        {
            Self::with_provider(Rc::new(crate::net::provider::HttpIdentityProvider::new()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self { state: RwSignal::new(AuthState::default()) }
        }
    }

    #[cfg(feature = "hydrate")]
    pub fn with_provider(provider: Rc<dyn IdentityProvider>) -> Self {
        let state = RwSignal::new(AuthState::default());
        let holder = SessionHolder::new(provider, SignalStore(state));
        Self { state, holder: StoredValue::new_local(holder) }
    }

    /// Start listening to the provider.
    pub fn initialize(&self) {
        #[cfg(feature = "hydrate")]
        self.holder.with_value(|holder| holder.initialize());
    }

    /// Stop listening. Safe to call after the context has been disposed.
    pub fn teardown(&self) {
        #[cfg(feature = "hydrate")]
        {
            let _ = self.holder.try_with_value(|holder| holder.teardown());
        }
    }

    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    /// Current user (tracked).
    pub fn user(&self) -> Option<Identity> {
        self.state.with(|s| s.user.clone())
    }

    /// Whether a user is signed in (tracked).
    pub fn is_signed_in(&self) -> bool {
        self.state.with(AuthState::is_signed_in)
    }

    /// True until the provider reports for the first time (tracked).
    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    /// Whether the first provider notification has arrived (tracked).
    pub fn ready(&self) -> bool {
        self.state.with(AuthState::should_render_children)
    }

    /// Run the Google popup sign-in.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`]; the failure is already logged.
    pub async fn login_with_google(self) -> Result<Identity, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let holder = self.holder.get_value();
            holder.sign_in().await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(AuthError::Unavailable)
        }
    }

    /// # Errors
    ///
    /// Returns the provider's [`AuthError`]; the failure is already logged.
    pub async fn logout(self) -> Result<(), AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let holder = self.holder.get_value();
            holder.sign_out().await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(AuthError::Unavailable)
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up the auth context.
///
/// # Errors
///
/// Returns [`ScopeError::MissingAuthProvider`] outside an `AuthProvider`.
pub fn try_use_auth() -> Result<AuthContext, ScopeError> {
    use_context::<AuthContext>().ok_or(ScopeError::MissingAuthProvider)
}

/// Look up the auth context, failing fast outside an `AuthProvider`.
///
/// # Panics
///
/// Panics when no `AuthProvider` is an ancestor of the caller.
pub fn use_auth() -> AuthContext {
    match try_use_auth() {
        Ok(auth) => auth,
        Err(e) => panic!("{e}"),
    }
}
