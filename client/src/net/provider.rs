//! Identity provider backed by the server's Google sign-in broker.
//!
//! ARCHITECTURE
//! ============
//! The server owns the OAuth exchange and the cookie session. In the browser
//! this provider:
//! - resolves the current session from `/api/auth/me` when a listener registers,
//! - opens `/auth/google` in a popup and waits until the popup closes, then
//!   reads `/api/auth/me` again to learn the outcome,
//! - posts `/api/auth/logout` to sign out.
//!
//! Every resulting session change fans out through one [`ListenerSet`].
//!
//! The popup wait has no timeout: a popup left open keeps
//! the sign-in action pending.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use async_trait::async_trait;
use session::{AuthError, AuthListener, Identity, IdentityProvider, ListenerSet, Subscription};

/// Server route that starts the Google OAuth redirect.
pub const SIGN_IN_PATH: &str = "/auth/google";
pub const POPUP_NAME: &str = "gatekeep-sign-in";
pub const POPUP_FEATURES: &str = "popup,width=500,height=640";
#[cfg(feature = "hydrate")]
const POPUP_POLL: std::time::Duration = std::time::Duration::from_millis(400);

/// Outcome of a finished popup: the session the server now reports.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn popup_outcome(session: Option<Identity>) -> Result<Identity, AuthError> {
    session.ok_or(AuthError::PopupClosed)
}

#[derive(Clone, Debug, Default)]
pub struct HttpIdentityProvider {
    listeners: ListenerSet,
}

impl HttpIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read the server session and broadcast it.
    #[cfg(feature = "hydrate")]
    fn refresh(&self) {
        let listeners = self.listeners.clone();
        leptos::task::spawn_local(async move {
            let session = match super::api::fetch_current_user().await {
                Ok(session) => session,
                Err(e) => {
                    log::warn!("could not resolve current session ({}): {e}", e.reason());
                    None
                }
            };
            listeners.notify(&session);
        });
    }

    #[cfg(feature = "hydrate")]
    async fn wait_for_popup() -> Result<(), AuthError> {
        let window = web_sys::window().ok_or(AuthError::Unavailable)?;
        let popup = window
            .open_with_url_and_target_and_features(SIGN_IN_PATH, POPUP_NAME, POPUP_FEATURES)
            .ok()
            .flatten()
            .ok_or(AuthError::PopupBlocked)?;
        while !popup.closed().unwrap_or(true) {
            gloo_timers::future::sleep(POPUP_POLL).await;
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl IdentityProvider for HttpIdentityProvider {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        let subscription = self.listeners.register(listener);
        #[cfg(feature = "hydrate")]
        self.refresh();
        subscription
    }

    async fn sign_in_with_popup(&self) -> Result<Identity, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            Self::wait_for_popup().await?;
            let user = popup_outcome(super::api::fetch_current_user().await?)?;
            self.listeners.notify(&Some(user.clone()));
            Ok(user)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(AuthError::Unavailable)
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        #[cfg(feature = "hydrate")]
        {
            super::api::logout().await?;
            self.listeners.notify(&None);
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(AuthError::Unavailable)
        }
    }
}
