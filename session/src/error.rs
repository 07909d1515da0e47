//! Failure categories surfaced by the identity provider and document store.
//!
//! ERROR HANDLING
//! ==============
//! Both kinds are logged where they occur and handed back unchanged to the UI
//! action that started the call. Nothing here is retried.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::record::RecordError;

/// Interactive sign-in or sign-out rejected by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The user closed the sign-in popup before finishing.
    #[error("sign-in popup was closed before completing")]
    PopupClosed,
    /// The browser refused to open the sign-in popup.
    #[error("sign-in popup was blocked by the browser")]
    PopupBlocked,
    /// No interactive environment is available (e.g. during server rendering).
    #[error("interactive sign-in is not available here")]
    Unavailable,
    #[error("identity provider request failed: {0}")]
    Network(String),
    /// Provider answered with an explicit rejection code.
    #[error("identity provider rejected the request: {code}")]
    Rejected { code: String },
}

impl AuthError {
    /// Provider-style diagnostic code.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::PopupClosed => "popup_closed",
            Self::PopupBlocked => "popup_blocked",
            Self::Unavailable => "unavailable",
            Self::Network(_) => "network_error",
            Self::Rejected { code } => code,
        }
    }
}

/// Record append rejected by the document store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid record: {0}")]
    Invalid(#[from] RecordError),
    /// The store requires a signed-in session.
    #[error("not signed in")]
    Unauthenticated,
    #[error("document store request failed: {0}")]
    Network(String),
    #[error("document store rejected the record ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Reading the auth session outside the provider scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("use_auth must be called inside an <AuthProvider>")]
    MissingAuthProvider,
}
