//! Route guard and the login page's inverse guard.
//!
//! Both are pure functions of the current session so they can be re-run on
//! every render and every session change.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::identity::Identity;

/// Application destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    /// Protected; requires a session.
    Dashboard,
    /// Fallback for anything unmatched.
    NotFound,
}

impl Route {
    /// Router path. `NotFound` is the wildcard.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::NotFound => "*",
        }
    }

    /// Match a location path, ignoring query, fragment, and a trailing slash.
    #[must_use]
    pub fn from_path(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

/// What to do with a navigation to a protected destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// `replace` substitutes the current history entry so going back skips
    /// the protected page.
    Redirect { to: Route, replace: bool },
}

/// Gate a protected destination on the current session.
#[must_use]
pub fn guard(session: Option<&Identity>) -> GuardDecision {
    match session {
        Some(_) => GuardDecision::Render,
        None => GuardDecision::Redirect { to: Route::Login, replace: true },
    }
}

/// Fires the login page's redirect to the dashboard once per transition into
/// "signed in", whether the session notification or the sign-in action
/// completes first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoginRedirect {
    fired: bool,
}

impl LoginRedirect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current session presence; true means navigate now.
    pub fn observe(&mut self, signed_in: bool) -> bool {
        if !signed_in {
            self.fired = false;
            return false;
        }
        !std::mem::replace(&mut self.fired, true)
    }

    /// A sign-in action resolved successfully; true means navigate now.
    pub fn signed_in(&mut self) -> bool {
        self.observe(true)
    }
}
