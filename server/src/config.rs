//! Process configuration read from the environment at start.
//!
//! Parsing goes through a lookup function so tests can feed a fixed map
//! instead of mutating the process environment.
//!
//! - `PORT`: listen port, default 3000
//! - `COOKIE_SECURE`: `Secure` cookie flag; inferred from the
//!   `GOOGLE_REDIRECT_URI` scheme when unset
//! - `GOOGLE_*`: see [`GoogleOAuthConfig`]; sign-in is disabled without them
//! - `FIREBASE_*`: see [`FirebaseConfig`]; never validated here

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use crate::services::firebase::FirebaseConfig;
use crate::services::google::GoogleOAuthConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cookie_secure: bool,
    pub firebase: FirebaseConfig,
    /// `None` when the Google OAuth client is not configured.
    pub google: Option<GoogleOAuthConfig>,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let cookie_secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or_else(|| lookup("GOOGLE_REDIRECT_URI").is_some_and(|uri| uri.starts_with("https://")));

        Ok(Self {
            port,
            cookie_secure,
            firebase: FirebaseConfig::from_lookup(&lookup),
            google: GoogleOAuthConfig::from_lookup(&lookup),
        })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
