//! Google OAuth service: authorize redirect and authorization-code exchange.
//!
//! The exchange yields a Google ID token, which is handed to Firebase Auth to
//! mint the Firebase session (see `firebase`).

#[cfg(test)]
#[path = "google_test.rs"]
mod tests;

use serde::Deserialize;

pub const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPES: &str = "openid email profile";

/// Google OAuth client configuration.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
}

impl GoogleOAuthConfig {
    /// Load from `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REDIRECT_URI`.
    /// Returns `None` if any are missing or blank (sign-in will be disabled).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Some(Self {
            client_id: get("GOOGLE_CLIENT_ID")?,
            client_secret: get("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: get("GOOGLE_REDIRECT_URI")?,
            token_url: TOKEN_URL.to_owned(),
        })
    }

    /// Build the Google authorization URL carrying the CSRF `state`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Malformed`] if the URL cannot be assembled.
    pub fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        reqwest::Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map(String::from)
        .map_err(|e| OAuthError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OAuthError {
    #[error("google rejected the code exchange: {code}")]
    Rejected { code: String },
    #[error("google token request failed: {0}")]
    Transport(String),
    #[error("unexpected google response: {0}")]
    Malformed(String),
}

impl OAuthError {
    /// Short code reported back to the browser.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Rejected { code } => code,
            Self::Transport(_) => "network_error",
            Self::Malformed(_) => "invalid_response",
        }
    }
}

/// Exchange an authorization code for a Google ID token.
///
/// # Errors
///
/// Returns [`OAuthError`] on transport failure, a Google rejection, or a
/// response without an `id_token`.
pub async fn exchange_code(http: &reqwest::Client, config: &GoogleOAuthConfig, code: &str) -> Result<String, OAuthError> {
    let resp = http
        .post(&config.token_url)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| OAuthError::Transport(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| OAuthError::Transport(e.to_string()))?;

    if !status.is_success() {
        let code = serde_json::from_str::<TokenErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("http_{}", status.as_u16()));
        return Err(OAuthError::Rejected { code });
    }

    serde_json::from_str::<TokenResponse>(&body)
        .map(|t| t.id_token)
        .map_err(|e| {
            // The body also carries access and refresh tokens; keep it out of the error.
            OAuthError::Malformed(format!("token response without a usable id_token ({:?}, column {})", e.classify(), e.column()))
        })
}
