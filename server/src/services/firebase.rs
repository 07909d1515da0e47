//! Firebase Auth REST service: Google credential sign-in and ID-token refresh.
//!
//! ARCHITECTURE
//! ============
//! The browser never talks to Firebase directly. After the Google code
//! exchange the server calls `accounts:signInWithIdp` with the Google ID
//! token and keeps the resulting Firebase ID/refresh tokens in its session
//! table. The ID token authorizes Firestore writes and is refreshed through
//! the Secure Token API shortly before it expires.
//!
//! Credentials are never validated locally; a bad API key or project id only
//! shows up as a rejection from Firebase.

#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use session::Identity;

pub const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
pub const SECURE_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";
pub const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Lifetime assumed when Firebase omits or garbles `expiresIn`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);
/// Refresh this long before the ID token actually expires.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Public Firebase web-app settings, as the Firebase JS SDK names them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseWebConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub web: FirebaseWebConfig,
    pub identity_toolkit_base: String,
    pub secure_token_base: String,
    pub firestore_base: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            web: FirebaseWebConfig::default(),
            identity_toolkit_base: IDENTITY_TOOLKIT_BASE.to_owned(),
            secure_token_base: SECURE_TOKEN_BASE.to_owned(),
            firestore_base: FIRESTORE_BASE.to_owned(),
        }
    }
}

impl FirebaseConfig {
    /// Load the `FIREBASE_*` web settings (empty when missing) and honor the
    /// standard `FIREBASE_AUTH_EMULATOR_HOST` / `FIRESTORE_EMULATOR_HOST`
    /// overrides.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_default();
        let web = FirebaseWebConfig {
            api_key: get("FIREBASE_API_KEY"),
            auth_domain: get("FIREBASE_AUTH_DOMAIN"),
            project_id: get("FIREBASE_PROJECT_ID"),
            storage_bucket: get("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: get("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: get("FIREBASE_APP_ID"),
        };

        let mut config = Self { web, ..Self::default() };
        if let Some(host) = lookup("FIREBASE_AUTH_EMULATOR_HOST").filter(|h| !h.trim().is_empty()) {
            config.identity_toolkit_base = format!("http://{host}/identitytoolkit.googleapis.com/v1");
            config.secure_token_base = format!("http://{host}/securetoken.googleapis.com/v1");
        }
        if let Some(host) = lookup("FIRESTORE_EMULATOR_HOST").filter(|h| !h.trim().is_empty()) {
            config.firestore_base = format!("http://{host}/v1");
        }
        config
    }

    fn sign_in_with_idp_url(&self) -> String {
        format!("{}/accounts:signInWithIdp?key={}", self.identity_toolkit_base, self.web.api_key)
    }

    fn token_url(&self) -> String {
        format!("{}/token?key={}", self.secure_token_base, self.web.api_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FirebaseError {
    #[error("firebase request failed: {0}")]
    Transport(String),
    #[error("firebase rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected firebase response: {0}")]
    Malformed(String),
}

impl FirebaseError {
    /// Short lowercase code reported back to the browser, e.g.
    /// `INVALID_IDP_RESPONSE : ...` becomes `invalid_idp_response`.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message
                .split([' ', ':'])
                .find(|part| !part.is_empty())
                .map_or_else(|| "rejected".to_owned(), str::to_ascii_lowercase),
            Self::Transport(_) => "network_error".to_owned(),
            Self::Malformed(_) => "invalid_response".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleApiErrorBody {
    error: GoogleApiError,
}

#[derive(Debug, Deserialize)]
struct GoogleApiError {
    message: String,
}

/// Map a non-success Google API answer to [`FirebaseError::Rejected`].
pub(crate) fn rejection(status: reqwest::StatusCode, body: &str) -> FirebaseError {
    let message = serde_json::from_str::<GoogleApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_owned());
    FirebaseError::Rejected { status: status.as_u16(), message }
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, FirebaseError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| FirebaseError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(rejection(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| FirebaseError::Malformed(e.to_string()))
}

fn expires_at(now: Instant, expires_in: &str) -> Instant {
    let lifetime = expires_in
        .trim()
        .parse::<u64>()
        .map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs);
    now.checked_add(lifetime).unwrap_or(now + DEFAULT_TOKEN_LIFETIME)
}

/// A signed-in Firebase user plus the tokens that act on their behalf.
#[derive(Debug, Clone)]
pub struct FirebaseSession {
    pub identity: Identity,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: Instant,
}

impl FirebaseSession {
    #[must_use]
    pub fn needs_refresh(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN >= self.expires_at
    }

    #[must_use]
    pub fn refreshed(self, token: RefreshedToken) -> Self {
        Self { id_token: token.id_token, refresh_token: token.refresh_token, expires_at: token.expires_at, ..self }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshedToken {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: Instant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: String,
}

/// Sign in to Firebase with a Google ID token.
///
/// # Errors
///
/// Returns [`FirebaseError`] on transport failure, a Firebase rejection (bad
/// API key, provider disabled, stale token), or an unreadable response.
pub async fn sign_in_with_idp(
    http: &reqwest::Client,
    config: &FirebaseConfig,
    google_id_token: &str,
    request_uri: &str,
) -> Result<FirebaseSession, FirebaseError> {
    // Google ID tokens are JWTs (base64url segments), so they need no
    // form escaping inside `postBody`.
    let body = serde_json::json!({
        "postBody": format!("id_token={google_id_token}&providerId=google.com"),
        "requestUri": request_uri,
        "returnSecureToken": true,
        "returnIdpCredential": true,
    });
    let resp = http
        .post(config.sign_in_with_idp_url())
        .json(&body)
        .send()
        .await
        .map_err(|e| FirebaseError::Transport(e.to_string()))?;
    let signed_in: SignInWithIdpResponse = read_json(resp).await?;

    Ok(FirebaseSession {
        identity: Identity {
            uid: signed_in.local_id,
            display_name: signed_in.display_name,
            email: signed_in.email,
            photo_url: signed_in.photo_url,
        },
        id_token: signed_in.id_token,
        refresh_token: signed_in.refresh_token,
        expires_at: expires_at(Instant::now(), &signed_in.expires_in),
    })
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: String,
}

/// Exchange a refresh token for a fresh ID token.
///
/// # Errors
///
/// Returns [`FirebaseError`] when the refresh token is revoked or expired, or
/// the request fails.
pub async fn refresh_id_token(
    http: &reqwest::Client,
    config: &FirebaseConfig,
    refresh_token: &str,
) -> Result<RefreshedToken, FirebaseError> {
    let resp = http
        .post(config.token_url())
        .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
        .send()
        .await
        .map_err(|e| FirebaseError::Transport(e.to_string()))?;
    let refreshed: RefreshResponse = read_json(resp).await?;

    Ok(RefreshedToken {
        id_token: refreshed.id_token,
        refresh_token: refreshed.refresh_token,
        expires_at: expires_at(Instant::now(), &refreshed.expires_in),
    })
}
