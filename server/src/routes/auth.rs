//! Auth routes: Google OAuth popup flow and cookie sessions.
//!
//! The browser opens `/auth/google` in a popup. The callback finishes the
//! Google + Firebase exchange, sets the session cookie, and answers with a
//! page that closes the popup. The opener then learns the outcome from
//! `/api/auth/me`; a failed attempt leaves a short-lived `sign_in_error`
//! cookie that `me` reports once and clears.

use std::time::Instant;

use axum::extract::{FromRef, FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::services::firebase::{self, FirebaseError, FirebaseSession};
use crate::services::google::{self, GoogleOAuthConfig, OAuthError};
use crate::services::session::{SESSION_TTL, generate_token};
use crate::state::AppState;

pub(crate) const SESSION_COOKIE: &str = "gatekeep_session";
pub(crate) const OAUTH_STATE_COOKIE: &str = "oauth_state";
pub(crate) const SIGN_IN_ERROR_COOKIE: &str = "sign_in_error";
const SIGN_IN_ERROR_MAX_CODE: usize = 64;

fn auth_cookie(name: &'static str, value: String, secure: bool, max_age: Option<Duration>) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    if let Some(age) = max_age {
        builder = builder.max_age(age);
    }
    builder.build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    auth_cookie(name, String::new(), secure, Some(Duration::ZERO))
}

/// Reduce a provider error code to cookie-safe characters.
pub(crate) fn cookie_safe_code(code: &str) -> String {
    let cleaned: String = code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .take(SIGN_IN_ERROR_MAX_CODE)
        .collect();
    if cleaned.is_empty() { "sign_in_failed".to_owned() } else { cleaned }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie, with an ID token
/// that is valid for at least another minute.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub session: FirebaseSession,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(Cookie::value).unwrap_or_default().to_owned();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let session = app_state.sessions.get(&token).await.ok_or(StatusCode::UNAUTHORIZED)?;
        let session = fresh_session(&app_state, &token, session).await?;
        Ok(Self { session })
    }
}

/// Refresh the Firebase ID token when it is about to expire. A refresh
/// failure ends the session.
async fn fresh_session(state: &AppState, token: &str, session: FirebaseSession) -> Result<FirebaseSession, StatusCode> {
    if !session.needs_refresh(Instant::now()) {
        return Ok(session);
    }
    match firebase::refresh_id_token(&state.http, &state.firebase, &session.refresh_token).await {
        Ok(refreshed) => {
            let session = session.refreshed(refreshed);
            state.sessions.replace(token, session.clone()).await;
            tracing::debug!(uid = %session.identity.uid, "firebase id token refreshed");
            Ok(session)
        }
        Err(e) => {
            tracing::warn!(error = %e, uid = %session.identity.uid, "token refresh failed, ending session");
            state.sessions.remove(token).await;
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

// =============================================================================
// SIGN-IN FLOW
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub(crate) enum CallbackError {
    #[error("google returned an error: {0}")]
    Denied(String),
    #[error("callback without an authorization code")]
    MissingCode,
    #[error("oauth state mismatch")]
    InvalidState,
    #[error(transparent)]
    OAuth(#[from] OAuthError),
    #[error(transparent)]
    Firebase(#[from] FirebaseError),
}

impl CallbackError {
    /// Code reported to the opener through `sign_in_error`.
    pub(crate) fn code(&self) -> String {
        let raw = match self {
            Self::Denied(code) => code.clone(),
            Self::MissingCode => "missing_code".to_owned(),
            Self::InvalidState => "invalid_state".to_owned(),
            Self::OAuth(e) => e.code().to_owned(),
            Self::Firebase(e) => e.code(),
        };
        cookie_safe_code(&raw)
    }
}

/// Page returned to the popup. Closes itself when it has an opener and
/// otherwise continues in the same tab.
pub(crate) fn popup_page(signed_in: bool) -> Html<&'static str> {
    Html(if signed_in { POPUP_SIGNED_IN } else { POPUP_FAILED })
}

const POPUP_SIGNED_IN: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Signed in</title></head>
<body><p>Signed in. You can close this window.</p>
<script>if (window.opener) { window.close(); } else { window.location.replace("/dashboard"); }</script>
</body></html>"#;

const POPUP_FAILED: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Sign-in failed</title></head>
<body><p>Sign-in did not complete. You can close this window.</p>
<script>if (window.opener) { window.close(); } else { window.location.replace("/login"); }</script>
</body></html>"#;

fn google_unconfigured() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response()
}

/// `GET /auth/google`: redirect to Google's consent page.
pub async fn google_redirect(State(state): State<AppState>) -> Response {
    let Some(config) = &state.google else {
        return google_unconfigured();
    };

    let oauth_state = generate_token();
    let url = match config.authorize_url(&oauth_state) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "could not build google authorize url");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Could not start sign-in").into_response();
        }
    };

    let cookie = auth_cookie(OAUTH_STATE_COOKIE, oauth_state, state.cookie_secure, Some(Duration::minutes(10)));
    (CookieJar::new().add(cookie), Redirect::temporary(&url)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

async fn complete_sign_in(
    state: &AppState,
    config: &GoogleOAuthConfig,
    expected_state: &str,
    params: &CallbackQuery,
) -> Result<FirebaseSession, CallbackError> {
    if let Some(error) = &params.error {
        return Err(CallbackError::Denied(error.clone()));
    }
    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        return Err(CallbackError::MissingCode);
    };
    if expected_state.is_empty() || params.state.as_deref() != Some(expected_state) {
        return Err(CallbackError::InvalidState);
    }

    let google_id_token = google::exchange_code(&state.http, config, code).await?;
    let session = firebase::sign_in_with_idp(&state.http, &state.firebase, &google_id_token, &config.redirect_uri).await?;
    Ok(session)
}

/// `GET /auth/google/callback`: finish the exchange, set the session cookie,
/// and close the popup.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(config) = state.google.clone() else {
        return google_unconfigured();
    };
    let secure = state.cookie_secure;
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(Cookie::value)
        .unwrap_or_default()
        .to_owned();
    let jar = jar.add(expired_cookie(OAUTH_STATE_COOKIE, secure));

    match complete_sign_in(&state, &config, &expected_state, &params).await {
        Ok(session) => {
            let uid = session.identity.uid.clone();
            let token = state.sessions.create(session).await;
            let sessions = state.sessions.len().await;
            tracing::info!(%uid, sessions, "google sign-in completed");
            let max_age = Duration::try_from(SESSION_TTL).ok();
            let jar = jar
                .add(auth_cookie(SESSION_COOKIE, token, secure, max_age))
                .add(expired_cookie(SIGN_IN_ERROR_COOKIE, secure));
            (jar, popup_page(true)).into_response()
        }
        Err(e) => {
            match &e {
                CallbackError::Denied(_) | CallbackError::MissingCode => {
                    tracing::info!(error = %e, "google sign-in abandoned");
                }
                _ => tracing::error!(error = %e, "google sign-in failed"),
            }
            let cookie = auth_cookie(SIGN_IN_ERROR_COOKIE, e.code(), secure, Some(Duration::seconds(60)));
            (jar.add(cookie), popup_page(false)).into_response()
        }
    }
}

// =============================================================================
// SESSION ENDPOINTS
// =============================================================================

/// `GET /api/auth/me`: current identity, or 401. A pending sign-in failure
/// is reported once as `{"error": code}` alongside the 401.
pub async fn me(State(state): State<AppState>, jar: CookieJar, auth: Result<AuthUser, StatusCode>) -> Response {
    match auth {
        Ok(user) => Json(user.session.identity).into_response(),
        Err(status) => {
            let Some(code) = jar
                .get(SIGN_IN_ERROR_COOKIE)
                .map(|c| c.value().to_owned())
                .filter(|c| !c.is_empty())
            else {
                return status.into_response();
            };
            let jar = jar.add(expired_cookie(SIGN_IN_ERROR_COOKIE, state.cookie_secure));
            (status, jar, Json(serde_json::json!({ "error": code }))).into_response()
        }
    }
}

/// `POST /api/auth/logout`: drop the session and clear the cookie. Succeeds
/// without a session too.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()).unwrap_or_default();
    if !token.is_empty() && state.sessions.remove(&token).await {
        tracing::info!("session ended");
    }
    (jar.add(expired_cookie(SESSION_COOKIE, state.cookie_secure)), StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
