//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an "unavailable" error since these
//! endpoints are only meaningful in the browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "hydrate"))]
use serde::Deserialize;
use session::{AuthError, Identity, Record, StoreError};

pub const ME_ENDPOINT: &str = "/api/auth/me";
pub const LOGOUT_ENDPOINT: &str = "/api/auth/logout";
pub const RECORDS_ENDPOINT: &str = "/api/records";

#[cfg(any(test, feature = "hydrate"))]
/// Error body returned by the server's JSON endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(any(test, feature = "hydrate"))]
/// Extract the `error` field from a JSON error body.
pub(crate) fn error_code(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|code| !code.is_empty())
}

#[cfg(any(test, feature = "hydrate"))]
/// Interpret an unauthenticated `/api/auth/me` answer. A pending sign-in
/// failure code becomes an error; otherwise there is simply no session.
pub(crate) fn unauthenticated_me(body: &str) -> Result<Option<Identity>, AuthError> {
    match error_code(body) {
        Some(code) => Err(AuthError::Rejected { code }),
        None => Ok(None),
    }
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn store_error_for_status(status: u16, body: &str) -> StoreError {
    if status == 401 {
        return StoreError::Unauthenticated;
    }
    let message = error_code(body).unwrap_or_else(|| format!("HTTP {status}"));
    StoreError::Rejected { status, message }
}

/// Fetch the signed-in user from `/api/auth/me`. `Ok(None)` when signed out.
///
/// # Errors
///
/// Returns [`AuthError::Network`] on transport failure and
/// [`AuthError::Rejected`] when the last sign-in attempt failed server-side.
pub async fn fetch_current_user() -> Result<Option<Identity>, AuthError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(ME_ENDPOINT)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if resp.status() == 401 {
            let body = resp.text().await.unwrap_or_default();
            return unauthenticated_me(&body);
        }
        if !resp.ok() {
            return Err(AuthError::Network(format!("{ME_ENDPOINT} failed: {}", resp.status())));
        }
        resp.json::<Identity>()
            .await
            .map(Some)
            .map_err(|e| AuthError::Network(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(AuthError::Unavailable)
    }
}

/// End the server session via `POST /api/auth/logout`.
///
/// # Errors
///
/// Returns [`AuthError`] if the request fails or the server refuses it.
pub async fn logout() -> Result<(), AuthError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(LOGOUT_ENDPOINT)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if !resp.ok() {
            let body = resp.text().await.unwrap_or_default();
            let code = error_code(&body).unwrap_or_else(|| format!("logout failed: {}", resp.status()));
            return Err(AuthError::Rejected { code });
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(AuthError::Unavailable)
    }
}

/// Append a record via `POST /api/records`.
///
/// # Errors
///
/// Returns [`StoreError`] if the request fails or the server rejects the record.
pub async fn append_record(record: &Record) -> Result<(), StoreError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(RECORDS_ENDPOINT)
            .json(record)
            .map_err(|e| StoreError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if !resp.ok() {
            let body = resp.text().await.unwrap_or_default();
            return Err(store_error_for_status(resp.status(), &body));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = record;
        Err(StoreError::Network("not available on server".to_owned()))
    }
}
