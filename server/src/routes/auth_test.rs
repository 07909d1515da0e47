use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use serde_json::{Value, json};

use super::*;
use crate::routes::api_routes;
use crate::services::firebase::FirebaseConfig;
use crate::state::test_helpers::{ada, live_session, serve, test_app_state};

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
    resp.headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_owned))
        .collect()
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    cookies
        .iter()
        .find_map(|c| c.strip_prefix(&prefix))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_owned())
}

fn google_config(token_url: &str) -> GoogleOAuthConfig {
    GoogleOAuthConfig {
        client_id: "client-id".to_owned(),
        client_secret: "client-secret".to_owned(),
        redirect_uri: "http://localhost:3000/auth/google/callback".to_owned(),
        token_url: token_url.to_owned(),
    }
}

/// Mock Google token endpoint + Firebase `signInWithIdp` on one server.
async fn mock_providers(firebase_ok: bool) -> String {
    let router = Router::new()
        .route("/token", post(|| async { Json(json!({ "id_token": "google-jwt" })) }))
        .route(
            "/accounts:signInWithIdp",
            post(move || async move {
                if firebase_ok {
                    Json(json!({
                        "localId": "firebase-uid-ada",
                        "email": "ada@example.com",
                        "displayName": "Ada Lovelace",
                        "idToken": "firebase-id",
                        "refreshToken": "firebase-refresh",
                        "expiresIn": "3600"
                    }))
                    .into_response()
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": { "code": 400, "message": "OPERATION_NOT_ALLOWED" } })),
                    )
                        .into_response()
                }
            }),
        );
    serve(router).await
}

async fn app_with_google(firebase_ok: bool) -> (AppState, String) {
    let mock = mock_providers(firebase_ok).await;
    let mut state = test_app_state();
    state.google = Some(Arc::new(google_config(&format!("{mock}/token"))));
    state.firebase = Arc::new(FirebaseConfig { identity_toolkit_base: mock, ..FirebaseConfig::default() });
    let base = serve(api_routes(state.clone())).await;
    (state, base)
}

// =============================================================================
// pure helpers
// =============================================================================

#[test]
fn cookie_safe_code_strips_unsafe_characters() {
    assert_eq!(cookie_safe_code("access_denied"), "access_denied");
    assert_eq!(cookie_safe_code("bad value; path=/"), "badvaluepath");
    assert_eq!(cookie_safe_code(";;;"), "sign_in_failed");
    assert_eq!(cookie_safe_code(&"x".repeat(200)).len(), SIGN_IN_ERROR_MAX_CODE);
}

#[test]
fn callback_error_codes() {
    assert_eq!(CallbackError::Denied("access_denied".to_owned()).code(), "access_denied");
    assert_eq!(CallbackError::MissingCode.code(), "missing_code");
    assert_eq!(CallbackError::InvalidState.code(), "invalid_state");
    let firebase = FirebaseError::Rejected { status: 400, message: "INVALID_IDP_RESPONSE : x".to_owned() };
    assert_eq!(CallbackError::from(firebase).code(), "invalid_idp_response");
}

#[test]
fn popup_pages_close_themselves() {
    let Html(ok) = popup_page(true);
    let Html(failed) = popup_page(false);
    assert!(ok.contains("window.close()"));
    assert!(ok.contains("/dashboard"));
    assert!(failed.contains("window.close()"));
    assert!(failed.contains("/login"));
}

#[test]
fn auth_cookie_attributes() {
    let cookie = auth_cookie(SESSION_COOKIE, "tok".to_owned(), true, None);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(expired_cookie(SESSION_COOKIE, false).max_age(), Some(Duration::ZERO));
}

// =============================================================================
// routes
// =============================================================================

#[tokio::test]
async fn sign_in_routes_unavailable_without_google_config() {
    let base = serve(api_routes(test_app_state())).await;
    let resp = http().get(format!("{base}/auth/google")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let resp = http().get(format!("{base}/auth/google/callback?code=x")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn google_redirect_sets_state_cookie_and_redirects() {
    let (_, base) = app_with_google(true).await;
    let resp = http().get(format!("{base}/auth/google")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let state_cookie = cookie_value(&set_cookies(&resp), OAUTH_STATE_COOKIE).expect("state cookie");
    assert_eq!(state_cookie.len(), 64);
    let location = resp.headers().get("location").and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(location.starts_with(google::AUTHORIZE_URL));
    assert!(location.contains(&format!("state={state_cookie}")));
}

#[tokio::test]
async fn me_without_session_is_unauthorized() {
    let base = serve(api_routes(test_app_state())).await;
    let resp = http().get(format!("{base}/api/auth/me")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn me_returns_identity_for_session_cookie() {
    let state = test_app_state();
    let token = state.sessions.create(live_session(ada())).await;
    let base = serve(api_routes(state)).await;

    let resp = http()
        .get(format!("{base}/api/auth/me"))
        .header("cookie", format!("{SESSION_COOKIE}={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["uid"], "firebase-uid-ada");
    assert_eq!(body["display_name"], "Ada Lovelace");
}

#[tokio::test]
async fn me_reports_pending_sign_in_error_once() {
    let base = serve(api_routes(test_app_state())).await;
    let resp = http()
        .get(format!("{base}/api/auth/me"))
        .header("cookie", format!("{SIGN_IN_ERROR_COOKIE}=access_denied"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let cleared = cookie_value(&set_cookies(&resp), SIGN_IN_ERROR_COOKIE);
    assert_eq!(cleared.as_deref(), Some(""));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "access_denied" }));
}

#[tokio::test]
async fn callback_with_google_error_records_failure() {
    let (state, base) = app_with_google(true).await;
    let resp = http()
        .get(format!("{base}/auth/google/callback?error=access_denied&state=s"))
        .header("cookie", format!("{OAUTH_STATE_COOKIE}=s"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert_eq!(cookie_value(&cookies, SIGN_IN_ERROR_COOKIE).as_deref(), Some("access_denied"));
    assert_eq!(cookie_value(&cookies, SESSION_COOKIE), None);
    assert!(resp.text().await.unwrap().contains("window.close()"));
    assert_eq!(state.sessions.len().await, 0);
}

#[tokio::test]
async fn callback_rejects_state_mismatch() {
    let (state, base) = app_with_google(true).await;
    let resp = http()
        .get(format!("{base}/auth/google/callback?code=c&state=forged"))
        .header("cookie", format!("{OAUTH_STATE_COOKIE}=expected"))
        .send()
        .await
        .unwrap();
    let cookies = set_cookies(&resp);
    assert_eq!(cookie_value(&cookies, SIGN_IN_ERROR_COOKIE).as_deref(), Some("invalid_state"));
    assert_eq!(state.sessions.len().await, 0);
}

#[tokio::test]
async fn callback_success_creates_session_visible_to_me() {
    let (state, base) = app_with_google(true).await;
    let resp = http()
        .get(format!("{base}/auth/google/callback?code=c&state=s"))
        .header("cookie", format!("{OAUTH_STATE_COOKIE}=s"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    let token = cookie_value(&cookies, SESSION_COOKIE).expect("session cookie");
    let session_cookie = cookies
        .iter()
        .find(|c| c.starts_with(&format!("{SESSION_COOKIE}=")))
        .expect("session cookie header");
    assert!(session_cookie.contains(&format!("Max-Age={}", SESSION_TTL.as_secs())));
    assert_eq!(cookie_value(&cookies, OAUTH_STATE_COOKIE).as_deref(), Some(""));
    assert_eq!(state.sessions.len().await, 1);

    let me = http()
        .get(format!("{base}/api/auth/me"))
        .header("cookie", format!("{SESSION_COOKIE}={token}"))
        .send()
        .await
        .unwrap();
    let body: Value = me.json().await.unwrap();
    assert_eq!(body["uid"], "firebase-uid-ada");
    assert_eq!(body["email"], "ada@example.com");
}

#[tokio::test]
async fn callback_firebase_rejection_is_reported() {
    let (state, base) = app_with_google(false).await;
    let resp = http()
        .get(format!("{base}/auth/google/callback?code=c&state=s"))
        .header("cookie", format!("{OAUTH_STATE_COOKIE}=s"))
        .send()
        .await
        .unwrap();
    let cookies = set_cookies(&resp);
    assert_eq!(cookie_value(&cookies, SIGN_IN_ERROR_COOKIE).as_deref(), Some("operation_not_allowed"));
    assert_eq!(state.sessions.len().await, 0);
}

#[tokio::test]
async fn logout_removes_session_and_clears_cookie() {
    let state = test_app_state();
    let token = state.sessions.create(live_session(ada())).await;
    let base = serve(api_routes(state.clone())).await;

    let resp = http()
        .post(format!("{base}/api/auth/logout"))
        .header("cookie", format!("{SESSION_COOKIE}={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(cookie_value(&set_cookies(&resp), SESSION_COOKIE).as_deref(), Some(""));
    assert!(state.sessions.get(&token).await.is_none());
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let base = serve(api_routes(test_app_state())).await;
    let resp = http().post(format!("{base}/api/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn expired_token_with_dead_refresh_ends_session() {
    // Secure-token endpoint that always refuses.
    let mock = serve(Router::new().route(
        "/token",
        post(|| async {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": { "code": 400, "message": "TOKEN_EXPIRED" } })))
        }),
    ))
    .await;
    let mut state = test_app_state();
    state.firebase = Arc::new(FirebaseConfig { secure_token_base: mock, ..FirebaseConfig::default() });
    let mut session = live_session(ada());
    session.expires_at = Instant::now();
    let token = state.sessions.create(session).await;
    let base = serve(api_routes(state.clone())).await;

    let resp = http()
        .get(format!("{base}/api/auth/me"))
        .header("cookie", format!("{SESSION_COOKIE}={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.sessions.get(&token).await.is_none());
}
