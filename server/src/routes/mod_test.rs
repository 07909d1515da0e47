use std::sync::Arc;

use serde_json::Value;

use super::*;
use crate::services::firebase::FirebaseConfig;
use crate::state::test_helpers::{serve, test_app_state};

#[tokio::test]
async fn healthz_is_ok() {
    let base = serve(api_routes(test_app_state())).await;
    let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn firebase_config_serves_public_settings() {
    let mut state = test_app_state();
    state.firebase = Arc::new(FirebaseConfig {
        web: FirebaseWebConfig {
            api_key: "public-key".to_owned(),
            project_id: "demo".to_owned(),
            ..FirebaseWebConfig::default()
        },
        ..FirebaseConfig::default()
    });
    let base = serve(api_routes(state)).await;

    let body: Value = reqwest::get(format!("{base}/api/firebase-config"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["apiKey"], "public-key");
    assert_eq!(body["projectId"], "demo");
    assert_eq!(body["appId"], "");
}

#[tokio::test]
async fn unknown_api_path_is_not_found() {
    let base = serve(api_routes(test_app_state())).await;
    let resp = reqwest::get(format!("{base}/api/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
