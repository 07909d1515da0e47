use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

const GOOGLE: [(&str, &str); 3] = [
    ("GOOGLE_CLIENT_ID", "client-id"),
    ("GOOGLE_CLIENT_SECRET", "client-secret"),
    ("GOOGLE_REDIRECT_URI", "https://app.example.com/auth/google/callback"),
];

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", "On", "  true  "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "FALSE"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_invalid_returns_none() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

#[test]
fn empty_environment_uses_defaults() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(!config.cookie_secure);
    assert!(config.google.is_none());
    assert_eq!(config.firebase.web.api_key, "");
    assert_eq!(config.firebase.web.project_id, "");
}

#[test]
fn port_is_parsed() {
    let config = AppConfig::from_lookup(lookup_from(&[("PORT", " 8080 ")])).unwrap();
    assert_eq!(config.port, 8080);
}

#[test]
fn invalid_port_is_an_error() {
    let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("eighty".to_owned()));
}

#[test]
fn google_config_enables_sign_in() {
    let config = AppConfig::from_lookup(lookup_from(&GOOGLE)).unwrap();
    let google = config.google.expect("google configured");
    assert_eq!(google.client_id, "client-id");
    assert_eq!(google.redirect_uri, "https://app.example.com/auth/google/callback");
}

#[test]
fn partial_google_config_disables_sign_in() {
    let config = AppConfig::from_lookup(lookup_from(&GOOGLE[..2])).unwrap();
    assert!(config.google.is_none());
}

#[test]
fn cookie_secure_inferred_from_https_redirect() {
    let config = AppConfig::from_lookup(lookup_from(&GOOGLE)).unwrap();
    assert!(config.cookie_secure);

    let config = AppConfig::from_lookup(lookup_from(&[(
        "GOOGLE_REDIRECT_URI",
        "http://localhost:3000/auth/google/callback",
    )]))
    .unwrap();
    assert!(!config.cookie_secure);
}

#[test]
fn cookie_secure_explicit_value_wins() {
    let mut pairs = GOOGLE.to_vec();
    pairs.push(("COOKIE_SECURE", "false"));
    let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
    assert!(!config.cookie_secure);
}

#[test]
fn unparseable_cookie_secure_falls_back_to_inference() {
    let mut pairs = GOOGLE.to_vec();
    pairs.push(("COOKIE_SECURE", "sometimes"));
    let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
    assert!(config.cookie_secure);
}
