//! Firestore REST append.
//!
//! Documents are created with `POST .../documents/{collection}` so Firestore
//! assigns the id. Plain JSON is converted to Firestore's typed value form;
//! integers travel as strings because Firestore's `int64` does.

#[cfg(test)]
#[path = "firestore_test.rs"]
mod tests;

use serde_json::{Map, Value, json};
use session::Record;

use super::firebase::{FirebaseConfig, FirebaseError, rejection};

/// Convert a JSON value into a Firestore `Value`.
#[must_use]
pub fn to_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({ "arrayValue": { "values": items.iter().map(to_value).collect::<Vec<_>>() } }),
        Value::Object(map) => json!({ "mapValue": { "fields": to_fields(map) } }),
    }
}

#[must_use]
pub fn to_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()
}

/// Request body for creating `record` as a new document.
#[must_use]
pub fn document_body(record: &Record) -> Value {
    json!({ "fields": to_fields(&record.fields()) })
}

#[must_use]
pub fn collection_url(config: &FirebaseConfig, collection: &str) -> String {
    format!(
        "{}/projects/{}/databases/(default)/documents/{collection}",
        config.firestore_base, config.web.project_id
    )
}

/// Append `record` to its collection on behalf of the user owning `id_token`.
///
/// # Errors
///
/// Returns [`FirebaseError`] when the request fails or Firestore rejects the
/// write (security rules, expired token, unknown project).
pub async fn append(
    http: &reqwest::Client,
    config: &FirebaseConfig,
    id_token: &str,
    record: &Record,
) -> Result<(), FirebaseError> {
    let resp = http
        .post(collection_url(config, record.collection()))
        .bearer_auth(id_token)
        .json(&document_body(record))
        .send()
        .await
        .map_err(|e| FirebaseError::Transport(e.to_string()))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(rejection(status, &body))
}
