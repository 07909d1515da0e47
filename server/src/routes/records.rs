//! Record routes: validated append to the document store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use session::Record;

use super::auth::AuthUser;
use crate::services::firebase::FirebaseError;
use crate::services::firestore;
use crate::state::AppState;

/// Status returned to the browser for a failed Firestore write. An expired or
/// revoked credential reads as signed out; anything else is an upstream fault.
pub(crate) fn store_failure_status(err: &FirebaseError) -> StatusCode {
    match err {
        FirebaseError::Rejected { status: 401, .. } => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Read a record off the request body. Deserialization trims and validates,
/// so the message is the record error itself for a well-formed but invalid
/// record.
pub(crate) fn parse_record(body: serde_json::Value) -> Result<Record, String> {
    let record = serde_json::from_value::<Record>(body).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}

/// `POST /api/records`: re-validate and append with the caller's credentials.
pub async fn append_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let record = match parse_record(body) {
        Ok(record) => record,
        Err(message) => return error_body(StatusCode::UNPROCESSABLE_ENTITY, message),
    };

    match firestore::append(&state.http, &state.firebase, &auth.session.id_token, &record).await {
        Ok(()) => {
            tracing::info!(uid = %auth.session.identity.uid, collection = record.collection(), "record appended");
            StatusCode::CREATED.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, uid = %auth.session.identity.uid, "firestore append failed");
            error_body(store_failure_status(&e), e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
