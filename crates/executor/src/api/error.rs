use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::BridgeError;
use serde_json::Value;

/// HTTP face of a `BridgeError`.
///
/// Exchange failures pass the exchange's own body through untouched; every
/// other failure becomes a `{code, message}` JSON object.
pub struct ApiError(pub BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        Self(err)
    }
}

fn status_for(err: &BridgeError) -> StatusCode {
    match err {
        BridgeError::Auth(_) => StatusCode::UNAUTHORIZED,
        BridgeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BridgeError::InvalidSide(_) => StatusCode::BAD_REQUEST,
        BridgeError::SlotsExhausted { .. } => StatusCode::CONFLICT,
        BridgeError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BridgeError::Exchange { .. } | BridgeError::Transport(_) | BridgeError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
        BridgeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        match self.0 {
            BridgeError::Exchange { body, .. } => {
                let content_type = if serde_json::from_str::<Value>(&body).is_ok() {
                    "application/json"
                } else {
                    "text/plain; charset=utf-8"
                };
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            other => (status, Json(other.payload())).into_response(),
        }
    }
}
