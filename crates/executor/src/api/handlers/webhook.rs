use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::Value;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::ApiState;

pub async fn receive(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let span = info_span!("webhook", request_id = %Uuid::new_v4());

    async move {
        info!("Webhook received ({} bytes)", body.len());

        match state.execution.handle_webhook(&body).await {
            Ok(response) => Ok(Json(response)),
            Err(e) => {
                if e.is_rejection() {
                    warn!(code = e.code(), "Webhook rejected: {}", e);
                } else {
                    error!(code = e.code(), "Webhook failed: {}", e);
                }
                Err(e.into())
            }
        }
    }
    .instrument(span)
    .await
}
