// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::types::{ErrorResponse, GenerationResponse};
use crate::api::ApiState;
use crate::core::admission::{self, Decision};
use crate::core::dispatch::WebhookPayload;
use crate::core::fallback;

/// POST /api/v1/generate — Forward a generation request downstream, once per
/// session. Duplicates are rejected while work is in flight and served from
/// cache after it completes; irrecoverable downstream failure yields a
/// synthesized response with the same shape and a 200.
pub async fn generate(
    State(state): State<ApiState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<GenerationResponse>), (StatusCode, Json<ErrorResponse>)> {
    let request = admission::validate(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let correlation_id = match admission::admit(&state.ledger, &request) {
        Decision::Cached(response) => {
            tracing::info!(session_id = %request.session_id, "serving cached response");
            return Ok((StatusCode::OK, Json(*response)));
        }
        Decision::Rejected => {
            tracing::info!(
                session_id = %request.session_id,
                "rejecting duplicate while generation is in progress"
            );
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    error: "Request already in progress for this session".into(),
                }),
            ));
        }
        Decision::Proceed { correlation_id } => correlation_id,
    };

    // The ledger entry is already in progress; the downstream call runs
    // without holding any lock.
    let payload = WebhookPayload::from_request(&request);
    match state.dispatcher.dispatch(&payload).await {
        Ok(response) => {
            if let Err(e) =
                state
                    .ledger
                    .complete(&request.session_id, &correlation_id, response.clone())
            {
                // The dedup guarantee is already broken if this fires. Serve
                // the generated content anyway.
                tracing::error!(
                    session_id = %request.session_id,
                    correlation_id = %correlation_id,
                    "{e}"
                );
            }
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            tracing::error!(
                session_id = %request.session_id,
                correlation_id = %correlation_id,
                "downstream generation failed, synthesizing fallback: {e}"
            );
            state.ledger.abandon(&request.session_id);
            Ok((StatusCode::OK, Json(fallback::synthesize(&request))))
        }
    }
}

/// GET /api/v1/health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
