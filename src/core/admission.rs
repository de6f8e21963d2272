// src/core/admission.rs — Request validation and admission decisions

use serde_json::Value;

use crate::api::types::{GenerationRequest, GenerationResponse};
use crate::core::ledger::SessionLedger;
use crate::infra::errors::RelayError;

/// Outcome of admitting a request against the session ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The session already completed — serve the cached response verbatim.
    Cached(Box<GenerationResponse>),
    /// Generation is already running for this session.
    Rejected,
    /// No entry existed; an in-progress entry was recorded and the caller
    /// may dispatch downstream.
    Proceed { correlation_id: String },
}

/// Validate a raw request body into a typed request.
///
/// Works on the raw JSON value rather than a typed extractor so that
/// malformed bodies and missing fields both surface as the same
/// `InvalidRequest` (HTTP 400) class, before any ledger interaction.
pub fn validate(body: Value) -> Result<GenerationRequest, RelayError> {
    if !body.is_object() {
        return Err(RelayError::InvalidRequest("request body must be a JSON object".into()));
    }

    for field in ["sessionId", "propertyData", "agentData"] {
        match body.get(field) {
            None | Some(Value::Null) => {
                return Err(RelayError::InvalidRequest(format!(
                    "missing required field: {field}"
                )));
            }
            Some(_) => {}
        }
    }

    let request: GenerationRequest = serde_json::from_value(body)
        .map_err(|e| RelayError::InvalidRequest(e.to_string()))?;

    if request.session_id.is_empty() {
        return Err(RelayError::InvalidRequest("sessionId must be non-empty".into()));
    }

    Ok(request)
}

/// Admit a validated request: one atomic ledger operation decides between
/// cache hit, duplicate rejection, and permission to dispatch.
///
/// The session id is used verbatim as the ledger key. The correlation id is
/// fresh per attempt; only uniqueness within the process matters.
pub fn admit(ledger: &SessionLedger, request: &GenerationRequest) -> Decision {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    ledger.admit(&request.session_id, correlation_id)
}
