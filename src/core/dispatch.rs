// src/core/dispatch.rs — Downstream webhook dispatch with bounded retries
//
// The dispatcher is a pure network-calling unit: it never touches the
// session ledger. Success/failure bookkeeping belongs to its caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::types::{AgentData, GenerationRequest, GenerationResponse, PropertyData};
use crate::infra::config::WebhookConfig;
use crate::infra::errors::RelayError;

/// Reduced view of the request posted to the downstream webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub session_id: String,
    pub property: PropertyData,
    pub agent: AgentData,
    pub timestamp: String,
}

impl WebhookPayload {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            session_id: request.session_id.clone(),
            property: request.property_data.clone(),
            agent: request.agent_data.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Seam between the retry loop and the network, so tests substitute a mock.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, payload: &WebhookPayload) -> Result<GenerationResponse, RelayError>;
}

/// Production transport: JSON POST with a hard per-attempt timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            timeout: config.timeout(),
        }
    }

    fn classify(&self, error: reqwest::Error) -> RelayError {
        if error.is_timeout() {
            RelayError::DownstreamTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            RelayError::DownstreamTransport(error.to_string())
        }
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post(&self, payload: &WebhookPayload) -> Result<GenerationResponse, RelayError> {
        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .header("user-agent", format!("listing-relay/{}", env!("CARGO_PKG_VERSION")))
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::DownstreamHttp {
                status: status.as_u16(),
            });
        }

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| self.classify(e))
    }
}

/// Delay between attempt `k` and `k + 1`: 2^k seconds, no jitter.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Bounded-retry dispatcher over a [`WebhookTransport`].
pub struct Dispatcher {
    transport: Arc<dyn WebhookTransport>,
    max_attempts: u32,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>, max_attempts: u32) -> Self {
        Self {
            transport,
            max_attempts,
        }
    }

    /// Execute the downstream call, retrying transient failures with
    /// exponential backoff. On exhaustion the last error is carried in
    /// `DownstreamUnavailable`.
    pub async fn dispatch(&self, payload: &WebhookPayload) -> Result<GenerationResponse, RelayError> {
        let mut last_error: Option<RelayError> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = backoff_delay(attempt - 1);
                tracing::info!(
                    session_id = %payload.session_id,
                    attempt = attempt + 1,
                    max_attempts = self.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying downstream webhook"
                );
                tokio::time::sleep(delay).await;
            }

            match self.transport.post(payload).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retriable() => {
                    tracing::warn!(
                        session_id = %payload.session_id,
                        attempt = attempt + 1,
                        "downstream attempt failed: {e}"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".into());
        Err(RelayError::DownstreamUnavailable {
            attempts: self.max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback;
    use crate::core::testutil::sample_request;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Scripted transport: pops one result per attempt and records when each
    /// attempt happened (paused-clock instants, so deltas are exact).
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<GenerationResponse, RelayError>>>,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<GenerationResponse, RelayError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebhookTransport for ScriptedTransport {
        async fn post(&self, _payload: &WebhookPayload) -> Result<GenerationResponse, RelayError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(RelayError::DownstreamHttp { status: 500 }))
        }
    }

    fn response() -> GenerationResponse {
        fallback::synthesize(&sample_request())
    }

    fn payload() -> WebhookPayload {
        WebhookPayload::from_request(&sample_request())
    }

    fn http_err(status: u16) -> RelayError {
        RelayError::DownstreamHttp { status }
    }

    #[test]
    fn test_backoff_delay_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_payload_reduces_request() {
        let request = sample_request();
        let payload = WebhookPayload::from_request(&request);
        assert_eq!(payload.session_id, request.session_id);
        assert_eq!(payload.property, request.property_data);
        assert_eq!(payload.agent, request.agent_data);
        assert!(chrono::DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
    }

    #[test]
    fn test_payload_wire_casing() {
        let value = serde_json::to_value(payload()).unwrap();
        assert!(value.get("sessionId").is_some());
        assert!(value["property"].get("address").is_some());
        assert!(value["agent"].get("headshot").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_skips_backoff() {
        let expected = response();
        let transport = ScriptedTransport::new(vec![Ok(expected.clone())]);
        let dispatcher = Dispatcher::new(transport.clone(), 3);
        let start = Instant::now();

        let result = dispatcher.dispatch(&payload()).await.unwrap();
        assert_eq!(result, expected);
        assert_eq!(transport.call_times().len(), 1);
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_one_second_then_success() {
        let transport = ScriptedTransport::new(vec![Err(http_err(502)), Ok(response())]);
        let dispatcher = Dispatcher::new(transport.clone(), 3);
        let start = Instant::now();

        dispatcher.dispatch(&payload()).await.unwrap();

        let calls = transport.call_times();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], start);
        assert_eq!(calls[1] - start, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_three_attempts_with_backoff() {
        let transport = ScriptedTransport::new(vec![
            Err(http_err(500)),
            Err(http_err(500)),
            Err(http_err(503)),
        ]);
        let dispatcher = Dispatcher::new(transport.clone(), 3);
        let start = Instant::now();

        let err = dispatcher.dispatch(&payload()).await.unwrap_err();
        match err {
            RelayError::DownstreamUnavailable { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"), "carries the last error: {last_error}");
            }
            other => panic!("expected DownstreamUnavailable, got {other:?}"),
        }

        // Exactly 3 attempts, at t+0s, t+1s, t+3s (backoff 1s then 2s)
        let calls = transport.call_times();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], start);
        assert_eq!(calls[1] - start, Duration::from_secs(1));
        assert_eq!(calls[2] - start, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_and_transport_errors_also_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(RelayError::DownstreamTimeout { timeout_ms: 10_000 }),
            Err(RelayError::DownstreamTransport("connection reset".into())),
            Ok(response()),
        ]);
        let dispatcher = Dispatcher::new(transport.clone(), 3);

        assert!(dispatcher.dispatch(&payload()).await.is_ok());
        assert_eq!(transport.call_times().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retriable_error_escapes_immediately() {
        let transport = ScriptedTransport::new(vec![Err(RelayError::LedgerInvariant(
            "bug".into(),
        ))]);
        let dispatcher = Dispatcher::new(transport.clone(), 3);

        let err = dispatcher.dispatch(&payload()).await.unwrap_err();
        assert!(matches!(err, RelayError::LedgerInvariant(_)));
        assert_eq!(transport.call_times().len(), 1);
    }
}
