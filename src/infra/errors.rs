// src/infra/errors.rs — Error types for listing-relay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    // Caller errors (never retried, never touch the ledger)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Per-attempt downstream failures (retriable)
    #[error("Downstream request timed out after {timeout_ms}ms")]
    DownstreamTimeout { timeout_ms: u64 },

    #[error("Downstream returned HTTP {status}")]
    DownstreamHttp { status: u16 },

    #[error("Downstream transport error: {0}")]
    DownstreamTransport(String),

    // Terminal downstream failure, after all attempts
    #[error("Downstream unavailable after {attempts} attempts: {last_error}")]
    DownstreamUnavailable { attempts: u32, last_error: String },

    // Internal bug class — the dedup guarantee is already broken if this fires
    #[error("Ledger invariant violated: {0}")]
    LedgerInvariant(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    /// Whether a fresh attempt against the downstream could succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            RelayError::DownstreamTimeout { .. }
                | RelayError::DownstreamHttp { .. }
                | RelayError::DownstreamTransport(_)
        )
    }
}
