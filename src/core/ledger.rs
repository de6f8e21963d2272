// src/core/ledger.rs — Per-session dedup state with expiry
//
// One entry per session id, guarded by a single mutex. The lock is never
// held across an await point: the downstream call happens entirely outside
// the ledger, with the entry already marked in-progress.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::api::types::GenerationResponse;
use crate::core::admission::Decision;
use crate::infra::errors::RelayError;

/// State of a tracked session. A completed session always carries its
/// response; an in-progress one never does.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    InProgress,
    Completed(Box<GenerationResponse>),
}

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub created_at: Instant,
    pub correlation_id: String,
    pub state: SessionState,
}

impl SessionEntry {
    pub fn is_in_progress(&self) -> bool {
        matches!(self.state, SessionState::InProgress)
    }
}

/// In-memory session ledger with injected retention and stall windows.
///
/// Constructed once per process and shared by `Arc`; every operation takes
/// the lock exactly once, so `admit` is atomic with respect to concurrent
/// admissions for the same session id.
pub struct SessionLedger {
    entries: Mutex<HashMap<String, SessionEntry>>,
    retention: Duration,
    stall: Duration,
}

impl SessionLedger {
    pub fn new(retention: Duration, stall: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention,
            stall,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        // A panic while holding the lock leaves the map intact; keep serving.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admission decision for a session id: sweep, then check-then-act under
    /// one lock acquisition. Exactly one concurrent caller per session id can
    /// receive `Proceed`.
    pub fn admit(&self, session_id: &str, correlation_id: String) -> Decision {
        let mut entries = self.lock();
        let now = Instant::now();
        sweep_expired(&mut entries, now, self.retention, self.stall);

        match entries.get(session_id) {
            Some(entry) => match &entry.state {
                SessionState::Completed(response) => Decision::Cached(response.clone()),
                SessionState::InProgress => Decision::Rejected,
            },
            None => {
                entries.insert(
                    session_id.to_string(),
                    SessionEntry {
                        created_at: now,
                        correlation_id: correlation_id.clone(),
                        state: SessionState::InProgress,
                    },
                );
                Decision::Proceed { correlation_id }
            }
        }
    }

    pub fn lookup(&self, session_id: &str) -> Option<SessionEntry> {
        self.lock().get(session_id).cloned()
    }

    /// Record a fresh in-progress entry. Callers must have verified the
    /// session is absent; `admit` does both under one lock and is what the
    /// request path uses.
    pub fn begin_in_progress(
        &self,
        session_id: &str,
        correlation_id: &str,
    ) -> Result<(), RelayError> {
        let mut entries = self.lock();
        if entries.contains_key(session_id) {
            return Err(RelayError::LedgerInvariant(format!(
                "session '{session_id}' already has a ledger entry"
            )));
        }
        entries.insert(
            session_id.to_string(),
            SessionEntry {
                created_at: Instant::now(),
                correlation_id: correlation_id.to_string(),
                state: SessionState::InProgress,
            },
        );
        Ok(())
    }

    /// Transition an in-progress entry to completed, caching the response.
    /// The entry must still be owned by the attempt that started it.
    pub fn complete(
        &self,
        session_id: &str,
        correlation_id: &str,
        response: GenerationResponse,
    ) -> Result<(), RelayError> {
        let mut entries = self.lock();
        let entry = entries.get_mut(session_id).ok_or_else(|| {
            RelayError::LedgerInvariant(format!(
                "completed session '{session_id}' has no ledger entry"
            ))
        })?;
        if !entry.is_in_progress() {
            return Err(RelayError::LedgerInvariant(format!(
                "session '{session_id}' is not in progress"
            )));
        }
        if entry.correlation_id != correlation_id {
            return Err(RelayError::LedgerInvariant(format!(
                "session '{session_id}' is owned by another attempt"
            )));
        }
        entry.state = SessionState::Completed(Box::new(response));
        Ok(())
    }

    /// Forget a session regardless of state. A later request for the same
    /// session id is treated as new.
    pub fn abandon(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    /// Drop entries past the retention window, and in-progress entries past
    /// the stall window. Runs opportunistically at the start of every
    /// admission; callable directly as well.
    pub fn sweep(&self) {
        let mut entries = self.lock();
        sweep_expired(&mut entries, Instant::now(), self.retention, self.stall);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

fn sweep_expired(
    entries: &mut HashMap<String, SessionEntry>,
    now: Instant,
    retention: Duration,
    stall: Duration,
) {
    entries.retain(|session_id, entry| {
        let age = now.saturating_duration_since(entry.created_at);
        let expired = age > retention || (entry.is_in_progress() && age > stall);
        if expired {
            tracing::debug!(
                session_id = %session_id,
                age_secs = age.as_secs(),
                "sweeping ledger entry"
            );
        }
        !expired
    });
}
