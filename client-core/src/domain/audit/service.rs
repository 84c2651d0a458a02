//! Fire-and-forget audit emitter with a bounded persisted retry queue.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bounded_queue::{BoundedQueue, ZeroCapacityError};
use tracing::{debug, warn};

use crate::domain::audit::AuditEvent;
use crate::domain::ports::{AuditSink, AuditTransport, KeyValueStore};

/// Storage key under which undelivered events are persisted.
///
/// Unlike note drafts, the retry queue is stored as plain JSON; it matches
/// what the server-side audit table would have recorded anyway.
pub const FAILED_AUDIT_LOG_KEY: &str = "failed_audit_logs";

/// Outcome of one [`AuditService::retry_failed`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryOutcome {
    /// Events the transport accepted during this pass.
    pub delivered: usize,
    /// Events that failed again and went back onto the queue.
    pub requeued: usize,
}

/// Best-effort audit emitter.
///
/// [`AuditService::log_event`] never fails from the caller's perspective:
/// when the transport rejects an event it joins a bounded evict-oldest queue
/// (capacity from configuration, 100 in production) that is persisted to the
/// injected store after every mutation and rehydrated on construction. This
/// is telemetry, not a guaranteed-delivery log; a retry racing a fresh event
/// for the same logical action can deliver duplicates, and nothing dedupes.
pub struct AuditService<T, S> {
    transport: Arc<T>,
    store: Arc<S>,
    queue: Mutex<BoundedQueue<AuditEvent>>,
}

impl<T, S> AuditService<T, S>
where
    T: AuditTransport,
    S: KeyValueStore,
{
    /// Create an emitter, rehydrating any queue persisted by a previous run.
    ///
    /// A persisted queue that cannot be read or parsed is discarded (same
    /// erasure policy as the secure cache).
    ///
    /// # Errors
    ///
    /// Returns [`ZeroCapacityError`] when `capacity` is zero.
    pub fn new(transport: Arc<T>, store: Arc<S>, capacity: usize) -> Result<Self, ZeroCapacityError> {
        let persisted = Self::load_persisted(store.as_ref());
        let queue = BoundedQueue::from_items(capacity, persisted)?;
        Ok(Self {
            transport,
            store,
            queue: Mutex::new(queue),
        })
    }

    /// Record one event, queueing it locally if delivery fails.
    ///
    /// Never returns an error: audit logging must not propagate failures
    /// back into clinical workflows.
    pub async fn log_event(&self, event: AuditEvent) {
        match self.transport.deliver(&event).await {
            Ok(()) => debug!(action = %event.action, "audit event delivered"),
            Err(err) => {
                warn!(action = %event.action, error = %err, "audit delivery failed; queueing");
                let mut queue = self.lock_queue();
                if let Some(evicted) = queue.push(event) {
                    warn!(
                        action = %evicted.action,
                        "audit queue full; dropped oldest undelivered event"
                    );
                }
                self.persist(&queue);
            }
        }
    }

    /// Re-attempt every queued event once, requeueing the ones that fail.
    pub async fn retry_failed(&self) -> RetryOutcome {
        let pending = self.lock_queue().drain();
        if pending.is_empty() {
            return RetryOutcome::default();
        }

        let mut outcome = RetryOutcome::default();
        let mut still_failing = Vec::new();
        for event in pending {
            match self.transport.deliver(&event).await {
                Ok(()) => outcome.delivered += 1,
                Err(err) => {
                    debug!(action = %event.action, error = %err, "audit retry failed");
                    still_failing.push(event);
                }
            }
        }
        outcome.requeued = still_failing.len();

        let mut queue = self.lock_queue();
        for event in still_failing {
            queue.push(event);
        }
        self.persist(&queue);
        outcome
    }

    /// Number of undelivered events currently queued.
    pub fn queued_len(&self) -> usize {
        self.lock_queue().len()
    }

    fn lock_queue(&self) -> MutexGuard<'_, BoundedQueue<AuditEvent>> {
        match self.queue.lock() {
            Ok(guard) => guard,
            // A panic mid-push cannot leave the queue structurally broken,
            // so recover the guard rather than losing the whole queue.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, queue: &BoundedQueue<AuditEvent>) {
        let snapshot: Vec<&AuditEvent> = queue.iter().collect();
        let serialized = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize audit retry queue");
                return;
            }
        };
        if let Err(err) = self.store.put(FAILED_AUDIT_LOG_KEY, &serialized) {
            warn!(error = %err, "failed to persist audit retry queue");
        }
    }

    fn load_persisted(store: &S) -> Vec<AuditEvent> {
        let raw = match store.get(FAILED_AUDIT_LOG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read persisted audit retry queue");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "discarding unparsable audit retry queue");
                if let Err(remove_err) = store.remove(FAILED_AUDIT_LOG_KEY) {
                    warn!(error = %remove_err, "failed to remove unparsable audit retry queue");
                }
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<T, S> AuditSink for AuditService<T, S>
where
    T: AuditTransport,
    S: KeyValueStore,
{
    async fn record(&self, event: AuditEvent) {
        self.log_event(event).await;
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
