use super::payload::PayloadHandle;
use super::source::{ConfidenceSource, ConfidenceUpdate};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RefreshTrigger {
    PayloadReady,
    Timer,
    LogSubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied(ConfidenceUpdate),
    /// Another refresh was already in flight.
    Busy,
    /// The fetch failed; the previous score/band stay in place.
    Failed(String),
    /// Torn down before or while fetching; nothing was written.
    Discarded,
    /// Fetched, but there was no payload to patch.
    NoPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RefreshEvent {
    Started { trigger: RefreshTrigger },
    Updated(ConfidenceUpdate),
    /// Transient, user-visible failure message.
    Notice { message: String },
}

/// Clears the in-flight flag when the refresh ends, including when the
/// refresh future is dropped mid-fetch.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct ConfidenceRefresher<S> {
    source: Arc<S>,
    payload: PayloadHandle,
    in_flight: Arc<AtomicBool>,
    cancel: CancellationToken,
    events: Option<Sender<RefreshEvent>>,
}

impl<S> Clone for ConfidenceRefresher<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            payload: self.payload.clone(),
            in_flight: self.in_flight.clone(),
            cancel: self.cancel.clone(),
            events: self.events.clone(),
        }
    }
}

impl<S: ConfidenceSource> ConfidenceRefresher<S> {
    pub fn new(source: S, payload: PayloadHandle) -> Self {
        Self {
            source: Arc::new(source),
            payload,
            in_flight: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: Sender<RefreshEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn payload(&self) -> &PayloadHandle {
        &self.payload
    }

    pub fn state(&self) -> RefreshState {
        if self.in_flight.load(Ordering::Acquire) {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops all current and future refreshes from writing to the payload.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn refresh(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        if self.cancel.is_cancelled() {
            return RefreshOutcome::Discarded;
        }

        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Ignoring {:?} refresh: one is already in flight", trigger);
            return RefreshOutcome::Busy;
        };

        self.send_event(RefreshEvent::Started { trigger });

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Confidence refresh cancelled mid-flight");
                return RefreshOutcome::Discarded;
            }
            result = self.source.fetch_confidence() => result,
        };

        if self.cancel.is_cancelled() {
            return RefreshOutcome::Discarded;
        }

        let outcome = match result {
            Ok(update) => {
                if self.payload.patch_confidence(&update).await {
                    RefreshOutcome::Applied(update)
                } else {
                    debug!("Confidence fetched before any payload was loaded; dropping it");
                    RefreshOutcome::NoPayload
                }
            }
            Err(e) => {
                warn!("Confidence refresh failed: {}", e);
                RefreshOutcome::Failed(e.to_string())
            }
        };

        // Back to idle before anyone hears about the result.
        drop(guard);

        match &outcome {
            RefreshOutcome::Applied(update) => {
                info!(
                    "Confidence refreshed ({:?}): score {} band {}",
                    trigger, update.score, update.band
                );
                self.send_event(RefreshEvent::Updated(*update));
            }
            RefreshOutcome::Failed(reason) => {
                self.send_event(RefreshEvent::Notice {
                    message: format!("Couldn't update forecast confidence: {}", reason),
                });
            }
            _ => {}
        }

        outcome
    }

    /// Never waits on the listener; a full or closed channel drops the event.
    fn send_event(&self, event: RefreshEvent) {
        let Some(events) = &self.events else { return };
        match events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Refresh event listener is lagging; dropping {:?}", event);
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Refresh event listener is gone");
            }
        }
    }
}
