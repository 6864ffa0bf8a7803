use super::refresher::{ConfidenceRefresher, RefreshTrigger};
use super::source::ConfidenceSource;
use log::{debug, info};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const TRIGGER_QUEUE: usize = 8;

/// Background driver for a [`ConfidenceRefresher`].
///
/// Fires once immediately, then every `interval`, plus whenever a trigger
/// is sent. Each refresh runs on its own task so the in-flight guard can
/// turn overlapping triggers away; those tasks are joined before the loop
/// exits. Dropping the task cancels it.
pub struct RefreshTask {
    triggers: mpsc::Sender<RefreshTrigger>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    pub fn spawn<S: ConfidenceSource>(
        refresher: ConfidenceRefresher<S>,
        interval: Duration,
    ) -> Self {
        let (triggers, mut rx) = mpsc::channel(TRIGGER_QUEUE);
        let cancel = refresher.cancellation_token();
        let loop_cancel = cancel.clone();

        info!("Confidence refresh task started (every {:?})", interval);

        let handle = tokio::spawn(async move {
            // tokio::time::interval panics on a zero period
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut in_flight = JoinSet::new();

            loop {
                let trigger = tokio::select! {
                    biased;
                    _ = loop_cancel.cancelled() => break,
                    Some(_) = in_flight.join_next(), if !in_flight.is_empty() => continue,
                    received = rx.recv() => match received {
                        Some(trigger) => trigger,
                        None => break,
                    },
                    _ = ticker.tick() => RefreshTrigger::Timer,
                };

                let worker = refresher.clone();
                in_flight.spawn(async move {
                    let outcome = worker.refresh(trigger).await;
                    debug!("Refresh {:?} finished: {:?}", trigger, outcome);
                });
            }

            // cancelled refreshes resolve as soon as they observe the token
            while in_flight.join_next().await.is_some() {}

            info!("Confidence refresh task stopped");
        });

        Self {
            triggers,
            cancel,
            handle: Some(handle),
        }
    }

    /// Requests an out-of-band refresh. Returns `false` if the task has
    /// stopped or its queue is full.
    pub fn trigger(&self, trigger: RefreshTrigger) -> bool {
        self.triggers.try_send(trigger).is_ok()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Cancels the timer and any in-flight refresh, then waits for the loop
    /// and every refresh it started to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
