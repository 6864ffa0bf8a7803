use super::source::ConfidenceUpdate;
use crate::chart::ChartLayout;
use crate::schema::{Confidence, DashboardPayload};
use crate::{derive_with_layout, DashboardDerivation};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared slot for the current dashboard payload.
///
/// The screen controller replaces the whole payload on each fetch; the
/// refresher only ever patches the confidence score and band. Whichever
/// write lands last wins.
#[derive(Debug, Clone, Default)]
pub struct PayloadHandle {
    inner: Arc<RwLock<Option<DashboardPayload>>>,
}

impl PayloadHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: DashboardPayload) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(payload))),
        }
    }

    pub async fn replace(&self, payload: DashboardPayload) {
        *self.inner.write().await = Some(payload);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn is_ready(&self) -> bool {
        self.inner.read().await.is_some()
    }

    pub async fn snapshot(&self) -> Option<DashboardPayload> {
        self.inner.read().await.clone()
    }

    pub async fn confidence(&self) -> Option<Confidence> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|payload| payload.confidence.clone())
    }

    /// Returns `false` when there is no payload to patch.
    pub async fn patch_confidence(&self, update: &ConfidenceUpdate) -> bool {
        let mut guard = self.inner.write().await;
        match guard.as_mut() {
            Some(payload) => {
                payload.confidence.score = Some(update.score);
                payload.confidence.band = Some(update.band);
                true
            }
            None => false,
        }
    }

    pub async fn derive(
        &self,
        now: NaiveDate,
        layout: &ChartLayout,
    ) -> Option<DashboardDerivation> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|payload| derive_with_layout(payload, now, layout))
    }
}
