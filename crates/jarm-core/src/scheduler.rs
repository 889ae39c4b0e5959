// ── Refresh scheduler ──
//
// Six independent poll cycles, one tokio task each. A stream awaits its
// own request before the next tick, so it never has more than one
// request outstanding. Streams are not coordinated with each other.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use strum::{Display, EnumIter, IntoEnumIterator};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jarm_api::ApiClient;

use crate::config::{FetchParams, RefreshIntervals};
use crate::dashboard::Update;
use crate::error::CoreError;
use crate::model::{Alert, Analytics, MetricSample, Notification, ProcessSample, SystemStatus};
use crate::queries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StreamKind {
    Status,
    Metrics,
    Alerts,
    Notifications,
    Analytics,
    Processes,
}

/// Result of one successful poll.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPayload {
    Status(SystemStatus),
    Metrics(MetricSample),
    Alerts(Vec<Alert>),
    Notifications(Vec<Notification>),
    Analytics(Analytics),
    Processes(Vec<ProcessSample>),
}

impl StreamPayload {
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Status(_) => StreamKind::Status,
            Self::Metrics(_) => StreamKind::Metrics,
            Self::Alerts(_) => StreamKind::Alerts,
            Self::Notifications(_) => StreamKind::Notifications,
            Self::Analytics(_) => StreamKind::Analytics,
            Self::Processes(_) => StreamKind::Processes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamUpdate {
    pub kind: StreamKind,
    pub payload: StreamPayload,
    pub received_at: DateTime<Utc>,
}

/// Fetch one stream once.
pub async fn fetch_stream(
    api: &ApiClient,
    kind: StreamKind,
    params: &FetchParams,
) -> Result<StreamPayload, CoreError> {
    let payload = match kind {
        StreamKind::Status => StreamPayload::Status(queries::status(api).await?),
        StreamKind::Metrics => {
            StreamPayload::Metrics(queries::metrics(api, params.metrics_hours).await?)
        }
        StreamKind::Alerts => StreamPayload::Alerts(queries::alerts(api).await?),
        StreamKind::Notifications => {
            StreamPayload::Notifications(queries::notifications(api).await?)
        }
        StreamKind::Analytics => {
            StreamPayload::Analytics(queries::analytics(api, params.analytics_days).await?)
        }
        StreamKind::Processes => {
            StreamPayload::Processes(queries::processes(api, params.process_limit).await?)
        }
    };
    Ok(payload)
}

// ── RefreshScheduler ─────────────────────────────────────────────────

pub struct RefreshScheduler {
    api: Arc<ApiClient>,
    intervals: RefreshIntervals,
    params: FetchParams,
    tx: mpsc::UnboundedSender<Update>,
    cancel: Option<CancellationToken>,
}

impl RefreshScheduler {
    pub fn new(
        api: Arc<ApiClient>,
        intervals: RefreshIntervals,
        params: FetchParams,
        tx: mpsc::UnboundedSender<Update>,
    ) -> Self {
        Self {
            api,
            intervals,
            params,
            tx,
            cancel: None,
        }
    }

    pub fn intervals(&self) -> &RefreshIntervals {
        &self.intervals
    }

    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    /// Start all six cycles. Any running cycles are stopped first.
    pub fn start(&mut self) {
        self.stop();

        let cancel = CancellationToken::new();
        for kind in StreamKind::iter() {
            tokio::spawn(stream_task(
                Arc::clone(&self.api),
                kind,
                self.intervals.get(kind),
                self.params,
                self.tx.clone(),
                cancel.clone(),
            ));
        }
        self.cancel = Some(cancel);
        info!("refresh scheduler started");
    }

    /// Cancel every timer. In-flight requests are left to finish.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
            info!("refresh scheduler stopped");
        }
    }

    /// Change one stream's cadence, restarting if running.
    pub fn set_period(&mut self, kind: StreamKind, period: Duration) {
        self.intervals.set(kind, period);
        if self.is_running() {
            self.start();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn stream_task(
    api: Arc<ApiClient>,
    kind: StreamKind,
    period: Duration,
    params: FetchParams,
    tx: mpsc::UnboundedSender<Update>,
    cancel: CancellationToken,
) {
    // A zero period would panic in `interval`.
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // The fetch is not raced against cancellation: a response
                // that lands after stop is still delivered if the inbox lives.
                match fetch_stream(&api, kind, &params).await {
                    Ok(payload) => {
                        let update = StreamUpdate {
                            kind,
                            payload,
                            received_at: Utc::now(),
                        };
                        if tx.send(Update::Stream(update)).is_err() {
                            debug!(stream = %kind, "inbox closed, stopping stream");
                            break;
                        }
                    }
                    Err(e) => warn!(stream = %kind, error = %e, "refresh cycle failed"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_streams() {
        assert_eq!(StreamKind::iter().count(), 6);
        assert_eq!(StreamKind::Notifications.to_string(), "notifications");
    }

    #[test]
    fn payload_reports_its_stream() {
        assert_eq!(StreamPayload::Alerts(Vec::new()).kind(), StreamKind::Alerts);
        assert_eq!(
            StreamPayload::Metrics(MetricSample::default()).kind(),
            StreamKind::Metrics
        );
    }
}
