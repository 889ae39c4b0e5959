// Monitoring lifecycle and system metrics endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    Ack, GaugeResponse, HealthResponse, HistoricalResponse, MetricsResponse, StatusResponse,
};

impl ApiClient {
    /// Current monitoring state and agent status.
    ///
    /// `GET /api/status`
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        let url = self.api_url("status")?;
        self.get(url).await
    }

    /// Liveness check.
    ///
    /// `GET /healthz`
    pub async fn healthz(&self) -> Result<HealthResponse, Error> {
        let url = self.root_url("healthz")?;
        self.get(url).await
    }

    /// Start backend monitoring. The server clamps `interval` to 1..=60 s.
    ///
    /// `POST /api/start_monitoring` with optional `{"interval": n}`
    pub async fn start_monitoring(&self, interval_secs: Option<u32>) -> Result<Ack, Error> {
        let url = self.api_url("start_monitoring")?;
        debug!(?interval_secs, "starting monitoring");
        match interval_secs {
            Some(n) => self.post(url, Some(&json!({ "interval": n }))).await,
            None => self.post(url, None::<&()>).await,
        }
    }

    /// Stop backend monitoring.
    ///
    /// `POST /api/stop_monitoring`
    pub async fn stop_monitoring(&self) -> Result<Ack, Error> {
        let url = self.api_url("stop_monitoring")?;
        debug!("stopping monitoring");
        self.post(url, None::<&()>).await
    }

    /// Latest CPU / memory / process counters.
    ///
    /// `GET /api/metrics?hours={hours}`
    pub async fn metrics(&self, hours: u32) -> Result<MetricsResponse, Error> {
        let url = self.api_url(&format!("metrics?hours={hours}"))?;
        self.get(url).await
    }

    /// Stored samples for the line chart.
    ///
    /// `GET /api/metrics/historical?hours={hours}`
    pub async fn historical_metrics(&self, hours: u32) -> Result<HistoricalResponse, Error> {
        let url = self.api_url(&format!("metrics/historical?hours={hours}"))?;
        self.get(url).await
    }

    /// Dial values with server-computed colors.
    ///
    /// `GET /api/system/gauge-data`
    pub async fn gauge_data(&self) -> Result<GaugeResponse, Error> {
        let url = self.api_url("system/gauge-data")?;
        self.get(url).await
    }

    /// MySQL-compatible dump of stored metrics. The body is SQL text.
    ///
    /// `GET /api/export_metrics_mysql?hours={hours}`
    pub async fn export_metrics_sql(&self, hours: u32) -> Result<String, Error> {
        let url = self.api_url(&format!("export_metrics_mysql?hours={hours}"))?;
        debug!(hours, "exporting metrics");
        self.get_text(url).await
    }

    /// CSV dump of every stored task, newest first.
    ///
    /// `GET /api/export_tasks_csv`
    pub async fn export_tasks_csv(&self) -> Result<String, Error> {
        let url = self.api_url("export_tasks_csv")?;
        debug!("exporting tasks");
        self.get_text(url).await
    }

    /// CSV dump of every stored alert, newest first.
    ///
    /// `GET /api/export_alerts_csv`
    pub async fn export_alerts_csv(&self) -> Result<String, Error> {
        let url = self.api_url("export_alerts_csv")?;
        debug!("exporting alerts");
        self.get_text(url).await
    }
}
