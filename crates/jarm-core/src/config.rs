// ── Runtime dashboard configuration ──
//
// Describes *how* to reach the backend and how often to refresh each
// stream. Never touches disk: the CLI/TUI (via jarm-config) builds a
// `DashboardConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use jarm_api::{ReconnectConfig, TlsMode, TransportConfig};
use url::Url;

use crate::scheduler::StreamKind;

pub const DEFAULT_REFRESH: Duration = Duration::from_millis(2000);
pub const DEFAULT_CHART_REFRESH: Duration = Duration::from_millis(5000);
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Per-stream refresh cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub status: Duration,
    pub metrics: Duration,
    pub alerts: Duration,
    pub notifications: Duration,
    pub analytics: Duration,
    pub processes: Duration,
}

impl RefreshIntervals {
    /// Same period for every stream.
    pub const fn uniform(period: Duration) -> Self {
        Self {
            status: period,
            metrics: period,
            alerts: period,
            notifications: period,
            analytics: period,
            processes: period,
        }
    }

    pub fn get(&self, kind: StreamKind) -> Duration {
        match kind {
            StreamKind::Status => self.status,
            StreamKind::Metrics => self.metrics,
            StreamKind::Alerts => self.alerts,
            StreamKind::Notifications => self.notifications,
            StreamKind::Analytics => self.analytics,
            StreamKind::Processes => self.processes,
        }
    }

    pub fn set(&mut self, kind: StreamKind, period: Duration) {
        let slot = match kind {
            StreamKind::Status => &mut self.status,
            StreamKind::Metrics => &mut self.metrics,
            StreamKind::Alerts => &mut self.alerts,
            StreamKind::Notifications => &mut self.notifications,
            StreamKind::Analytics => &mut self.analytics,
            StreamKind::Processes => &mut self.processes,
        };
        *slot = period;
    }
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self::uniform(DEFAULT_REFRESH)
    }
}

/// Query parameters sent with the periodic reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchParams {
    pub process_limit: u32,
    pub chart_process_limit: u32,
    pub analytics_days: u32,
    pub metrics_hours: u32,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            process_limit: 10,
            chart_process_limit: 15,
            analytics_days: 30,
            metrics_hours: 24,
        }
    }
}

/// Configuration for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend URL (e.g. `http://127.0.0.1:5000`).
    pub url: Url,
    /// Push channel URL. `None` derives the Socket.IO endpoint
    /// `ws(s)://<host>/socket.io/?EIO=4&transport=websocket` from `url`.
    pub push_url: Option<Url>,
    pub tls: TlsVerification,
    /// HTTP transport timeout.
    pub timeout: Duration,
    pub refresh: RefreshIntervals,
    pub chart_refresh: Duration,
    /// Alert and notification page size.
    pub page_size: usize,
    pub push_enabled: bool,
    pub reconnect: ReconnectConfig,
    pub audio_enabled: bool,
    pub fetch: FetchParams,
    /// Initial look-back window of the line chart.
    pub history_hours: u32,
    /// Sampling interval requested when starting monitoring.
    pub monitoring_interval_secs: u32,
}

impl DashboardConfig {
    /// Defaults for everything except the backend URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            push_url: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(15),
            refresh: RefreshIntervals::default(),
            chart_refresh: DEFAULT_CHART_REFRESH,
            page_size: DEFAULT_PAGE_SIZE,
            push_enabled: true,
            reconnect: ReconnectConfig::default(),
            audio_enabled: true,
            fetch: FetchParams::default(),
            history_hours: 24,
            monitoring_interval_secs: 5,
        }
    }

    /// The push channel endpoint, if push is enabled.
    pub fn push_endpoint(&self) -> Option<Url> {
        if !self.push_enabled {
            return None;
        }
        if let Some(url) = &self.push_url {
            return Some(url.clone());
        }
        let scheme = match self.url.scheme() {
            "https" => "wss",
            "http" => "ws",
            _ => return None,
        };
        let mut url = self.url.clone();
        url.set_scheme(scheme).ok()?;
        url.set_path("/socket.io/");
        url.set_query(Some("EIO=4&transport=websocket"));
        url.set_fragment(None);
        Some(url)
    }

    /// Build the transport settings. The TLS mode also applies to `wss://`
    /// push connections.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn push_endpoint_derived_from_backend_url() {
        let config = DashboardConfig::new(Url::parse("https://jarm.local:8443/app?x=1").unwrap());
        assert_eq!(
            config.push_endpoint().unwrap().as_str(),
            "wss://jarm.local:8443/socket.io/?EIO=4&transport=websocket"
        );

        let mut config = DashboardConfig::new(Url::parse("http://127.0.0.1:5000").unwrap());
        assert_eq!(
            config.push_endpoint().unwrap().as_str(),
            "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket"
        );

        config.push_enabled = false;
        assert!(config.push_endpoint().is_none());
    }

    #[test]
    fn explicit_push_url_wins() {
        let mut config = DashboardConfig::new(Url::parse("http://127.0.0.1:5000").unwrap());
        config.push_url = Some(Url::parse("ws://10.0.0.2:9000/events").unwrap());
        assert_eq!(
            config.push_endpoint().unwrap().as_str(),
            "ws://10.0.0.2:9000/events"
        );
    }

    #[test]
    fn refresh_intervals_per_stream() {
        let mut intervals = RefreshIntervals::default();
        assert_eq!(intervals.get(StreamKind::Alerts), Duration::from_millis(2000));
        intervals.set(StreamKind::Analytics, Duration::from_secs(30));
        assert_eq!(intervals.get(StreamKind::Analytics), Duration::from_secs(30));
        assert_eq!(intervals.get(StreamKind::Status), Duration::from_millis(2000));
    }
}
