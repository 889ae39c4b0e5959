// ── Status and metrics domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend monitoring state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub system_running: bool,
    pub timestamp: Option<DateTime<Utc>>,
    /// Agent name to state (`"active"` / `"inactive"`). Empty for push updates.
    pub agents: BTreeMap<String, String>,
}

/// Latest resource reading. Only the most recent sample is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub data_points_count: u64,
    pub active_processes: u64,
}

/// One point of the historical line chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub processes: u64,
}

/// Liveness check result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
    pub status: String,
    pub system_running: bool,
    pub uptime_seconds: f64,
    pub timestamp: Option<DateTime<Utc>>,
}
