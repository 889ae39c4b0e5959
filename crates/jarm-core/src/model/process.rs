// ── Process and application history domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub user: Option<String>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// An application observed during a monitoring session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedApplication {
    pub id: i64,
    pub name: String,
    pub pid: Option<u32>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSession {
    pub session_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub applications: Vec<TrackedApplication>,
}

/// Open file paths of one process, as far as the backend may inspect it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFiles {
    pub pid: u32,
    pub paths: Vec<String>,
}
