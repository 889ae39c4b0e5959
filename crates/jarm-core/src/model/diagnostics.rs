// ── Readiness, diagnostics and agent statistics ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessCheck {
    pub name: String,
    pub ok: bool,
    pub error: Option<String>,
}

/// Result of the backend's readiness checks, sorted by check name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readiness {
    pub ready: bool,
    pub checks: Vec<ReadinessCheck>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Readiness {
    pub fn failing(&self) -> impl Iterator<Item = &ReadinessCheck> {
        self.checks.iter().filter(|c| !c.ok)
    }
}

/// Health of one backing store with best-effort row counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub name: String,
    pub ok: bool,
    pub counts: BTreeMap<String, u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub system_running: bool,
    pub data_points: u64,
    pub monitor_thread_alive: bool,
    pub debug: bool,
    pub cpu_threshold: f64,
    pub memory_threshold: f64,
    pub server_time: Option<DateTime<Utc>>,
    pub uptime_seconds: u64,
    pub stores: Vec<StoreStatus>,
    pub versions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
    pub total_states: u64,
    pub total_visits: u64,
    pub recent_activity: u64,
    /// Passed through as sent; the backend defines no fixed shape.
    pub top_states: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityStats {
    pub total_alerts: u64,
    /// Last 24 hours.
    pub recent_alerts: u64,
}
