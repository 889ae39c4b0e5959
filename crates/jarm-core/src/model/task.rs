// ── Task and analytics domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub command: String,
    pub category: String,
    pub risk_score: Option<f64>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for task creation. `name` must be non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub command: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
}

/// Aggregated statistics over a look-back window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub period_days: u32,
    pub total_tasks: u64,
    pub category_distribution: BTreeMap<String, u64>,
    pub success_rates: BTreeMap<String, f64>,
    pub risk: RiskSummary,
    pub total_alerts: u64,
    pub severity_distribution: BTreeMap<String, u64>,
    pub type_distribution: BTreeMap<String, u64>,
    pub learning_states: u64,
    pub learning_visits: u64,
    pub learning_recent_activity: u64,
}

/// Outcome the decision agent assigns to a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Verdict {
    Allow,
    Warn,
    Block,
    /// Only produced by the learning agent's explanation.
    Escalate,
}

impl Verdict {
    /// Blank or unknown actions carry no verdict.
    pub fn from_wire(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| s.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDecision {
    pub task_id: Option<String>,
    pub category: String,
    pub verdict: Option<Verdict>,
    pub message: String,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionExplanation {
    pub explanation: String,
    /// 0.0..=1.0
    pub confidence: f64,
    pub verdict: Option<Verdict>,
}
