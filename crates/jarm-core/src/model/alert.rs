// ── Alert and notification domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Alert severity with the total order `Low < Medium < High < Critical`.
///
/// Parsing is case-insensitive; the backend sends capitalized names.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lenient decode: missing or unrecognized values become `Low`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }

    /// Whether `raw` names one of the four levels. Missing or blank values
    /// count as recognized `Low`; anything else that fails to parse does not.
    pub fn is_recognized(raw: Option<&str>) -> bool {
        match raw.map(str::trim) {
            None | Some("") => true,
            Some(s) => s.parse::<Self>().is_ok(),
        }
    }

    /// Capitalized display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Opaque alert identity. Unique within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An active alert from the latest snapshot.
///
/// Alerts without an `id` can be displayed but never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Option<AlertId>,
    pub kind: String,
    pub severity: Severity,
    /// False when the backend sent a severity outside the four levels and
    /// `severity` holds the `Low` fallback.
    #[serde(default = "recognized")]
    pub severity_recognized: bool,
    pub message: String,
    pub source: String,
    pub created_at: Option<DateTime<Utc>>,
}

fn recognized() -> bool {
    true
}

/// Notification identity, used for the mark-as-read command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Option<NotificationId>,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub is_read: bool,
}

/// Push-only alert notice. Carries no identity, so it bypasses dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveAlert {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Persistent badge showing the highest severity among all active alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityBadge {
    pub highest: Option<Severity>,
}

impl SeverityBadge {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        Self {
            highest: alerts.iter().map(|a| a.severity).max(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.highest.map_or("All Clear", Severity::label)
    }

    /// Style class for the presentation layer.
    pub fn class(&self) -> &'static str {
        match self.highest {
            None => "badge-clear",
            Some(Severity::Low) => "badge-low",
            Some(Severity::Medium) => "badge-medium",
            Some(Severity::High) => "badge-high",
            Some(Severity::Critical) => "badge-critical",
        }
    }
}
