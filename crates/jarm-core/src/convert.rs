// ── API-to-domain type conversions ──
//
// Bridges raw `jarm_api::models` response types into `jarm_core::model`
// domain types. Missing text becomes a placeholder, missing numbers are
// already zero from the wire layer, and timestamps are parsed leniently.

use chrono::{DateTime, NaiveDateTime, Utc};

use jarm_api::models::{
    AlertNotificationEvent, AlertRecord, AnalyticsResponse, ApplicationRecord, DecisionRecord,
    DiagnosticsReport, ExplanationResponse, HealthResponse, HistoricalPoint,
    LearningStats as LearningStatsRecord, MetricsPayload, NotificationRecord,
    ProcessFilesResponse, ProcessRecord, ReadinessResponse, SecurityStats as SecurityStatsRecord,
    SessionRecord, StatusResponse, StoreDiagnostics, SystemStatusEvent, TaskRecord,
};

use crate::model::{
    Alert, AlertId, Analytics, DecisionExplanation, Diagnostics, Health, HistoricalSample,
    LearningStats, LiveAlert, MetricSample, MonitoringSession, Notification, NotificationId,
    OpenFiles, ProcessSample, Readiness, ReadinessCheck, RiskSummary, SecurityStats, Severity,
    StoreStatus, SystemStatus, Task, TaskDecision, TrackedApplication, Verdict,
};

const UNKNOWN: &str = "unknown";
const NO_MESSAGE: &str = "(no message)";

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp. Naive values (no offset) are taken as UTC.
/// HTTP-dates (`Tue, 10 Feb 2026 12:00:00 GMT`) are accepted too; some
/// endpoints serialize raw datetimes that way.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn text_or(raw: Option<String>, placeholder: &str) -> String {
    raw.filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| placeholder.to_owned())
}

// ── Alerts & notifications ─────────────────────────────────────────

impl From<AlertRecord> for Alert {
    fn from(r: AlertRecord) -> Self {
        Self {
            id: r.id.map(AlertId::new),
            kind: text_or(r.alert_type, UNKNOWN),
            severity: Severity::from_wire(r.severity.as_deref()),
            severity_recognized: Severity::is_recognized(r.severity.as_deref()),
            message: text_or(r.message, NO_MESSAGE),
            source: text_or(r.source, UNKNOWN),
            created_at: parse_timestamp(r.created_at.as_deref()),
        }
    }
}

impl From<NotificationRecord> for Notification {
    fn from(r: NotificationRecord) -> Self {
        Self {
            id: r.id.map(NotificationId::new),
            severity: Severity::from_wire(r.severity.as_deref()),
            category: text_or(r.category, UNKNOWN),
            message: text_or(r.message, NO_MESSAGE),
            timestamp: parse_timestamp(r.timestamp.as_deref()),
            is_read: r.is_read,
        }
    }
}

impl From<AlertNotificationEvent> for LiveAlert {
    fn from(e: AlertNotificationEvent) -> Self {
        Self {
            kind: text_or(e.kind, "info"),
            title: text_or(e.title, "Alert"),
            message: text_or(e.message, NO_MESSAGE),
            timestamp: parse_timestamp(e.timestamp.as_deref()),
        }
    }
}

// ── Status & metrics ───────────────────────────────────────────────

impl From<StatusResponse> for SystemStatus {
    fn from(r: StatusResponse) -> Self {
        Self {
            system_running: r.system_running,
            timestamp: parse_timestamp(r.timestamp.as_deref()),
            agents: r.agents,
        }
    }
}

impl From<SystemStatusEvent> for SystemStatus {
    fn from(e: SystemStatusEvent) -> Self {
        Self {
            system_running: e.system_running,
            timestamp: parse_timestamp(e.timestamp.as_deref()),
            agents: std::collections::BTreeMap::new(),
        }
    }
}

impl From<MetricsPayload> for MetricSample {
    fn from(m: MetricsPayload) -> Self {
        Self {
            timestamp: parse_timestamp(m.last_timestamp.as_deref()),
            cpu_percent: m.cpu_stats.current,
            memory_percent: m.memory_stats.current,
            data_points_count: m.data_points,
            active_processes: m.active_processes,
        }
    }
}

impl From<HistoricalPoint> for HistoricalSample {
    fn from(p: HistoricalPoint) -> Self {
        Self {
            timestamp: parse_timestamp(p.timestamp.as_deref()),
            cpu_percent: p.cpu,
            memory_percent: p.memory,
            processes: p.processes,
        }
    }
}

impl From<HealthResponse> for Health {
    fn from(r: HealthResponse) -> Self {
        Self {
            ok: r.ok,
            status: text_or(Some(r.status), UNKNOWN),
            system_running: r.system_running,
            uptime_seconds: r.uptime_seconds,
            timestamp: parse_timestamp(r.timestamp.as_deref()),
        }
    }
}

// ── Processes ──────────────────────────────────────────────────────

impl From<ProcessRecord> for ProcessSample {
    fn from(r: ProcessRecord) -> Self {
        Self {
            pid: r.pid,
            name: text_or(Some(r.name), UNKNOWN),
            user: r.user.filter(|u| !u.is_empty()),
            cpu_percent: r.cpu_percent,
            memory_percent: r.memory_percent,
            read_bytes: r.read_bytes,
            write_bytes: r.write_bytes,
        }
    }
}

impl From<ApplicationRecord> for TrackedApplication {
    fn from(r: ApplicationRecord) -> Self {
        Self {
            id: r.id,
            name: text_or(Some(r.name), UNKNOWN),
            pid: r.pid,
            cpu_percent: r.cpu_usage,
            memory_percent: r.memory_usage,
            started_at: parse_timestamp(r.start_time.as_deref()),
        }
    }
}

impl From<SessionRecord> for MonitoringSession {
    fn from(r: SessionRecord) -> Self {
        Self {
            session_id: r.session_id,
            started_at: parse_timestamp(r.start_time.as_deref()),
            applications: r.applications.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Tasks & analytics ──────────────────────────────────────────────

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            command: r.command.unwrap_or_default(),
            category: text_or(r.category, UNKNOWN),
            risk_score: r.risk_score,
            status: text_or(r.status, "pending"),
            created_at: parse_timestamp(r.created_at.as_deref()),
        }
    }
}

impl From<AnalyticsResponse> for Analytics {
    fn from(r: AnalyticsResponse) -> Self {
        Self {
            period_days: r.tasks.period_days.max(r.alerts.period_days),
            total_tasks: r.tasks.total_tasks,
            category_distribution: r.tasks.category_distribution,
            success_rates: r.tasks.success_rates,
            risk: RiskSummary {
                average: r.tasks.risk_statistics.average,
                minimum: r.tasks.risk_statistics.minimum,
                maximum: r.tasks.risk_statistics.maximum,
            },
            total_alerts: r.alerts.total_alerts,
            severity_distribution: r.alerts.severity_distribution,
            type_distribution: r.alerts.type_distribution,
            learning_states: r.learning.total_states,
            learning_visits: r.learning.total_visits,
            learning_recent_activity: r.learning.recent_activity,
        }
    }
}

impl From<DecisionRecord> for TaskDecision {
    fn from(r: DecisionRecord) -> Self {
        Self {
            task_id: r.task_id,
            category: text_or(r.category, UNKNOWN),
            verdict: Verdict::from_wire(r.action.as_deref()),
            message: r.message.unwrap_or_default(),
            decided_at: parse_timestamp(r.timestamp.as_deref()),
        }
    }
}

impl From<ExplanationResponse> for DecisionExplanation {
    fn from(r: ExplanationResponse) -> Self {
        Self {
            explanation: text_or(r.explanation, NO_MESSAGE),
            confidence: r.confidence.clamp(0.0, 1.0),
            verdict: Verdict::from_wire(r.action.as_deref()),
        }
    }
}

impl From<ProcessFilesResponse> for OpenFiles {
    fn from(r: ProcessFilesResponse) -> Self {
        Self {
            pid: r.pid,
            paths: r.files,
        }
    }
}

// ── Readiness, diagnostics & statistics ────────────────────────────

impl From<ReadinessResponse> for Readiness {
    fn from(r: ReadinessResponse) -> Self {
        let checks: Vec<ReadinessCheck> = r
            .checks
            .into_iter()
            .map(|(name, c)| ReadinessCheck {
                name,
                ok: c.ok,
                error: c.error,
            })
            .collect();
        Self {
            // A report with no checks proves nothing.
            ready: r.ok && checks.iter().all(|c| c.ok),
            checks,
            timestamp: parse_timestamp(r.timestamp.as_deref()),
        }
    }
}

fn store_status(name: &str, s: StoreDiagnostics) -> StoreStatus {
    StoreStatus {
        name: name.to_owned(),
        ok: s.ok,
        counts: s.counts,
        error: s.error,
    }
}

impl From<DiagnosticsReport> for Diagnostics {
    fn from(r: DiagnosticsReport) -> Self {
        Self {
            system_running: r.system.system_running,
            data_points: r.system.data_points,
            monitor_thread_alive: r.system.monitor_thread_alive,
            debug: r.config.debug,
            cpu_threshold: r.config.cpu_threshold,
            memory_threshold: r.config.memory_threshold,
            server_time: parse_timestamp(r.time.now.as_deref()),
            uptime_seconds: r.time.uptime_seconds,
            stores: vec![
                store_status("database", r.database),
                store_status("app_history_db", r.app_history_db),
            ],
            versions: r.versions,
        }
    }
}

impl From<LearningStatsRecord> for LearningStats {
    fn from(r: LearningStatsRecord) -> Self {
        Self {
            total_states: r.total_states,
            total_visits: r.total_visits,
            recent_activity: r.recent_activity,
            top_states: r.top_states,
        }
    }
}

impl From<SecurityStatsRecord> for SecurityStats {
    fn from(r: SecurityStatsRecord) -> Self {
        Self {
            total_alerts: r.total_alerts,
            recent_alerts: r.recent_alerts,
        }
    }
}
