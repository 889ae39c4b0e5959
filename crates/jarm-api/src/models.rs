// Backend response types
//
// Wire models for the JARM backend's JSON API. Fields use `#[serde(default)]`
// liberally: the backend omits or nulls fields whenever monitoring is off or a
// collector fails, and a missing field must never fail the whole decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Record identifiers arrive as integers from some endpoints and as strings
/// from others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Int(n)) => Some(n.to_string()),
        Some(RawId::Text(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

// ── Status ───────────────────────────────────────────────────────────

/// `GET /api/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub system_running: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Agent name → `"active"` / `"inactive"`.
    #[serde(default, deserialize_with = "null_default")]
    pub agents: BTreeMap<String, String>,
}

/// `GET /healthz`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub ok: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub system_running: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub uptime_seconds: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Plain `{ success, message }` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Metrics ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default, deserialize_with = "null_default")]
    pub current: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub average: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub peak: f64,
}

/// Body of the `metrics` object, shared by `GET /api/metrics` and the
/// `metrics_update` push event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsPayload {
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_stats: UsageStats,
    #[serde(default, deserialize_with = "null_default")]
    pub memory_stats: UsageStats,
    #[serde(default, deserialize_with = "null_default")]
    pub data_points: u64,
    #[serde(default)]
    pub last_timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub active_processes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub metrics: MetricsPayload,
}

/// One row of `GET /api/metrics/historical`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub memory: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub processes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<HistoricalPoint>,
    #[serde(default, deserialize_with = "null_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub time_range_hours: u32,
}

/// One dial of `GET /api/system/gauge-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GaugeReading {
    #[serde(default, deserialize_with = "null_default")]
    pub value: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub max: f64,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GaugeResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub cpu: GaugeReading,
    #[serde(default, deserialize_with = "null_default")]
    pub memory: GaugeReading,
    #[serde(default, deserialize_with = "null_default")]
    pub processes: GaugeReading,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ── Alerts & notifications ───────────────────────────────────────────

/// Alert record from `GET /api/alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub alert_type: Option<String>,
    /// `"Low"`, `"Medium"`, `"High"` or `"Critical"`; case varies.
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub alerts: Vec<AlertRecord>,
}

/// Notification record from `GET /api/notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "isRead", alias = "is_read", deserialize_with = "null_default")]
    pub is_read: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub notifications: Vec<NotificationRecord>,
}

// ── Processes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub pid: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_percent: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub memory_percent: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub read_bytes: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub write_bytes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessesResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub processes: Vec<ProcessRecord>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarChartData {
    #[serde(default, deserialize_with = "null_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub memory_data: Vec<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_data: Vec<f64>,
}

/// Bucketed counts with parallel label and color arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(default, deserialize_with = "null_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PieChartData {
    #[serde(default, deserialize_with = "null_default")]
    pub memory_distribution: Distribution,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_distribution: Distribution,
}

/// `GET /api/processes/chart-data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessChartResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub processes: Vec<ProcessRecord>,
    #[serde(default, deserialize_with = "null_default")]
    pub bar_chart: BarChartData,
    #[serde(default, deserialize_with = "null_default")]
    pub pie_chart: PieChartData,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_usage: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub memory_usage: f64,
    #[serde(default)]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub session_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub applications: Vec<ApplicationRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationHistoryResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub sessions: Vec<SessionRecord>,
}

// ── Tasks & analytics ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TasksResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskCreatedResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub task: TaskRecord,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub command: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskStatistics {
    #[serde(default, deserialize_with = "null_default")]
    pub average: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub minimum: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub maximum: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskAnalytics {
    #[serde(default, deserialize_with = "null_default")]
    pub category_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub risk_statistics: RiskStatistics,
    #[serde(default, deserialize_with = "null_default")]
    pub success_rates: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub total_tasks: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub period_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertAnalytics {
    #[serde(default, deserialize_with = "null_default")]
    pub severity_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub type_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub total_alerts: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub period_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningStats {
    #[serde(default, deserialize_with = "null_default")]
    pub total_states: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub total_visits: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub recent_activity: u64,
    /// Most visited states. Only present on `GET /api/learning/stats`.
    #[serde(default, deserialize_with = "null_default")]
    pub top_states: Vec<serde_json::Value>,
}

/// `GET /api/analytics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub tasks: TaskAnalytics,
    #[serde(default, deserialize_with = "null_default")]
    pub alerts: AlertAnalytics,
    #[serde(default, deserialize_with = "null_default")]
    pub learning: LearningStats,
}

/// `GET /api/task/stats`: task count per category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskStatsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub tasks: BTreeMap<String, u64>,
}

/// `GET /api/learning/stats`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LearningStatsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub learning: LearningStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityStats {
    #[serde(default, deserialize_with = "null_default")]
    pub total_alerts: u64,
    /// Alerts raised in the last 24 hours.
    #[serde(default, deserialize_with = "null_default")]
    pub recent_alerts: u64,
}

/// `GET /api/security/stats`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityStatsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub security: SecurityStats,
}

/// Category-driven verdict for one task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `ALLOW`, `WARN` or `BLOCK`; empty for unknown categories.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// HTTP-date or ISO-8601, depending on the backend's JSON encoder.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /api/decisions/{task_id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub decision: DecisionRecord,
}

/// `GET /api/learning/explain/{task_id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplanationResponse {
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub confidence: f64,
    /// `ALLOW`, `WARN`, `BLOCK` or `ESCALATE`.
    #[serde(default)]
    pub action: Option<String>,
}

/// `GET /api/processes/{pid}/files`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessFilesResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub pid: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub files: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub count: u64,
}

// ── Readiness & diagnostics ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadinessCheck {
    #[serde(default, deserialize_with = "null_default")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /readyz`. Served with 503 when any check fails.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadinessResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub ok: bool,
    /// Check name (`database`, `app_history_db`) → result.
    #[serde(default, deserialize_with = "null_default")]
    pub checks: BTreeMap<String, ReadinessCheck>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsSystem {
    #[serde(default, deserialize_with = "null_default")]
    pub system_running: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub data_points: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub monitor_thread_alive: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default, deserialize_with = "null_default")]
    pub debug: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_threshold: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub memory_threshold: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsTime {
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub uptime_seconds: u64,
}

/// Best-effort row counts for one backing store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreDiagnostics {
    #[serde(default, deserialize_with = "null_default")]
    pub ok: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsReport {
    #[serde(default, deserialize_with = "null_default")]
    pub system: DiagnosticsSystem,
    #[serde(default, deserialize_with = "null_default")]
    pub config: DiagnosticsConfig,
    #[serde(default, deserialize_with = "null_default")]
    pub time: DiagnosticsTime,
    #[serde(default, deserialize_with = "null_default")]
    pub database: StoreDiagnostics,
    #[serde(default, deserialize_with = "null_default")]
    pub app_history_db: StoreDiagnostics,
    /// Package → version. Omitted when the backend cannot introspect.
    #[serde(default, deserialize_with = "null_default")]
    pub versions: BTreeMap<String, String>,
}

/// `GET /api/diagnostics`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub diagnostics: DiagnosticsReport,
}

// ── Push payloads ────────────────────────────────────────────────────

/// `system_status` push event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemStatusEvent {
    #[serde(default, deserialize_with = "null_default")]
    pub system_running: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `metrics_update` push event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsUpdateEvent {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub metrics: MetricsPayload,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `task_update` push event: the changed task record.
pub type TaskUpdateEvent = TaskRecord;

/// `alert_notification` push event. Carries no id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertNotificationEvent {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
