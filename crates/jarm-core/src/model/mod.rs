// ── Dashboard domain model ──
//
// Invariant-satisfying view-model types. Wire shapes live in
// `jarm_api::models`; `crate::convert` maps between the two.

pub mod alert;
pub mod chart;
pub mod diagnostics;
pub mod metrics;
pub mod process;
pub mod task;

pub use alert::{Alert, AlertId, LiveAlert, Notification, NotificationId, Severity, SeverityBadge};
pub use chart::{
    BarChartView, ChartData, ChartKind, Dial, GaugeView, LineChartView, PieChartView, Slice,
};
pub use diagnostics::{
    Diagnostics, LearningStats, Readiness, ReadinessCheck, SecurityStats, StoreStatus,
};
pub use metrics::{Health, HistoricalSample, MetricSample, SystemStatus};
pub use process::{MonitoringSession, OpenFiles, ProcessSample, TrackedApplication};
pub use task::{
    Analytics, DecisionExplanation, RiskSummary, Task, TaskDecision, TaskDraft, Verdict,
};
