// jarm-core: Real-time synchronization core for the JARM dashboard.
//
// Reconciles independently paced backend streams (push channel, poll
// cycles, chart refreshes) into one consistent, side-effect-safe view.
// `Dashboard` is the composition root; every component is also usable
// on its own.

pub mod charts;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod pagination;
pub mod queries;
pub mod reconciler;
pub mod scheduler;
pub mod sink;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────

pub use charts::{ChartOrchestrator, ChartSelection, ChartUpdate};
pub use config::{DashboardConfig, FetchParams, RefreshIntervals, TlsVerification};
pub use dashboard::{
    CommandKind, CommandOutcome, Dashboard, DashboardView, NotificationRow, Update,
};
pub use error::CoreError;
pub use pagination::{BindingRegistry, ControlId, NavAction, Paginator};
pub use reconciler::{AlertReconciler, ReconcileOutcome};
pub use scheduler::{RefreshScheduler, StreamKind, StreamPayload, StreamUpdate};
pub use sink::{AudioCue, NotificationSink, Pulse, RecordingSink, SinkEvent, Toast, ToastLevel};
pub use transport::{
    ConnectionState, EventBus, PushMessage, PushTopic, TransportManager, TransportMode,
};

pub use model::{
    Alert, AlertId, Analytics, BarChartView, ChartData, ChartKind, DecisionExplanation,
    Diagnostics, Dial, GaugeView, Health, HistoricalSample, LearningStats, LineChartView,
    LiveAlert, MetricSample, MonitoringSession, Notification, NotificationId, OpenFiles,
    PieChartView, ProcessSample, Readiness, ReadinessCheck, RiskSummary, SecurityStats, Severity,
    SeverityBadge, Slice, StoreStatus, SystemStatus, Task, TaskDecision, TaskDraft,
    TrackedApplication, Verdict,
};

pub use jarm_api::ReconnectConfig;
