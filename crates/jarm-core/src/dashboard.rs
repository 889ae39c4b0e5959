// ── Dashboard ──
//
// Composition root of the synchronization core. Background tasks (poll
// streams, the push pump, the chart timer, one-shot commands) only ever
// talk to the dashboard through the `Update` inbox; every piece of shared
// state is mutated by whichever task owns the `Dashboard`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use jarm_api::ApiClient;

use crate::charts::{ChartOrchestrator, ChartUpdate};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{
    Alert, Analytics, ChartData, ChartKind, LiveAlert, MetricSample, MonitoringSession,
    Notification, NotificationId, ProcessSample, SeverityBadge, SystemStatus, Task, TaskDraft,
};
use crate::pagination::{BindingRegistry, ControlId, NavAction, Paginator};
use crate::queries;
use crate::reconciler::{AlertReconciler, ReconcileOutcome};
use crate::scheduler::{RefreshScheduler, StreamKind, StreamPayload, StreamUpdate};
use crate::sink::{NotificationSink, Toast, ToastLevel};
use crate::transport::{ConnectionState, PushMessage, PushTopic, TransportManager};

const LIVE_ALERT_HISTORY: usize = 20;

/// Everything a background task can hand to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Stream(StreamUpdate),
    Push(PushMessage),
    Chart(ChartUpdate),
    Command(CommandOutcome),
}

/// A user command whose request has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    MarkRead(NotificationId),
    MarkAllRead(Vec<NotificationId>),
    StartMonitoring { previous: bool },
    StopMonitoring { previous: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub kind: CommandKind,
    /// Backend message on success, error text on failure.
    pub result: Result<String, String>,
}

/// A notification as presented, with its available action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationRow<'a> {
    pub notification: &'a Notification,
    /// Unread notifications with an id offer "mark read".
    pub can_mark_read: bool,
}

/// Snapshot for one render pass.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub connection: ConnectionState,
    pub monitoring_active: bool,
    pub monitoring_pending: bool,
    pub status: Option<&'a SystemStatus>,
    pub metrics: Option<&'a MetricSample>,
    pub alert_count: usize,
    pub alerts: &'a [Alert],
    pub alerts_page: String,
    pub badge: SeverityBadge,
    pub notifications: Vec<NotificationRow<'a>>,
    pub notifications_page: String,
    pub unread_count: usize,
    pub processes: &'a [ProcessSample],
    pub analytics: Option<&'a Analytics>,
    pub live_alerts: &'a [LiveAlert],
    pub active_chart: ChartKind,
    pub chart: Option<&'a ChartData>,
    pub chart_auto_refresh: bool,
    pub history_hours: u32,
    pub last_updated: &'a HashMap<StreamKind, DateTime<Utc>>,
}

pub struct Dashboard {
    config: DashboardConfig,
    api: Arc<ApiClient>,
    sink: Arc<dyn NotificationSink>,
    tx: mpsc::UnboundedSender<Update>,
    rx: mpsc::UnboundedReceiver<Update>,

    transport: TransportManager,
    connection: watch::Receiver<ConnectionState>,
    scheduler: RefreshScheduler,
    charts: ChartOrchestrator,
    reconciler: AlertReconciler,
    alert_pages: Paginator,
    notification_pages: Paginator,
    bindings: BindingRegistry,

    status: Option<SystemStatus>,
    /// Optimistic monitoring flag while a start/stop request is in flight.
    pending_monitoring: Option<bool>,
    metrics: Option<MetricSample>,
    notifications: Vec<Notification>,
    /// Marked read locally, request still in flight.
    pending_reads: HashSet<NotificationId>,
    /// Marked read on the backend, not yet reflected by a poll.
    confirmed_reads: HashSet<NotificationId>,
    processes: Vec<ProcessSample>,
    analytics: Option<Analytics>,
    live_alerts: Vec<LiveAlert>,
    chart_data: HashMap<ChartKind, ChartData>,
    last_updated: HashMap<StreamKind, DateTime<Utc>>,
    last_reconcile: Option<ReconcileOutcome>,
}

impl Dashboard {
    /// Wire up every component. Nothing runs until [`start`](Self::start).
    pub fn new(
        config: DashboardConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, CoreError> {
        let api = Arc::new(queries::api_client(&config)?);
        Ok(Self::with_api(config, api, sink))
    }

    /// Build around an existing client.
    pub fn with_api(
        config: DashboardConfig,
        api: Arc<ApiClient>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let transport = TransportManager::new(
            config.push_endpoint(),
            config.reconnect.clone(),
            config.transport().tls,
        );
        let connection = transport.connection_state();
        forward_push_events(&transport, &tx);

        let scheduler =
            RefreshScheduler::new(Arc::clone(&api), config.refresh, config.fetch, tx.clone());
        let charts = ChartOrchestrator::new(
            Arc::clone(&api),
            config.chart_refresh,
            config.fetch.chart_process_limit,
            config.history_hours,
            tx.clone(),
        );

        Self {
            reconciler: AlertReconciler::new(config.audio_enabled),
            alert_pages: Paginator::new(config.page_size),
            notification_pages: Paginator::new(config.page_size),
            bindings: BindingRegistry::new(),
            config,
            api,
            sink,
            tx,
            rx,
            transport,
            connection,
            scheduler,
            charts,
            status: None,
            pending_monitoring: None,
            metrics: None,
            notifications: Vec::new(),
            pending_reads: HashSet::new(),
            confirmed_reads: HashSet::new(),
            processes: Vec::new(),
            analytics: None,
            live_alerts: Vec::new(),
            chart_data: HashMap::new(),
            last_updated: HashMap::new(),
            last_reconcile: None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Open the push channel and start every refresh cycle.
    pub fn start(&mut self) {
        self.transport.connect();
        self.scheduler.start();
        self.charts.start();
        self.charts.refresh_now();
        info!(url = %self.config.url, "dashboard started");
    }

    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.charts.stop();
        self.transport.disconnect();
        info!("dashboard stopped");
    }

    /// Wait for the next update from any background task.
    pub async fn next_update(&mut self) -> Option<Update> {
        self.rx.recv().await
    }

    pub fn try_next_update(&mut self) -> Option<Update> {
        self.rx.try_recv().ok()
    }

    /// Sender for feeding updates in from outside (tests, replay).
    pub fn sender(&self) -> mpsc::UnboundedSender<Update> {
        self.tx.clone()
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn transport(&self) -> &TransportManager {
        &self.transport
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn charts(&self) -> &ChartOrchestrator {
        &self.charts
    }

    pub fn reconciler(&self) -> &AlertReconciler {
        &self.reconciler
    }

    pub fn last_reconcile(&self) -> Option<&ReconcileOutcome> {
        self.last_reconcile.as_ref()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    /// Server-reported monitoring state, overlaid by any in-flight command.
    pub fn monitoring_active(&self) -> bool {
        self.pending_monitoring
            .unwrap_or_else(|| self.status.as_ref().is_some_and(|s| s.system_running))
    }

    // ── Applying updates ─────────────────────────────────────────────

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Stream(update) => self.apply_stream(update),
            Update::Push(message) => self.apply_push(message),
            Update::Chart(update) => self.apply_chart(update),
            Update::Command(outcome) => self.apply_command(outcome),
        }
    }

    fn apply_stream(&mut self, update: StreamUpdate) {
        self.last_updated.insert(update.kind, update.received_at);
        match update.payload {
            StreamPayload::Status(status) => self.status = Some(status),
            StreamPayload::Metrics(sample) => self.metrics = Some(sample),
            StreamPayload::Alerts(alerts) => {
                let active = self.monitoring_active();
                let outcome = self
                    .reconciler
                    .reconcile(alerts, active, self.sink.as_ref());
                self.alert_pages.set_total(outcome.total);
                self.last_reconcile = Some(outcome);
            }
            StreamPayload::Notifications(notifications) => self.set_notifications(notifications),
            StreamPayload::Analytics(analytics) => self.analytics = Some(analytics),
            StreamPayload::Processes(processes) => self.processes = processes,
        }
    }

    fn set_notifications(&mut self, mut notifications: Vec<Notification>) {
        // A confirmed read stays overlaid until a poll agrees with it.
        self.confirmed_reads.retain(|id| {
            notifications
                .iter()
                .any(|n| n.id.as_ref() == Some(id) && !n.is_read)
        });
        for notification in &mut notifications {
            if let Some(id) = &notification.id {
                if self.pending_reads.contains(id) || self.confirmed_reads.contains(id) {
                    notification.is_read = true;
                }
            }
        }
        self.notification_pages.set_total(notifications.len());
        self.notifications = notifications;
    }

    fn apply_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::Connected => debug!("push channel connected"),
            PushMessage::Disconnected { reason } => debug!(%reason, "push channel down"),
            PushMessage::SystemStatus(update) => {
                let status = self.status.get_or_insert_with(SystemStatus::default);
                status.system_running = update.system_running;
                if update.timestamp.is_some() {
                    status.timestamp = update.timestamp;
                }
                if !update.agents.is_empty() {
                    status.agents = update.agents;
                }
                self.last_updated.insert(StreamKind::Status, Utc::now());
            }
            PushMessage::MetricsUpdate(sample) => {
                self.metrics = Some(sample);
                self.last_updated.insert(StreamKind::Metrics, Utc::now());
            }
            PushMessage::AlertNotification(alert) => {
                // Live notices bypass dedup and never play audio.
                self.sink.show_toast(Toast::new(
                    live_alert_level(&alert.kind),
                    alert.title.clone(),
                    alert.message.clone(),
                ));
                self.sink.show_system_notification(&alert.title, &alert.message);
                self.live_alerts.insert(0, alert);
                self.live_alerts.truncate(LIVE_ALERT_HISTORY);
            }
            PushMessage::TaskUpdate(task) => {
                let label = if task.name.trim().is_empty() {
                    task.id.as_deref().map_or_else(|| "task".to_owned(), |id| format!("task #{id}"))
                } else {
                    task.name.clone()
                };
                debug!(task = %label, status = %task.status, "task updated");
                self.sink.show_toast(Toast::new(
                    ToastLevel::Info,
                    "Task updated",
                    format!("{label}: {}", task.status),
                ));
            }
        }
    }

    fn apply_chart(&mut self, update: ChartUpdate) {
        let kind = update.kind();
        // A line chart fetched for a previous window is stale.
        if let ChartData::Line(line) = &update.data {
            if line.hours != self.charts.history_hours() {
                debug!(hours = line.hours, "dropping stale history chart");
                return;
            }
        }
        self.chart_data.insert(kind, update.data);
    }

    fn apply_command(&mut self, outcome: CommandOutcome) {
        match outcome.kind {
            CommandKind::MarkRead(id) => {
                self.pending_reads.remove(&id);
                match outcome.result {
                    Ok(_) => {
                        self.confirmed_reads.insert(id);
                    }
                    Err(message) => {
                        self.set_read_locally(&id, false);
                        self.notify_failure("Could not mark notification read", message);
                    }
                }
            }
            CommandKind::MarkAllRead(ids) => {
                for id in &ids {
                    self.pending_reads.remove(id);
                }
                match outcome.result {
                    Ok(message) => {
                        self.confirmed_reads.extend(ids);
                        self.sink
                            .show_toast(Toast::new(ToastLevel::Success, "Notifications", message));
                    }
                    Err(message) => {
                        for id in &ids {
                            self.set_read_locally(id, false);
                        }
                        self.notify_failure("Could not mark notifications read", message);
                    }
                }
            }
            CommandKind::StartMonitoring { previous } => {
                self.finish_monitoring(true, previous, outcome.result);
            }
            CommandKind::StopMonitoring { previous } => {
                self.finish_monitoring(false, previous, outcome.result);
            }
        }
    }

    fn finish_monitoring(
        &mut self,
        requested: bool,
        previous: bool,
        result: Result<String, String>,
    ) {
        self.pending_monitoring = None;
        match result {
            Ok(message) => {
                self.set_monitoring_flag(requested);
                self.sink
                    .show_toast(Toast::new(ToastLevel::Success, "Monitoring", message));
            }
            Err(message) => {
                self.set_monitoring_flag(previous);
                self.notify_failure("Monitoring", message);
            }
        }
    }

    fn set_monitoring_flag(&mut self, running: bool) {
        self.status
            .get_or_insert_with(SystemStatus::default)
            .system_running = running;
    }

    fn set_read_locally(&mut self, id: &NotificationId, read: bool) {
        if let Some(n) = self
            .notifications
            .iter_mut()
            .find(|n| n.id.as_ref() == Some(id))
        {
            n.is_read = read;
        }
    }

    fn notify_failure(&self, title: &str, message: String) {
        warn!(%title, %message, "command failed");
        self.sink.show_toast(Toast::new(ToastLevel::Error, title, message));
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Re-clamps both paginators against the current collections.
    pub fn view(&mut self) -> DashboardView<'_> {
        let alerts = self.alert_pages.slice(self.reconciler.alerts());
        let notifications = self
            .notification_pages
            .slice(&self.notifications)
            .iter()
            .map(|notification| NotificationRow {
                notification,
                can_mark_read: !notification.is_read && notification.id.is_some(),
            })
            .collect();

        DashboardView {
            connection: *self.connection.borrow(),
            monitoring_active: self.monitoring_active(),
            monitoring_pending: self.pending_monitoring.is_some(),
            status: self.status.as_ref(),
            metrics: self.metrics.as_ref(),
            alert_count: self.reconciler.alerts().len(),
            alerts,
            alerts_page: self.alert_pages.label(),
            badge: SeverityBadge::from_alerts(self.reconciler.alerts()),
            notifications,
            notifications_page: self.notification_pages.label(),
            unread_count: self.notifications.iter().filter(|n| !n.is_read).count(),
            processes: &self.processes,
            analytics: self.analytics.as_ref(),
            live_alerts: &self.live_alerts,
            active_chart: self.charts.active(),
            chart: self.chart_data.get(&self.charts.active()),
            chart_auto_refresh: self.charts.auto_refresh(),
            history_hours: self.charts.history_hours(),
            last_updated: &self.last_updated,
        }
    }

    /// Attach navigation handlers. Safe to call on every render; returns
    /// how many bindings were new.
    pub fn bind_controls(&mut self) -> usize {
        const BINDINGS: [(ControlId, NavAction); 6] = [
            (ControlId::AlertList, NavAction::Next),
            (ControlId::AlertList, NavAction::Prev),
            (ControlId::NotificationList, NavAction::Next),
            (ControlId::NotificationList, NavAction::Prev),
            (ControlId::NotificationList, NavAction::MarkRead),
            (ControlId::NotificationList, NavAction::MarkAllRead),
        ];
        BINDINGS
            .iter()
            .filter(|(control, action)| self.bindings.bind(*control, *action))
            .count()
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Page through the alert list. Returns whether the page changed.
    pub fn page_alerts(&mut self, action: NavAction) -> bool {
        navigate(&mut self.alert_pages, action)
    }

    pub fn page_notifications(&mut self, action: NavAction) -> bool {
        navigate(&mut self.notification_pages, action)
    }

    /// Optimistically mark one notification read. Returns `false` when
    /// there is nothing to mark.
    pub fn mark_notification_read(&mut self, id: &NotificationId) -> bool {
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| n.id.as_ref() == Some(id))
        else {
            return false;
        };
        if notification.is_read || self.pending_reads.contains(id) {
            return false;
        }
        notification.is_read = true;
        self.pending_reads.insert(id.clone());

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let id = id.clone();
        tokio::spawn(async move {
            let result = queries::mark_notification_read(&api, &id)
                .await
                .map(|()| String::new())
                .map_err(|e| e.to_string());
            let _ = tx.send(Update::Command(CommandOutcome {
                kind: CommandKind::MarkRead(id),
                result,
            }));
        });
        true
    }

    /// Optimistically mark every unread notification read. Returns how
    /// many were flipped locally.
    ///
    /// Rows without an id stay unread until the next poll reports them,
    /// since a failed request could not revert them.
    pub fn mark_all_read(&mut self) -> usize {
        let ids: Vec<NotificationId> = self
            .notifications
            .iter_mut()
            .filter(|n| !n.is_read)
            .filter_map(|n| {
                let id = n.id.clone()?;
                n.is_read = true;
                Some(id)
            })
            .collect();
        self.pending_reads.extend(ids.iter().cloned());
        let marked = ids.len();

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = queries::mark_all_notifications_read(&api)
                .await
                .map(|()| "All notifications marked as read".to_owned())
                .map_err(|e| e.to_string());
            let _ = tx.send(Update::Command(CommandOutcome {
                kind: CommandKind::MarkAllRead(ids),
                result,
            }));
        });
        marked
    }

    pub fn start_monitoring(&mut self) {
        let previous = self.monitoring_active();
        self.pending_monitoring = Some(true);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let interval = self.config.monitoring_interval_secs;
        tokio::spawn(async move {
            let result = queries::start_monitoring(&api, Some(interval))
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Update::Command(CommandOutcome {
                kind: CommandKind::StartMonitoring { previous },
                result,
            }));
        });
    }

    pub fn stop_monitoring(&mut self) {
        let previous = self.monitoring_active();
        self.pending_monitoring = Some(false);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = queries::stop_monitoring(&api)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Update::Command(CommandOutcome {
                kind: CommandKind::StopMonitoring { previous },
                result,
            }));
        });
    }

    pub fn select_chart(&mut self, kind: ChartKind) {
        self.charts.select(kind);
    }

    pub fn set_history_window(&mut self, hours: u32) -> u32 {
        self.charts.set_history_window(hours)
    }

    pub fn toggle_chart_auto_refresh(&mut self) -> bool {
        self.charts.toggle_auto_refresh()
    }

    pub fn set_refresh_period(&mut self, kind: StreamKind, period: Duration) {
        self.scheduler.set_period(kind, period);
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.reconciler.set_audio_enabled(enabled);
    }

    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task, CoreError> {
        queries::create_task(&self.api, draft).await
    }

    pub async fn recent_tasks(&self, limit: u32) -> Result<Vec<Task>, CoreError> {
        queries::tasks(&self.api, limit).await
    }

    pub async fn application_history(&self) -> Result<Vec<MonitoringSession>, CoreError> {
        queries::application_history(&self.api).await
    }

    pub async fn export_metrics(&self, hours: u32) -> Result<String, CoreError> {
        queries::export_metrics(&self.api, hours).await
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn navigate(pages: &mut Paginator, action: NavAction) -> bool {
    match action {
        NavAction::Next => pages.next(),
        NavAction::Prev => pages.prev(),
        NavAction::MarkRead | NavAction::MarkAllRead => false,
    }
}

fn live_alert_level(kind: &str) -> ToastLevel {
    match kind.to_ascii_lowercase().as_str() {
        "critical" | "error" | "high" | "danger" => ToastLevel::Error,
        "warning" | "medium" => ToastLevel::Warning,
        "success" => ToastLevel::Success,
        _ => ToastLevel::Info,
    }
}

/// Forward every decoded push event into the dashboard inbox.
fn forward_push_events(transport: &TransportManager, tx: &mpsc::UnboundedSender<Update>) {
    for topic in [
        PushTopic::Connected,
        PushTopic::Disconnected,
        PushTopic::SystemStatus,
        PushTopic::MetricsUpdate,
        PushTopic::AlertNotification,
        PushTopic::TaskUpdate,
    ] {
        let tx = tx.clone();
        transport.on(
            topic,
            Arc::new(move |message: &PushMessage| {
                let _ = tx.send(Update::Push(message.clone()));
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_alert_levels() {
        assert_eq!(live_alert_level("Critical"), ToastLevel::Error);
        assert_eq!(live_alert_level("warning"), ToastLevel::Warning);
        assert_eq!(live_alert_level("info"), ToastLevel::Info);
        assert_eq!(live_alert_level(""), ToastLevel::Info);
    }

    #[test]
    fn navigation_ignores_non_paging_actions() {
        let mut pages = Paginator::new(5);
        pages.set_total(12);
        assert!(navigate(&mut pages, NavAction::Next));
        assert!(!navigate(&mut pages, NavAction::MarkRead));
        assert!(navigate(&mut pages, NavAction::Prev));
        assert!(!navigate(&mut pages, NavAction::Prev));
    }
}
