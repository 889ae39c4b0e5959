// ── One-shot backend operations ──
//
// Request/response calls that sit outside the periodic refresh cycles:
// monitoring control, tasks, history, exports, health and diagnostics.
// Shared by the dashboard and the CLI.

use std::collections::BTreeMap;

use jarm_api::models::NewTask;
use jarm_api::ApiClient;
use tracing::debug;

use crate::charts::clamp_history_hours;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{
    Alert, Analytics, DecisionExplanation, Diagnostics, Health, LearningStats, MetricSample,
    MonitoringSession, Notification, NotificationId, OpenFiles, ProcessSample, Readiness,
    SecurityStats, SystemStatus, Task, TaskDecision, TaskDraft,
};

/// Build an HTTP client for the configured backend.
pub fn api_client(config: &DashboardConfig) -> Result<ApiClient, CoreError> {
    Ok(ApiClient::new(config.url.clone(), &config.transport())?)
}

pub async fn status(api: &ApiClient) -> Result<SystemStatus, CoreError> {
    Ok(api.status().await?.into())
}

pub async fn health(api: &ApiClient) -> Result<Health, CoreError> {
    Ok(api.healthz().await?.into())
}

/// Readiness of the backend's stores. Not-ready is a value, not an error.
pub async fn readiness(api: &ApiClient) -> Result<Readiness, CoreError> {
    Ok(api.readyz().await?.into())
}

pub async fn diagnostics(api: &ApiClient) -> Result<Diagnostics, CoreError> {
    Ok(api.diagnostics().await?.diagnostics.into())
}

pub async fn metrics(api: &ApiClient, hours: u32) -> Result<MetricSample, CoreError> {
    Ok(api.metrics(hours).await?.metrics.into())
}

/// Returns the backend's confirmation message.
pub async fn start_monitoring(
    api: &ApiClient,
    interval_secs: Option<u32>,
) -> Result<String, CoreError> {
    let ack = api.start_monitoring(interval_secs).await?;
    Ok(ack
        .message
        .unwrap_or_else(|| "Monitoring started".to_owned()))
}

pub async fn stop_monitoring(api: &ApiClient) -> Result<String, CoreError> {
    let ack = api.stop_monitoring().await?;
    Ok(ack
        .message
        .unwrap_or_else(|| "Monitoring stopped".to_owned()))
}

pub async fn alerts(api: &ApiClient) -> Result<Vec<Alert>, CoreError> {
    Ok(api
        .alerts()
        .await?
        .alerts
        .into_iter()
        .map(Alert::from)
        .collect())
}

pub async fn notifications(api: &ApiClient) -> Result<Vec<Notification>, CoreError> {
    Ok(api
        .notifications()
        .await?
        .notifications
        .into_iter()
        .map(Notification::from)
        .collect())
}

pub async fn mark_notification_read(
    api: &ApiClient,
    id: &NotificationId,
) -> Result<(), CoreError> {
    api.mark_notification_read(id.as_str()).await?;
    Ok(())
}

pub async fn mark_all_notifications_read(api: &ApiClient) -> Result<(), CoreError> {
    api.mark_all_notifications_read().await?;
    Ok(())
}

pub async fn processes(api: &ApiClient, limit: u32) -> Result<Vec<ProcessSample>, CoreError> {
    Ok(api
        .processes(limit)
        .await?
        .processes
        .into_iter()
        .map(ProcessSample::from)
        .collect())
}

pub async fn analytics(api: &ApiClient, days: u32) -> Result<Analytics, CoreError> {
    Ok(api.analytics(days).await?.into())
}

pub async fn tasks(api: &ApiClient, limit: u32) -> Result<Vec<Task>, CoreError> {
    Ok(api
        .list_tasks(limit)
        .await?
        .tasks
        .into_iter()
        .map(Task::from)
        .collect())
}

/// Create a task. A blank name is rejected before any request is made.
pub async fn create_task(api: &ApiClient, draft: TaskDraft) -> Result<Task, CoreError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation {
            message: "task name is required".into(),
        });
    }
    let body = NewTask {
        name: name.to_owned(),
        description: draft.description,
        command: draft.command,
    };
    debug!(name = %body.name, "creating task");
    Ok(api.create_task(&body).await?.task.into())
}

pub async fn application_history(api: &ApiClient) -> Result<Vec<MonitoringSession>, CoreError> {
    Ok(api
        .application_history()
        .await?
        .sessions
        .into_iter()
        .map(MonitoringSession::from)
        .collect())
}

/// SQL dump of the metrics table. `hours` is clamped to 1..=168.
pub async fn export_metrics(api: &ApiClient, hours: u32) -> Result<String, CoreError> {
    Ok(api.export_metrics_sql(clamp_history_hours(hours)).await?)
}

/// CSV of every stored task.
pub async fn export_tasks(api: &ApiClient) -> Result<String, CoreError> {
    Ok(api.export_tasks_csv().await?)
}

/// CSV of every stored alert.
pub async fn export_alerts(api: &ApiClient) -> Result<String, CoreError> {
    Ok(api.export_alerts_csv().await?)
}

/// Task count per category.
pub async fn task_stats(api: &ApiClient) -> Result<BTreeMap<String, u64>, CoreError> {
    Ok(api.task_stats().await?.tasks)
}

pub async fn learning_stats(api: &ApiClient) -> Result<LearningStats, CoreError> {
    Ok(api.learning_stats().await?.learning.into())
}

pub async fn security_stats(api: &ApiClient) -> Result<SecurityStats, CoreError> {
    Ok(api.security_stats().await?.security.into())
}

pub async fn task_decision(api: &ApiClient, task_id: u64) -> Result<TaskDecision, CoreError> {
    Ok(api.task_decision(task_id).await?.decision.into())
}

pub async fn explain_task_decision(
    api: &ApiClient,
    task_id: u64,
) -> Result<DecisionExplanation, CoreError> {
    Ok(api.explain_task_decision(task_id).await?.into())
}

pub async fn process_files(
    api: &ApiClient,
    pid: u32,
    limit: Option<u32>,
) -> Result<OpenFiles, CoreError> {
    Ok(api.process_files(pid, limit).await?.into())
}
