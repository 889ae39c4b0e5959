// Task and analytics endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AnalyticsResponse, DecisionResponse, ExplanationResponse, NewTask, TaskCreatedResponse,
    TaskStatsResponse, TasksResponse,
};

impl ApiClient {
    /// Most recent tasks. The server clamps `limit` to 1..=1000.
    ///
    /// `GET /api/tasks?limit={limit}`
    pub async fn list_tasks(&self, limit: u32) -> Result<TasksResponse, Error> {
        let url = self.api_url(&format!("tasks?limit={limit}"))?;
        self.get(url).await
    }

    /// `POST /api/tasks`
    pub async fn create_task(&self, task: &NewTask) -> Result<TaskCreatedResponse, Error> {
        let url = self.api_url("tasks")?;
        debug!(name = %task.name, "creating task");
        self.post(url, Some(task)).await
    }

    /// Aggregated task, alert and learning statistics over `days`.
    ///
    /// `GET /api/analytics?days={days}`
    pub async fn analytics(&self, days: u32) -> Result<AnalyticsResponse, Error> {
        let url = self.api_url(&format!("analytics?days={days}"))?;
        self.get(url).await
    }

    /// Task count per category. The backend takes no window or limit.
    ///
    /// `GET /api/task/stats`
    pub async fn task_stats(&self) -> Result<TaskStatsResponse, Error> {
        let url = self.api_url("task/stats")?;
        self.get(url).await
    }

    /// Allow / warn / block verdict for one task. 404 when the task is gone.
    ///
    /// `GET /api/decisions/{task_id}`
    pub async fn task_decision(&self, task_id: u64) -> Result<DecisionResponse, Error> {
        let id = task_id.to_string();
        let url = self.api_segments_url(&["decisions", &id])?;
        self.get(url).await
    }

    /// The learning agent's reasoning for a task's verdict.
    ///
    /// `GET /api/learning/explain/{task_id}`
    pub async fn explain_task_decision(&self, task_id: u64) -> Result<ExplanationResponse, Error> {
        let id = task_id.to_string();
        let url = self.api_segments_url(&["learning", "explain", &id])?;
        self.get(url).await
    }
}
