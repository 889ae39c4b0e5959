// Alert and notification endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, AlertsResponse, NotificationsResponse};

impl ApiClient {
    /// The current set of active alerts.
    ///
    /// `GET /api/alerts`
    pub async fn alerts(&self) -> Result<AlertsResponse, Error> {
        let url = self.api_url("alerts")?;
        self.get(url).await
    }

    /// All notifications, newest first.
    ///
    /// `GET /api/notifications`
    pub async fn notifications(&self) -> Result<NotificationsResponse, Error> {
        let url = self.api_url("notifications")?;
        self.get(url).await
    }

    /// Mark one notification read. Unknown ids come back as a 404 rejection;
    /// the id is sent as a single encoded path segment.
    ///
    /// `POST /api/notifications/{id}/read`
    pub async fn mark_notification_read(&self, id: &str) -> Result<Ack, Error> {
        let url = self.api_segments_url(&["notifications", id, "read"])?;
        debug!(id, "marking notification read");
        self.post(url, None::<&()>).await
    }

    /// `POST /api/notifications/mark_all_read`
    pub async fn mark_all_notifications_read(&self) -> Result<Ack, Error> {
        let url = self.api_url("notifications/mark_all_read")?;
        debug!("marking all notifications read");
        self.post(url, None::<&()>).await
    }
}
