// Readiness, diagnostics and per-agent statistics endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    DiagnosticsResponse, LearningStatsResponse, ReadinessResponse, SecurityStatsResponse,
};

impl ApiClient {
    /// Database readiness. A failing check is still `Ok`: inspect
    /// [`ReadinessResponse::ok`], which the server pairs with HTTP 503.
    ///
    /// `GET /readyz`
    pub async fn readyz(&self) -> Result<ReadinessResponse, Error> {
        let url = self.root_url("readyz")?;
        self.get_report(url).await
    }

    /// Runtime, threshold, store and version snapshot.
    ///
    /// `GET /api/diagnostics`
    pub async fn diagnostics(&self) -> Result<DiagnosticsResponse, Error> {
        let url = self.api_url("diagnostics")?;
        self.get(url).await
    }

    /// `GET /api/learning/stats`
    pub async fn learning_stats(&self) -> Result<LearningStatsResponse, Error> {
        let url = self.api_url("learning/stats")?;
        self.get(url).await
    }

    /// `GET /api/security/stats`
    pub async fn security_stats(&self) -> Result<SecurityStatsResponse, Error> {
        let url = self.api_url("security/stats")?;
        self.get(url).await
    }
}
