// Process table, chart and application history endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    ApplicationHistoryResponse, ProcessChartResponse, ProcessFilesResponse, ProcessesResponse,
};

impl ApiClient {
    /// Top processes by resource usage.
    ///
    /// `GET /api/processes?limit={limit}`
    pub async fn processes(&self, limit: u32) -> Result<ProcessesResponse, Error> {
        let url = self.api_url(&format!("processes?limit={limit}"))?;
        self.get(url).await
    }

    /// Bar and pie chart series over the top `limit` processes.
    ///
    /// `GET /api/processes/chart-data?limit={limit}`
    pub async fn process_chart_data(&self, limit: u32) -> Result<ProcessChartResponse, Error> {
        let url = self.api_url(&format!("processes/chart-data?limit={limit}"))?;
        self.get(url).await
    }

    /// Monitoring sessions and the applications recorded in each.
    ///
    /// `GET /api/application_history`
    pub async fn application_history(&self) -> Result<ApplicationHistoryResponse, Error> {
        let url = self.api_url("application_history")?;
        self.get(url).await
    }

    /// Files a process holds open. Without `limit` the server returns at
    /// most 50; access-denied processes yield an empty list.
    ///
    /// `GET /api/processes/{pid}/files[?limit={limit}]`
    pub async fn process_files(
        &self,
        pid: u32,
        limit: Option<u32>,
    ) -> Result<ProcessFilesResponse, Error> {
        let pid = pid.to_string();
        let mut url = self.api_segments_url(&["processes", &pid, "files"])?;
        if let Some(limit) = limit {
            url.query_pairs_mut().append_pair("limit", &limit.to_string());
        }
        self.get(url).await
    }
}
