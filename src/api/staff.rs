use crate::api::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::models::dashboard::DashboardStats;

impl ApiClient {
    /// Fetches the staff dashboard counts. `GET /staff/dashboard/stats/`
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.send(&ApiRequest::get("/staff/dashboard/stats/"))
            .await
    }
}
