use crate::api::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::models::dashboard::HealthStatus;

impl ApiClient {
    /// Checks that the API is up. `GET /health/`
    pub async fn health(&self) -> Result<HealthStatus> {
        self.send(&ApiRequest::get("/health/")).await
    }
}
