use url::Url;
use uuid::Uuid;

use crate::api::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::models::baggage::{
    Baggage, BaggageCreateData, BaggageCreated, Paginated, SearchFilters, StatusUpdateCreateData,
    StatusUpdated, Timeline,
};

impl ApiClient {
    /// Lists baggage, newest first. `GET /baggage/`
    pub async fn list_baggage(&self, filters: &SearchFilters) -> Result<Paginated<Baggage>> {
        self.send(&ApiRequest::get("/baggage/").query(filters.to_query()))
            .await
    }

    /// Fetches one bag by its identifier. `GET /baggage/{id}/`
    pub async fn baggage(&self, id: Uuid) -> Result<Baggage> {
        self.send(&ApiRequest::get(format!("/baggage/{}/", id)))
            .await
    }

    /// Fetches one bag by its tag code. `GET /baggage/qr/{code}/`
    ///
    /// The code is sent as given apart from surrounding whitespace; use
    /// [`crate::scanner::extract_baggage_code`] first for raw scanner output.
    pub async fn baggage_by_qr(&self, code: &str) -> Result<Baggage> {
        let code = code.trim();
        tracing::debug!("🔎 Looking up bag by QR code: {}", code);
        self.send(&ApiRequest::get(format!("/baggage/qr/{}/", path_segment(code)?)))
            .await
    }

    /// Checks in a new bag. `POST /baggage/`
    pub async fn create_baggage(&self, data: &BaggageCreateData) -> Result<BaggageCreated> {
        let created: BaggageCreated = self
            .send(&ApiRequest::post("/baggage/").json(data)?)
            .await?;
        tracing::info!("✅ Baggage created: {}", created.baggage.qr_code);
        Ok(created)
    }

    /// Appends a status update to a bag's timeline. `POST /baggage/{id}/update/`
    pub async fn update_baggage_status(
        &self,
        id: Uuid,
        update: &StatusUpdateCreateData,
    ) -> Result<StatusUpdated> {
        let updated: StatusUpdated = self
            .send(&ApiRequest::post(format!("/baggage/{}/update/", id)).json(update)?)
            .await?;
        tracing::info!(
            "✅ Baggage {} moved to {}",
            updated.baggage.qr_code,
            updated.status_update.status
        );
        Ok(updated)
    }

    /// Fetches a bag's status history. `GET /baggage/{id}/timeline/`
    pub async fn baggage_timeline(&self, id: Uuid) -> Result<Timeline> {
        self.send(&ApiRequest::get(format!("/baggage/{}/timeline/", id)))
            .await
    }
}

/// Percent-encodes `value` so it stays a single path segment.
fn path_segment(value: &str) -> Result<String> {
    let mut url = Url::parse("http://localhost/")?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_codes_pass_through_unchanged() {
        assert_eq!(path_segment("BAG-A8C74A09").unwrap(), "BAG-A8C74A09");
    }

    #[test]
    fn separators_are_encoded() {
        assert_eq!(path_segment("BAG/1?x#y").unwrap(), "BAG%2F1%3Fx%23y");
        assert_eq!(path_segment("a b").unwrap(), "a%20b");
    }
}
