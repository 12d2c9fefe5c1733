use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The handling stages a bag moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaggageStatus {
    CheckedIn,
    SecurityCleared,
    Loaded,
    InFlight,
    Arrived,
}

impl BaggageStatus {
    /// Every status, in handling order.
    pub const ALL: [BaggageStatus; 5] = [
        BaggageStatus::CheckedIn,
        BaggageStatus::SecurityCleared,
        BaggageStatus::Loaded,
        BaggageStatus::InFlight,
        BaggageStatus::Arrived,
    ];

    /// The wire code, e.g. `SECURITY_CLEARED`.
    pub fn code(self) -> &'static str {
        match self {
            BaggageStatus::CheckedIn => "CHECKED_IN",
            BaggageStatus::SecurityCleared => "SECURITY_CLEARED",
            BaggageStatus::Loaded => "LOADED",
            BaggageStatus::InFlight => "IN_FLIGHT",
            BaggageStatus::Arrived => "ARRIVED",
        }
    }

    /// The label shown to passengers and staff.
    pub fn display_name(self) -> &'static str {
        match self {
            BaggageStatus::CheckedIn => "Checked In",
            BaggageStatus::SecurityCleared => "Security Cleared",
            BaggageStatus::Loaded => "Loaded",
            BaggageStatus::InFlight => "In-Flight",
            BaggageStatus::Arrived => "Arrived",
        }
    }

    /// The stage that follows this one, `None` once the bag has arrived.
    pub fn next(self) -> Option<BaggageStatus> {
        let position = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(position + 1).copied()
    }
}

impl fmt::Display for BaggageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BaggageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', ' '], "_").to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.code() == wanted)
            .ok_or_else(|| format!("unknown baggage status: {}", s))
    }
}

/// One entry of a bag's status history. Entries are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: i64,
    pub status: BaggageStatus,
    pub status_display: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<i64>,
    #[serde(default)]
    pub updated_by_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Represents a tracked bag, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baggage {
    /// The unique identifier for the bag.
    pub id: Uuid,
    /// The passenger's name.
    pub passenger_name: String,
    /// The passenger's email address.
    #[serde(default)]
    pub passenger_email: Option<String>,
    /// The flight the bag is checked onto.
    #[serde(default)]
    pub flight_number: Option<String>,
    /// The destination airport.
    #[serde(default)]
    pub destination: Option<String>,
    /// The printed tag code, e.g. `BAG-A8C74A09`.
    pub qr_code: String,
    /// The absolute URL of the rendered tag, if generated.
    #[serde(default)]
    pub qr_code_image_url: Option<String>,
    /// The latest status.
    pub current_status: BaggageStatus,
    /// The latest status's label.
    pub current_status_display: String,
    /// The timestamp when the bag was checked in.
    pub created_at: DateTime<Utc>,
    /// The timestamp of the last change.
    pub updated_at: DateTime<Utc>,
    /// The status history, oldest first as sent by the server.
    #[serde(default)]
    pub status_timeline: Vec<StatusUpdate>,
}

impl Baggage {
    /// The status history ordered for display, most recent first.
    pub fn timeline_most_recent_first(&self) -> Vec<&StatusUpdate> {
        most_recent_first(&self.status_timeline)
    }
}

/// Orders status updates most recent first without touching the entries.
pub fn most_recent_first(updates: &[StatusUpdate]) -> Vec<&StatusUpdate> {
    let mut ordered: Vec<&StatusUpdate> = updates.iter().collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    ordered
}

/// The request payload for creating a baggage record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BaggageCreateData {
    pub passenger_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// The request payload for appending a status update.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateCreateData {
    pub status: BaggageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Optional filters for listing baggage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub search: Option<String>,
    pub status: Option<BaggageStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SearchFilters {
    /// The query pairs to send, skipping unset and blank filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.code().to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// The response of `POST /baggage/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggageCreated {
    pub message: String,
    pub baggage: Baggage,
}

/// The response of `POST /baggage/{id}/update/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdated {
    pub message: String,
    pub baggage: Baggage,
    pub status_update: StatusUpdate,
}

/// The response of `GET /baggage/{id}/timeline/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub baggage_id: Uuid,
    pub qr_code: String,
    pub passenger_name: String,
    pub current_status: BaggageStatus,
    pub timeline: Vec<StatusUpdate>,
}

impl Timeline {
    /// The entries ordered for display, most recent first.
    pub fn most_recent_first(&self) -> Vec<&StatusUpdate> {
        most_recent_first(&self.timeline)
    }
}
