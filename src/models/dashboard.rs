use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::baggage::{most_recent_first, Baggage, BaggageStatus, StatusUpdate};

/// How many recent updates the dashboard shows.
pub const RECENT_UPDATES_LIMIT: usize = 10;

/// The number of bags currently in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub count: u64,
    pub display: String,
}

/// The aggregate counts shown on the staff dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// The total number of bags.
    pub total_baggage: u64,
    /// Counts keyed by status code (`CHECKED_IN`, ...).
    pub status_counts: BTreeMap<String, StatusCount>,
    /// The latest status updates, most recent first.
    pub recent_updates: Vec<StatusUpdate>,
}

impl DashboardStats {
    /// Computes the dashboard figures from a list of bags, for servers or
    /// accounts without access to the stats endpoint.
    pub fn summarize(baggage: &[Baggage]) -> Self {
        let mut status_counts: BTreeMap<String, StatusCount> = BaggageStatus::ALL
            .into_iter()
            .map(|status| {
                (
                    status.code().to_string(),
                    StatusCount {
                        count: 0,
                        display: status.display_name().to_string(),
                    },
                )
            })
            .collect();

        for bag in baggage {
            if let Some(entry) = status_counts.get_mut(bag.current_status.code()) {
                entry.count += 1;
            }
        }

        let all_updates: Vec<StatusUpdate> = baggage
            .iter()
            .flat_map(|bag| bag.status_timeline.iter().cloned())
            .collect();
        let recent_updates = most_recent_first(&all_updates)
            .into_iter()
            .take(RECENT_UPDATES_LIMIT)
            .cloned()
            .collect();

        Self {
            total_baggage: baggage.len() as u64,
            status_counts,
            recent_updates,
        }
    }

    /// The number of bags in `status`, zero when the server omitted it.
    pub fn count_for(&self, status: BaggageStatus) -> u64 {
        self.status_counts
            .get(status.code())
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// The response of `GET /health/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// A bare `{ "message": ... }` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
