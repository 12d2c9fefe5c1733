use anyhow::{bail, Context};
use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::cli::output;
use crate::models::baggage::{
    BaggageCreateData, BaggageStatus, SearchFilters, StatusUpdateCreateData,
};

#[derive(Subcommand)]
pub enum BaggageAction {
    /// List baggage records
    List {
        /// Match passenger name, flight number or tag code
        #[arg(long)]
        search: Option<String>,
        /// Only bags currently in this status
        #[arg(long)]
        status: Option<BaggageStatus>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show one baggage record
    Show {
        /// Baggage ID
        id: Uuid,
    },
    /// Register a checked-in bag
    Create {
        /// Passenger name
        #[arg(long)]
        passenger_name: String,
        #[arg(long)]
        passenger_email: Option<String>,
        #[arg(long)]
        flight_number: Option<String>,
        #[arg(long)]
        destination: Option<String>,
    },
    /// Record a handling step
    Update {
        /// Baggage ID
        id: Uuid,
        /// New status, e.g. LOADED or in-flight
        #[arg(long)]
        status: BaggageStatus,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move a bag to the next handling step
    Advance {
        /// Baggage ID
        id: Uuid,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the status history of a bag, most recent first
    Timeline {
        /// Baggage ID
        id: Uuid,
    },
}

impl BaggageAction {
    pub async fn run(self, client: &ApiClient, json: bool) -> anyhow::Result<()> {
        let now = Utc::now();

        match self {
            BaggageAction::List {
                search,
                status,
                page,
                page_size,
            } => {
                let filters = SearchFilters {
                    search,
                    status,
                    page,
                    page_size,
                };
                let resp = client.list_baggage(&filters).await?;
                if json {
                    output::print_json(&resp)?;
                } else {
                    output::print_baggage_list(&resp);
                }
            }
            BaggageAction::Show { id } => {
                let bag = client.baggage(id).await?;
                if json {
                    output::print_json(&bag)?;
                } else {
                    output::print_baggage(&bag, now);
                }
            }
            BaggageAction::Create {
                passenger_name,
                passenger_email,
                flight_number,
                destination,
            } => {
                if passenger_name.trim().is_empty() {
                    bail!("Passenger name is required");
                }
                let data = BaggageCreateData {
                    passenger_name,
                    passenger_email,
                    flight_number,
                    destination,
                };
                let resp = client.create_baggage(&data).await?;
                if json {
                    output::print_json(&resp)?;
                } else {
                    println!("{}", resp.message);
                    output::print_baggage(&resp.baggage, now);
                }
            }
            BaggageAction::Update {
                id,
                status,
                location,
                notes,
            } => {
                let data = StatusUpdateCreateData {
                    status,
                    notes,
                    location,
                };
                let resp = client.update_baggage_status(id, &data).await?;
                if json {
                    output::print_json(&resp)?;
                } else {
                    println!("{}", resp.message);
                    output::print_baggage(&resp.baggage, now);
                }
            }
            BaggageAction::Advance {
                id,
                location,
                notes,
            } => {
                let bag = client.baggage(id).await?;
                let Some(status) = bag.current_status.next() else {
                    bail!("{} has already arrived", bag.qr_code);
                };
                let data = StatusUpdateCreateData {
                    status,
                    notes,
                    location,
                };
                let resp = client
                    .update_baggage_status(id, &data)
                    .await
                    .with_context(|| format!("Failed to move {} to {}", bag.qr_code, status))?;
                if json {
                    output::print_json(&resp)?;
                } else {
                    println!("{}", resp.message);
                    output::print_baggage(&resp.baggage, now);
                }
            }
            BaggageAction::Timeline { id } => {
                let resp = client.baggage_timeline(id).await?;
                if json {
                    output::print_json(&resp)?;
                } else {
                    println!(
                        "{}  {}  {}",
                        resp.qr_code,
                        resp.passenger_name,
                        resp.current_status.display_name()
                    );
                    output::print_timeline(resp.most_recent_first(), now);
                }
            }
        }

        Ok(())
    }
}
