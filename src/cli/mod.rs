//! The `baggage` command line.

pub mod baggage;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::baggage::SearchFilters;
use crate::models::dashboard::DashboardStats;
use crate::models::user::{LoginCredentials, RegisterData, Role};
use crate::scanner::{
    extract_baggage_code, scan_image_file, DirectoryFrames, RqrrDecoder, ScanSession, DEMO_CODES,
};
use crate::services::auth;
use crate::store::{FileStore, SessionStore};

/// Page size used when computing dashboard figures locally.
const LOCAL_STATS_PAGE_SIZE: u32 = 100;

/// Baggage tracking client: sign in, track tags and record handling steps
#[derive(Parser)]
#[command(name = "baggage", version, about)]
pub struct Cli {
    /// Tracking API base URL
    #[arg(long, env = "BAGGAGE_API_URL", global = true)]
    api_url: Option<String>,

    /// File holding the signed-in session
    #[arg(long, env = "BAGGAGE_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a passenger
    Login {
        username: String,
        #[arg(long, env = "BAGGAGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in as a staff member
    StaffLogin {
        username: String,
        #[arg(long, env = "BAGGAGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BAGGAGE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        password_confirm: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// PASSENGER, STAFF or ADMIN
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check that the API is up
    Health,
    /// Look up a bag by its tag code or scanned QR payload
    Track {
        /// `BAG-...` code, baggage UUID or raw QR payload
        #[arg(required_unless_present_any = ["image", "watch"])]
        code: Option<String>,
        /// Read the tag from a photo (PNG or JPEG)
        #[arg(long, conflicts_with_all = ["code", "watch"])]
        image: Option<PathBuf>,
        /// Scan image frames as they appear in a directory, until a tag is found
        #[arg(long, conflicts_with = "code")]
        watch: Option<PathBuf>,
    },
    /// List the tag codes of the demo bags
    DemoCodes,
    /// Manage baggage records (staff)
    Baggage {
        #[command(subcommand)]
        action: baggage::BaggageAction,
    },
    /// Show dashboard figures (staff)
    Stats {
        /// Compute the figures from the baggage list instead of the stats endpoint
        #[arg(long)]
        local: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::from_env()?;
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url);
        }
        if let Some(session_file) = self.session_file {
            config = config.with_session_file(session_file);
        }
        tracing::debug!("API: {}, session file: {}", config.api_url, config.session_file.display());

        let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(&config.session_file));
        let client = ApiClient::new(&config, store).context("Failed to build HTTP client")?;
        let json = self.json;

        match self.command {
            Commands::Login { username, password } => {
                let user = auth::login(&client, &LoginCredentials::new(username, password)).await?;
                println!("Signed in as {} ({})", user.display_name(), user.role);
            }
            Commands::StaffLogin { username, password } => {
                let credentials = LoginCredentials::new(username, password);
                let user = auth::staff_login(&client, &credentials).await?;
                println!("Signed in as {} ({})", user.display_name(), user.role);
            }
            Commands::Register {
                username,
                email,
                password,
                password_confirm,
                first_name,
                last_name,
                role,
                employee_id,
                department,
            } => {
                let data = RegisterData {
                    username,
                    email,
                    first_name,
                    last_name,
                    password_confirm: password_confirm.unwrap_or_else(|| password.clone()),
                    password,
                    role,
                    employee_id,
                    department,
                };
                let user = auth::register(&client, &data).await?;
                println!("Registered and signed in as {}", user.username);
            }
            Commands::Logout => {
                auth::logout(&client).await?;
                println!("Signed out");
            }
            Commands::Whoami => match auth::restore_session(&client).await? {
                Some(user) if json => output::print_json(&user)?,
                Some(user) => output::print_user(&user),
                None => println!("Not signed in"),
            },
            Commands::Health => {
                let health = client.health().await?;
                if json {
                    output::print_json(&health)?;
                } else {
                    println!("{} {}: {}", health.service, health.version, health.status);
                }
            }
            Commands::Track { code, image, watch } => {
                let code = resolve_code(code, image, watch).await?;
                let bag = client
                    .baggage_by_qr(&code)
                    .await
                    .with_context(|| format!("Failed to track {}", code))?;
                if json {
                    output::print_json(&bag)?;
                } else {
                    output::print_baggage(&bag, Utc::now());
                }
            }
            Commands::DemoCodes => {
                for code in DEMO_CODES {
                    println!("{}", code);
                }
            }
            Commands::Baggage { action } => action.run(&client, json).await?,
            Commands::Stats { local } => {
                let stats = if local {
                    let filters = SearchFilters {
                        page_size: Some(LOCAL_STATS_PAGE_SIZE),
                        ..SearchFilters::default()
                    };
                    let page = client.list_baggage(&filters).await?;
                    DashboardStats::summarize(&page.results)
                } else {
                    client.dashboard_stats().await?
                };
                if json {
                    output::print_json(&stats)?;
                } else {
                    output::print_stats(&stats, Utc::now());
                }
            }
        }

        Ok(())
    }
}

/// The tag code to look up, typed in or read from a photo or frame directory.
async fn resolve_code(
    code: Option<String>,
    image: Option<PathBuf>,
    watch: Option<PathBuf>,
) -> anyhow::Result<String> {
    if let Some(path) = image {
        return scan_image_file(&path, &RqrrDecoder)
            .await
            .with_context(|| format!("Failed to scan {}", path.display()));
    }

    if let Some(dir) = watch {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        eprintln!("Waiting for a tag in {} (Ctrl-C to stop)", dir.display());
        let mut session = ScanSession::start(DirectoryFrames::new(&dir));
        return session
            .scan(&RqrrDecoder, &cancel)
            .await
            .with_context(|| format!("Failed to scan frames in {}", dir.display()));
    }

    match code {
        Some(code) => Ok(extract_baggage_code(&code)),
        None => anyhow::bail!("Give a tag code, --image or --watch"),
    }
}
