//! Client for the baggage tracking API.
//!
//! [`api::ApiClient`] performs the HTTP calls, attaching the stored access
//! token and refreshing it once on a `401`. The session lives in an injected
//! [`store::SessionStore`]; [`services::auth`] keeps it in step with login,
//! registration and logout.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod scanner;
pub mod store;

pub mod models {
    pub mod baggage;
    pub mod dashboard;
    pub mod session;
    pub mod user;
}

pub mod services {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}

pub use api::ApiClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use store::{FileStore, MemoryStore, SessionStore};
