//! The tracking API: the authenticated client and one module of thin
//! resource methods per endpoint group.

pub mod auth;
pub mod baggage;
pub mod client;
pub mod health;
pub mod staff;

pub use client::{ApiClient, ApiRequest, REFRESH_PATH};
