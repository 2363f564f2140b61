//! Client library for the HireFlow job board API.
//!
//! The interesting part lives in [`api::client`]: every authenticated call
//! runs through a single request core that checks the stored access token's
//! expiry before the request goes out, refreshes it at most once, and maps
//! failures onto a small typed error set ([`api::ApiError`]). The resource
//! modules under [`api`] are thin per-endpoint wrappers, and [`auth`] holds
//! the pluggable token storage backends.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
