//! REST API client module for the HireFlow backend.
//!
//! `client` holds the authenticated request core; the sibling modules
//! (`auth`, `companies`, `jobs`, `users`, `analytics`) are thin resource
//! wrappers that build a path and payload per endpoint and call through it.
//!
//! The API uses JWT bearer token authentication with a refresh-token
//! exchange at `/auth/refresh`.

pub mod analytics;
pub mod auth;
pub mod client;
pub mod companies;
pub mod error;
pub mod jobs;
pub mod users;

pub use auth::AuthSession;
pub use client::ApiClient;
pub use error::ApiError;
