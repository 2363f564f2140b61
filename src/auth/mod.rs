//! Session credential handling.
//!
//! This module provides:
//! - `TokenStore`: pluggable storage for the access/refresh token pair
//!   (keychain, JSON file, or in-memory)
//! - `TokenClaims`: JWT payload decoding for the pre-flight expiry check
//!
//! Tokens are created on login/registration, overwritten by refresh, and
//! deleted on logout.

pub mod claims;
pub mod store;

pub use claims::{decode_claims, token_is_expired, TokenClaims};
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, SessionTokens, TokenStore};
