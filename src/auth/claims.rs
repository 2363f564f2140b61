//! Access-token expiry checking.
//!
//! The backend issues JWT access tokens; the client never verifies the
//! signature (that is the server's job) but decodes the payload segment to
//! read the `exp` claim and decide whether a refresh is needed before a
//! request goes out. A token that cannot be decoded is treated as expired,
//! so the worst case for a garbled token is one redundant refresh.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;

/// Claims carried in the payload segment of a HireFlow access token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Decode the claims from a `header.payload.signature` token.
///
/// Returns `None` for anything that is not a well-formed JWT payload:
/// wrong segment count, bad base64, bad JSON, or a missing `exp` claim.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether the token should be refreshed before use.
///
/// Undecodable tokens count as expired rather than being trusted as-is.
pub fn token_is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Some(claims) => claims.is_expired_at(Utc::now().timestamp()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unsigned test token with the given payload JSON
    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{}.{}.sig", header, payload)
    }

    fn token_with_exp(exp: i64) -> String {
        token_with_payload(&format!(r#"{{"exp":{}}}"#, exp))
    }

    #[test]
    fn token_expiring_in_the_past_is_expired() {
        let token = token_with_exp(Utc::now().timestamp() - 1);
        assert!(token_is_expired(&token));
    }

    #[test]
    fn token_expiring_in_an_hour_is_valid() {
        let token = token_with_exp(Utc::now().timestamp() + 3600);
        assert!(!token_is_expired(&token));
    }

    #[test]
    fn garbled_payload_counts_as_expired() {
        assert!(token_is_expired("header.%%%not-base64%%%.sig"));
    }

    #[test]
    fn missing_exp_claim_counts_as_expired() {
        let token = token_with_payload(r#"{"sub":"user-1"}"#);
        assert!(decode_claims(&token).is_none());
        assert!(token_is_expired(&token));
    }

    #[test]
    fn missing_payload_segment_counts_as_expired() {
        assert!(token_is_expired("not-a-jwt"));
        assert!(token_is_expired(""));
    }

    #[test]
    fn decodes_optional_identity_claims() {
        let token = token_with_payload(
            r#"{"exp":4102444800,"sub":"user-7","email":"amy@example.com","role":"candidate"}"#,
        );
        let claims = decode_claims(&token).expect("claims");
        assert_eq!(claims.sub.as_deref(), Some("user-7"));
        assert_eq!(claims.email.as_deref(), Some("amy@example.com"));
        assert_eq!(claims.role.as_deref(), Some("candidate"));
    }
}
