use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced to callers of the API client.
///
/// Session-related variants (`MissingCredentials`, `MissingRefreshToken`,
/// `SessionExpired`) mean the user has to sign in again; everything else is a
/// per-request failure the caller can show inline.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not signed in")]
    MissingCredentials,

    #[error("Session expired and no refresh token is stored")]
    MissingRefreshToken,

    #[error("Session expired - please sign in again")]
    SessionExpired,

    #[error("{message} (status {status})")]
    RequestFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

/// Maximum length for server-provided error messages
const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// Shape of the backend's JSON error body
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// True when the caller should route the user back to the login flow
    /// instead of rendering the error inline.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::MissingCredentials
                | ApiError::MissingRefreshToken
                | ApiError::SessionExpired
        )
    }

    /// Wrap a token-store failure, keeping the context chain readable
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        ApiError::Storage(format!("{:#}", err))
    }

    /// Build a `RequestFailed` from a non-2xx response body.
    ///
    /// Uses the server's `{"message": ...}` when the body parses as one,
    /// otherwise the per-endpoint fallback string.
    pub(crate) fn from_response(status: StatusCode, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| fallback.to_string());
        ApiError::RequestFailed {
            status: status.as_u16(),
            message: Self::truncate_message(&message),
        }
    }

    /// Truncate a server message to avoid dumping huge bodies into logs
    fn truncate_message(message: &str) -> String {
        if message.len() <= MAX_ERROR_MESSAGE_LENGTH {
            message.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &message[..MAX_ERROR_MESSAGE_LENGTH],
                message.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_server_message_when_body_parses() {
        let err = ApiError::from_response(
            StatusCode::NOT_FOUND,
            r#"{"message": "Job not found"}"#,
            "Failed to fetch job",
        );
        match err {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Job not found");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn falls_back_when_body_is_not_json() {
        let err = ApiError::from_response(
            StatusCode::BAD_GATEWAY,
            "<html>502 Bad Gateway</html>",
            "Failed to fetch job",
        );
        match err {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Failed to fetch job");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn falls_back_when_body_is_empty() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "", "Request failed");
        match err {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Request failed");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn truncates_oversized_messages() {
        let long = "x".repeat(2000);
        let body = format!(r#"{{"message": "{}"}}"#, long);
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, &body, "fallback");
        match err {
            ApiError::RequestFailed { message, .. } => {
                assert!(message.len() < 600);
                assert!(message.contains("truncated"));
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn session_errors_require_login() {
        assert!(ApiError::MissingCredentials.requires_login());
        assert!(ApiError::MissingRefreshToken.requires_login());
        assert!(ApiError::SessionExpired.requires_login());
        assert!(!ApiError::RequestFailed {
            status: 404,
            message: "nope".into()
        }
        .requires_login());
    }
}
