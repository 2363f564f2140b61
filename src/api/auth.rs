//! Account endpoints: registration, login, logout, current user.
//!
//! Login and registration are public endpoints; they bypass the
//! authenticated core entirely and persist the returned token pair into the
//! store on success.

use tracing::{debug, warn};

use crate::auth::SessionTokens;
use crate::models::{NewUser, User};

use super::{ApiClient, ApiError};

/// Response of the login/registration endpoints: the token pair plus the
/// signed-in user. Both token field spellings occur in the wild and are
/// normalized on deserialization.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthSession {
    #[serde(rename = "access_token", alias = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refresh_token", alias = "refreshToken")]
    pub refresh_token: String,
    pub user: User,
}

/// Login request body
#[derive(serde::Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Register a new account and store its session tokens
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let session: AuthSession = self
            .post_public("/auth/register", new_user, "Registration failed")
            .await?;
        self.persist_session(&session)?;
        Ok(session.user)
    }

    /// Sign in and store the session tokens
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let session: AuthSession = self
            .post_public(
                "/auth/login",
                &LoginRequest { email, password },
                "Login failed",
            )
            .await?;
        debug!(email, "signed in");
        self.persist_session(&session)?;
        Ok(session.user)
    }

    /// Sign out. The server-side revocation is best effort; the local
    /// tokens are cleared no matter what the server says.
    pub async fn logout(&self) -> Result<(), ApiError> {
        match self.authed(reqwest::Method::POST, "/auth/logout").await {
            Ok(builder) => {
                if let Err(err) = self.execute_empty(builder, "Logout failed").await {
                    warn!(error = %err, "server-side logout failed");
                }
            }
            // nothing to revoke without a usable session
            Err(err) => debug!(error = %err, "skipping server-side logout"),
        }
        self.store().clear().map_err(ApiError::storage)?;
        Ok(())
    }

    /// The currently signed-in user
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/auth/me", "Failed to load profile").await
    }

    fn persist_session(&self, session: &AuthSession) -> Result<(), ApiError> {
        self.store()
            .save(&SessionTokens::new(
                session.access_token.clone(),
                session.refresh_token.clone(),
            ))
            .map_err(ApiError::storage)
    }
}
