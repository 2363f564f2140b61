//! API client for communicating with the HireFlow REST API.
//!
//! This module provides the `ApiClient` struct: the authenticated request
//! core plus the builder/send plumbing the resource modules call through.
//!
//! One logical call runs a fixed sequence: check the stored access token is
//! present, check its `exp` claim, refresh it at most once if needed, then
//! issue the request with a bearer header. There is no retry loop back into
//! the refresh path; a call that fails after a successful refresh fails for
//! good.

use std::sync::Arc;

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::{token_is_expired, SessionTokens, TokenStore};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token refresh endpoint, relative to the API base URL
const REFRESH_PATH: &str = "/auth/refresh";

/// Response body of the refresh endpoint.
/// The backend is inconsistent about the field spelling across deployments,
/// so both are accepted and normalized here.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "access_token", alias = "accessToken")]
    access_token: String,
    #[serde(rename = "refresh_token", alias = "refreshToken", default)]
    refresh_token: Option<String>,
}

/// Client for the HireFlow REST API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    /// Serializes refresh attempts across concurrent calls so an expired
    /// token costs one refresh, not one per in-flight request
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store this client reads and writes
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Tokens as currently stored. A storage read failure is logged and
    /// treated as an absent session.
    fn load_tokens(&self) -> Option<SessionTokens> {
        match self.store.load() {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "failed to read token store");
                None
            }
        }
    }

    /// Produce a bearer token good for one request, refreshing the stored
    /// access token at most once if it is expired or undecodable.
    ///
    /// Fails without any network traffic when no access token is stored
    /// (`MissingCredentials`) or when a refresh is needed but no refresh
    /// token is stored (`MissingRefreshToken`). A failed refresh surfaces
    /// as `SessionExpired` and the original request is never issued.
    async fn bearer_token(&self) -> Result<String, ApiError> {
        let tokens = self.load_tokens().unwrap_or_default();
        let Some(access) = tokens.access_token else {
            return Err(ApiError::MissingCredentials);
        };
        if !token_is_expired(&access) {
            return Ok(access);
        }

        debug!("access token expired, attempting refresh");
        let _gate = self.refresh_gate.lock().await;

        // A concurrent call may have refreshed while we waited on the gate;
        // re-read the store before spending a refresh of our own.
        let tokens = self.load_tokens().unwrap_or_default();
        if let Some(access) = &tokens.access_token {
            if !token_is_expired(access) {
                return Ok(access.clone());
            }
        }
        let Some(refresh_token) = tokens.refresh_token.clone() else {
            return Err(ApiError::MissingRefreshToken);
        };
        self.refresh_access_token(tokens, &refresh_token).await
    }

    /// Exchange the refresh token for a new access token and store it.
    /// Every failure in here (bad status, transport error, malformed body,
    /// store write) collapses into `SessionExpired`.
    async fn refresh_access_token(
        &self,
        mut tokens: SessionTokens,
        refresh_token: &str,
    ) -> Result<String, ApiError> {
        let renewed = match self.call_refresh(refresh_token).await {
            Ok(renewed) => renewed,
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                return Err(ApiError::SessionExpired);
            }
        };

        tokens.access_token = Some(renewed.access_token.clone());
        // the stored refresh token survives unless the server rotated it
        if renewed.refresh_token.is_some() {
            tokens.refresh_token = renewed.refresh_token;
        }
        if let Err(err) = self.store.save(&tokens) {
            warn!(error = %err, "failed to store refreshed tokens");
            return Err(ApiError::SessionExpired);
        }

        debug!("access token refreshed");
        Ok(renewed.access_token)
    }

    async fn call_refresh(&self, refresh_token: &str) -> anyhow::Result<RefreshResponse> {
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .context("Failed to send refresh request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("refresh endpoint returned status {}", status);
        }
        response
            .json()
            .await
            .context("Failed to parse refresh response")
    }

    // ========================================================================
    // Request plumbing used by the resource modules
    // ========================================================================

    /// Request builder for an authenticated endpoint. The pre-flight token
    /// check (and at most one refresh) happens before the builder exists,
    /// so the request itself is only ever issued once.
    pub(crate) async fn authed(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer_token().await?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    /// Request builder for a public endpoint; no token is read or attached
    pub(crate) fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a prepared request and parse the JSON response body
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%status, "API response received");

        if !status.is_success() {
            return Err(ApiError::from_response(status, &text, fallback));
        }
        serde_json::from_str(&text)
            .map_err(|err| ApiError::InvalidResponse(format!("{}: {}", fallback, err)))
    }

    /// Send a prepared request for an endpoint with no response body
    pub(crate) async fn execute_empty(
        &self,
        builder: RequestBuilder,
        fallback: &'static str,
    ) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &text, fallback));
        }
        Ok(())
    }

    // ===== Verb helpers =====

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let builder = self.authed(Method::GET, path).await?;
        self.execute(builder, fallback).await
    }

    pub(crate) async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        fallback: &'static str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.authed(Method::POST, path).await?.json(body);
        self.execute(builder, fallback).await
    }

    pub(crate) async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        fallback: &'static str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.authed(Method::PUT, path).await?.json(body);
        self.execute(builder, fallback).await
    }

    pub(crate) async fn patch<T, B>(
        &self,
        path: &str,
        body: &B,
        fallback: &'static str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.authed(Method::PATCH, path).await?.json(body);
        self.execute(builder, fallback).await
    }

    pub(crate) async fn delete(&self, path: &str, fallback: &'static str) -> Result<(), ApiError> {
        let builder = self.authed(Method::DELETE, path).await?;
        self.execute_empty(builder, fallback).await
    }

    /// Multipart upload. reqwest sets the multipart content type itself;
    /// the JSON content-type header is never attached to these requests.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let builder = self.authed(Method::POST, path).await?.multipart(form);
        self.execute(builder, fallback).await
    }

    pub(crate) async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        self.execute(self.public(Method::GET, path), fallback).await
    }

    pub(crate) async fn post_public<T, B>(
        &self,
        path: &str,
        body: &B,
        fallback: &'static str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.public(Method::POST, path).json(body), fallback)
            .await
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::MemoryTokenStore;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Widget {
        id: String,
    }

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(json!({ "exp": exp }).to_string());
        format!("{}.{}.sig", header, payload)
    }

    fn valid_token() -> String {
        jwt_with_exp(Utc::now().timestamp() + 3600)
    }

    fn expired_token() -> String {
        jwt_with_exp(Utc::now().timestamp() - 60)
    }

    fn client_with(
        server: &MockServer,
        tokens: Option<SessionTokens>,
    ) -> (ApiClient, Arc<MemoryTokenStore>) {
        let store = Arc::new(match tokens {
            Some(tokens) => MemoryTokenStore::with_tokens(tokens),
            None => MemoryTokenStore::new(),
        });
        let client = ApiClient::new(server.uri(), store.clone()).expect("client");
        (client, store)
    }

    #[tokio::test]
    async fn missing_access_token_fails_without_network_io() {
        let server = MockServer::start().await;
        // refresh token alone does not help; the access slot must be filled
        let (client, _store) = client_with(
            &server,
            Some(SessionTokens {
                access_token: None,
                refresh_token: Some("refresh-1".into()),
            }),
        );

        let result: Result<Widget, ApiError> = client.get("/jobs/j-1", "Failed to fetch job").await;
        assert!(matches!(result, Err(ApiError::MissingCredentials)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_store_fails_without_network_io() {
        let server = MockServer::start().await;
        let (client, _store) = client_with(&server, None);

        let result: Result<Widget, ApiError> = client.get("/jobs/j-1", "Failed to fetch job").await;
        assert!(matches!(result, Err(ApiError::MissingCredentials)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_token_without_refresh_token_fails_without_network_io() {
        let server = MockServer::start().await;
        let (client, _store) = client_with(
            &server,
            Some(SessionTokens {
                access_token: Some(expired_token()),
                refresh_token: None,
            }),
        );

        let result: Result<Widget, ApiError> = client.get("/jobs/j-1", "Failed to fetch job").await;
        assert!(matches!(result, Err(ApiError::MissingRefreshToken)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_session_expired_and_skips_main_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({ "refreshToken": "refresh-1" })))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _store) = client_with(
            &server,
            Some(SessionTokens::new(expired_token(), "refresh-1")),
        );

        let result: Result<Widget, ApiError> = client.get("/jobs/j-1", "Failed to fetch job").await;
        assert!(matches!(result, Err(ApiError::SessionExpired)));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/auth/refresh");
    }

    #[tokio::test]
    async fn expired_token_refreshes_once_then_issues_main_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "new-token" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        // the retried request must carry the freshly stored token
        Mock::given(method("GET"))
            .and(path("/jobs/j-42"))
            .and(header("Authorization", "Bearer new-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "42" })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(
            &server,
            Some(SessionTokens::new(expired_token(), "refresh-1")),
        );

        let widget: Widget = client
            .get("/jobs/j-42", "Failed to fetch job")
            .await
            .expect("widget");
        assert_eq!(widget.id, "42");

        let tokens = store.load().unwrap().expect("tokens");
        assert_eq!(tokens.access_token.as_deref(), Some("new-token"));
        // refresh token was not rotated by the server, so it is unchanged
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url.path(), "/auth/refresh");
        assert_eq!(requests[1].url.path(), "/jobs/j-42");
    }

    #[tokio::test]
    async fn failing_main_call_after_refresh_is_not_refreshed_again() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "new-token" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/jobs/j-42"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _store) = client_with(
            &server,
            Some(SessionTokens::new(expired_token(), "refresh-1")),
        );

        let result: Result<Widget, ApiError> = client.get("/jobs/j-42", "Failed to fetch job").await;
        match result {
            Err(ApiError::RequestFailed { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected RequestFailed, got {:?}", other),
        }
        // exactly one refresh and one main request, no loop
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn valid_token_passes_through_and_failure_carries_server_message() {
        let server = MockServer::start().await;
        let token = valid_token();
        Mock::given(method("GET"))
            .and(path("/jobs/j-7"))
            .and(header("Authorization", format!("Bearer {}", token).as_str()))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (client, _store) =
            client_with(&server, Some(SessionTokens::new(token, "refresh-1")));

        let result: Result<Widget, ApiError> = client.get("/jobs/j-7", "Failed to fetch job").await;
        match result {
            Err(ApiError::RequestFailed { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
        // no refresh was attempted for a valid token
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_accepts_camel_case_token_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "tok-2" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("Authorization", "Bearer tok-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _store) = client_with(
            &server,
            Some(SessionTokens::new(expired_token(), "refresh-1")),
        );

        let widget: Widget = client
            .get("/users/me", "Failed to load profile")
            .await
            .expect("widget");
        assert_eq!(widget.id, "u-1");
    }

    #[tokio::test]
    async fn rotated_refresh_token_replaces_stored_one() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "access_token": "tok-2", "refresh_token": "refresh-2" }),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(
            &server,
            Some(SessionTokens::new(expired_token(), "refresh-1")),
        );

        let _widget: Widget = client
            .get("/users/me", "Failed to load profile")
            .await
            .expect("widget");

        let tokens = store.load().unwrap().expect("tokens");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn concurrent_calls_share_one_refresh() {
        let server = MockServer::start().await;
        // the renewed token must decode as fresh so the second caller can
        // skip its own refresh after waiting on the gate
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": valid_token() })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/jobs/j-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
            .expect(2)
            .mount(&server)
            .await;

        let (client, _store) = client_with(
            &server,
            Some(SessionTokens::new(expired_token(), "refresh-1")),
        );

        let (a, b) = tokio::join!(
            client.get::<Widget>("/jobs/j-1", "Failed to fetch job"),
            client.get::<Widget>("/jobs/j-1", "Failed to fetch job"),
        );
        assert!(a.is_ok() && b.is_ok());

        let refreshes = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/auth/refresh")
            .count();
        assert_eq!(refreshes, 1);
    }

    #[tokio::test]
    async fn public_endpoints_need_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/j-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _store) = client_with(&server, None);
        let widget: Widget = client
            .get_public("/jobs/j-1", "Failed to fetch job")
            .await
            .expect("widget");
        assert_eq!(widget.id, "1");
    }

    #[tokio::test]
    async fn success_body_that_fails_to_parse_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/j-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _store) =
            client_with(&server, Some(SessionTokens::new(valid_token(), "r")));
        let result: Result<Widget, ApiError> = client.get("/jobs/j-1", "Failed to fetch job").await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }
}
