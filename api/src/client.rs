//! The HTTP client adapter.
//!
//! Wraps `reqwest` with the base URL, bearer-token attach, and the one-shot
//! refresh-and-retry pipeline. The retry budget is an explicit parameter
//! threaded through [`ApiClient::execute`], bounded at
//! [`REFRESH_BUDGET`], so the cap is a visible contract instead of an
//! incidental flag on the request.

use crate::auth::{RefreshRequest, RefreshResponse};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::storage::{CredentialVault, SessionEviction};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Number of refresh-and-replay attempts per original request.
///
/// Exactly one: a second 401 after the replay surfaces to the caller, so an
/// expired-again token can never loop.
pub const REFRESH_BUDGET: u8 = 1;

/// HTTP client adapter.
///
/// # Type Parameters
///
/// - `V`: credential vault holding the access/refresh token pair
/// - `X`: eviction hook run when a 401 cannot be recovered
pub struct ApiClient<V, X> {
    http: reqwest::Client,
    base_url: String,
    vault: V,
    eviction: X,
}

impl<V, X> ApiClient<V, X>
where
    V: CredentialVault,
    X: SessionEviction,
{
    /// Create an adapter over a fresh `reqwest` client.
    #[must_use]
    pub fn new(config: ApiConfig, vault: V, eviction: X) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, vault, eviction)
    }

    /// Create an adapter over an existing `reqwest` client.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        config: ApiConfig,
        vault: V,
        eviction: X,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url,
            vault,
            eviction,
        }
    }

    /// The configured API origin.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}{path}` decoded as JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] on network, HTTP, or decode failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(Method::GET, path, None).await
    }

    /// `POST {base_url}{path}` with a JSON body, decoded as JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] on network, HTTP, or decode failure.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send_json(Method::POST, path, Some(Self::to_body(body)?))
            .await
    }

    /// `POST {base_url}{path}` without a body, ignoring the response payload.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] on network or HTTP failure.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        let response = self.execute(Method::POST, path, None, REFRESH_BUDGET).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    /// `PUT {base_url}{path}` with a JSON body, decoded as JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] on network, HTTP, or decode failure.
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send_json(Method::PUT, path, Some(Self::to_body(body)?))
            .await
    }

    /// `DELETE {base_url}{path}`; no payload is expected on success (204).
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] on network or HTTP failure.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .execute(Method::DELETE, path, None, REFRESH_BUDGET)
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value> {
        serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.execute(method, path, body, REFRESH_BUDGET).await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Run one request through the attach/refresh pipeline.
    ///
    /// The body is pre-serialized so the request can be replayed verbatim
    /// after a refresh. A non-401 response returns immediately; a 401 with
    /// budget left triggers exactly one refresh-and-replay. When the refresh
    /// itself fails (or no refresh token exists) the session is evicted and
    /// the original 401 flows back to the caller.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        mut budget: u8,
    ) -> Result<reqwest::Response> {
        loop {
            let url = format!("{}{}", self.base_url, path);
            let mut request = self.http.request(method.clone(), &url);
            if let Some(token) = self.vault.access_token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(ApiError::Network)?;
            if response.status() != StatusCode::UNAUTHORIZED || budget == 0 {
                return Ok(response);
            }

            budget -= 1;
            match self.refresh_session().await {
                Ok(()) => {
                    tracing::debug!(path, "access token refreshed, replaying request");
                },
                Err(err) => {
                    tracing::warn!(error = %err, "token refresh failed, evicting session");
                    self.vault.clear();
                    self.eviction.evict();
                    return Ok(response);
                },
            }
        }
    }

    /// Exchange the durable refresh token for a new access token.
    ///
    /// Called by the pipeline, never recursively through it: the refresh
    /// request goes straight to `reqwest`.
    async fn refresh_session(&self) -> Result<()> {
        let refresh_token = self.vault.refresh_token().ok_or(ApiError::NoCredentials)?;

        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(ApiError::Network)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let minted: RefreshResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;

        self.vault.set_access_token(&minted.access_token);
        if let Some(rotated) = &minted.refresh_token {
            self.vault.set_refresh_token(rotated);
        }
        Ok(())
    }
}
