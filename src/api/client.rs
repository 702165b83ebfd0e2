//! HTTP client for the TaskDeck REST API.
//!
//! This module provides the `ApiClient` struct that every typed endpoint API
//! goes through. Outbound requests get the stored access token attached as a
//! bearer credential; a 401 response on a non-auth endpoint triggers the
//! single-flight renewal protocol and a one-shot replay.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::config::Config;
use crate::models::{RefreshRequest, TokenPair};

use super::refresh::{GateEntry, RefreshGate, RefreshOutcome};
use super::{ApiError, AuthApi, TasksApi};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Login endpoint path
pub(crate) const LOGIN_PATH: &str = "/api/auth/login/";

/// Registration endpoint path
pub(crate) const REGISTER_PATH: &str = "/api/auth/register/";

/// Token renewal endpoint path
pub(crate) const REFRESH_PATH: &str = "/api/auth/refresh/";

/// Paths that never trigger token renewal on a 401. A rejected login or
/// registration is a credentials problem, and a rejected renewal must not
/// recurse into itself.
const AUTH_EXEMPT_PATHS: [&str; 3] = [LOGIN_PATH, REGISTER_PATH, REFRESH_PATH];

/// Per-call mutable state for the pipeline: the one-shot retry marker and the
/// token to replay with after a renewal.
struct RequestContext {
    auth_exempt: bool,
    retried: bool,
    token_override: Option<String>,
}

impl RequestContext {
    fn new(path: &str) -> Self {
        Self {
            auth_exempt: AUTH_EXEMPT_PATHS.iter().any(|p| path == *p),
            retried: false,
            token_override: None,
        }
    }
}

/// API client for the TaskDeck backend.
/// Clone is cheap - the HTTP connection pool, token store, and refresh gate
/// are shared across clones.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<TokenStore>,
    gate: Arc<RefreshGate>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            store,
            gate: Arc::new(RefreshGate::new()),
        })
    }

    /// Create a client from the application configuration, with the token
    /// store in the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(TokenStore::new(config.data_dir()?)?);
        Self::new(config.api_base_url.clone(), store)
    }

    /// The token store backing this client.
    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    /// Access the authentication API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the tasks API.
    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Verb helpers =====

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .execute(Method::GET, path, None::<&()>, None::<&()>)
            .await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::GET, path, Some(query), None::<&()>)
            .await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::POST, path, None::<&()>, Some(body))
            .await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::PUT, path, None::<&()>, Some(body))
            .await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::PATCH, path, None::<&()>, Some(body))
            .await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .execute(Method::DELETE, path, None::<&()>, None::<&()>)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    // ===== Pipeline =====

    /// Send a request with the current access token attached. A 401 on a
    /// non-auth endpoint renews the token (at most once per call) and replays
    /// the request with the renewed token; every other response passes
    /// through unchanged.
    async fn execute<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut ctx = RequestContext::new(path);

        loop {
            let mut request = self.http.request(method.clone(), self.url(path));
            if let Some(query) = query {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let token = match ctx.token_override {
                Some(ref token) => Some(token.clone()),
                None => self.store.access_token(),
            };
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;

            if response.status() != StatusCode::UNAUTHORIZED || ctx.auth_exempt || ctx.retried {
                return Ok(response);
            }

            debug!(path, "Access token rejected, renewing");
            ctx.retried = true;
            let token = self.renew_access_token().await?;
            ctx.token_override = Some(token);
        }
    }

    /// Obtain a renewed access token, either by performing the renewal or by
    /// waiting for the one already in flight.
    async fn renew_access_token(&self) -> Result<String, ApiError> {
        let outcome = match self.gate.enter() {
            GateEntry::Leader(claim) => {
                let outcome = self.run_renewal().await;
                claim.settle(&outcome);
                outcome
            }
            GateEntry::Waiter(rx) => rx
                .await
                .unwrap_or_else(|_| RefreshOutcome::Failed("renewal interrupted".to_string())),
        };

        match outcome {
            RefreshOutcome::Renewed(token) => Ok(token),
            RefreshOutcome::MissingRefreshToken => Err(ApiError::Unauthorized),
            RefreshOutcome::Failed(detail) => Err(ApiError::SessionExpired(detail)),
        }
    }

    /// The renewal call itself. Only ever runs in the gate leader. Any
    /// failure - missing refresh token, transport error, timeout, or an
    /// explicit rejection - clears the token store.
    async fn run_renewal(&self) -> RefreshOutcome {
        let Some(refresh) = self.store.refresh_token() else {
            warn!("No stored refresh token, clearing session");
            self.store.clear_all();
            return RefreshOutcome::MissingRefreshToken;
        };

        // The renewal goes straight to the endpoint, unauthenticated. It must
        // not re-enter the pipeline.
        let result = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token renewal failed in transit, clearing session");
                self.store.clear_all();
                return RefreshOutcome::Failed(e.to_string());
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Token renewal rejected, clearing session");
            self.store.clear_all();
            return RefreshOutcome::Failed(ApiError::from_status(status, &body).to_string());
        }

        let pair: TokenPair = match response.json().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Token renewal returned an unreadable body, clearing session");
                self.store.clear_all();
                return RefreshOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = self
            .store
            .set_access_token(&pair.access)
            .and_then(|_| self.store.set_refresh_token(&pair.refresh))
        {
            // The renewed pair still authorizes this process; only durability
            // across restarts is lost.
            warn!(error = %e, "Failed to persist renewed tokens");
        }

        debug!("Access token renewed");
        RefreshOutcome::Renewed(pair.access)
    }

    /// Parse a successful response body, or map the failure status to an error.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse body: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
