//! Authentication endpoints.

use crate::models::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, TokenPair};

use super::client::{ApiClient, LOGIN_PATH, REFRESH_PATH, REGISTER_PATH};
use super::ApiError;

/// Authentication API client. A 401 from any of these endpoints means
/// rejected credentials and is surfaced directly; none of them participate in
/// token renewal.
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in with email and password, returning the token pair and the user
    /// record. Does not touch the token store; see `Session::login`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.post(LOGIN_PATH, credentials).await
    }

    /// Register a new account. The account is created but not logged in.
    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.client.post(REGISTER_PATH, data).await
    }

    /// Exchange a refresh token for a renewed pair. The pipeline performs
    /// this exchange on its own when a request hits a stale token; this
    /// method is for renewing eagerly.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let body = RefreshRequest {
            refresh: refresh_token.to_string(),
        };
        self.client.post(REFRESH_PATH, &body).await
    }
}
