use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{LoginRequest, RegisterRequest, User};

/// In-memory authenticated-user state layered over the token store.
///
/// The session is authenticated when it holds both an access token and a user
/// record. The refresh token may lag behind the store while a renewal is in
/// flight; the pipeline always reads the store directly.
pub struct Session {
    client: ApiClient,
    user: Option<User>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            user: None,
            access_token: None,
            refresh_token: None,
        }
    }

    /// Hydrate from the token store. Runs only when no in-memory access token
    /// is present, and only adopts a stored session that is complete: access
    /// token, refresh token, and user record all present. A stored token
    /// without a user record stays unauthenticated until the next login.
    pub fn initialize(&mut self) {
        if self.access_token.is_some() {
            return;
        }

        let store = self.client.token_store();
        let (Some(access), Some(refresh), Some(user)) =
            (store.access_token(), store.refresh_token(), store.user())
        else {
            return;
        };

        self.access_token = Some(access);
        self.refresh_token = Some(refresh);
        self.user = Some(user);
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Display name of the authenticated user, empty when logged out.
    pub fn full_name(&self) -> String {
        self.user.as_ref().map(User::full_name).unwrap_or_default()
    }

    /// Log in and persist the session. On success the store holds the token
    /// pair and the user record.
    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<(), ApiError> {
        let response = self.client.auth().login(credentials).await?;

        let store = self.client.token_store();
        if let Err(e) = store
            .set_access_token(&response.access)
            .and_then(|_| store.set_refresh_token(&response.refresh))
            .and_then(|_| store.set_user(&response.user))
        {
            warn!(error = %e, "Failed to persist session");
        }

        self.access_token = Some(response.access);
        self.refresh_token = Some(response.refresh);
        self.user = Some(response.user);
        Ok(())
    }

    /// Register a new account, then log it in with the same credentials.
    pub async fn register(&mut self, data: &RegisterRequest) -> Result<(), ApiError> {
        self.client.auth().register(data).await?;
        self.login(&LoginRequest {
            email: data.email.clone(),
            password: data.password.clone(),
        })
        .await
    }

    /// Drop the in-memory state and clear the token store.
    pub fn logout(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.client.token_store().clear_all();
    }
}
