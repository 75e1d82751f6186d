//! Authentication Debug Utility
//!
//! Obtains, checks, refreshes and clears the bearer token the prompt service
//! expects. Credentials can optionally be remembered so the token can be
//! refreshed by logging in again.

use std::rc::Rc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::send;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::storage::{stored_token, KeyValueStorage, EMAIL_KEY, PASSWORD_KEY, TOKEN_KEY};
use crate::store::StateHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenStatus {
    Valid,
    Invalid,
    Checking,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthDebugState {
    pub token: Option<String>,
    pub status: TokenStatus,
    pub has_stored_credentials: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshResult {
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait(?Send)]
pub trait CredentialProvider {
    fn get_token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear_token(&self);

    /// A 401 comes back as a response with `status: Some(401)`, not as an error
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Whether the service accepts the token
    async fn verify_token(&self, token: &str) -> bool;

    /// Log in again with remembered credentials and store the new token
    async fn refresh_token(&self) -> RefreshResult;

    fn store_credentials_for_refresh(&self, email: &str, password: &str);
    fn clear_stored_credentials(&self);
    fn has_stored_credentials(&self) -> bool;
}

pub struct HttpCredentialProvider {
    client: Client,
    config: ApiConfig,
    storage: Rc<dyn KeyValueStorage>,
}

impl HttpCredentialProvider {
    pub fn new(config: ApiConfig, storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { client: Client::new(), config, storage }
    }

    fn stored_credentials(&self) -> Option<(String, String)> {
        let email = self.storage.get(EMAIL_KEY).filter(|e| !e.is_empty())?;
        let password = self.storage.get(PASSWORD_KEY).filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

#[async_trait(?Send)]
impl CredentialProvider for HttpCredentialProvider {
    fn get_token(&self) -> Option<String> {
        stored_token(self.storage.as_ref())
    }

    fn set_token(&self, token: &str) {
        self.storage.set(TOKEN_KEY, token);
    }

    fn clear_token(&self) {
        self.storage.remove(TOKEN_KEY);
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.config.login_url();
        debug!(%url, email, "logging in");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            let message = match ApiError::from_response(401, &body) {
                ApiError::Http { message, .. } if !message.starts_with("HTTP error!") => Some(message),
                _ => None,
            };
            return Ok(LoginResponse { access_token: None, status: Some(401), message });
        }

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn verify_token(&self, token: &str) -> bool {
        let url = self.config.token_check_url();
        match send(self.client.get(&url).bearer_auth(token)).await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "token rejected");
                false
            }
        }
    }

    async fn refresh_token(&self) -> RefreshResult {
        let Some((email, password)) = self.stored_credentials() else {
            return RefreshResult {
                success: false,
                token: None,
                message: Some("No stored credentials available for refresh".to_string()),
            };
        };

        match self.login(&email, &password).await {
            Ok(LoginResponse { access_token: Some(token), .. }) if !token.is_empty() => {
                self.set_token(&token);
                RefreshResult { success: true, token: Some(token), message: None }
            }
            Ok(response) => RefreshResult {
                success: false,
                token: None,
                message: response.message.or_else(|| Some("Failed to refresh token".to_string())),
            },
            Err(err) => RefreshResult { success: false, token: None, message: Some(err.to_string()) },
        }
    }

    fn store_credentials_for_refresh(&self, email: &str, password: &str) {
        self.storage.set(EMAIL_KEY, email);
        self.storage.set(PASSWORD_KEY, password);
    }

    fn clear_stored_credentials(&self) {
        self.storage.remove(EMAIL_KEY);
        self.storage.remove(PASSWORD_KEY);
    }

    fn has_stored_credentials(&self) -> bool {
        self.stored_credentials().is_some()
    }
}

/// State machine behind the auth-debug page
pub struct AuthDebugger<H, P> {
    state: H,
    provider: Rc<P>,
}

impl<H: Clone, P> Clone for AuthDebugger<H, P> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone(), provider: Rc::clone(&self.provider) }
    }
}

impl<H, P> AuthDebugger<H, P>
where
    H: StateHandle<AuthDebugState>,
    P: CredentialProvider + 'static,
{
    pub fn new(state: H, provider: Rc<P>) -> Self {
        Self { state, provider }
    }

    pub fn state(&self) -> &H {
        &self.state
    }

    /// Load the stored token and check it if there is one
    pub async fn init(&self) {
        let token = self.provider.get_token();
        let has_credentials = self.provider.has_stored_credentials();
        self.state.update(|s| {
            s.token = token.clone();
            s.has_stored_credentials = has_credentials;
        });
        if let Some(token) = token {
            self.check_token(&token).await;
        }
    }

    pub async fn check_token(&self, token: &str) {
        self.state.update(|s| s.status = TokenStatus::Checking);
        let valid = self.provider.verify_token(token).await;
        debug!(valid, "token checked");
        self.state.update(|s| {
            s.status = if valid { TokenStatus::Valid } else { TokenStatus::Invalid };
        });
    }

    pub async fn login(&self, email: &str, password: &str, remember: bool) {
        self.begin();

        let token = match self.provider.login(email, password).await {
            Ok(response) if response.status == Some(401) => {
                Err(response.message.unwrap_or_else(|| "Invalid credentials".to_string()))
            }
            Ok(LoginResponse { access_token: Some(token), .. }) if !token.is_empty() => Ok(token),
            Ok(_) => Err("No access token received".to_string()),
            Err(err) => Err(err.to_string()),
        };

        match token {
            Ok(token) => {
                self.provider.set_token(&token);
                self.state.update(|s| s.token = Some(token.clone()));
                self.check_token(&token).await;

                let message = if remember {
                    self.provider.store_credentials_for_refresh(email, password);
                    "Login successful. Credentials stored for auto-refresh."
                } else {
                    "Login successful"
                };
                info!(remember, "logged in");
                self.state.update(|s| {
                    if remember {
                        s.has_stored_credentials = true;
                    }
                    s.success_message = Some(message.to_string());
                    s.error = None;
                    s.loading = false;
                });
            }
            Err(message) => {
                warn!(%message, "login failed");
                self.state.update(|s| {
                    s.error = Some(message);
                    s.status = TokenStatus::Invalid;
                    s.loading = false;
                });
            }
        }
    }

    pub fn clear_token(&self) {
        self.provider.clear_token();
        self.state.update(|s| {
            s.token = None;
            s.status = TokenStatus::Unknown;
            s.success_message = Some("Token cleared successfully".to_string());
        });
    }

    pub async fn refresh_token(&self) {
        self.begin();

        let result = self.provider.refresh_token().await;
        match result.token.filter(|_| result.success) {
            Some(token) => {
                self.state.update(|s| s.token = Some(token.clone()));
                self.check_token(&token).await;
                info!("token refreshed");
                self.state.update(|s| {
                    s.success_message = Some("Token refreshed successfully".to_string());
                    s.loading = false;
                });
            }
            None => {
                let message = result.message.unwrap_or_else(|| "Failed to refresh token".to_string());
                warn!(%message, "token refresh failed");
                self.state.update(|s| {
                    s.error = Some(message);
                    s.loading = false;
                });
            }
        }
    }

    pub fn clear_credentials(&self) {
        self.provider.clear_stored_credentials();
        self.state.update(|s| {
            s.has_stored_credentials = false;
            s.success_message = Some("Stored credentials have been cleared".to_string());
        });
    }

    fn begin(&self) {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
            s.success_message = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;

    /// Provider backed by memory; accepts one email/password pair and one token
    struct FakeProvider {
        storage: MemoryStorage,
        valid_token: String,
        login_response: RefCell<Option<LoginResponse>>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self { storage: MemoryStorage::new(), valid_token: "good".into(), login_response: RefCell::new(None) }
        }

        fn respond_with(self, response: LoginResponse) -> Self {
            *self.login_response.borrow_mut() = Some(response);
            self
        }
    }

    #[async_trait(?Send)]
    impl CredentialProvider for FakeProvider {
        fn get_token(&self) -> Option<String> {
            stored_token(&self.storage)
        }

        fn set_token(&self, token: &str) {
            self.storage.set(TOKEN_KEY, token);
        }

        fn clear_token(&self) {
            self.storage.remove(TOKEN_KEY);
        }

        async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
            if let Some(response) = self.login_response.borrow().clone() {
                return Ok(response);
            }
            if email == "me@test.com" && password == "123456" {
                Ok(LoginResponse { access_token: Some(self.valid_token.clone()), ..Default::default() })
            } else {
                Ok(LoginResponse { status: Some(401), ..Default::default() })
            }
        }

        async fn verify_token(&self, token: &str) -> bool {
            token == self.valid_token
        }

        async fn refresh_token(&self) -> RefreshResult {
            match (self.storage.get(EMAIL_KEY), self.storage.get(PASSWORD_KEY)) {
                (Some(email), Some(password)) => match self.login(&email, &password).await {
                    Ok(LoginResponse { access_token: Some(token), .. }) => {
                        self.set_token(&token);
                        RefreshResult { success: true, token: Some(token), message: None }
                    }
                    _ => RefreshResult { success: false, token: None, message: None },
                },
                _ => RefreshResult {
                    success: false,
                    token: None,
                    message: Some("No stored credentials available for refresh".into()),
                },
            }
        }

        fn store_credentials_for_refresh(&self, email: &str, password: &str) {
            self.storage.set(EMAIL_KEY, email);
            self.storage.set(PASSWORD_KEY, password);
        }

        fn clear_stored_credentials(&self) {
            self.storage.remove(EMAIL_KEY);
            self.storage.remove(PASSWORD_KEY);
        }

        fn has_stored_credentials(&self) -> bool {
            self.storage.get(EMAIL_KEY).is_some() && self.storage.get(PASSWORD_KEY).is_some()
        }
    }

    type Shared = Rc<RefCell<AuthDebugState>>;

    fn debugger(provider: FakeProvider) -> (AuthDebugger<Shared, FakeProvider>, Rc<FakeProvider>, Shared) {
        let state: Shared = Rc::new(RefCell::new(AuthDebugState::default()));
        let provider = Rc::new(provider);
        (AuthDebugger::new(state.clone(), Rc::clone(&provider)), provider, state)
    }

    #[tokio::test]
    async fn test_init_without_token() {
        let (debugger, _, state) = debugger(FakeProvider::new());
        debugger.init().await;
        let state = state.borrow();
        assert_eq!(state.token, None);
        assert_eq!(state.status, TokenStatus::Unknown);
        assert!(!state.has_stored_credentials);
    }

    #[tokio::test]
    async fn test_init_checks_stored_token() {
        let provider = FakeProvider::new();
        provider.set_token("stale");
        let (debugger, _, state) = debugger(provider);
        debugger.init().await;
        assert_eq!(state.borrow().token.as_deref(), Some("stale"));
        assert_eq!(state.borrow().status, TokenStatus::Invalid);
    }

    #[tokio::test]
    async fn test_login_success_remembering_credentials() {
        let (debugger, provider, state) = debugger(FakeProvider::new());
        debugger.login("me@test.com", "123456", true).await;

        let state = state.borrow();
        assert_eq!(state.token.as_deref(), Some("good"));
        assert_eq!(state.status, TokenStatus::Valid);
        assert!(state.has_stored_credentials);
        assert!(!state.loading);
        assert_eq!(
            state.success_message.as_deref(),
            Some("Login successful. Credentials stored for auto-refresh.")
        );
        assert_eq!(provider.get_token().as_deref(), Some("good"));
        assert!(provider.has_stored_credentials());
    }

    #[tokio::test]
    async fn test_login_without_remembering() {
        let (debugger, provider, state) = debugger(FakeProvider::new());
        debugger.login("me@test.com", "123456", false).await;
        assert_eq!(state.borrow().success_message.as_deref(), Some("Login successful"));
        assert!(!provider.has_stored_credentials());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let (debugger, provider, state) = debugger(FakeProvider::new());
        debugger.login("me@test.com", "wrong", false).await;

        let state = state.borrow();
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(state.status, TokenStatus::Invalid);
        assert!(state.success_message.is_none());
        assert!(provider.get_token().is_none());
    }

    #[tokio::test]
    async fn test_login_without_token_in_response() {
        let (debugger, _, state) = debugger(FakeProvider::new().respond_with(LoginResponse::default()));
        debugger.login("me@test.com", "123456", false).await;
        assert_eq!(state.borrow().error.as_deref(), Some("No access token received"));
    }

    #[tokio::test]
    async fn test_clear_token() {
        let (debugger, provider, state) = debugger(FakeProvider::new());
        debugger.login("me@test.com", "123456", false).await;
        debugger.clear_token();

        let state = state.borrow();
        assert!(state.token.is_none());
        assert_eq!(state.status, TokenStatus::Unknown);
        assert_eq!(state.success_message.as_deref(), Some("Token cleared successfully"));
        assert!(provider.get_token().is_none());
    }

    #[tokio::test]
    async fn test_refresh_with_and_without_credentials() {
        let (debugger, provider, state) = debugger(FakeProvider::new());
        debugger.refresh_token().await;
        assert_eq!(
            state.borrow().error.as_deref(),
            Some("No stored credentials available for refresh")
        );

        provider.store_credentials_for_refresh("me@test.com", "123456");
        debugger.refresh_token().await;
        let snapshot = state.borrow().clone();
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.token.as_deref(), Some("good"));
        assert_eq!(snapshot.status, TokenStatus::Valid);
        assert_eq!(snapshot.success_message.as_deref(), Some("Token refreshed successfully"));
    }

    #[tokio::test]
    async fn test_clear_credentials() {
        let (debugger, provider, state) = debugger(FakeProvider::new());
        debugger.login("me@test.com", "123456", true).await;
        debugger.clear_credentials();
        assert!(!state.borrow().has_stored_credentials);
        assert!(!provider.has_stored_credentials());
        assert_eq!(
            state.borrow().success_message.as_deref(),
            Some("Stored credentials have been cleared")
        );
    }

    #[test]
    fn test_http_provider_stored_credentials() {
        let storage = Rc::new(MemoryStorage::new());
        let provider = HttpCredentialProvider::new(ApiConfig::default(), storage.clone());
        assert!(!provider.has_stored_credentials());
        provider.store_credentials_for_refresh("me@test.com", "123456");
        assert!(provider.has_stored_credentials());
        assert_eq!(storage.get(EMAIL_KEY).as_deref(), Some("me@test.com"));
        provider.clear_stored_credentials();
        assert!(!provider.has_stored_credentials());

        provider.set_token("abc");
        assert_eq!(provider.get_token().as_deref(), Some("abc"));
        provider.clear_token();
        assert!(provider.get_token().is_none());
    }

    #[tokio::test]
    async fn test_http_refresh_without_credentials_skips_network() {
        let provider = HttpCredentialProvider::new(
            ApiConfig::default().with_base_url("http://127.0.0.1:9"),
            Rc::new(MemoryStorage::new()),
        );
        let result = provider.refresh_token().await;
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("No stored credentials available for refresh"));
    }
}
