use std::sync::Arc;

use chrono::Utc;
use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    config::{self, SpotifyConfig},
    error::{Result, SpotifyError},
    management::storage::{
        SLOT_ACCESS_TOKEN, SLOT_AUTH_STATE, SLOT_REFRESH_TOKEN, SLOT_RETURN_TO,
        SLOT_TOKEN_EXPIRES_AT, TokenStore,
    },
    spotify,
    types::{AppCredential, TokenResponse, UserCredential},
    utils,
};

/// Owns the lifecycle of both credential kinds: the app-level
/// client-credentials token and the user-level authorization-code token.
///
/// An explicit injectable instance rather than module-level globals, so its
/// lifetime is scoped by the caller and tests get a fresh one each time.
/// "No usable user token" is reported as `Ok(None)`, never as an error;
/// callers distinguish "got a token" from "must redirect to authorize" by
/// the `None` return.
pub struct TokenManager {
    config: SpotifyConfig,
    store: Arc<dyn TokenStore>,
    app_credential: Mutex<Option<AppCredential>>,
    user_credential: Mutex<Option<UserCredential>>,
}

impl TokenManager {
    pub fn new(config: SpotifyConfig, store: Arc<dyn TokenStore>) -> Self {
        TokenManager {
            config,
            store,
            app_credential: Mutex::new(None),
            user_credential: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Returns a currently-valid app token, performing a client-credentials
    /// exchange when the cached one is missing or inside the expiry margin.
    pub async fn get_app_token(&self) -> Result<String> {
        // Lock held across the exchange so two callers don't both hit the
        // token endpoint.
        let mut cached = self.app_credential.lock().await;
        if let Some(credential) = cached.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.access_token.clone());
            }
        }

        let response = spotify::auth::request_app_token(&self.config).await?;
        let credential = AppCredential {
            access_token: response.access_token.clone(),
            expires_at: response.expires_at(Utc::now().timestamp_millis()),
        };
        *cached = Some(credential.clone());
        Ok(credential.access_token)
    }

    /// Returns a currently-valid user token, or `None` when interactive
    /// re-authentication is unavoidable.
    ///
    /// Checks the in-memory cache first, then the durable store (backfilling
    /// the cache). An expired token with a refresh token available triggers
    /// a silent refresh; a failed refresh clears all persisted credential
    /// state and yields `None`.
    pub async fn get_user_token(&self) -> Result<Option<String>> {
        let now = Utc::now().timestamp_millis();

        let cached = self.user_credential.lock().await.clone();
        if let Some(credential) = &cached {
            if !credential.is_expired_at(now) {
                return Ok(Some(credential.access_token.clone()));
            }
        }

        let access_token = self.store.get(SLOT_ACCESS_TOKEN).await?;
        let refresh_token = self.store.get(SLOT_REFRESH_TOKEN).await?;
        let expires_at: i64 = self
            .store
            .get(SLOT_TOKEN_EXPIRES_AT)
            .await?
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        if let Some(token) = &access_token {
            let credential = UserCredential {
                access_token: token.clone(),
                refresh_token: refresh_token.clone().unwrap_or_default(),
                expires_at,
            };
            if !credential.is_expired_at(now) {
                *self.user_credential.lock().await = Some(credential.clone());
                return Ok(Some(credential.access_token));
            }
        }

        // Missing or expired. Refresh if any path still holds a refresh token.
        let refresh = refresh_token
            .filter(|r| !r.is_empty())
            .or_else(|| cached.map(|c| c.refresh_token).filter(|r| !r.is_empty()));
        let Some(refresh) = refresh else {
            return Ok(None);
        };

        match spotify::auth::refresh_token(&self.config, &refresh).await {
            Ok(response) => {
                let credential = self.cache_response(&response, Some(refresh)).await?;
                Ok(Some(credential.access_token))
            }
            Err(SpotifyError::Auth(_)) => {
                // Refresh token revoked; everything persisted is stale.
                self.clear_credentials().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Constructs the provider authorization URL for interactive consent.
    ///
    /// Generates a fresh state nonce and persists it (overwriting any prior
    /// pending nonce) together with the page path to return to after the
    /// round-trip. `show_dialog=true` forces re-consent.
    pub async fn build_authorization_url(&self, return_to: &str) -> Result<String> {
        let state = utils::generate_state_nonce();
        self.store.set(SLOT_AUTH_STATE, &state).await?;
        self.store.set(SLOT_RETURN_TO, return_to).await?;

        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", config::PLAYLIST_SCOPES),
                ("state", state.as_str()),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| SpotifyError::Auth(format!("invalid authorization url: {}", e)))?;

        Ok(url.to_string())
    }

    /// Completes the authorization round-trip by validating the state nonce
    /// and exchanging the code for a user credential.
    ///
    /// The stored nonce is deleted after the single comparison regardless of
    /// outcome, so a replayed callback fails. A provider error indicating the
    /// code was already consumed (`invalid_grant`) clears any persisted
    /// credential state before the error is surfaced.
    pub async fn complete_authorization(&self, code: &str, state: &str) -> Result<UserCredential> {
        let stored_state = self.store.get(SLOT_AUTH_STATE).await?;
        self.store.remove(SLOT_AUTH_STATE).await?;
        if stored_state.as_deref() != Some(state) {
            return Err(SpotifyError::Auth("state mismatch".to_string()));
        }

        match spotify::auth::exchange_code(&self.config, code).await {
            Ok(response) => self.cache_response(&response, None).await,
            Err(SpotifyError::Auth(message)) => {
                if message.contains("invalid_grant") {
                    self.clear_credentials().await?;
                }
                Err(SpotifyError::Auth(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Removes the persisted credential slots and in-memory user cache.
    pub async fn clear_credentials(&self) -> Result<()> {
        self.store.remove(SLOT_ACCESS_TOKEN).await?;
        self.store.remove(SLOT_REFRESH_TOKEN).await?;
        self.store.remove(SLOT_TOKEN_EXPIRES_AT).await?;
        *self.user_credential.lock().await = None;
        Ok(())
    }

    /// Persists and caches a token-endpoint response. `previous_refresh` is
    /// kept when the provider did not rotate the refresh token.
    async fn cache_response(
        &self,
        response: &TokenResponse,
        previous_refresh: Option<String>,
    ) -> Result<UserCredential> {
        let refresh_token = response.refresh_token.clone().or(previous_refresh);
        let credential = UserCredential {
            access_token: response.access_token.clone(),
            refresh_token: refresh_token.clone().unwrap_or_default(),
            expires_at: response.expires_at(Utc::now().timestamp_millis()),
        };

        self.store
            .set(SLOT_ACCESS_TOKEN, &credential.access_token)
            .await?;
        if let Some(rotated) = &response.refresh_token {
            self.store.set(SLOT_REFRESH_TOKEN, rotated).await?;
        } else if refresh_token.is_none() {
            // Nothing usable from this exchange or the one before it; a slot
            // left over from an earlier authorization must not survive.
            self.store.remove(SLOT_REFRESH_TOKEN).await?;
        }
        self.store
            .set(SLOT_TOKEN_EXPIRES_AT, &credential.expires_at.to_string())
            .await?;

        *self.user_credential.lock().await = Some(credential.clone());
        Ok(credential)
    }
}
