use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    config::SpotifyConfig,
    error::{Result, SpotifyError},
    spotify,
    types::TokenResponse,
};

/// Builds the `Basic` authorization value from the configured client
/// identifier/secret pair.
fn basic_credentials(config: &SpotifyConfig) -> String {
    let credentials = format!("{}:{}", config.client_id, config.client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Performs a client-credentials exchange against the provider's token
/// endpoint.
///
/// Yields an app-identity token with no user context, used for public
/// catalog search only. There is no refresh for this grant; callers simply
/// re-request on expiry.
///
/// # Errors
///
/// Returns [`SpotifyError::Auth`] with the provider's status and body for
/// any non-success response; network failures surface as
/// [`SpotifyError::Http`]. Neither is retried internally.
pub async fn request_app_token(config: &SpotifyConfig) -> Result<TokenResponse> {
    let res = spotify::http_client()
        .post(&config.token_url)
        .header("Authorization", basic_credentials(config))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::auth(status.as_u16(), body));
    }

    Ok(res.json::<TokenResponse>().await?)
}

/// Exchanges an authorization code for a user token pair.
///
/// Completes the authorization-code grant after the provider redirected back
/// to the callback with a `code`. The redirect URI must match the one used
/// in the authorization request.
///
/// # Errors
///
/// Returns [`SpotifyError::Auth`] carrying the provider's status and body.
/// A body containing `invalid_grant` means the code was already consumed or
/// has expired; the token manager inspects the message for that marker.
pub async fn exchange_code(config: &SpotifyConfig, code: &str) -> Result<TokenResponse> {
    let res = spotify::http_client()
        .post(&config.token_url)
        .header("Authorization", basic_credentials(config))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &config.redirect_uri),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::auth(status.as_u16(), body));
    }

    Ok(res.json::<TokenResponse>().await?)
}

/// Exchanges a refresh token for a fresh access token.
///
/// The provider may or may not issue a new refresh token; the response's
/// `refresh_token` field is `None` when the existing one stays valid.
///
/// # Errors
///
/// Returns [`SpotifyError::Auth`] for non-success responses. A failed
/// refresh usually means the user revoked access; the token manager reacts
/// by clearing all persisted credential state.
pub async fn refresh_token(config: &SpotifyConfig, refresh_token: &str) -> Result<TokenResponse> {
    let res = spotify::http_client()
        .post(&config.token_url)
        .header("Authorization", basic_credentials(config))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::auth(status.as_u16(), body));
    }

    Ok(res.json::<TokenResponse>().await?)
}
