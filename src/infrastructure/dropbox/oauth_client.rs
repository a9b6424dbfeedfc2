use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{CredentialError, RefreshedToken, TokenRefresher};

const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

/// Mints short-lived Dropbox access tokens from the long-lived refresh
/// token, authenticating with the app key/secret pair.
pub struct DropboxOAuthClient {
    client: Client,
    app_key: String,
    app_secret: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl DropboxOAuthClient {
    pub fn new(app_key: String, app_secret: String, refresh_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client build never fails with valid TLS config"),
            app_key,
            app_secret,
            refresh_token,
        }
    }
}

#[async_trait]
impl TokenRefresher for DropboxOAuthClient {
    async fn refresh(&self) -> Result<RefreshedToken, CredentialError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.app_key, Some(&self.app_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CredentialError::RefreshFailed(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            // Revoked grants and bad app credentials land here; retrying
            // without operator intervention is pointless.
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::RefreshRejected(format!(
                "HTTP {}: {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::RefreshFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::RefreshFailed(format!("invalid response: {}", e)))?;

        tracing::debug!("Dropbox access token minted");
        Ok(RefreshedToken {
            access_token: token.access_token,
            expires_in_secs: token.expires_in,
        })
    }
}
