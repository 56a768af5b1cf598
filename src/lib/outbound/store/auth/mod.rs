pub mod token;

use crate::config::Config;
use crate::outbound::store::auth::token::AuthToken;
use anyhow::Context;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::error;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest {
    client_id: String,
    client_secret: String,
    grant_type: String,
    scope: String,
}

/// Exchanges the configured client credentials for a bearer token and caches
/// it until it nears expiry.
pub struct AuthClient {
    config: Config,
    http_client: ReqwestClient,
    current_token: Mutex<Option<AuthToken>>,
}

impl AuthClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http_client: ReqwestClient::new(),
            current_token: Mutex::new(None),
        }
    }

    pub async fn get_valid_token(&self) -> anyhow::Result<String> {
        let mut token_guard = self.current_token.lock().await;

        if let Some(token) = token_guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.header_value());
        }

        let new_token = self.fetch_new_token().await?;
        let header_value = new_token.header_value();
        *token_guard = Some(new_token);

        Ok(header_value)
    }

    async fn fetch_new_token(&self) -> anyhow::Result<AuthToken> {
        let token_request = TokenRequest {
            client_id: self.config.client_id.clone(),
            client_secret: self.config.client_secret.clone(),
            grant_type: "client_credentials".to_string(),
            scope: DATASTORE_SCOPE.to_string(),
        };

        let response = self
            .http_client
            .post(self.config.token_url.as_str())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form(&token_request)
            .send()
            .await
            .with_context(|| {
                format!(
                    "failed to send token request to: {}",
                    self.config.token_url
                )
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            error!("Token request rejected: invalid credentials (status: {})", status);
            anyhow::bail!("Token request rejected: invalid credentials");
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("failed to read token response body (status: {})", status))?;

        if let Ok(error_response) = serde_json::from_str::<TokenErrorResponse>(&response_text) {
            error!(
                "Token endpoint error: {}: {}",
                error_response.error, error_response.error_description
            );
            anyhow::bail!(
                "Token endpoint error: {}: {}",
                error_response.error,
                error_response.error_description
            );
        }

        let token_response: TokenResponse =
            serde_json::from_str(&response_text).with_context(|| {
                format!(
                    "failed to parse token response (status: {}): {}",
                    status, response_text
                )
            })?;

        Ok(AuthToken::new(
            token_response.access_token,
            token_response.token_type,
            token_response.expires_in,
        ))
    }
}
