//! Client leg of the code-for-token exchange.

use crate::{ExchangeError, ExchangeResult};
use activity_config_and_utils::summarize_response_body;
use async_trait::async_trait;
use host_capability::{AccessToken, AuthorizationCode};
use serde::{Deserialize, Serialize};
use url::Url;

/// Path of the relay endpoint.
pub const TOKEN_PATH: &str = "/api/token";

/// Exchanges an authorization code for an access token.
#[async_trait]
pub trait TokenRelay: Send + Sync {
    /// Exchange `code`, consuming it.
    async fn exchange(&self, code: AuthorizationCode) -> ExchangeResult<AccessToken>;
}

#[derive(Serialize)]
struct TokenRequest {
    code: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// [`TokenRelay`] that posts JSON to `{base}/api/token`.
#[derive(Clone)]
pub struct HttpTokenRelay {
    http_client: reqwest::Client,
    token_url: Url,
}

impl HttpTokenRelay {
    /// Create a relay client for `base_url` (e.g., `http://127.0.0.1:3000`).
    pub fn new(base_url: &str) -> ExchangeResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: &str) -> ExchangeResult<Self> {
        let token_url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH))?;
        Ok(Self {
            http_client,
            token_url,
        })
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

#[async_trait]
impl TokenRelay for HttpTokenRelay {
    async fn exchange(&self, code: AuthorizationCode) -> ExchangeResult<AccessToken> {
        tracing::debug!(url = %self.token_url, "posting authorization code to relay");

        let response = self
            .http_client
            .post(self.token_url.clone())
            .json(&TokenRequest {
                code: code.into_inner(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::error!(http_status = status.as_u16(), body_summary = %body_summary, "Token relay rejected the code");
            return Err(ExchangeError::RelayStatus {
                status: status.as_u16(),
                body_summary,
            });
        }

        let body: TokenResponse = response.json().await?;
        match body.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => Err(ExchangeError::MissingToken),
        }
    }
}
