//! Identity provider token endpoint client.

use crate::{RelayError, RelayResult};
use activity_config_and_utils::summarize_response_body;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Environment variable holding the public client id.
pub const CLIENT_ID_ENV: &str = "ACTIVITY_CLIENT_ID";

/// Environment variable holding the client secret.
pub const CLIENT_SECRET_ENV: &str = "ACTIVITY_CLIENT_SECRET";

/// Grant type forwarded with every code.
pub const GRANT_TYPE: &str = "authorization_code";

/// Client credentials known only to the relay.
#[derive(Clone)]
pub struct RelaySecrets {
    pub client_id: String,
    client_secret: String,
}

impl RelaySecrets {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read the secret from the process environment.
    ///
    /// `client_id` comes from configuration; the secret is never part of it.
    pub fn from_env(client_id: &str) -> RelayResult<Self> {
        Self::from_lookup(client_id, |name| std::env::var(name).ok())
    }

    /// Read the secret with `lookup`. Blank values count as missing.
    pub fn from_lookup(
        client_id: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> RelayResult<Self> {
        if client_id.trim().is_empty() {
            return Err(RelayError::MissingSecret(CLIENT_ID_ENV));
        }
        let client_secret = lookup(CLIENT_SECRET_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(RelayError::MissingSecret(CLIENT_SECRET_ENV))?;
        Ok(Self::new(client_id.trim(), client_secret))
    }
}

impl fmt::Debug for RelaySecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Serialize)]
struct TokenForm<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
    code: &'a str,
}

#[derive(Deserialize)]
struct ProviderTokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Forwards authorization codes to the provider token endpoint.
#[derive(Clone)]
pub struct ProviderClient {
    http_client: reqwest::Client,
    token_endpoint: Url,
    secrets: RelaySecrets,
}

impl ProviderClient {
    pub fn new(token_endpoint: Url, secrets: RelaySecrets) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            token_endpoint,
            secrets,
        }
    }

    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    /// Exchange `code` for an access token. Only the token is kept from the
    /// provider's answer.
    pub async fn exchange_code(&self, code: &str) -> RelayResult<String> {
        tracing::debug!(endpoint = %self.token_endpoint, "forwarding code to identity provider");

        let response = self
            .http_client
            .post(self.token_endpoint.clone())
            .form(&TokenForm {
                client_id: &self.secrets.client_id,
                client_secret: &self.secrets.client_secret,
                grant_type: GRANT_TYPE,
                code,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::warn!(http_status = status.as_u16(), body_summary = %body_summary, "Identity provider rejected the code");
            return Err(RelayError::Provider {
                status: status.as_u16(),
                body_summary,
            });
        }

        let body: ProviderTokenResponse = response.json().await?;
        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or(RelayError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_secret_from_lookup() {
        let secrets = RelaySecrets::from_lookup("123", |name| {
            (name == CLIENT_SECRET_ENV).then(|| " s3cret ".to_string())
        })
        .unwrap();
        assert_eq!(secrets.client_id, "123");
        assert_eq!(secrets.client_secret, "s3cret");
    }

    #[test]
    fn test_missing_secret() {
        let err = RelaySecrets::from_lookup("123", |_| None).unwrap_err();
        assert!(matches!(err, RelayError::MissingSecret(CLIENT_SECRET_ENV)));

        let blank = RelaySecrets::from_lookup("123", |_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(blank, RelayError::MissingSecret(_)));
    }

    #[test]
    fn test_missing_client_id() {
        let err = RelaySecrets::from_lookup("", |_| Some("s".to_string())).unwrap_err();
        assert!(matches!(err, RelayError::MissingSecret(CLIENT_ID_ENV)));
    }

    #[test]
    fn test_secrets_debug_is_redacted() {
        let rendered = format!("{:?}", RelaySecrets::new("123", "s3cret"));
        assert!(rendered.contains("123"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_form_encoding() {
        let form = TokenForm {
            client_id: "123",
            client_secret: "s",
            grant_type: GRANT_TYPE,
            code: "a b",
        };
        let value = serde_json::to_value(&form).unwrap();
        let fields: HashMap<String, String> = serde_json::from_value(value).unwrap();
        assert_eq!(fields["grant_type"], "authorization_code");
        assert_eq!(fields["code"], "a b");
    }
}
