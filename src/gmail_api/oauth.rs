use crate::config::AuthConfig;
use crate::error::ExchangeError;
use crate::gmail_api::token::{Token, TokenErrorResponse, TokenResponse};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

// Define a trait for token endpoint operations to allow mocking
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<Token, ExchangeError>;
    async fn refresh(&self, token: &Token) -> Result<Token, ExchangeError>;
}

/// Talks to the provider's OAuth2 endpoints using the identity from
/// `client_secret.json`.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: AuthConfig,
    http_client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: AuthConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Builds the consent URL. Requests offline access so the exchange also
    /// returns a refresh token.
    pub fn authorization_url(&self, state: &str) -> Result<Url, ExchangeError> {
        let mut url = Url::parse(&self.config.secret.auth_uri)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("access_type", "offline")
                .append_pair("client_id", &self.config.secret.client_id);
            if let Some(redirect_uri) = self.config.redirect_uri() {
                pairs.append_pair("redirect_uri", redirect_uri);
            }
            pairs.append_pair("response_type", "code");
            if !self.config.scopes.is_empty() {
                pairs.append_pair("scope", &self.config.scopes.join(" "));
            }
            pairs.append_pair("state", state);
        }
        Ok(url)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<Token, ExchangeError> {
        let response = self
            .http_client
            .post(&self.config.secret.token_uri)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(error) => error.into(),
                Err(_) => ExchangeError::Rejected {
                    error: status.to_string(),
                    description: body,
                },
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;
        Token::from_response(token_response)
    }
}

#[async_trait]
impl TokenExchange for OAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<Token, ExchangeError> {
        let secret = &self.config.secret;
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
        ];
        if let Some(redirect_uri) = self.config.redirect_uri() {
            params.push(("redirect_uri", redirect_uri));
        }

        debug!("Exchanging authorization code at {}", secret.token_uri);
        self.request_token(&params).await
    }

    async fn refresh(&self, token: &Token) -> Result<Token, ExchangeError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(ExchangeError::NoRefreshToken)?;
        let secret = &self.config.secret;
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
        ];

        debug!("Refreshing access token at {}", secret.token_uri);
        let mut refreshed = self.request_token(&params).await?;
        // Google only returns a refresh token on the first exchange
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_string());
        }
        Ok(refreshed)
    }
}
