use crate::error::{ApiError, ExchangeError, Result};
use crate::gmail_api::oauth::TokenExchange;
use crate::gmail_api::token::Token;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cache,
    Exchange,
}

/// HTTP client bound to an OAuth token. Expired access tokens are refreshed
/// in memory right before a request goes out.
pub struct AuthorizedClient {
    http_client: reqwest::Client,
    token: Mutex<Token>,
    exchange: Arc<dyn TokenExchange>,
    source: TokenSource,
}

impl AuthorizedClient {
    pub fn new(token: Token, exchange: Arc<dyn TokenExchange>, source: TokenSource) -> Self {
        Self::with_http_client(reqwest::Client::new(), token, exchange, source)
    }

    pub fn with_http_client(
        http_client: reqwest::Client,
        token: Token,
        exchange: Arc<dyn TokenExchange>,
        source: TokenSource,
    ) -> Self {
        Self {
            http_client,
            token: Mutex::new(token),
            exchange,
            source,
        }
    }

    pub fn token_source(&self) -> TokenSource {
        self.source
    }

    pub async fn current_token(&self) -> Token {
        self.token.lock().await.clone()
    }

    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired() {
            if token.refresh_token.is_none() {
                return Err(ExchangeError::NoRefreshToken.into());
            }
            info!("Access token expired, refreshing");
            *token = self.exchange.refresh(&token).await?;
        }
        Ok(token.access_token.clone())
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let access_token = self.access_token().await?;
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(ApiError::from)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::Status { status, body }.into())
        }
    }
}
