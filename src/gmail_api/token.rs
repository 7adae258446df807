use crate::error::ExchangeError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// How long before the real expiry a token is already treated as expired.
const EXPIRY_DELTA_SECS: i64 = 10;

/// OAuth2 token as persisted in the cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| now + Duration::seconds(EXPIRY_DELTA_SECS) >= expiry)
    }

    pub fn from_response(response: TokenResponse) -> Result<Self, ExchangeError> {
        if response.access_token.is_empty() {
            return Err(ExchangeError::InvalidResponse(
                "server response missing access_token".to_string(),
            ));
        }
        let expiry = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Ok(Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_else(default_token_type),
            refresh_token: response.refresh_token,
            expiry,
        })
    }
}

/// Successful body of a token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
}

/// Error body of a token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

impl From<TokenErrorResponse> for ExchangeError {
    fn from(response: TokenErrorResponse) -> Self {
        ExchangeError::Rejected {
            error: response.error,
            description: response.error_description,
        }
    }
}
