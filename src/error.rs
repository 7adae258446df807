//! Error types shared by the auth flow, the mail session and the presenter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not determine the current user's home directory")]
    HomeDirUnavailable,

    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no cached token at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("cached token at {} is not valid: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("failed to read input: {0}")]
    Prompt(#[source] io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),

    #[error("authorization failed: {0}")]
    AuthExchange(#[from] ExchangeError),

    #[error("mail API error: {0}")]
    Api(#[from] ApiError),
}

impl Error {
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// True for the errors that mean "no usable cached token": the file is
    /// missing or its contents could not be decoded.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Decode { .. })
    }
}

/// Failures talking to the OAuth token endpoint.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{error}: {description}")]
    Rejected { error: String, description: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("no authorization code entered")]
    EmptyCode,

    #[error("access token expired and no refresh token is available")]
    NoRefreshToken,

    #[error("invalid authorization URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failures from the mail API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid payload: {0}")]
    Payload(String),

    #[error("invalid API URL: {0}")]
    Url(String),
}
