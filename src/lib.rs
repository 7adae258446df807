//! Command-line quickstart for the Gmail API: authorize with OAuth2 (caching
//! the token under `~/.credentials`), list messages, print one and save its
//! attachments.

pub mod app;
pub mod cli;
pub mod config;
pub mod email_content;
pub mod error;
pub mod gmail_api;
pub mod presenter;
pub mod prompt;
pub mod types;

pub use error::{ApiError, Error, ExchangeError, Result};
