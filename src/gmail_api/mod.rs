//! Gmail API module split into logical submodules
//!
//! - token / token_store: the OAuth token and its on-disk cache
//! - oauth: consent URL, code exchange and refresh against the token endpoint
//! - auth: cache-or-prompt authorization flow
//! - client: HTTP client that carries and refreshes the token
//! - messages: list/get messages and fetch attachments

pub mod auth;
pub mod client;
pub mod messages;
pub mod oauth;
pub mod token;
pub mod token_store;

pub use auth::{obtain_token, request_token_interactively, try_authenticate, AUTH_STATE};
pub use client::{AuthorizedClient, TokenSource};
pub use messages::{GmailSession, MailApi, GMAIL_API_BASE_URL};
pub use oauth::{OAuthClient, TokenExchange};
pub use token::Token;
pub use token_store::{resolve_cache_path, TokenStore};

// Re-export the mail API mock for app tests
#[cfg(test)]
pub use messages::MockMailApi;
