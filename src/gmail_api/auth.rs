use crate::config::{AuthConfig, CacheLocation};
use crate::error::{Error, ExchangeError, Result};
use crate::gmail_api::client::{AuthorizedClient, TokenSource};
use crate::gmail_api::oauth::{OAuthClient, TokenExchange};
use crate::gmail_api::token::Token;
use crate::gmail_api::token_store::TokenStore;
use crate::prompt::Prompt;
use std::sync::Arc;
use tracing::{debug, info, warn};

// Fixed anti-forgery marker sent as the `state` parameter.
pub const AUTH_STATE: &str = "state-token";

// Main authentication function
pub async fn try_authenticate<P: Prompt + ?Sized>(
    config: &AuthConfig,
    location: &CacheLocation,
    prompt: &mut P,
) -> Result<AuthorizedClient> {
    let oauth_client = Arc::new(OAuthClient::new(config.clone()));
    let url_client = Arc::clone(&oauth_client);
    let consent_url = move || -> Result<String> {
        Ok(url_client.authorization_url(AUTH_STATE)?.to_string())
    };
    obtain_token(location, consent_url, prompt, oauth_client).await
}

/// Returns a client bound to the cached token, or runs the interactive
/// authorization-code exchange when there is no usable cached token.
///
/// The cached token is used as-is; an expired access token is refreshed by
/// the client on its first request. `consent_url` is only called on a cache
/// miss.
pub async fn obtain_token<P, F>(
    location: &CacheLocation,
    consent_url: F,
    prompt: &mut P,
    exchange: Arc<dyn TokenExchange>,
) -> Result<AuthorizedClient>
where
    P: Prompt + ?Sized,
    F: FnOnce() -> Result<String>,
{
    let store = TokenStore::resolve(location)?;

    let (token, source) = match store.load() {
        Ok(token) => {
            debug!("Using cached token from {}", store.path().display());
            (token, TokenSource::Cache)
        }
        Err(e) if e.is_cache_miss() => {
            if let Error::Decode { .. } = e {
                warn!("{}; requesting a new token", e);
            } else {
                info!("No cached token, starting authorization");
            }
            let consent_url = consent_url()?;
            let token =
                request_token_interactively(&consent_url, prompt, exchange.as_ref()).await?;
            store.save(&token)?;
            (token, TokenSource::Exchange)
        }
        Err(e) => return Err(e),
    };

    Ok(AuthorizedClient::new(token, exchange, source))
}

/// Shows the consent URL, reads the authorization code and exchanges it.
/// There is no retry: a bad code or a failed exchange is returned to the caller.
pub async fn request_token_interactively<P: Prompt + ?Sized>(
    consent_url: &str,
    prompt: &mut P,
    exchange: &dyn TokenExchange,
) -> Result<Token> {
    let message = format!(
        "Go to the following link in your browser then type the authorization code: \n{}",
        consent_url
    );
    let code = prompt.ask(&message).map_err(Error::Prompt)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(ExchangeError::EmptyCode.into());
    }

    let token = exchange.exchange_code(code).await?;
    info!("Authorization code exchanged for a new token");
    Ok(token)
}
