use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use yup_oauth2::ApplicationSecret;

pub const DEFAULT_CLIENT_SECRET_PATH: &str = "client_secret.json";
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";
pub const CREDENTIALS_DIR: &str = ".credentials";
pub const TOKEN_CACHE_FILE_NAME: &str = "gmail-rs-quickstart.json";

// Client identity plus the scopes we ask for.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: ApplicationSecret,
    pub scopes: Vec<String>,
}

impl AuthConfig {
    pub fn new(secret: ApplicationSecret, scopes: Vec<String>) -> Self {
        Self { secret, scopes }
    }

    /// Reads `client_secret.json` (either the `installed` or the `web` layout).
    ///
    /// If the scopes change, the cached token must be deleted (`--clear-token`)
    /// so that a new consent is requested.
    pub async fn from_file(path: impl AsRef<Path>, scopes: Vec<String>) -> Result<Self> {
        let path = path.as_ref();
        let secret = yup_oauth2::read_application_secret(path)
            .await
            .map_err(|e| {
                Error::Config(format!(
                    "unable to read client secret file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Self::validate(&secret)?;
        Ok(Self::new(secret, scopes))
    }

    pub fn from_json(json: &str, scopes: Vec<String>) -> Result<Self> {
        let secret = yup_oauth2::parse_application_secret(json)
            .map_err(|e| Error::Config(format!("unable to parse client secret: {}", e)))?;
        Self::validate(&secret)?;
        Ok(Self::new(secret, scopes))
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.secret.redirect_uris.first().map(String::as_str)
    }

    fn validate(secret: &ApplicationSecret) -> Result<()> {
        if secret.client_id.is_empty() {
            return Err(Error::Config("client_id is empty".to_string()));
        }
        if secret.token_uri.is_empty() || secret.auth_uri.is_empty() {
            return Err(Error::Config(
                "auth_uri and token_uri are required".to_string(),
            ));
        }
        Ok(())
    }
}

// Where the token cache lives. Passed around explicitly so tests can point it
// at a sandbox instead of the real home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    pub home: PathBuf,
    pub file_name: String,
}

impl CacheLocation {
    pub fn in_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            file_name: TOKEN_CACHE_FILE_NAME.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        dirs::home_dir()
            .map(Self::in_home)
            .ok_or(Error::HomeDirUnavailable)
    }

    pub fn credentials_dir(&self) -> PathBuf {
        self.home.join(CREDENTIALS_DIR)
    }
}
