use crate::config::{CacheLocation, DEFAULT_CLIENT_SECRET_PATH};
use crate::error::Result;
use crate::gmail_api::TokenStore;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// OAuth client identity downloaded from the Google Cloud console.
    #[clap(long, default_value = DEFAULT_CLIENT_SECRET_PATH)]
    pub client_secret: PathBuf,

    /// Directory attachments are written to.
    #[clap(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Mailbox to read; "me" is the authorized user.
    #[clap(long, default_value = "me")]
    pub user: String,

    /// Delete the cached OAuth token and exit.
    #[clap(long)]
    pub clear_token: bool,
}

pub fn handle_token_clear(location: &CacheLocation) -> Result<()> {
    let store = TokenStore::resolve(location)?;
    if store.clear()? {
        println!("Removed cached token {}. Exiting.", store.path().display());
    } else {
        println!("No cached token at {}.", store.path().display());
    }
    Ok(())
}
