//! On-disk cache for the OAuth token.
//!
//! The cache is a single JSON file under `<home>/.credentials`. Saving always
//! truncates, so the file only ever holds the most recent token.

use crate::config::CacheLocation;
use crate::error::{Error, Result};
use crate::gmail_api::token::Token;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Percent-encodes a file name the way a URL query value is encoded.
pub fn escape_file_name(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

/// Computes the cache file path and makes sure its directory exists.
pub fn resolve_cache_path(location: &CacheLocation) -> Result<PathBuf> {
    let dir = location.credentials_dir();
    create_private_dir(&dir)?;
    Ok(dir.join(escape_file_name(&location.file_name)))
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|e| Error::filesystem(dir, e))
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::filesystem(dir, e))
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn resolve(location: &CacheLocation) -> Result<Self> {
        resolve_cache_path(location).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Token> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::NotFound {
                    path: self.path.clone(),
                }
            } else {
                Error::filesystem(&self.path, e)
            }
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, token: &Token) -> Result<()> {
        println!("Saving credential file to: {}", self.path.display());

        let file = open_private(&self.path).map_err(|e| Error::filesystem(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, token)
            .map_err(io::Error::from)
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush())
            .map_err(|e| Error::filesystem(&self.path, e))?;

        debug!("Token cached at {}", self.path.display());
        Ok(())
    }

    /// Removes the cached token. Returns false when there was nothing to remove.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::filesystem(&self.path, e)),
        }
    }
}

#[cfg(unix)]
pub(crate) fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; tighten a pre-existing file too
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
pub(crate) fn open_private(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
