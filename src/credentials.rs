//! Local cache for the access token.
//!
//! One entry, one key: the token is stored in plain text as
//! `{"github_token": "..."}` in the platform config directory
//! (`~/.config/gh-pdf-share/credentials.json` on Linux). There is no expiry;
//! a new token overwrites the old one.

use crate::error::ShareError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "github_token";

const CREDENTIALS_FILE: &str = "credentials.json";

/// Somewhere a single token can be kept between runs.
pub trait CredentialStore {
    /// The cached token, if any.
    fn load(&self) -> Result<Option<String>, ShareError>;

    /// Cache `token`. Empty or whitespace-only tokens are ignored.
    fn save(&self, token: &str) -> Result<(), ShareError>;

    /// Remove the cached token.
    fn clear(&self) -> Result<(), ShareError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github_token: Option<String>,
}

/// JSON file backed [`CredentialStore`].
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at an explicit location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory.
    pub fn default_location() -> Result<Self, ShareError> {
        let dirs = ProjectDirs::from("", "", "gh-pdf-share").ok_or_else(|| {
            ShareError::Internal("Could not determine a home directory for the token cache".into())
        })?;
        Ok(Self::new(dirs.config_dir().join(CREDENTIALS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn err(&self, detail: impl std::fmt::Display) -> ShareError {
        ShareError::CredentialStore {
            path: self.path.clone(),
            detail: detail.to_string(),
        }
    }

    /// Atomic write: temp file in the same directory, then rename.
    fn write(&self, file: &CredentialFile) -> Result<(), ShareError> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| self.err("path has no parent directory"))?;
        std::fs::create_dir_all(dir).map_err(|e| self.err(e))?;

        let json = serde_json::to_vec_pretty(file).map_err(|e| self.err(e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.err(e))?;
        restrict_permissions(tmp.as_file()).map_err(|e| self.err(e))?;
        tmp.write_all(&json).map_err(|e| self.err(e))?;
        tmp.persist(&self.path).map_err(|e| self.err(e.error))?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, ShareError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.err(e)),
        };
        let file: CredentialFile = serde_json::from_slice(&raw).map_err(|e| self.err(e))?;
        Ok(file.github_token.filter(|t| !t.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), ShareError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }
        self.write(&CredentialFile {
            github_token: Some(token.to_string()),
        })?;
        debug!("Cached token at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), ShareError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.err(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileCredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join(CREDENTIALS_FILE));
        (dir, store)
    }

    #[test]
    fn load_missing_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let (_dir, store) = store();
        store.save("  ghp_abc  ").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("ghp_abc"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(TOKEN_KEY), "got {raw}");
    }

    #[test]
    fn save_overwrites() {
        let (_dir, store) = store();
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn empty_token_is_not_saved() {
        let (_dir, store) = store();
        store.save("kept").unwrap();
        store.save("   ").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn clear_removes_token() {
        let (_dir, store) = store();
        store.save("gone").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"not json").unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            ShareError::CredentialStore { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = store();
        store.save("secret").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
