//! Granted tokens and their on-disk cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use drivectl_common::{Error, Result};

/// Tokens from a completed authorization-code grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokens {
    /// Access token for API requests.
    pub access_token: String,
    /// Refresh token, present when offline access was granted.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
    /// Scopes the grant covers.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Tokens {
    /// Check if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        // Consider expired if less than 5 minutes remaining
        self.expires_at < Utc::now() + Duration::minutes(5)
    }
}

/// On-disk token cache at a fixed path.
///
/// The cache holds at most one token set; a new grant fully replaces the
/// file, never merges into it.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load cached tokens, returning `None` when no cache file exists.
    ///
    /// # Errors
    /// - File exists but cannot be read or parsed
    pub fn load(&self) -> Result<Option<Tokens>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Credentials(format!(
                "Failed to read token cache {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let tokens = serde_json::from_str(&raw).map_err(|e| {
            Error::Credentials(format!(
                "Malformed token cache {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(tokens))
    }

    /// Persist tokens, overwriting any previous cache.
    pub fn save(&self, tokens: &Tokens) -> Result<()> {
        let json = serde_json::to_string_pretty(tokens)
            .map_err(|e| Error::Serialization(format!("Failed to serialize tokens: {}", e)))?;

        std::fs::write(&self.path, json).map_err(|e| {
            Error::Credentials(format!(
                "Failed to write token cache {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}
