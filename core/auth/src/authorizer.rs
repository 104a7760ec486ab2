//! Authorizer: produce a usable session from cache or interactive grant.

use std::path::PathBuf;
use std::time::Duration;

use drivectl_common::Result;

use crate::credentials::ClientIdentity;
use crate::grant;
use crate::manager::{AuthManager, DRIVE_FILE_SCOPE, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL};
use crate::tokens::{TokenStore, Tokens};

/// Default path of the client identity file.
const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
/// Default path of the token cache.
const DEFAULT_TOKEN_PATH: &str = "token.json";
/// Default port for the local callback listener.
const DEFAULT_PORT: u16 = 3000;
/// Default bound on how long a grant may wait for the callback.
const DEFAULT_GRANT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the authorizer.
///
/// Everything the flow used to take from global constants lives here, so
/// tests and callers can point it at their own paths and ports.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path of the client identity file.
    pub credentials_path: PathBuf,
    /// Path of the token cache.
    pub token_path: PathBuf,
    /// Port for the local callback listener.
    pub port: u16,
    /// Scopes requested during the grant.
    pub scopes: Vec<String>,
    /// Bound on how long the grant waits for the callback.
    pub grant_timeout: Duration,
    /// OAuth2 authorization endpoint.
    pub auth_url: String,
    /// OAuth2 token endpoint.
    pub token_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            port: DEFAULT_PORT,
            scopes: vec![DRIVE_FILE_SCOPE.to_string()],
            grant_timeout: DEFAULT_GRANT_TIMEOUT,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }
}

impl AuthConfig {
    /// Redirect URI served by the callback listener.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/oauth2callback", self.port)
    }
}

/// A client identity bound to granted tokens, owned by one process run.
#[derive(Debug, Clone)]
pub struct AuthorizedSession {
    /// The loaded client identity.
    pub identity: ClientIdentity,
    /// The tokens authorizing API calls.
    pub tokens: Tokens,
}

/// Produces an authorized session, from cache when possible.
pub struct Authorizer {
    config: AuthConfig,
}

impl Authorizer {
    /// Create an authorizer with the given configuration.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Obtain an authorized session.
    ///
    /// A cached token set is bound and returned as-is without any network
    /// call or listener binding. No validity check happens here: an expired
    /// token surfaces later as a rejected remote call. Without a cache, the
    /// interactive grant runs and its tokens are persisted before returning.
    ///
    /// # Errors
    /// - Identity file missing or malformed
    /// - Grant flow or code exchange failure
    pub async fn authorize(&self) -> Result<AuthorizedSession> {
        let identity =
            ClientIdentity::load(&self.config.credentials_path, self.config.redirect_uri())?;

        let store = TokenStore::new(&self.config.token_path);

        if let Some(tokens) = store.load()? {
            if tokens.is_expired() {
                tracing::debug!(
                    "Cached token is past its expiry; remote calls may be rejected"
                );
            }
            tracing::debug!(path = %store.path().display(), "Using cached token");
            return Ok(AuthorizedSession { identity, tokens });
        }

        let manager = AuthManager::with_endpoints(
            &identity,
            &self.config.scopes,
            &self.config.auth_url,
            &self.config.token_url,
        )?;
        let tokens = grant::run(&manager, self.config.port, self.config.grant_timeout).await?;

        // Persist only after a successful exchange; a failed grant leaves
        // no token file behind.
        store.save(&tokens)?;
        tracing::info!(path = %store.path().display(), "Token cached");

        Ok(AuthorizedSession { identity, tokens })
    }
}
