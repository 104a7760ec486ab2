//! Client identity loading from a Google `credentials.json` file.

use serde::Deserialize;
use std::path::Path;

use drivectl_common::{Error, Result};

/// OAuth2 client identity, loaded once per process.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URI the callback listener serves.
    pub redirect_uri: String,
}

/// Raw shape of a downloaded `credentials.json`: the identity sits under
/// either an `installed` or a `web` key depending on the client type.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    installed: Option<RawIdentity>,
    #[serde(default)]
    web: Option<RawIdentity>,
}

#[derive(Debug, Deserialize)]
struct RawIdentity {
    client_id: String,
    client_secret: String,
}

impl ClientIdentity {
    /// Load the client identity from a credentials file.
    ///
    /// # Errors
    /// - File missing or unreadable
    /// - JSON malformed, or neither `installed` nor `web` present
    pub fn load(path: &Path, redirect_uri: String) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Credentials(format!(
                "Failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let parsed: CredentialsFile = serde_json::from_str(&raw).map_err(|e| {
            Error::Credentials(format!(
                "Malformed credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let identity = parsed.installed.or(parsed.web).ok_or_else(|| {
            Error::Credentials(format!(
                "Credentials file {} has neither 'installed' nor 'web' client",
                path.display()
            ))
        })?;

        Ok(Self {
            client_id: identity.client_id,
            client_secret: identity.client_secret,
            redirect_uri,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REDIRECT: &str = "http://localhost:3000/oauth2callback";

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_installed_client() {
        let file = write_temp(
            r#"{"installed": {"client_id": "id123", "client_secret": "secret456"}}"#,
        );

        let identity = ClientIdentity::load(file.path(), REDIRECT.to_string()).unwrap();
        assert_eq!(identity.client_id, "id123");
        assert_eq!(identity.client_secret, "secret456");
        assert_eq!(identity.redirect_uri, REDIRECT);
    }

    #[test]
    fn test_load_web_client() {
        let file =
            write_temp(r#"{"web": {"client_id": "webid", "client_secret": "websecret"}}"#);

        let identity = ClientIdentity::load(file.path(), REDIRECT.to_string()).unwrap();
        assert_eq!(identity.client_id, "webid");
    }

    #[test]
    fn test_installed_takes_precedence_over_web() {
        let file = write_temp(
            r#"{
                "installed": {"client_id": "a", "client_secret": "s1"},
                "web": {"client_id": "b", "client_secret": "s2"}
            }"#,
        );

        let identity = ClientIdentity::load(file.path(), REDIRECT.to_string()).unwrap();
        assert_eq!(identity.client_id, "a");
    }

    #[test]
    fn test_missing_file() {
        let result = ClientIdentity::load(
            Path::new("/nonexistent/credentials.json"),
            REDIRECT.to_string(),
        );
        assert!(matches!(result, Err(Error::Credentials(_))));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp("not json at all");
        let result = ClientIdentity::load(file.path(), REDIRECT.to_string());
        assert!(matches!(result, Err(Error::Credentials(_))));
    }

    #[test]
    fn test_neither_installed_nor_web() {
        let file = write_temp(r#"{"other": {}}"#);
        let result = ClientIdentity::load(file.path(), REDIRECT.to_string());
        assert!(matches!(result, Err(Error::Credentials(_))));
    }
}
