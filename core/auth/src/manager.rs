//! OAuth2 client wrapper for the Google endpoints.

use chrono::{Duration, Utc};
use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenResponse,
    TokenUrl,
};

use drivectl_common::{Error, Result};

use crate::credentials::ClientIdentity;
use crate::tokens::Tokens;

/// OAuth2 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope for files created or opened by this app.
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
/// Read-only scope for listing Drive contents.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// OAuth2 flow manager bound to one client identity and scope set.
pub struct AuthManager {
    client: BasicClient,
    scopes: Vec<String>,
}

impl AuthManager {
    /// Create a new manager for the given identity and requested scopes,
    /// against the Google endpoints.
    pub fn new(identity: &ClientIdentity, scopes: &[String]) -> Result<Self> {
        Self::with_endpoints(identity, scopes, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL)
    }

    /// Create a manager against explicit endpoints.
    pub fn with_endpoints(
        identity: &ClientIdentity,
        scopes: &[String],
        auth_url: &str,
        token_url: &str,
    ) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(identity.client_id.clone()),
            Some(ClientSecret::new(identity.client_secret.clone())),
            AuthUrl::new(auth_url.to_string())
                .map_err(|e| Error::InvalidInput(format!("Invalid auth URL: {}", e)))?,
            Some(
                TokenUrl::new(token_url.to_string())
                    .map_err(|e| Error::InvalidInput(format!("Invalid token URL: {}", e)))?,
            ),
        )
        .set_redirect_uri(
            RedirectUrl::new(identity.redirect_uri.clone())
                .map_err(|e| Error::InvalidInput(format!("Invalid redirect URL: {}", e)))?,
        );

        Ok(Self {
            client,
            scopes: scopes.to_vec(),
        })
    }

    /// Generate the authorization URL for the user to visit.
    ///
    /// Requests offline access so the grant yields a refresh token.
    pub fn authorization_url(&self) -> String {
        let mut request = self
            .client
            .authorize_url(oauth2::CsrfToken::new_random)
            .add_extra_param("access_type", "offline");

        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, _csrf_token) = request.url();
        auth_url.to_string()
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// - Invalid authorization code
    /// - Network errors during the exchange
    pub async fn exchange_code(&self, code: &str) -> Result<Tokens> {
        use oauth2::reqwest::async_http_client;
        use oauth2::AuthorizationCode;

        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| Error::Grant(format!("Token exchange failed: {}", e)))?;

        let access_token = token_result.access_token().secret().clone();
        let refresh_token = token_result.refresh_token().map(|t| t.secret().clone());

        let expires_in = token_result
            .expires_in()
            .unwrap_or_else(|| std::time::Duration::from_secs(3600));

        let expires_at =
            Utc::now() + Duration::from_std(expires_in).unwrap_or_else(|_| Duration::hours(1));

        Ok(Tokens {
            access_token,
            refresh_token,
            expires_at,
            scopes: self.scopes.clone(),
        })
    }
}
