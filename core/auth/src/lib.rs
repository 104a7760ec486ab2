//! OAuth2 authorization for the Google Drive API.
//!
//! This crate covers the full token lifecycle for a command-line process:
//! - Loading the OAuth client identity from a local `credentials.json`
//! - Caching granted tokens on disk and reusing them on later runs
//! - Running the interactive authorization-code grant with a short-lived
//!   local callback listener when no cached token exists

pub mod authorizer;
pub mod credentials;
pub mod grant;
pub mod manager;
pub mod tokens;

pub use authorizer::{AuthConfig, AuthorizedSession, Authorizer};
pub use credentials::ClientIdentity;
pub use manager::{AuthManager, DRIVE_FILE_SCOPE, DRIVE_READONLY_SCOPE};
pub use tokens::{TokenStore, Tokens};
