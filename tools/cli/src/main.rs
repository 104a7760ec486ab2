//! drivectl - Command line interface for Google Drive upload and listing.
//!
//! Authorizes against the Drive API via the OAuth2 authorization-code
//! grant (with a local callback listener and an on-disk token cache) and
//! performs one operation per invocation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use drivectl_auth::{
    AuthConfig, Authorizer, DRIVE_FILE_SCOPE, DRIVE_READONLY_SCOPE,
};
use drivectl_drive::{list_folders, upload, DriveClient};

/// Token cache for the upload scope.
const UPLOAD_TOKEN_PATH: &str = "token.json";
/// Token cache for the read-only listing scope.
const FOLDERS_TOKEN_PATH: &str = "google-token.json";

#[derive(Parser)]
#[command(name = "drivectl")]
#[command(about = "drivectl - Google Drive upload and folder listing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Path to the OAuth client credentials file.
    #[arg(long, default_value = "credentials.json")]
    credentials: PathBuf,

    /// Path to the token cache (defaults per command).
    #[arg(long)]
    token: Option<PathBuf>,

    /// Local port for the OAuth callback listener.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, updating an existing file of the same name.
    Upload {
        /// Local file to upload.
        file: PathBuf,

        /// Remote name (default: the file's basename).
        #[arg(short, long)]
        name: Option<String>,

        /// Target folder ID.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// List folders, sorted by name.
    Folders,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Upload { file, name, folder } => {
            let config = auth_config(
                &cli.credentials,
                cli.token,
                cli.port,
                DRIVE_FILE_SCOPE,
                UPLOAD_TOKEN_PATH,
            );
            cmd_upload(config, &file, name.as_deref(), folder.as_deref()).await
        }

        Commands::Folders => {
            let config = auth_config(
                &cli.credentials,
                cli.token,
                cli.port,
                DRIVE_READONLY_SCOPE,
                FOLDERS_TOKEN_PATH,
            );
            cmd_folders(config).await
        }
    }
}

/// Build the auth configuration for one command.
fn auth_config(
    credentials: &PathBuf,
    token: Option<PathBuf>,
    port: u16,
    scope: &str,
    default_token_path: &str,
) -> AuthConfig {
    AuthConfig {
        credentials_path: credentials.clone(),
        token_path: token.unwrap_or_else(|| PathBuf::from(default_token_path)),
        port,
        scopes: vec![scope.to_string()],
        ..Default::default()
    }
}

/// Upload a file with upsert semantics.
async fn cmd_upload(
    config: AuthConfig,
    file: &PathBuf,
    name: Option<&str>,
    folder: Option<&str>,
) -> Result<()> {
    info!("Uploading {}", file.display());

    let session = Authorizer::new(config)
        .authorize()
        .await
        .context("Authorization failed")?;

    let client =
        DriveClient::new(session.tokens.access_token.clone()).context("Failed to create client")?;

    let uploaded = upload(&client, file, name, folder)
        .await
        .context("Upload failed")?;

    println!("File uploaded successfully. File ID: {}", uploaded.id);
    if let Some(link) = uploaded.web_view_link {
        println!("  View: {}", link);
    }

    Ok(())
}

/// List folders.
async fn cmd_folders(config: AuthConfig) -> Result<()> {
    let session = Authorizer::new(config)
        .authorize()
        .await
        .context("Authorization failed")?;

    let client =
        DriveClient::new(session.tokens.access_token.clone()).context("Failed to create client")?;

    let folders = list_folders(&client).await.context("Listing failed")?;

    if folders.is_empty() {
        println!("No folders found.");
    } else {
        println!("Found folders:");
        for folder in folders {
            println!("- {} ({})", folder.name, folder.id);
        }
    }

    Ok(())
}
