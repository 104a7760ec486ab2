//! Interactive authorization-code grant with a local callback listener.
//!
//! The listener is strictly single-shot: it serves exactly one successful
//! callback, then stops accepting. Requests without a `code` parameter get
//! an explicit 400 response instead of being left hanging, and the whole
//! grant is bounded by a timeout.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use drivectl_common::{Error, Result};

use crate::manager::AuthManager;
use crate::tokens::Tokens;

const SUCCESS_BODY: &str = "Authentication successful! You can close this window.";
const DENIED_BODY: &str = "Authorization was denied. You can close this window.";
const MALFORMED_BODY: &str = "Missing authorization code.";

/// Outcome of one parsed callback request.
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    /// Redirect carried an authorization code.
    Code(String),
    /// User denied consent; the redirect carried an `error` parameter.
    Denied(String),
    /// Anything else (wrong path, no query, stray browser requests).
    Malformed,
}

/// Run the interactive grant: open the browser, wait for the callback,
/// exchange the code for tokens.
///
/// # Errors
/// - Callback port already bound (a second concurrent grant)
/// - User denied consent
/// - No callback within `timeout`
/// - Code exchange failure
pub async fn run(manager: &AuthManager, port: u16, timeout: Duration) -> Result<Tokens> {
    // Bind before opening the browser so the redirect cannot race the listener.
    let listener = TcpListener::bind(("127.0.0.1", port)).await.map_err(|e| {
        Error::Grant(format!(
            "Failed to bind callback listener on port {}: {}",
            port, e
        ))
    })?;

    let auth_url = manager.authorization_url();

    tracing::info!(port, "Authorization server listening");

    if let Err(e) = open::that(&auth_url) {
        tracing::warn!("Failed to open browser: {}", e);
        println!("Open this URL in your browser to authorize:\n{}", auth_url);
    }

    let code = tokio::time::timeout(timeout, wait_for_code(&listener))
        .await
        .map_err(|_| {
            Error::Grant(format!(
                "No authorization callback received within {}s",
                timeout.as_secs()
            ))
        })??;

    tracing::debug!("Authorization code received, exchanging for tokens");

    manager.exchange_code(&code).await
}

/// Accept connections until one delivers an authorization code.
///
/// Malformed requests are answered with 400 and the listener keeps going;
/// a denial callback ends the grant with an error.
async fn wait_for_code(listener: &TcpListener) -> Result<String> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| Error::Grant(format!("Callback listener failed: {}", e)))?;

        match handle_connection(stream).await {
            Ok(Callback::Code(code)) => return Ok(code),
            Ok(Callback::Denied(reason)) => {
                return Err(Error::Grant(format!("Authorization denied: {}", reason)));
            }
            Ok(Callback::Malformed) => {
                tracing::debug!(%peer, "Ignoring request without authorization code");
            }
            Err(e) => {
                tracing::warn!(%peer, "Callback connection error: {}", e);
            }
        }
    }
}

/// Read one request, answer it, and report what it carried.
async fn handle_connection(mut stream: TcpStream) -> Result<Callback> {
    let mut reader = BufReader::new(&mut stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    drop(reader);

    let callback = parse_callback(&request_line);

    match &callback {
        Callback::Code(_) => respond(&mut stream, "200 OK", SUCCESS_BODY).await?,
        Callback::Denied(_) => respond(&mut stream, "200 OK", DENIED_BODY).await?,
        Callback::Malformed => respond(&mut stream, "400 Bad Request", MALFORMED_BODY).await?,
    }

    Ok(callback)
}

/// Parse the request line of a callback request.
fn parse_callback(request_line: &str) -> Callback {
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");

    if method != "GET" {
        return Callback::Malformed;
    }

    let url = match Url::parse(&format!("http://localhost{}", target)) {
        Ok(url) => url,
        Err(_) => return Callback::Malformed,
    };

    if url.path() != "/oauth2callback" {
        return Callback::Malformed;
    }

    let mut code = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, error) {
        (Some(code), _) => Callback::Code(code),
        (None, Some(error)) => Callback::Denied(error),
        (None, None) => Callback::Malformed,
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
