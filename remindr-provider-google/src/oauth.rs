//! Local OAuth 2.0 flow against Google's endpoints.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::debug;
use url::Url;

use crate::app_config::AppConfig;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/spreadsheets.readonly",
];

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

pub fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Token endpoint response, for both code exchange and refresh.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Omitted by Google on most refreshes.
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Opaque value tying the callback to this login attempt.
pub fn new_state() -> String {
    format!("remindr-{}", Utc::now().timestamp_micros())
}

pub fn consent_url(app: &AppConfig, state: &str) -> Result<Url> {
    let url = Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", app.client_id.as_str()),
            ("redirect_uri", redirect_uri().as_str()),
            ("response_type", "code"),
            ("scope", SCOPES.join(" ").as_str()),
            // Offline + consent so Google hands out a refresh token every time
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )?;
    Ok(url)
}

/// Accept one browser redirect and return the authorization code.
pub async fn wait_for_callback(expected_state: &str) -> Result<String> {
    let listener = TcpListener::bind(redirect_address())
        .await
        .context("Failed to bind OAuth callback listener")?;

    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let result = parse_callback(&request_line, expected_state);

    let (status, message) = match &result {
        Ok(_) => ("200 OK", "Authentication successful! You can close this window and return to the terminal."),
        Err(_) => ("400 Bad Request", "Authentication failed. Check the terminal for details."),
    };
    let response = format!(
        "HTTP/1.1 {status}\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body><h1>remindr</h1><p>{message}</p></body></html>"
    );

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    result
}

/// Pull the code out of `GET /callback?code=..&state=.. HTTP/1.1`.
fn parse_callback(request_line: &str, expected_state: &str) -> Result<String> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = Url::parse(&format!("http://localhost{}", url_part))?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    if let Some(error) = param("error") {
        anyhow::bail!("Google denied access: {}", error);
    }

    if param("state").as_deref() != Some(expected_state) {
        anyhow::bail!("OAuth state mismatch, refusing callback");
    }

    param("code").ok_or_else(|| anyhow::anyhow!("No code in callback"))
}

pub async fn exchange_code(app: &AppConfig, code: &str) -> Result<TokenResponse> {
    debug!("exchanging authorization code");
    let redirect = redirect_uri();

    let response = reqwest::Client::new()
        .post(TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", app.client_id.as_str()),
            ("client_secret", app.client_secret.as_str()),
            ("redirect_uri", redirect.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .context("Failed to reach Google token endpoint")?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token exchange failed: {}", error_text);
    }

    response
        .json()
        .await
        .context("Failed to parse token response")
}
