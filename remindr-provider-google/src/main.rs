//! remindr-provider-google - Google Sheets + Calendar provider for remindr
//!
//! This binary implements the remindr provider protocol, communicating
//! with remindr via JSON over stdin/stdout. Logs go to stderr.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/remindr/providers/google/app_config.toml
//!   ~/.config/remindr/providers/google/session/{account}.toml

mod api;
mod app_config;
mod commands;
mod oauth;
mod remote_config;
mod session;

use std::future::Future;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use remindr_core::remote::protocol::{Command, ProviderCommand, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> String {
    debug!(command = ?request.command, "handling request");

    // Commands without params may arrive as `null`
    let params = match request.params {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        params => params,
    };

    match request.command {
        Command::Authenticate => dispatch(params, commands::authenticate::handle).await,
        Command::ListCalendars => dispatch(params, commands::list_calendars::handle).await,
        Command::ReadSheet => dispatch(params, commands::read_sheet::handle).await,
        Command::ListReminderKeys => dispatch(params, commands::list_reminder_keys::handle).await,
        Command::CreateReminder => dispatch(params, commands::create_reminder::handle).await,
    }
}

/// Decode params into the typed command, run its handler, encode the reply.
async fn dispatch<C, F, Fut>(params: serde_json::Value, handler: F) -> String
where
    C: ProviderCommand + DeserializeOwned,
    C::Response: Serialize,
    F: FnOnce(C) -> Fut,
    Fut: Future<Output = Result<C::Response>>,
{
    let cmd: C = match serde_json::from_value(params) {
        Ok(cmd) => cmd,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };

    match handler(cmd).await {
        Ok(data) => Response::success(data),
        Err(e) => {
            debug!(error = %e, "command failed");
            Response::error(&format!("{:#}", e))
        }
    }
}
