//! Provider subprocess client.
//!
//! Each call spawns `remindr-provider-{name}`, writes one JSON request line
//! to its stdin and reads one JSON response from its stdout. Provider logs go
//! to stderr, which is inherited so they show up in the terminal.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{RemindrError, RemindrResult};
use crate::remote::protocol::{Authenticate, Command, ProviderCommand, Request, Response};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
/// Auth waits on the user finishing a browser login.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("remindr-provider-{}", self.0)
    }

    fn binary_path(&self) -> RemindrResult<PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| {
            RemindrError::ProviderNotInstalled(format!(
                "{}. Install it with:\n  cargo install {}",
                binary_name, binary_name
            ))
        })
    }

    /// Run the provider's login flow. Returns the account identifier.
    pub async fn authenticate(&self) -> RemindrResult<String> {
        self.call_with_timeout(Authenticate::default(), AUTH_TIMEOUT).await
    }

    /// Call a typed provider command and return the result.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> RemindrResult<C::Response> {
        self.call_with_timeout(cmd, PROVIDER_TIMEOUT).await
    }

    async fn call_with_timeout<C: ProviderCommand>(
        &self,
        cmd: C,
        limit: Duration,
    ) -> RemindrResult<C::Response> {
        timeout(limit, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| RemindrError::ProviderTimeout(limit.as_secs()))?
    }

    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> RemindrResult<R> {
        let params =
            serde_json::to_value(params).map_err(|e| RemindrError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json =
            serde_json::to_string(&request).map_err(|e| RemindrError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;
        debug!(provider = %self.0, ?command, "calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                RemindrError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RemindrError::Provider("Provider stdin was not captured".into()))?;
        stdin.write_all(format!("{request_json}\n").as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(RemindrError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_response<R: DeserializeOwned>(response_str: &str) -> RemindrResult<R> {
    if response_str.trim().is_empty() {
        return Err(RemindrError::Provider("Provider returned no response".into()));
    }

    let response: Response<R> = serde_json::from_str(response_str)
        .map_err(|e| RemindrError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(RemindrError::Provider(error)),
    }
}
