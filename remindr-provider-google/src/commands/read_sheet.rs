use anyhow::Result;
use remindr_core::remote::protocol::ReadSheet;

use crate::commands::authed_client;
use crate::remote_config::GoogleRemoteConfig;

pub async fn handle(cmd: ReadSheet) -> Result<Vec<Vec<String>>> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;

    client.read_values(&cmd.spreadsheet_id, &cmd.range).await
}
