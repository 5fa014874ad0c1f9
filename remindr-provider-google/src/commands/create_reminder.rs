use anyhow::Result;
use remindr_core::remote::protocol::CreateReminder;

use crate::commands::authed_client;
use crate::remote_config::GoogleRemoteConfig;

pub async fn handle(cmd: CreateReminder) -> Result<String> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;

    client
        .insert_reminder(&config.google_calendar_id, &cmd.reminder)
        .await
}
