use anyhow::Result;
use remindr_core::SourceKey;
use remindr_core::remote::protocol::ListReminderKeys;

use crate::commands::authed_client;
use crate::remote_config::GoogleRemoteConfig;

pub async fn handle(cmd: ListReminderKeys) -> Result<Vec<SourceKey>> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;

    client
        .list_reminder_keys(&config.google_calendar_id, cmd.from, cmd.to)
        .await
}
