use anyhow::Result;
use remindr_core::remote::protocol::{CalendarInfo, ListCalendars};

use crate::commands::authed_client;
use crate::remote_config::GoogleRemoteConfig;

pub async fn handle(cmd: ListCalendars) -> Result<Vec<CalendarInfo>> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;

    client.list_calendars().await
}
