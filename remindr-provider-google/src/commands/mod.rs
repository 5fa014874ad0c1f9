pub mod authenticate;
pub mod create_reminder;
pub mod list_calendars;
pub mod list_reminder_keys;
pub mod read_sheet;

use anyhow::Result;

use crate::api::GoogleClient;
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

/// API client for the account named in the remote config, with a fresh token.
pub async fn authed_client(config: &GoogleRemoteConfig) -> Result<GoogleClient> {
    let session = Session::load_valid(&config.google_account).await?;
    Ok(GoogleClient::new(session.access_token()))
}
