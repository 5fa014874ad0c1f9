//! Interactive OAuth login. The user-facing prompts go to stderr, which
//! remindr passes through to the terminal.

use anyhow::Result;
use remindr_core::remote::protocol::Authenticate;

use crate::api::GoogleClient;
use crate::app_config::AppConfig;
use crate::oauth::{consent_url, exchange_code, new_state, wait_for_callback};
use crate::session::{Session, SessionData};

pub async fn handle(_cmd: Authenticate) -> Result<String> {
    let app = AppConfig::load()?;
    let state = new_state();
    let auth_url = consent_url(&app, &state)?;

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{}\n", auth_url);

    if open::that(auth_url.as_str()).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let code = wait_for_callback(&state).await?;

    eprintln!("\nReceived authorization code, exchanging for tokens...");

    let data = SessionData::from_tokens(exchange_code(&app, &code).await?)?;

    // The primary calendar's id is the account email
    let calendars = GoogleClient::new(data.access_token()).list_calendars().await?;
    let account_email = calendars
        .into_iter()
        .find(|cal| cal.primary)
        .map(|cal| cal.id)
        .ok_or_else(|| anyhow::anyhow!("No primary calendar found"))?;

    Session::new(&account_email, data).save()?;

    eprintln!("Authentication successful!");

    Ok(account_email)
}
