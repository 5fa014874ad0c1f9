use anyhow::Result;
use owo_colors::OwoColorize;
use remindr_core::remote::Remote;

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(remote: &Remote) -> Result<()> {
    let spinner = create_spinner("Fetching calendars...".to_string());
    let result = remote.list_calendars().await;
    spinner.finish_and_clear();

    let calendars = result?;
    if calendars.is_empty() {
        println!("No writable calendars found.");
        return Ok(());
    }

    let selected = remote.calendar_id();
    for calendar in &calendars {
        let is_selected = selected == Some(calendar.id.as_str())
            || (selected == Some("primary") && calendar.primary);

        if is_selected {
            println!("{} {}", "*".green(), calendar.render());
        } else {
            println!("  {}", calendar.render());
        }
    }

    Ok(())
}
