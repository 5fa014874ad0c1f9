use anyhow::Result;
use owo_colors::OwoColorize;
use remindr_core::sync::{CalendarStore, DateWindow, apply, plan};

use super::ReminderSource;
use crate::render::{PlanRender, Render};
use crate::utils::tui::create_spinner;

pub async fn run(source: &ReminderSource, dry_run: bool, verbose: bool) -> Result<()> {
    let instances = source.generate().await?;
    let remote = source.remote();

    let Some(window) = DateWindow::covering(&instances) else {
        println!("{}", "No reminders in range".dimmed());
        return Ok(());
    };

    let spinner = create_spinner("Checking calendar...".to_string());
    let existing = remote.list_existing_keys(window).await;
    spinner.finish_and_clear();

    let plan = plan(&existing?, instances);
    println!("{}", plan.render(verbose));

    if plan.is_up_to_date() {
        println!("\n{}", "Calendar is up to date".green());
        return Ok(());
    }

    if dry_run {
        println!("\n{}", "Dry run, nothing created".dimmed());
        return Ok(());
    }

    let spinner = create_spinner(format!("Creating {} reminders...", plan.to_create.len()));
    let stats = apply(remote, &plan).await;
    spinner.finish_and_clear();

    println!("\n{}", stats.render());

    if !stats.is_complete() {
        anyhow::bail!(
            "{} reminders could not be created. Run `remindr sync` again to retry them.",
            stats.failed.len()
        );
    }

    Ok(())
}
