pub mod auth;
pub mod calendars;
pub mod export;
pub mod generate;
pub mod sync;

use anyhow::Result;
use chrono::Local;
use clap::Args;
use remindr_core::config::RemindrConfig;
use remindr_core::recurrence::Horizon;
use remindr_core::remote::Remote;
use remindr_core::sheet::SheetLayout;
use remindr_core::{ReminderInstance, generate_all};
use tracing::info;

use crate::utils::tui::create_spinner;

/// Where the important dates come from and how far ahead to look.
#[derive(Args, Debug, Default)]
pub struct SheetArgs {
    /// Spreadsheet id (overrides `spreadsheet_id` in config.toml)
    #[arg(long)]
    pub spreadsheet: Option<String>,

    /// Months ahead to project recurring dates (overrides `horizon_months`)
    #[arg(long)]
    pub horizon_months: Option<u32>,
}

/// A configured spreadsheet plus the remote used to read it.
pub struct ReminderSource {
    remote: Remote,
    spreadsheet_id: String,
    layout: SheetLayout,
    horizon: Horizon,
}

impl ReminderSource {
    pub fn new(config: &RemindrConfig, args: &SheetArgs, remote: Remote) -> Result<Self> {
        let mut config = config.clone();
        if let Some(months) = args.horizon_months {
            config.horizon_months = months;
        }

        let Some(spreadsheet_id) = args.spreadsheet.clone().or(config.spreadsheet_id.clone()) else {
            anyhow::bail!(
                "No spreadsheet configured.\n\n\
                Pass --spreadsheet <id> or set spreadsheet_id in {}",
                RemindrConfig::config_path()?.display()
            );
        };

        Ok(ReminderSource {
            remote,
            spreadsheet_id,
            layout: config.layout(),
            horizon: config.horizon(Local::now().date_naive()),
        })
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    /// Read both sheets and generate every reminder in the horizon.
    pub async fn generate(&self) -> Result<Vec<ReminderInstance>> {
        let spinner = create_spinner("Reading spreadsheet...".to_string());
        let result = self
            .remote
            .load_spreadsheet(&self.spreadsheet_id, &self.layout)
            .await;
        spinner.finish_and_clear();

        let (records, catalog) = result?;
        let instances = generate_all(&records, &catalog, self.horizon)?;

        info!(
            records = records.len(),
            templates = catalog.len(),
            reminders = instances.len(),
            until = %self.horizon.until,
            "generated reminders"
        );

        Ok(instances)
    }
}

/// The configured remote, optionally pointed at another calendar.
pub fn remote_for(config: &RemindrConfig, calendar: Option<&str>) -> Result<Remote> {
    let remote = config.remote()?.clone();

    Ok(match calendar {
        Some(calendar_id) => remote.with_calendar_id(calendar_id),
        None => remote,
    })
}
