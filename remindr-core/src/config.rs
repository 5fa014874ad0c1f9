//! Global remindr configuration at ~/.config/remindr/config.toml

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{RemindrError, RemindrResult};
use crate::recurrence::{DEFAULT_HORIZON_MONTHS, Horizon};
use crate::remote::Remote;
use crate::sheet::SheetLayout;

const ENV_PREFIX: &str = "REMINDR";

fn default_horizon_months() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

fn default_important_dates_sheet() -> String {
    SheetLayout::default().important_dates
}

fn default_templates_sheet() -> String {
    SheetLayout::default().templates
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemindrConfig {
    /// Spreadsheet holding the "Important Dates" and "Templates" sheets.
    pub spreadsheet_id: Option<String>,

    /// How far ahead recurring dates are projected.
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    #[serde(default = "default_important_dates_sheet")]
    pub important_dates_sheet: String,

    #[serde(default = "default_templates_sheet")]
    pub templates_sheet: String,

    /// Provider and its parameters, e.g. `provider = "google"`,
    /// `google_account = "..."`, `google_calendar_id = "primary"`.
    pub remote: Option<Remote>,
}

impl RemindrConfig {
    pub fn config_path() -> RemindrResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RemindrError::Config("Could not determine config directory".into()))?
            .join("remindr");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default on first use.
    /// `REMINDR_*` environment variables override file values.
    pub fn load() -> RemindrResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> RemindrResult<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| RemindrError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RemindrError::Config(e.to_string()))
    }

    pub fn create_default_config(path: &Path) -> RemindrResult<()> {
        let contents = format!(
            "\
# remindr configuration

# Google Sheet with \"Important Dates\" and \"Templates\" sheets:
# spreadsheet_id = \"1AbC...\"

# How many months ahead recurring dates are projected:
# horizon_months = {}

# Sheet names, if yours differ:
# important_dates_sheet = \"Important Dates\"
# templates_sheet = \"Templates\"

# Where reminders are created. Run `remindr auth google` to get the account.
# [remote]
# provider = \"google\"
# google_account = \"you@gmail.com\"
# google_calendar_id = \"primary\"
",
            DEFAULT_HORIZON_MONTHS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RemindrError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RemindrError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(&self.important_dates_sheet, &self.templates_sheet)
    }

    pub fn horizon(&self, run_date: NaiveDate) -> Horizon {
        Horizon::months_from(run_date, self.horizon_months)
    }

    pub fn remote(&self) -> RemindrResult<&Remote> {
        self.remote.as_ref().ok_or_else(|| {
            RemindrError::Config(
                "No [remote] configured.\n\
                Run `remindr auth google`, then add a [remote] table to config.toml"
                    .into(),
            )
        })
    }
}
