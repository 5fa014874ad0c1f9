mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use remindr_core::config::RemindrConfig;
use tracing_subscriber::EnvFilter;

use commands::{ReminderSource, SheetArgs, remote_for};

#[derive(Parser)]
#[command(name = "remindr")]
#[command(about = "Turn a sheet of important dates into calendar reminders")]
struct Cli {
    /// List every reminder and log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to a provider and print the config to add
    Auth {
        #[arg(default_value = "google")]
        provider: String, // e.g. "google"
    },
    /// List calendars reminders can be written to
    Calendars {
        /// Calendar id to mark as selected (overrides config)
        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Print the reminders the spreadsheet produces, without touching a calendar
    Generate {
        #[command(flatten)]
        sheet: SheetArgs,
    },
    /// Create reminders that are not on the calendar yet
    Sync {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Calendar id to write to (overrides config)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Show the plan without creating anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Write the reminders to an .ics file
    Export {
        path: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Auth { provider } => commands::auth::run(&provider).await,
        Commands::Calendars { calendar } => {
            let config = RemindrConfig::load()?;
            let remote = remote_for(&config, calendar.as_deref())?;
            commands::calendars::run(&remote).await
        }
        Commands::Generate { sheet } => {
            let source = reminder_source(&sheet, None)?;
            commands::generate::run(&source, cli.verbose).await
        }
        Commands::Sync {
            sheet,
            calendar,
            dry_run,
        } => {
            let source = reminder_source(&sheet, calendar.as_deref())?;
            commands::sync::run(&source, dry_run, cli.verbose).await
        }
        Commands::Export { path, sheet } => {
            let source = reminder_source(&sheet, None)?;
            commands::export::run(&source, &path).await
        }
    }
}

fn reminder_source(sheet: &SheetArgs, calendar: Option<&str>) -> Result<ReminderSource> {
    let config = RemindrConfig::load()?;
    let remote = remote_for(&config, calendar)?;
    ReminderSource::new(&config, sheet, remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_flags_parse() {
        let cli = Cli::parse_from([
            "remindr",
            "sync",
            "--dry-run",
            "--calendar",
            "family@group.calendar.google.com",
            "--horizon-months",
            "18",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Sync {
                sheet,
                calendar,
                dry_run,
            } => {
                assert!(dry_run);
                assert_eq!(calendar.as_deref(), Some("family@group.calendar.google.com"));
                assert_eq!(sheet.horizon_months, Some(18));
                assert_eq!(sheet.spreadsheet, None);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn auth_defaults_to_google() {
        let cli = Cli::parse_from(["remindr", "auth"]);
        assert!(matches!(cli.command, Commands::Auth { provider } if provider == "google"));
    }
}
