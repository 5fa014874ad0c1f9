use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use remindr_core::ics::generate_ics;

use super::ReminderSource;

pub async fn run(source: &ReminderSource, path: &Path) -> Result<()> {
    let instances = source.generate().await?;
    let ics = generate_ics(&instances, Utc::now())?;

    std::fs::write(path, ics).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {} reminders to {}", instances.len(), path.display());

    Ok(())
}
