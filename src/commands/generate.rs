use anyhow::Result;

use super::ReminderSource;
use crate::render::render_instances;

pub async fn run(source: &ReminderSource, verbose: bool) -> Result<()> {
    let instances = source.generate().await?;

    println!("{}", render_instances(&instances, verbose));

    Ok(())
}
