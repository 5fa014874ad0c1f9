use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::RemindrResult;
use crate::generate::{ReminderInstance, SourceKey};

/// Inclusive range of reminder dates a sync run cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Smallest window holding every instance's reminder date, or `None`
    /// when there are no instances.
    pub fn covering(instances: &[ReminderInstance]) -> Option<Self> {
        let from = instances.iter().map(|i| i.reminder_date).min()?;
        let to = instances.iter().map(|i| i.reminder_date).max()?;
        Some(DateWindow { from, to })
    }
}

/// Where reminders end up. Only the stored source keys are ever read back.
#[allow(async_fn_in_trait)]
pub trait CalendarStore {
    /// Keys of reminders already created with a reminder date in `window`.
    async fn list_existing_keys(&self, window: DateWindow) -> RemindrResult<HashSet<SourceKey>>;

    /// Create one all-day reminder event. Returns the store's id for it.
    async fn create_event(&self, instance: &ReminderInstance) -> RemindrResult<String>;
}
