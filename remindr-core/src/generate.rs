//! Turning records + templates into concrete reminder instances.

use std::borrow::Borrow;
use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RemindrResult;
use crate::record::ImportantDateRecord;
use crate::recurrence::{Horizon, expand};
use crate::resolve::{DATE_FORMAT, RecordView, resolve};
use crate::template::{ReminderSpec, TemplateCatalog};

/// Stable identity of a generated reminder, stored on the calendar event
/// so later runs can tell it was already created.
///
/// Format: `event|category|offset|occurrence`, with a `#n` suffix for the
/// n-th extra reminder sharing the same offset in one template. Field text
/// is percent-escaped so the separators stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceKey(String);

impl SourceKey {
    pub fn new(
        event_name: &str,
        category: &str,
        offset_days: i64,
        occurrence_date: NaiveDate,
        ordinal: usize,
    ) -> Self {
        let mut key = format!(
            "{}|{}|{}|{}",
            escape(event_name),
            escape(category),
            offset_days,
            occurrence_date.format(DATE_FORMAT)
        );
        if ordinal > 0 {
            key.push_str(&format!("#{ordinal}"));
        }
        SourceKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SourceKey {
    fn from(key: String) -> Self {
        SourceKey(key)
    }
}

impl From<&str> for SourceKey {
    fn from(key: &str) -> Self {
        SourceKey(key.to_string())
    }
}

impl Borrow<str> for SourceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(field: &str) -> String {
    field
        .replace('%', "%25")
        .replace('|', "%7C")
        .replace('#', "%23")
}

/// One reminder to be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderInstance {
    pub event_name: String,
    pub category: String,
    /// The recurrence cycle this reminder belongs to.
    pub occurrence_date: NaiveDate,
    pub offset_days: i64,
    /// `occurrence_date + offset_days`
    pub reminder_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub source_key: SourceKey,
}

/// Shift a date by a signed number of days.
pub fn offset_date(date: NaiveDate, offset_days: i64) -> NaiveDate {
    let days = Days::new(offset_days.unsigned_abs());
    let shifted = if offset_days < 0 {
        date.checked_sub_days(days)
    } else {
        date.checked_add_days(days)
    };
    shifted.unwrap_or(if offset_days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// For each reminder, how many earlier reminders in the same template
/// share its offset.
fn ordinals(reminders: &[ReminderSpec]) -> Vec<usize> {
    reminders
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            reminders[..i]
                .iter()
                .filter(|earlier| earlier.offset_days == spec.offset_days)
                .count()
        })
        .collect()
}

/// Generate every reminder for one record.
///
/// Output is grouped by occurrence, then in template declaration order.
/// Fails with `UnknownTemplate` without producing anything if the record's
/// category is not in the catalog.
pub fn generate(
    record: &ImportantDateRecord,
    catalog: &TemplateCatalog,
    horizon: Horizon,
) -> RemindrResult<Vec<ReminderInstance>> {
    let template = catalog.template_for(record)?;
    let ordinals = ordinals(&template.reminders);

    let mut instances = Vec::new();
    for occurrence_date in expand(record.date, record.recurrence, horizon) {
        let view = RecordView::new(record, occurrence_date);

        for (spec, &ordinal) in template.reminders.iter().zip(&ordinals) {
            instances.push(ReminderInstance {
                event_name: record.event_name.clone(),
                category: record.category.clone(),
                occurrence_date,
                offset_days: spec.offset_days,
                reminder_date: offset_date(occurrence_date, spec.offset_days),
                title: resolve(&spec.title_pattern, &view),
                description: resolve(&spec.description_pattern, &view),
                source_key: SourceKey::new(
                    &record.event_name,
                    &record.category,
                    spec.offset_days,
                    occurrence_date,
                    ordinal,
                ),
            });
        }
    }

    Ok(instances)
}

/// Generate reminders for all records, sorted by reminder date then event name.
///
/// Every record's category is checked before anything is generated, so a
/// single bad record fails the whole run.
pub fn generate_all(
    records: &[ImportantDateRecord],
    catalog: &TemplateCatalog,
    horizon: Horizon,
) -> RemindrResult<Vec<ReminderInstance>> {
    catalog.check_records(records)?;

    let mut instances = Vec::new();
    for record in records {
        let generated = generate(record, catalog, horizon)?;
        debug!(event = %record.event_name, count = generated.len(), "generated reminders");
        instances.extend(generated);
    }

    // Stable: ties keep generation order
    instances.sort_by(|a, b| {
        a.reminder_date
            .cmp(&b.reminder_date)
            .then_with(|| a.event_name.cmp(&b.event_name))
    });

    Ok(instances)
}
