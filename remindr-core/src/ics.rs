//! ICS export of generated reminders.

use chrono::{DateTime, Days, Utc};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};
use uuid::Uuid;

use crate::error::{RemindrError, RemindrResult};
use crate::generate::{ReminderInstance, SourceKey};

pub const SOURCE_KEY_PROPERTY: &str = "X-REMINDR-SOURCE-KEY";

/// UID for a reminder. Same key, same UID, so re-imports update in place.
pub fn uid_for(key: &SourceKey) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("remindr:{key}").as_bytes()).to_string()
}

/// Render reminders as one VCALENDAR of all-day events.
pub fn generate_ics(instances: &[ReminderInstance], generated_at: DateTime<Utc>) -> RemindrResult<String> {
    let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();
    let mut cal = Calendar::new();

    for instance in instances {
        let end = instance
            .reminder_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| {
                RemindrError::IcsGenerate(format!("date out of range for '{}'", instance.source_key))
            })?;

        let mut event = icalendar::Event::new();
        event.uid(&uid_for(&instance.source_key));
        event.add_property("DTSTAMP", &dtstamp);
        event.summary(&instance.title);
        if !instance.description.is_empty() {
            event.description(&instance.description);
        }

        for (name, date) in [("DTSTART", instance.reminder_date), ("DTEND", end)] {
            let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            event.append_property(prop);
        }

        event.add_property("TRANSP", "TRANSPARENT");
        event.add_property(SOURCE_KEY_PROPERTY, instance.source_key.as_str());

        cal.push(event.done());
    }

    Ok(strip_ics_bloat(&cal.done().to_string()))
}

/// Replace the library PRODID and drop the default CALSCALE.
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:REMINDR\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
