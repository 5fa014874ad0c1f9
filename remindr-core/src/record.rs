//! Important-date records as loaded from the source sheet.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RemindrError, RemindrResult};

/// How often an important date comes back around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Yearly,
    Monthly,
}

impl Recurrence {
    /// Parse a recurrence cell. Blank means `None`; matching is case-insensitive.
    ///
    /// `event` is only used to make the error message point at the right row.
    pub fn parse(value: &str, event: &str) -> RemindrResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Recurrence::None),
            "yearly" => Ok(Recurrence::Yearly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(RemindrError::InvalidRecurrence {
                value: value.to_string(),
                event: event.to_string(),
            }),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => write!(f, "none"),
            Recurrence::Yearly => write!(f, "yearly"),
            Recurrence::Monthly => write!(f, "monthly"),
        }
    }
}

/// One row of the "Important Dates" sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantDateRecord {
    pub event_name: String,
    pub date: NaiveDate,
    /// Name of the template that drives this record's reminders.
    pub category: String,
    pub person: String,
    pub notes: String,
    pub recurrence: Recurrence,
}
