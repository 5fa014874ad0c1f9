//! Coercion of raw sheet cells into records and templates.
//!
//! Sheets arrive as grids of strings with the header row already removed.
//! Short rows are padded with empty cells; fully blank rows are ignored.
//!
//! "Important Dates" columns (A-F):
//!   event name, date, category, person, notes, recurrence
//!
//! "Templates" columns (A-Q):
//!   template name, description, then up to five `(days, title, description)`
//!   triples in C-E, F-H, I-K, L-N and O-Q. A triple with an empty days
//!   cell is absent.

use chrono::NaiveDate;

use crate::error::{RemindrError, RemindrResult};
use crate::record::{ImportantDateRecord, Recurrence};
use crate::template::{ReminderSpec, ReminderTemplate};

pub const IMPORTANT_DATES_COLUMNS: usize = 6;
pub const TEMPLATE_COLUMNS: usize = 17;
pub const MAX_TEMPLATE_REMINDERS: usize = 5;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Sheet names and column ranges to read, header row excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub important_dates: String,
    pub templates: String,
}

impl SheetLayout {
    pub fn new(important_dates: impl Into<String>, templates: impl Into<String>) -> Self {
        SheetLayout {
            important_dates: important_dates.into(),
            templates: templates.into(),
        }
    }

    pub fn important_dates_range(&self) -> String {
        format!("{}!A2:F", self.important_dates)
    }

    pub fn templates_range(&self) -> String {
        format!("{}!A2:Q", self.templates)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout::new("Important Dates", "Templates")
    }
}

/// Sheet row number for error messages: 1-based, counting the header.
fn sheet_row(index: usize) -> usize {
    index + 2
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn padded(row: &[String], width: usize) -> Vec<&str> {
    (0..width)
        .map(|i| row.get(i).map(|c| c.trim()).unwrap_or(""))
        .collect()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
}

/// Parse the "Important Dates" grid.
pub fn parse_important_dates(sheet: &str, rows: &[Vec<String>]) -> RemindrResult<Vec<ImportantDateRecord>> {
    let mut records = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let cells = padded(row, IMPORTANT_DATES_COLUMNS);
        let invalid = |reason: String| RemindrError::InvalidRow {
            sheet: sheet.to_string(),
            row: sheet_row(index),
            reason,
        };

        let event_name = cells[0];
        if event_name.is_empty() {
            return Err(invalid("missing event name".into()));
        }

        let date = parse_date(cells[1])
            .ok_or_else(|| invalid(format!("invalid date '{}' for '{}'", cells[1], event_name)))?;

        let category = cells[2];
        if category.is_empty() {
            return Err(invalid(format!("missing category for '{}'", event_name)));
        }

        records.push(ImportantDateRecord {
            event_name: event_name.to_string(),
            date,
            category: category.to_string(),
            person: cells[3].to_string(),
            notes: cells[4].to_string(),
            recurrence: Recurrence::parse(cells[5], event_name)?,
        });
    }

    Ok(records)
}

/// Parse the "Templates" grid.
///
/// Emptiness and duplicate names are left to `TemplateCatalog::load`.
pub fn parse_templates(sheet: &str, rows: &[Vec<String>]) -> RemindrResult<Vec<ReminderTemplate>> {
    let mut templates = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let cells = padded(row, TEMPLATE_COLUMNS);
        let invalid = |reason: String| RemindrError::InvalidRow {
            sheet: sheet.to_string(),
            row: sheet_row(index),
            reason,
        };

        let name = cells[0];
        if name.is_empty() {
            return Err(invalid("missing template name".into()));
        }

        let mut reminders = Vec::new();
        for triple in cells[2..].chunks(3).take(MAX_TEMPLATE_REMINDERS) {
            let days = triple[0];
            if days.is_empty() {
                continue;
            }
            let offset_days: i64 = days
                .parse()
                .map_err(|_| invalid(format!("invalid days value '{}' in template '{}'", days, name)))?;

            reminders.push(ReminderSpec {
                offset_days,
                title_pattern: triple[1].to_string(),
                description_pattern: triple[2].to_string(),
            });
        }

        templates.push(ReminderTemplate {
            name: name.to_string(),
            description: cells[1].to_string(),
            reminders,
        });
    }

    Ok(templates)
}
