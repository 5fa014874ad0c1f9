//! `{Field}` placeholder substitution for reminder titles and descriptions.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::record::ImportantDateRecord;

/// Date format used for `{Date}`. ISO 8601 so it reads the same everywhere.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholders a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EventName,
    Date,
    Person,
    Notes,
}

impl Field {
    /// Map a placeholder name (the text between the braces) to a field.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Event Name" => Some(Field::EventName),
            "Date" => Some(Field::Date),
            "Person" => Some(Field::Person),
            "Notes" => Some(Field::Notes),
            _ => None,
        }
    }
}

/// A record as seen by one reminder: `{Date}` is bound to the occurrence
/// being generated rather than to the record's anchor date.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    pub record: &'a ImportantDateRecord,
    pub date: NaiveDate,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a ImportantDateRecord, date: NaiveDate) -> Self {
        RecordView { record, date }
    }

    fn value(&self, field: Field) -> Cow<'a, str> {
        match field {
            Field::EventName => Cow::Borrowed(&self.record.event_name),
            Field::Date => Cow::Owned(self.date.format(DATE_FORMAT).to_string()),
            Field::Person => Cow::Borrowed(&self.record.person),
            Field::Notes => Cow::Borrowed(&self.record.notes),
        }
    }
}

impl<'a> From<&'a ImportantDateRecord> for RecordView<'a> {
    fn from(record: &'a ImportantDateRecord) -> Self {
        RecordView::new(record, record.date)
    }
}

/// Replace every recognized `{Field}` in `pattern` with its value.
///
/// Unrecognized placeholders and unmatched braces are copied through as-is.
pub fn resolve(pattern: &str, view: &RecordView<'_>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after_open[..close];
        if name.contains('{') {
            // "{a {Person}": the first brace is literal, rescan from the next one
            out.push('{');
            rest = after_open;
            continue;
        }

        match Field::from_name(name) {
            Some(field) => out.push_str(&view.value(field)),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}
