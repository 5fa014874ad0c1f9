//! Reminder templates and the catalog that holds them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RemindrError, RemindrResult};
use crate::record::ImportantDateRecord;

/// One reminder inside a template: fire `offset_days` away from the
/// occurrence (negative means before).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub offset_days: i64,
    pub title_pattern: String,
    pub description_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTemplate {
    pub name: String,
    pub description: String,
    /// Declaration order is generation order. Offsets need not be sorted.
    pub reminders: Vec<ReminderSpec>,
}

/// Templates by name, validated up front so a bad sheet fails the run
/// before anything is written to a calendar.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: HashMap<String, ReminderTemplate>,
}

impl TemplateCatalog {
    /// Build a catalog, rejecting duplicate names and templates without reminders.
    pub fn load(templates: impl IntoIterator<Item = ReminderTemplate>) -> RemindrResult<Self> {
        let mut map = HashMap::new();

        for template in templates {
            if template.reminders.is_empty() {
                return Err(RemindrError::EmptyTemplate(template.name));
            }
            if map.contains_key(&template.name) {
                return Err(RemindrError::DuplicateTemplate(template.name));
            }
            map.insert(template.name.clone(), template);
        }

        Ok(TemplateCatalog { templates: map })
    }

    pub fn get(&self, name: &str) -> RemindrResult<&ReminderTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| RemindrError::UnknownTemplate {
                category: name.to_string(),
                event: None,
            })
    }

    /// Look up the template a record refers to.
    pub fn template_for(&self, record: &ImportantDateRecord) -> RemindrResult<&ReminderTemplate> {
        self.templates
            .get(&record.category)
            .ok_or_else(|| RemindrError::UnknownTemplate {
                category: record.category.clone(),
                event: Some(record.event_name.clone()),
            })
    }

    /// Fail on the first record whose category has no template.
    pub fn check_records(&self, records: &[ImportantDateRecord]) -> RemindrResult<()> {
        for record in records {
            self.template_for(record)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
