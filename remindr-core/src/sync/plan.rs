use std::collections::HashSet;
use std::fmt;

use crate::generate::{ReminderInstance, SourceKey};

/// What a sync run will do with a generated reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    Skip,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAction::Create => write!(f, "+"),
            PlanAction::Skip => write!(f, "="),
        }
    }
}

/// Generated reminders split by whether they still need creating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_create: Vec<ReminderInstance>,
    pub to_skip: Vec<ReminderInstance>,
}

impl SyncPlan {
    /// True when there is nothing left to create.
    pub fn is_up_to_date(&self) -> bool {
        self.to_create.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_skip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_skip.is_empty()
    }

    /// All entries with their action, creates first, each in generation order.
    pub fn entries(&self) -> impl Iterator<Item = (PlanAction, &ReminderInstance)> {
        self.to_create
            .iter()
            .map(|i| (PlanAction::Create, i))
            .chain(self.to_skip.iter().map(|i| (PlanAction::Skip, i)))
    }
}

/// Partition `generated` against the keys already on the calendar.
///
/// An instance is skipped when its key is in `existing_keys`, or when an
/// earlier instance in this same batch already claimed the key. Relative
/// order is preserved within both halves.
pub fn plan(
    existing_keys: &HashSet<SourceKey>,
    generated: impl IntoIterator<Item = ReminderInstance>,
) -> SyncPlan {
    let mut result = SyncPlan::default();
    let mut claimed: HashSet<SourceKey> = HashSet::new();

    for instance in generated {
        if existing_keys.contains(&instance.source_key)
            || !claimed.insert(instance.source_key.clone())
        {
            result.to_skip.push(instance);
        } else {
            result.to_create.push(instance);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instance(event: &str, day: u32) -> ReminderInstance {
        let date = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        ReminderInstance {
            event_name: event.to_string(),
            category: "simple".to_string(),
            occurrence_date: date,
            offset_days: 0,
            reminder_date: date,
            title: event.to_string(),
            description: String::new(),
            source_key: SourceKey::new(event, "simple", 0, date, 0),
        }
    }

    #[test]
    fn everything_is_created_against_an_empty_calendar() {
        let generated = vec![instance("a", 1), instance("b", 2)];
        let result = plan(&HashSet::new(), generated.clone());
        assert_eq!(result.to_create, generated);
        assert!(result.to_skip.is_empty());
    }

    #[test]
    fn existing_keys_are_skipped() {
        let generated = vec![instance("a", 1), instance("b", 2), instance("c", 3)];
        let existing: HashSet<SourceKey> = [generated[1].source_key.clone()].into_iter().collect();

        let result = plan(&existing, generated);
        let created: Vec<&str> = result.to_create.iter().map(|i| i.event_name.as_str()).collect();
        let skipped: Vec<&str> = result.to_skip.iter().map(|i| i.event_name.as_str()).collect();
        assert_eq!(created, vec!["a", "c"]);
        assert_eq!(skipped, vec!["b"]);
    }

    #[test]
    fn replanning_after_creation_is_a_no_op() {
        let generated = vec![instance("a", 1), instance("b", 2)];
        let first = plan(&HashSet::new(), generated.clone());
        let existing: HashSet<SourceKey> =
            first.to_create.iter().map(|i| i.source_key.clone()).collect();

        let second = plan(&existing, generated);
        assert!(second.is_up_to_date());
        assert_eq!(second.to_skip.len(), 2);
    }

    #[test]
    fn duplicate_keys_in_one_batch_are_created_once() {
        let generated = vec![instance("a", 1), instance("a", 1)];
        let result = plan(&HashSet::new(), generated);
        assert_eq!(result.to_create.len(), 1);
        assert_eq!(result.to_skip.len(), 1);
    }

    #[test]
    fn unrelated_existing_keys_are_ignored() {
        let existing: HashSet<SourceKey> = ["someone else's key".into()].into_iter().collect();
        let result = plan(&existing, vec![instance("a", 1)]);
        assert_eq!(result.to_create.len(), 1);
    }

    #[test]
    fn entries_list_creates_first() {
        let generated = vec![instance("a", 1), instance("b", 2)];
        let existing: HashSet<SourceKey> = [generated[0].source_key.clone()].into_iter().collect();
        let result = plan(&existing, generated);

        let actions: Vec<(PlanAction, &str)> = result
            .entries()
            .map(|(action, i)| (action, i.event_name.as_str()))
            .collect();
        assert_eq!(actions, vec![(PlanAction::Create, "b"), (PlanAction::Skip, "a")]);
        assert_eq!(PlanAction::Create.to_string(), "+");
    }
}
