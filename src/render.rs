//! Terminal rendering for remindr-core types.
//!
//! Extension traits that add colored output using owo_colors.

use owo_colors::OwoColorize;
use remindr_core::ReminderInstance;
use remindr_core::remote::protocol::CalendarInfo;
use remindr_core::sync::{ApplyStats, PlanAction, SyncPlan};

/// Above this many entries, lists collapse to counts unless verbose.
const COMPACT_THRESHOLD: usize = 10;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for PlanAction {
    fn render(&self) -> String {
        let symbol = self.to_string();
        match self {
            PlanAction::Create => symbol.green().to_string(),
            PlanAction::Skip => symbol.dimmed().to_string(),
        }
    }
}

impl Render for ReminderInstance {
    fn render(&self) -> String {
        format!(
            "{}  {} {}",
            self.reminder_date.format("%Y-%m-%d"),
            self.title,
            format!("({})", self.event_name).dimmed()
        )
    }
}

impl Render for CalendarInfo {
    fn render(&self) -> String {
        let primary = if self.primary { " (primary)" } else { "" };
        format!("📅 {}{} {}", self.name, primary.dimmed(), self.id.dimmed())
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Render generated reminders, one per line, or a count when there are many.
pub fn render_instances(instances: &[ReminderInstance], verbose: bool) -> String {
    if instances.is_empty() {
        return "   No reminders in range".dimmed().to_string();
    }

    if !verbose && instances.len() > COMPACT_THRESHOLD {
        let events: std::collections::HashSet<&str> =
            instances.iter().map(|i| i.event_name.as_str()).collect();
        let first = instances.iter().map(|i| i.reminder_date).min();
        let last = instances.iter().map(|i| i.reminder_date).max();

        let mut line = format!(
            "   {} {} for {} {}",
            instances.len(),
            pluralize("reminder", instances.len()),
            events.len(),
            pluralize("event", events.len())
        );
        if let (Some(first), Some(last)) = (first, last) {
            line.push_str(&format!(", {} to {}", first, last).dimmed().to_string());
        }
        return line;
    }

    instances
        .iter()
        .map(|i| format!("   {}", i.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub trait PlanRender {
    fn render(&self, verbose: bool) -> String;
}

impl PlanRender for SyncPlan {
    fn render(&self, verbose: bool) -> String {
        if self.is_empty() {
            return "   No reminders in range".dimmed().to_string();
        }

        if verbose || self.len() <= COMPACT_THRESHOLD {
            return self
                .entries()
                .map(|(action, instance)| match action {
                    PlanAction::Create => format!("   {} {}", action.render(), instance.render()),
                    PlanAction::Skip => format!("   {} {}", action.render(), instance.render().dimmed()),
                })
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut lines = Vec::new();
        let creates = self.to_create.len();
        let skips = self.to_skip.len();

        if creates > 0 {
            let label = format!("({} new {})", creates, pluralize("reminder", creates));
            lines.push(format!("   {} {}", PlanAction::Create.render(), label.green()));
        }
        if skips > 0 {
            let label = format!("({} already on calendar)", skips);
            lines.push(format!("   {} {}", PlanAction::Skip.render(), label.dimmed()));
        }

        lines.join("\n")
    }
}

impl Render for ApplyStats {
    fn render(&self) -> String {
        let created = format!("Created {} {}", self.created, pluralize("reminder", self.created));

        if self.is_complete() {
            return created.green().to_string();
        }

        let mut lines = vec![
            created,
            format!("{} failed:", self.failed.len()).red().to_string(),
        ];
        for (key, error) in &self.failed {
            lines.push(format!("   {} {}", key.dimmed(), error.red()));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use remindr_core::SourceKey;

    fn instance(event: &str, day: u32) -> ReminderInstance {
        let date = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        ReminderInstance {
            event_name: event.to_string(),
            category: "c".to_string(),
            occurrence_date: date,
            offset_days: 0,
            reminder_date: date,
            title: format!("Remember {event}"),
            description: String::new(),
            source_key: SourceKey::new(event, "c", 0, date, 0),
        }
    }

    #[test]
    fn short_lists_show_every_reminder() {
        let instances: Vec<_> = (1..=3).map(|d| instance("Trip", d)).collect();
        let out = render_instances(&instances, false);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("Remember Trip"));
    }

    #[test]
    fn long_lists_collapse_unless_verbose() {
        let instances: Vec<_> = (1..=12).map(|d| instance(&format!("e{}", d % 2), d)).collect();

        let compact = render_instances(&instances, false);
        assert_eq!(compact.lines().count(), 1);
        assert!(compact.contains("12 reminders for 2 events"));

        assert_eq!(render_instances(&instances, true).lines().count(), 12);
    }

    #[test]
    fn compact_plan_counts_both_halves() {
        let plan = SyncPlan {
            to_create: (1..=8).map(|d| instance("a", d)).collect(),
            to_skip: (9..=12).map(|d| instance("b", d)).collect(),
        };
        let out = plan.render(false);
        assert!(out.contains("8 new reminders"));
        assert!(out.contains("4 already on calendar"));
    }

    #[test]
    fn one_reminder_is_singular() {
        let stats = ApplyStats {
            created: 1,
            failed: vec![],
        };
        assert!(stats.render().contains("Created 1 reminder"));
        assert!(!stats.render().contains("reminders"));
    }
}
