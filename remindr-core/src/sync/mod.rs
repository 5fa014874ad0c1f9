//! Reconciling generated reminders with what the calendar already holds.

mod apply;
mod plan;
mod store;

pub use apply::{ApplyStats, apply};
pub use plan::{PlanAction, SyncPlan, plan};
pub use store::{CalendarStore, DateWindow};
