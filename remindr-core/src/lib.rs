//! Core of the remindr ecosystem.
//!
//! Turns "important date" records and named reminder templates into
//! concrete, deterministically keyed reminder instances, and plans which
//! of them still need to be created on a calendar. Also holds the config,
//! the sheet row coercion and the provider protocol shared with
//! `remindr-provider-*` binaries.

pub mod config;
pub mod error;
pub mod generate;
pub mod ics;
pub mod record;
pub mod recurrence;
pub mod remote;
pub mod resolve;
pub mod sheet;
pub mod sync;
pub mod template;

pub use error::{RemindrError, RemindrResult};
pub use generate::{ReminderInstance, SourceKey, generate, generate_all};
pub use record::{ImportantDateRecord, Recurrence};
pub use recurrence::Horizon;
pub use template::{ReminderSpec, ReminderTemplate, TemplateCatalog};
