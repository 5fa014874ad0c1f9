//! Error types for remindr.

use thiserror::Error;

/// Errors that can occur while loading data, generating reminders, or
/// talking to a provider.
#[derive(Error, Debug)]
pub enum RemindrError {
    #[error("No template named '{category}'{}", used_by(.event))]
    UnknownTemplate {
        category: String,
        event: Option<String>,
    },

    #[error("Template '{0}' is defined more than once")]
    DuplicateTemplate(String),

    #[error("Template '{0}' has no reminders")]
    EmptyTemplate(String),

    #[error("Invalid recurrence '{value}' for '{event}'. Expected none, yearly or monthly")]
    InvalidRecurrence { value: String, event: String },

    #[error("{sheet} row {row}: {reason}")]
    InvalidRow {
        sheet: String,
        row: usize,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn used_by(event: &Option<String>) -> String {
    match event {
        Some(event) => format!(" (used by '{event}')"),
        None => String::new(),
    }
}

/// Result type alias for remindr operations.
pub type RemindrResult<T> = Result<T, RemindrError>;
