//! Defines the JSON protocol used for communication between remindr
//! and provider binaries over stdin/stdout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::generate::{ReminderInstance, SourceKey};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListCalendars,
    ReadSheet,
    ListReminderKeys,
    CreateReminder,
}

/// Request sent from remindr to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to remindr.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data })
            .unwrap_or_else(|e| Response::error(&format!("Failed to serialize response: {e}")))
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        let response = Response::<()>::Error {
            error: msg.to_string(),
        };
        // A struct of one String always serializes
        serde_json::to_string(&response).unwrap_or_default()
    }
}

/// Run the provider's interactive login. Responds with the account identifier.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String;
    fn command() -> Command {
        Command::Authenticate
    }
}

/// A calendar the authenticated account can write to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCalendars {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for ListCalendars {
    type Response = Vec<CalendarInfo>;
    fn command() -> Command {
        Command::ListCalendars
    }
}

/// Read a cell range (A1 notation) as a grid of display strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadSheet {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub spreadsheet_id: String,
    pub range: String,
}

impl ProviderCommand for ReadSheet {
    type Response = Vec<Vec<String>>;
    fn command() -> Command {
        Command::ReadSheet
    }
}

/// List source keys of reminders already created in a date window.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListReminderKeys {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ProviderCommand for ListReminderKeys {
    type Response = Vec<SourceKey>;
    fn command() -> Command {
        Command::ListReminderKeys
    }
}

/// The calendar-facing part of a reminder instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub source_key: SourceKey,
}

impl From<&ReminderInstance> for ReminderEvent {
    fn from(instance: &ReminderInstance) -> Self {
        ReminderEvent {
            title: instance.title.clone(),
            description: instance.description.clone(),
            date: instance.reminder_date,
            source_key: instance.source_key.clone(),
        }
    }
}

/// Create an all-day reminder event. Responds with the new event's id.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReminder {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub reminder: ReminderEvent,
}

impl ProviderCommand for CreateReminder {
    type Response = String;
    fn command() -> Command {
        Command::CreateReminder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_snake_case_commands() {
        let request = Request {
            command: Command::ListReminderKeys,
            params: serde_json::json!({}),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"command\":\"list_reminder_keys\""));
    }

    #[test]
    fn responses_are_tagged_by_status() {
        let ok = Response::success(vec!["k1".to_string()]);
        assert_eq!(ok, r#"{"status":"success","data":["k1"]}"#);

        let err = Response::error("boom");
        assert_eq!(err, r#"{"status":"error","error":"boom"}"#);

        let parsed: Response<Vec<SourceKey>> = serde_json::from_str(&ok).unwrap();
        assert!(matches!(parsed, Response::Success { data } if data == vec![SourceKey::from("k1")]));
    }

    #[test]
    fn remote_config_is_flattened_into_params() {
        let mut remote_config = serde_json::Map::new();
        remote_config.insert("google_account".into(), "me@example.com".into());

        let cmd = CreateReminder {
            remote_config,
            reminder: ReminderEvent {
                title: "Buy card".into(),
                description: String::new(),
                date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                source_key: "k".into(),
            },
        };

        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["google_account"], "me@example.com");
        assert_eq!(value["reminder"]["date"], "2025-06-01");
        assert_eq!(value["reminder"]["source_key"], "k");
    }
}
