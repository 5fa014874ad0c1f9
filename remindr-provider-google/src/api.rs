//! Thin REST client for the two Google APIs remindr needs:
//! Sheets v4 (read values) and Calendar v3 (calendar list, events).

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use remindr_core::SourceKey;
use remindr_core::remote::protocol::{CalendarInfo, ReminderEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";
const CALENDAR_BASE: &str = "https://www.googleapis.com/calendar/v3/";

/// Private extended property marking an event as created by remindr.
pub const MARKER_PROPERTY: &str = "remindr";
/// Private extended property holding the reminder's source key.
pub const SOURCE_KEY_PROPERTY: &str = "remindr_source_key";

pub struct GoogleClient {
    http: reqwest::Client,
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListPage {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarListEntry {
    id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    primary: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<EventDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<EventDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transparency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extended_properties: Option<ExtendedProperties>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EventDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ExtendedProperties {
    #[serde(default)]
    private: HashMap<String, String>,
}

/// Sheets hands back formatted strings, but numbers and booleans can slip
/// through for unformatted cells.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl GoogleEvent {
    fn for_reminder(reminder: &ReminderEvent) -> Result<Self> {
        let end = reminder
            .date
            .checked_add_days(Days::new(1))
            .context("Reminder date out of range")?;

        let mut private = HashMap::new();
        private.insert(MARKER_PROPERTY.to_string(), "1".to_string());
        private.insert(SOURCE_KEY_PROPERTY.to_string(), reminder.source_key.to_string());

        Ok(GoogleEvent {
            id: None,
            summary: Some(reminder.title.clone()),
            description: (!reminder.description.is_empty()).then(|| reminder.description.clone()),
            start: Some(EventDate {
                date: Some(reminder.date),
            }),
            end: Some(EventDate { date: Some(end) }),
            transparency: Some("transparent".to_string()),
            extended_properties: Some(ExtendedProperties { private }),
        })
    }

    fn source_key(&self) -> Option<SourceKey> {
        self.extended_properties
            .as_ref()?
            .private
            .get(SOURCE_KEY_PROPERTY)
            .map(|key| SourceKey::from(key.as_str()))
    }
}

fn rfc3339_midnight(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

impl GoogleClient {
    pub fn new(access_token: &str) -> Self {
        GoogleClient {
            http: reqwest::Client::new(),
            access_token: access_token.to_string(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url.path()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Google API returned {}: {}", status, error_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url.path()))
    }

    pub async fn read_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let mut url = Url::parse(SHEETS_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid Sheets base URL"))?
            .pop_if_empty()
            .extend([spreadsheet_id, "values", range]);

        let body: ValueRange = self
            .get_json(url)
            .await
            .with_context(|| format!("Failed to read range '{}'", range))?;

        let rows: Vec<Vec<String>> = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();

        info!(range, rows = rows.len(), "read sheet");
        Ok(rows)
    }

    pub async fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = Url::parse(CALENDAR_BASE)?.join("users/me/calendarList")?;
            url.query_pairs_mut().append_pair("minAccessRole", "writer");
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page: CalendarListPage = self.get_json(url).await.context("Failed to fetch calendars")?;
            calendars.extend(page.items.into_iter().map(|entry| CalendarInfo {
                id: entry.id,
                name: entry.summary,
                primary: entry.primary,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(calendars)
    }

    fn events_url(calendar_id: &str) -> Result<Url> {
        let mut url = Url::parse(CALENDAR_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid Calendar base URL"))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    /// Source keys of remindr events whose dates touch `[from, to]`.
    pub async fn list_reminder_keys(
        &self,
        calendar_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SourceKey>> {
        // One day of slack either side for calendars in far-off time zones
        let time_min = from.checked_sub_days(Days::new(1)).unwrap_or(from);
        let time_max = to.checked_add_days(Days::new(2)).unwrap_or(to);

        let mut keys = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = Self::events_url(calendar_id)?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("privateExtendedProperty", &format!("{}=1", MARKER_PROPERTY))
                    .append_pair("timeMin", &rfc3339_midnight(time_min))
                    .append_pair("timeMax", &rfc3339_midnight(time_max))
                    .append_pair("singleEvents", "true")
                    .append_pair("showDeleted", "false")
                    .append_pair("maxResults", "2500");
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: EventsPage = self.get_json(url).await.context("Failed to list events")?;
            keys.extend(page.items.iter().filter_map(GoogleEvent::source_key));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(calendar = calendar_id, count = keys.len(), "listed existing reminders");
        Ok(keys)
    }

    /// Insert an all-day reminder event. Returns Google's event id.
    pub async fn insert_reminder(&self, calendar_id: &str, reminder: &ReminderEvent) -> Result<String> {
        let url = Self::events_url(calendar_id)?;
        let body = GoogleEvent::for_reminder(reminder)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to create event: {}", reminder.title))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to create event '{}' ({}): {}", reminder.title, status, error_text);
        }

        let created: GoogleEvent = response
            .json()
            .await
            .context("Failed to parse created event")?;

        created
            .id
            .ok_or_else(|| anyhow::anyhow!("Google returned an event without an id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder() -> ReminderEvent {
        ReminderEvent {
            title: "Buy birthday card for John Smith".into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            source_key: SourceKey::from("John's Birthday|birthday_with_card|-14|2026-01-14"),
        }
    }

    #[test]
    fn reminder_body_is_an_all_day_tagged_event() {
        let body = serde_json::to_value(GoogleEvent::for_reminder(&reminder()).unwrap()).unwrap();

        assert_eq!(body["start"]["date"], "2025-12-31");
        assert_eq!(body["end"]["date"], "2026-01-01");
        assert_eq!(body["extendedProperties"]["private"]["remindr"], "1");
        assert_eq!(
            body["extendedProperties"]["private"]["remindr_source_key"],
            "John's Birthday|birthday_with_card|-14|2026-01-14"
        );
        assert!(body.get("description").is_none());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn source_key_is_read_back_from_listed_events() {
        let page: EventsPage = serde_json::from_str(
            r#"{
                "items": [
                    {"id": "a", "extendedProperties": {"private": {"remindr": "1", "remindr_source_key": "k1"}}},
                    {"id": "b", "summary": "not ours"}
                ],
                "nextPageToken": "p2"
            }"#,
        )
        .unwrap();

        let keys: Vec<SourceKey> = page.items.iter().filter_map(GoogleEvent::source_key).collect();
        assert_eq!(keys, vec![SourceKey::from("k1")]);
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));
    }

    #[test]
    fn sheet_cells_become_strings() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range": "Templates!A2:Q", "values": [["bill", "", -3, true]]}"#).unwrap();
        let row: Vec<String> = range.values.into_iter().next().unwrap().into_iter().map(cell_text).collect();
        assert_eq!(row, vec!["bill", "", "-3", "true"]);
    }

    #[test]
    fn empty_range_has_no_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "Templates!A2:Q"}"#).unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn ids_are_path_encoded() {
        let url = GoogleClient::events_url("family#group@group.calendar.google.com").unwrap();
        assert!(url.as_str().starts_with("https://www.googleapis.com/calendar/v3/calendars/family%23group@"));
        assert!(url.as_str().ends_with("/events"));
    }
}
