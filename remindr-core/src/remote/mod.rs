pub mod protocol;
pub mod provider;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RemindrResult;
use crate::generate::{ReminderInstance, SourceKey};
use crate::record::ImportantDateRecord;
use crate::remote::protocol::{
    CalendarInfo, CreateReminder, ListCalendars, ListReminderKeys, ReadSheet, ReminderEvent,
};
use crate::remote::provider::Provider;
use crate::sheet::{SheetLayout, parse_important_dates, parse_templates};
use crate::sync::{CalendarStore, DateWindow};
use crate::template::TemplateCatalog;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RemoteConfig(pub HashMap<String, toml::Value>);

impl From<&RemoteConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &RemoteConfig) -> Self {
        config
            .0
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

/// Provider plus its parameters (e.g. Google account and calendar id).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Remote {
    pub provider: Provider,
    #[serde(flatten)]
    pub config: RemoteConfig,
}

impl Remote {
    fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config)
    }

    pub fn new(provider: Provider, config: RemoteConfig) -> Self {
        Remote { provider, config }
    }

    /// Looks for a `{provider}_account` field in the config, e.g. `google_account`.
    pub fn account_identifier(&self) -> Option<&str> {
        self.param("account")
    }

    /// Calendar reminders are written to (`{provider}_calendar_id`).
    pub fn calendar_id(&self) -> Option<&str> {
        self.param("calendar_id")
    }

    /// Same remote, writing to a different calendar.
    pub fn with_calendar_id(mut self, calendar_id: &str) -> Self {
        let key = format!("{}_calendar_id", self.provider.name());
        self.config
            .0
            .insert(key, toml::Value::String(calendar_id.to_string()));
        self
    }

    fn param(&self, suffix: &str) -> Option<&str> {
        let key = format!("{}_{}", self.provider.name(), suffix);
        self.config.0.get(&key).and_then(|v| v.as_str())
    }

    pub async fn list_calendars(&self) -> RemindrResult<Vec<CalendarInfo>> {
        self.provider
            .call(ListCalendars {
                remote_config: self.remote_config(),
            })
            .await
    }

    pub async fn read_sheet(&self, spreadsheet_id: &str, range: &str) -> RemindrResult<Vec<Vec<String>>> {
        self.provider
            .call(ReadSheet {
                remote_config: self.remote_config(),
                spreadsheet_id: spreadsheet_id.to_string(),
                range: range.to_string(),
            })
            .await
    }

    /// Read and parse both sheets of the spreadsheet.
    pub async fn load_spreadsheet(
        &self,
        spreadsheet_id: &str,
        layout: &SheetLayout,
    ) -> RemindrResult<(Vec<ImportantDateRecord>, TemplateCatalog)> {
        let date_rows = self
            .read_sheet(spreadsheet_id, &layout.important_dates_range())
            .await?;
        let template_rows = self.read_sheet(spreadsheet_id, &layout.templates_range()).await?;

        debug!(
            dates = date_rows.len(),
            templates = template_rows.len(),
            "read spreadsheet rows"
        );

        let records = parse_important_dates(&layout.important_dates, &date_rows)?;
        let catalog = TemplateCatalog::load(parse_templates(&layout.templates, &template_rows)?)?;

        Ok((records, catalog))
    }
}

impl CalendarStore for Remote {
    async fn list_existing_keys(&self, window: DateWindow) -> RemindrResult<HashSet<SourceKey>> {
        let keys = self
            .provider
            .call(ListReminderKeys {
                remote_config: self.remote_config(),
                from: window.from,
                to: window.to,
            })
            .await?;

        Ok(keys.into_iter().collect())
    }

    async fn create_event(&self, instance: &ReminderInstance) -> RemindrResult<String> {
        self.provider
            .call(CreateReminder {
                remote_config: self.remote_config(),
                reminder: ReminderEvent::from(instance),
            })
            .await
    }
}
