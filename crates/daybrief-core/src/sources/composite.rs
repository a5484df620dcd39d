//! Merges events from every configured calendar account.

use chrono::NaiveDate;

use super::gcal::GcalcliCalendar;
use super::traits::CalendarSource;
use crate::calendar::{filter_events_by_date, sort_events_by_start, Event};
use crate::error::SourceError;
use crate::storage::Config;

/// Calendar source that fans out to one gcalcli adapter per account.
pub struct CompositeCalendar {
    accounts: Vec<GcalcliCalendar>,
}

impl CompositeCalendar {
    /// One adapter per configured account, or a single default-profile
    /// adapter when no accounts are configured.
    pub fn from_config(config: &Config) -> Self {
        let accounts = if config.calendar_accounts.is_empty() {
            vec![GcalcliCalendar::new()]
        } else {
            config
                .calendar_accounts
                .iter()
                .map(GcalcliCalendar::for_account)
                .collect()
        };
        Self { accounts }
    }
}

impl CalendarSource for CompositeCalendar {
    fn fetch_events(&self, start: NaiveDate, days: u32) -> Result<Vec<Event>, SourceError> {
        let mut events = Vec::new();
        for account in &self.accounts {
            events.extend(account.fetch_events(start, days)?);
        }
        let end = start + chrono::Duration::days(i64::from(days.saturating_sub(1)));
        Ok(sort_events_by_start(&filter_events_by_date(
            &events, start, end,
        )))
    }

    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<Event>, SourceError> {
        let mut events = Vec::new();
        for account in &self.accounts {
            events.extend(account.fetch_day(date)?);
        }
        Ok(sort_events_by_start(&events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CalendarAccount;

    #[test]
    fn empty_config_gets_default_account() {
        let composite = CompositeCalendar::from_config(&Config::default());
        assert_eq!(composite.accounts.len(), 1);
    }

    #[test]
    fn one_adapter_per_configured_account() {
        let mut config = Config::default();
        config.calendar_accounts = vec![
            CalendarAccount {
                config_folder: "~/.gcalcli-work".to_string(),
                label: Some("Work".to_string()),
                calendars: vec![],
            },
            CalendarAccount {
                config_folder: "~/.gcalcli-home".to_string(),
                label: None,
                calendars: vec!["Family".to_string()],
            },
        ];
        let composite = CompositeCalendar::from_config(&config);
        assert_eq!(composite.accounts.len(), 2);
    }
}
