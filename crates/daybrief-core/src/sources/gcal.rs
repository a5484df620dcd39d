//! Google Calendar source backed by the `gcalcli` command-line tool.
//!
//! Events come from `gcalcli agenda --tsv`; a fetch failure degrades to an
//! empty day rather than aborting the briefing.

use std::process::Stdio;
use std::time::Duration;

use chrono::NaiveDate;

use super::traits::CalendarSource;
use crate::calendar::{Event, EventTime};
use crate::error::SourceError;
use crate::storage::CalendarAccount;

const AGENDA_TIMEOUT_SECS: u64 = 30;
const GCALCLI_SOURCE: &str = "gcalcli";

/// One gcalcli invocation target: a config folder plus calendar filter.
pub struct GcalcliCalendar {
    config_folder: Option<String>,
    label: String,
    calendars: Vec<String>,
    timeout_secs: u64,
}

impl Default for GcalcliCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl GcalcliCalendar {
    /// Adapter over the default gcalcli account.
    pub fn new() -> Self {
        Self {
            config_folder: None,
            label: "Google".to_string(),
            calendars: Vec::new(),
            timeout_secs: AGENDA_TIMEOUT_SECS,
        }
    }

    /// Adapter for one configured account.
    pub fn for_account(account: &CalendarAccount) -> Self {
        let config_folder = if account.config_folder.is_empty() {
            None
        } else {
            Some(account.config_folder.clone())
        };
        Self {
            config_folder,
            label: account.display_label().to_string(),
            calendars: account.calendars.clone(),
            timeout_secs: AGENDA_TIMEOUT_SECS,
        }
    }

    fn run_agenda(&self, date: NaiveDate) -> Result<String, SourceError> {
        let mut cmd = tokio::process::Command::new("gcalcli");
        if let Some(folder) = &self.config_folder {
            cmd.arg("--config-folder").arg(folder);
        }
        for calendar in &self.calendars {
            cmd.arg("--calendar").arg(calendar);
        }
        cmd.arg("agenda")
            .arg(date.to_string())
            .arg(date.to_string())
            .arg("--tsv")
            .arg("--details")
            .arg("length")
            .stdin(Stdio::null());

        let result = tokio::runtime::Handle::current().block_on(async {
            tokio::time::timeout(Duration::from_secs(self.timeout_secs), cmd.output()).await
        });

        match result {
            Err(_) => Err(SourceError::CommandTimeout {
                command: "gcalcli".to_string(),
                timeout_secs: self.timeout_secs,
            }),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::CommandNotFound {
                    command: "gcalcli".to_string(),
                    hint: "install with 'pip install gcalcli'".to_string(),
                })
            }
            Ok(Err(e)) => Err(SourceError::CommandFailed {
                command: "gcalcli".to_string(),
                stderr: e.to_string(),
            }),
            Ok(Ok(output)) if !output.status.success() => Err(SourceError::CommandFailed {
                command: "gcalcli".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Ok(output)) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        }
    }

    /// Parse `gcalcli agenda --tsv` output into events.
    ///
    /// Columns: start date, start time, end date, end time, title, location.
    /// The first row is the header. Rows with unparseable times are skipped.
    fn parse_agenda(&self, output: &str) -> Vec<Event> {
        let mut events = Vec::new();
        for line in output.trim().lines().skip(1) {
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 5 {
                continue;
            }

            let Some(start) = EventTime::parse(&format!("{}T{}", parts[0], parts[1])) else {
                log::debug!("skipping agenda row with bad start time: {line}");
                continue;
            };
            let end = if !parts[2].is_empty() && !parts[3].is_empty() {
                match EventTime::parse(&format!("{}T{}", parts[2], parts[3])) {
                    Some(end) => Some(end),
                    None => {
                        log::debug!("skipping agenda row with bad end time: {line}");
                        continue;
                    }
                }
            } else {
                None
            };

            events.push(Event {
                title: parts[4].to_string(),
                start,
                end,
                calendar: self.label.clone(),
                location: parts.get(5).copied().unwrap_or("").to_string(),
                all_day: false,
                source: GCALCLI_SOURCE.to_string(),
            });
        }
        events
    }
}

impl CalendarSource for GcalcliCalendar {
    fn fetch_events(&self, start: NaiveDate, days: u32) -> Result<Vec<Event>, SourceError> {
        let mut events = Vec::new();
        for offset in 0..days {
            let date = start + chrono::Duration::days(i64::from(offset));
            events.extend(self.fetch_day(date)?);
        }
        Ok(events)
    }

    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<Event>, SourceError> {
        match self.run_agenda(date) {
            Ok(output) => Ok(self.parse_agenda(&output)),
            Err(e) => {
                log::warn!("gcalcli fetch for {date} failed: {e}");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> GcalcliCalendar {
        GcalcliCalendar::new()
    }

    #[test]
    fn parses_agenda_rows() {
        let tsv = "start_date\tstart_time\tend_date\tend_time\ttitle\tlocation\n\
                   2025-01-15\t09:00\t2025-01-15\t10:00\tStandup\tRoom 4\n\
                   2025-01-15\t13:00\t\t\tFocus block\n";
        let events = adapter().parse_agenda(tsv);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Standup");
        assert_eq!(events[0].location, "Room 4");
        assert_eq!(events[0].calendar, "Google");
        assert_eq!(events[0].source, "gcalcli");
        assert!(events[0].end.is_some());
        assert_eq!(events[1].title, "Focus block");
        assert!(events[1].end.is_none());
        assert_eq!(events[1].location, "");
    }

    #[test]
    fn skips_short_and_malformed_rows() {
        let tsv = "start_date\tstart_time\tend_date\tend_time\ttitle\n\
                   \n\
                   2025-01-15\t09:00\n\
                   not-a-date\t09:00\t\t\tBroken\n\
                   2025-01-15\t09:00\t2025-01-15\tbad\tBroken end\n\
                   2025-01-15\t09:00\t\t\tKept\n";
        let events = adapter().parse_agenda(tsv);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Kept");
    }

    #[test]
    fn account_label_is_attached() {
        let account = CalendarAccount {
            config_folder: "~/.gcalcli-work".to_string(),
            label: Some("Work".to_string()),
            calendars: vec!["Team".to_string()],
        };
        let adapter = GcalcliCalendar::for_account(&account);
        let tsv = "header\n2025-01-15\t09:00\t\t\tSync\n";
        let events = adapter.parse_agenda(tsv);

        assert_eq!(events[0].calendar, "Work");
    }
}
