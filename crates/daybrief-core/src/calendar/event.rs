//! Calendar event model.
//!
//! Events merged from several calendar accounts do not agree on timestamp
//! shape: some sources emit plain local times, others carry a UTC offset.
//! `EventTime` folds both into a single type with a total order so merged
//! lists always sort and compare without failing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An event timestamp, with or without a UTC offset.
///
/// `EventTime` is read as a wall-clock value: ordering, equality and
/// duration arithmetic all use the local reading, and a retained offset
/// only affects serialization. Mixing `Local` and `Zoned` values in one
/// list is therefore always well defined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    /// Timestamp with an explicit UTC offset
    Zoned(DateTime<FixedOffset>),
    /// Plain wall-clock timestamp, no offset information
    Local(NaiveDateTime),
}

impl EventTime {
    /// Parse an ISO 8601 timestamp, with or without an offset.
    ///
    /// Accepts `2025-01-15T09:00:00+02:00`, `2025-01-15T09:00:00` and the
    /// minute-precision `2025-01-15T09:00`.
    pub fn parse(value: &str) -> Option<EventTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(EventTime::Zoned(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
            return Some(EventTime::Local(dt));
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
            .ok()
            .map(EventTime::Local)
    }

    /// Calendar date of the wall-clock reading.
    pub fn date(&self) -> NaiveDate {
        self.naive_local().date()
    }

    /// Wall-clock reading; the offset is stripped for `Zoned` values.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            EventTime::Zoned(dt) => dt.naive_local(),
            EventTime::Local(dt) => *dt,
        }
    }

    /// Timestamp at `hour:00` on `date`, in the same awareness as `self`.
    ///
    /// Used to build day boundaries that compare cleanly against this
    /// value. Hours outside 0-23 yield `None`.
    pub fn at_hour(&self, date: NaiveDate, hour: u32) -> Option<EventTime> {
        let naive = date.and_time(NaiveTime::from_hms_opt(hour, 0, 0)?);
        match self {
            EventTime::Zoned(dt) => dt
                .offset()
                .from_local_datetime(&naive)
                .single()
                .map(EventTime::Zoned),
            EventTime::Local(_) => Some(EventTime::Local(naive)),
        }
    }

    /// Whole minutes from `self` to `later`; negative when `later` is
    /// actually earlier. Sub-minute remainders are truncated.
    pub fn minutes_until(&self, later: &EventTime) -> i64 {
        later
            .naive_local()
            .signed_duration_since(self.naive_local())
            .num_minutes()
    }
}

impl PartialEq for EventTime {
    fn eq(&self, other: &Self) -> bool {
        self.naive_local() == other.naive_local()
    }
}

impl Eq for EventTime {}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.naive_local().cmp(&other.naive_local())
    }
}

impl From<NaiveDateTime> for EventTime {
    fn from(dt: NaiveDateTime) -> Self {
        EventTime::Local(dt)
    }
}

impl From<DateTime<FixedOffset>> for EventTime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        EventTime::Zoned(dt)
    }
}

/// A calendar event from any account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event title
    pub title: String,
    /// Start time
    pub start: EventTime,
    /// End time; open-ended events have none
    #[serde(default)]
    pub end: Option<EventTime>,
    /// Name of the calendar/account this event came from
    #[serde(default)]
    pub calendar: String,
    /// Location, empty when the source gives none
    #[serde(default)]
    pub location: String,
    /// All-day marker
    #[serde(default)]
    pub all_day: bool,
    /// Adapter that produced the event
    #[serde(default)]
    pub source: String,
}

impl Event {
    /// `"All day"` for all-day events, otherwise the start as `HH:MM`.
    pub fn format_time(&self) -> String {
        if self.all_day {
            "All day".to_string()
        } else {
            self.start.naive_local().format("%H:%M").to_string()
        }
    }

    /// Event length in whole minutes; `None` without an end time.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end.map(|end| self.start.minutes_until(&end))
    }
}

/// Keep events whose start date lies in `[start_date, end_date]` inclusive.
pub fn filter_events_by_date(
    events: &[Event],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<Event> {
    events
        .iter()
        .filter(|e| {
            let day = e.start.date();
            day >= start_date && day <= end_date
        })
        .cloned()
        .collect()
}

/// Sort events ascending by start time. The sort is stable, so events
/// starting at the same moment keep their incoming order.
pub fn sort_events_by_start(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.start);
    sorted
}

/// Find pairs of timed events that overlap in time.
///
/// All-day and open-ended events never conflict. Pairs come back ordered
/// by start time, each unordered pair reported once. The forward scan
/// stops at the first later event starting at or past the anchor's end,
/// which is safe because the list is sorted by start.
pub fn find_conflicts(events: &[Event]) -> Vec<(Event, Event)> {
    let mut timed: Vec<&Event> = events
        .iter()
        .filter(|e| !e.all_day && e.end.is_some())
        .collect();
    timed.sort_by_key(|e| e.start);

    let mut conflicts = Vec::new();
    for (i, anchor) in timed.iter().enumerate() {
        let anchor_end = match anchor.end {
            Some(end) => end,
            None => continue,
        };
        for later in &timed[i + 1..] {
            if later.start >= anchor_end {
                break;
            }
            conflicts.push(((*anchor).clone(), (*later).clone()));
        }
    }
    conflicts
}
