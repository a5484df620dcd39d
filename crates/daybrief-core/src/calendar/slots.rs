//! Free-slot computation over a work day.
//!
//! A single forward sweep over the day's timed events. The cursor only
//! ever moves forward, so emitted slots never overlap each other or any
//! event, whatever overlap structure the input has.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::event::{Event, EventTime};

/// An open interval of free time within the work day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: EventTime,
    pub end: EventTime,
}

impl TimeSlot {
    /// Slot length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.start.minutes_until(&self.end)
    }

    /// Render as `HH:MM-HH:MM (N min)`.
    pub fn format(&self) -> String {
        format!(
            "{}-{} ({} min)",
            self.start.naive_local().format("%H:%M"),
            self.end.naive_local().format("%H:%M"),
            self.duration_minutes()
        )
    }

    /// Whether `at` falls inside the slot (start inclusive, end exclusive).
    pub fn contains(&self, at: &EventTime) -> bool {
        *at >= self.start && *at < self.end
    }

    /// Whether two slots share any time.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Find free slots of at least `min_duration` minutes between events.
///
/// The day under consideration is `target_date` when given, else the date
/// of the first event, else the current date. Only timed events occupy
/// time; all-day and open-ended events are ignored. Events are clamped to
/// the `work_start..work_end` window and anything wholly outside it is
/// skipped. Work-hour values outside 0-23 make the window unconstructible
/// and yield no slots.
pub fn find_free_slots(
    events: &[Event],
    work_start: u32,
    work_end: u32,
    min_duration: i64,
    target_date: Option<NaiveDate>,
) -> Vec<TimeSlot> {
    let target = target_date
        .or_else(|| events.first().map(|e| e.start.date()))
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut timed: Vec<&Event> = events
        .iter()
        .filter(|e| !e.all_day && e.end.is_some())
        .collect();
    timed.sort_by_key(|e| e.start);

    // Day boundaries take the awareness of the first timed event so every
    // comparison below is like-for-like.
    let reference = timed
        .first()
        .map(|e| e.start)
        .or_else(|| events.first().map(|e| e.start))
        .unwrap_or_else(|| EventTime::Local(target.and_time(NaiveTime::MIN)));

    let day_start = match reference.at_hour(target, work_start) {
        Some(t) => t,
        None => return Vec::new(),
    };
    let day_end = match reference.at_hour(target, work_end) {
        Some(t) => t,
        None => return Vec::new(),
    };

    let mut slots = Vec::new();
    let mut current = day_start;

    for event in &timed {
        let end = match event.end {
            Some(end) => end,
            None => continue,
        };
        if end <= day_start || event.start >= day_end {
            continue;
        }

        let clamped_start = event.start.max(day_start);
        let clamped_end = end.min(day_end);

        if clamped_start > current {
            let gap = TimeSlot {
                start: current,
                end: clamped_start,
            };
            if gap.duration_minutes() >= min_duration {
                slots.push(gap);
            }
        }
        current = current.max(clamped_end);
    }

    if current < day_end {
        let gap = TimeSlot {
            start: current,
            end: day_end,
        };
        if gap.duration_minutes() >= min_duration {
            slots.push(gap);
        }
    }

    slots
}
