//! Out-of-office deduplication across merged calendars.
//!
//! People mirror OOO blocks into several calendars, and an all-day OOO
//! marker makes the rest of that calendar's day moot. Both rules below
//! are evaluated against the original event set, so one drop can never
//! cascade into another, and survivors keep their incoming order.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::event::Event;

/// Title starts with "ooo" or "out of office" as a leading word,
/// case-insensitive.
fn is_ooo_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    for pattern in ["out of office", "ooo"] {
        if let Some(rest) = lower.strip_prefix(pattern) {
            if rest.chars().next().map_or(true, |c| !c.is_alphanumeric()) {
                return true;
            }
        }
    }
    false
}

/// Temporal overlap, substituting the start for a missing end.
fn overlaps(a: &Event, b: &Event) -> bool {
    let a_end = a.end.unwrap_or(a.start);
    let b_end = b.end.unwrap_or(b.start);
    a.start < b_end && b.start < a_end
}

/// Drop OOO events that duplicate information already on the calendar.
///
/// Rule 1: an OOO-titled event overlapping any event from a different
/// calendar is redundant. Non-OOO events are never dropped by this rule.
///
/// Rule 2: when a calendar carries an all-day OOO event, every other
/// event from that calendar on that date is dropped; only all-day OOO
/// events themselves are exempt.
///
/// Applying the pass a second time changes nothing.
pub fn drop_redundant_ooo(events: &[Event]) -> Vec<Event> {
    let all_day_ooo: HashSet<(&str, NaiveDate)> = events
        .iter()
        .filter(|e| e.all_day && is_ooo_title(&e.title))
        .map(|e| (e.calendar.as_str(), e.start.date()))
        .collect();

    let mut kept = Vec::new();
    for (i, event) in events.iter().enumerate() {
        if is_ooo_title(&event.title) {
            let covered_elsewhere = events.iter().enumerate().any(|(j, other)| {
                j != i && other.calendar != event.calendar && overlaps(event, other)
            });
            if covered_elsewhere {
                continue;
            }
        }

        let is_all_day_ooo = event.all_day && is_ooo_title(&event.title);
        if !is_all_day_ooo
            && all_day_ooo.contains(&(event.calendar.as_str(), event.start.date()))
        {
            continue;
        }

        kept.push(event.clone());
    }
    kept
}
