//! Calendar display commands.

use clap::ValueEnum;
use daybrief_core::calendar::Event;
use daybrief_core::sources::{CalendarSource, CompositeCalendar};
use daybrief_core::storage::Config;

/// Range covered by the calendar command.
#[derive(Clone, Copy, ValueEnum)]
pub enum Range {
    Day,
    Week,
}

/// Show events as fetched. Out-of-office reconciliation only applies
/// when compiling briefing and planning prompts.
pub fn run(range: Range, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let calendar = CompositeCalendar::from_config(&config);
    let today = chrono::Local::now().date_naive();

    let (events, empty_msg) = match range {
        Range::Day => (calendar.fetch_events(today, 1)?, "No events today."),
        Range::Week => (calendar.fetch_events(today, 7)?, "No events this week."),
    };
    show_events(&events, json, empty_msg)
}

fn show_events(
    events: &[Event],
    json: bool,
    empty_msg: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let items: Vec<serde_json::Value> = events
            .iter()
            .map(|e| {
                serde_json::json!({
                    "title": e.title,
                    "start": e.start,
                    "end": e.end,
                    "location": e.location,
                    "calendar": e.calendar,
                    "all_day": e.all_day,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{empty_msg}");
        return Ok(());
    }

    let mut current_date = None;
    for event in events {
        let event_date = event.start.date();
        if current_date != Some(event_date) {
            if current_date.is_some() {
                println!();
            }
            println!("### {}", event_date.format("%A, %B %d"));
            current_date = Some(event_date);
        }
        let loc = if event.location.is_empty() {
            String::new()
        } else {
            format!(" @ {}", event.location)
        };
        println!("  {:<8} {}{loc}", event.format_time(), event.title);
    }
    Ok(())
}
