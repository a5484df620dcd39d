//! Briefing assembly and markdown rendering.
//!
//! `assemble_briefing` is the composition point of the engine: tasks get
//! classified and bucketed, events turn into free slots, and the result is
//! a single immutable snapshot for one date. Rendering helpers turn that
//! snapshot into the markdown sections the prompt layer embeds.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::calendar::{find_free_slots, Event, TimeSlot};
use crate::task::{categorize_tasks, filter_actionable, sort_by_priority, Task};

/// Urgency window, in days, used when labelling individual lines.
const LABEL_URGENT_DAYS: i64 = 3;

/// Minimum slot length surfaced in briefings and plans, in minutes.
pub const MIN_SLOT_MINUTES: i64 = 30;

/// Everything a daily briefing needs, computed once per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingData {
    /// Date the briefing is for
    pub date: NaiveDate,
    /// Weekday name, e.g. `Wednesday`
    pub day_of_week: String,
    /// Actionable tasks from configured work lists, sorted
    pub work_tasks: Vec<Task>,
    /// Actionable tasks from configured personal lists, sorted
    pub personal_tasks: Vec<Task>,
    /// Actionable tasks from any other list, sorted
    pub other_tasks: Vec<Task>,
    /// The day's events, as passed in
    pub events: Vec<Event>,
    /// Free slots within the configured work hours
    pub free_slots: Vec<TimeSlot>,
    /// Whether `as_of` fell inside the work-hour window
    pub is_work_hours: bool,
    /// Display form of the work-hour window, `HH:00-HH:00`
    pub work_hours_str: String,
}

/// Build the briefing snapshot for the date of `as_of`.
///
/// The three task lists partition the actionable set: work lists are
/// checked before personal ones, anything else lands in other. Free
/// slots use a fixed 30 minute floor at this layer.
#[allow(clippy::too_many_arguments)]
pub fn assemble_briefing(
    tasks: &[Task],
    events: &[Event],
    work_task_lists: &[String],
    personal_task_lists: &[String],
    work_start: u32,
    work_end: u32,
    as_of: NaiveDateTime,
    urgent_days: i64,
) -> BriefingData {
    let today = as_of.date();

    let actionable = filter_actionable(tasks, urgent_days, today);
    let (work, personal, other) =
        categorize_tasks(&actionable, work_task_lists, personal_task_lists);

    let free_slots = find_free_slots(events, work_start, work_end, MIN_SLOT_MINUTES, Some(today));

    let is_work_hours = as_of.hour() >= work_start && as_of.hour() < work_end;

    BriefingData {
        date: today,
        day_of_week: as_of.format("%A").to_string(),
        work_tasks: sort_by_priority(&work, today),
        personal_tasks: sort_by_priority(&personal, today),
        other_tasks: sort_by_priority(&other, today),
        events: events.to_vec(),
        free_slots,
        is_work_hours,
        work_hours_str: format!("{work_start:02}:00-{work_end:02}:00"),
    }
}

/// One task as a briefing line: `- [<label>] <title> (<urgency>, project: <name>)`.
///
/// Urgency reads `OVERDUE by <n>d`, `due TODAY` or `due in <n>d`, and is
/// empty for undated tasks.
pub fn format_task_line(task: &Task, as_of: NaiveDate) -> String {
    let urgency = match task.days_until_due(as_of) {
        Some(days) if days < 0 => format!("OVERDUE by {}d", -days),
        Some(0) => "due TODAY".to_string(),
        Some(days) => format!("due in {days}d"),
        None => String::new(),
    };
    format!(
        "- [{}] {} ({}, project: {})",
        task.quadrant_label(LABEL_URGENT_DAYS, as_of),
        task.title,
        urgency,
        task.project_name
    )
}

/// One note as a briefing line: `- <title> (<when>, project: <name>)`.
pub fn format_note_line(task: &Task, as_of: NaiveDate) -> String {
    let when = match task.days_until_due(as_of) {
        Some(days) if days < 0 => format!("since {}d ago", -days),
        Some(0) => "today".to_string(),
        Some(days) => format!("in {days}d"),
        None => String::new(),
    };
    format!("- {} ({}, project: {})", task.title, when, task.project_name)
}

/// One event as a briefing line: `- <time>[ - HH:MM] <title>[ @ <location>]`.
pub fn format_event_line(event: &Event) -> String {
    let mut line = format!("- {}", event.format_time());
    if !event.all_day {
        if let Some(end) = event.end {
            line.push_str(&format!(" - {}", end.naive_local().format("%H:%M")));
        }
    }
    line.push(' ');
    line.push_str(&event.title);
    if !event.location.is_empty() {
        line.push_str(&format!(" @ {}", event.location));
    }
    line
}

/// Rendered markdown sections of a briefing.
#[derive(Debug, Clone)]
pub struct BriefingSections {
    pub tasks: String,
    pub calendar: String,
    pub free_slots: String,
    pub time_context: String,
}

/// Render a briefing snapshot into its markdown sections.
pub fn format_briefing_sections(data: &BriefingData) -> BriefingSections {
    let mut task_lines: Vec<String> = Vec::new();
    for (heading, bucket) in [
        ("Work Tasks", &data.work_tasks),
        ("Personal Tasks", &data.personal_tasks),
        ("Other", &data.other_tasks),
    ] {
        if !task_lines.is_empty() {
            task_lines.push(String::new());
        }
        task_lines.push(format!("### {heading}"));
        if bucket.is_empty() {
            task_lines.push("None".to_string());
        } else {
            task_lines.extend(bucket.iter().map(|t| format_task_line(t, data.date)));
        }
    }

    let calendar = if data.events.is_empty() {
        "No events today.".to_string()
    } else {
        data.events
            .iter()
            .map(format_event_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let free_slots = if data.free_slots.is_empty() {
        "No free slots today.".to_string()
    } else {
        data.free_slots
            .iter()
            .map(|s| format!("- {}", s.format()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let (in_out, focus) = if data.is_work_hours {
        ("during", "work")
    } else {
        ("outside", "personal")
    };
    let time_context = format!(
        "Currently {in_out} work hours ({}). Focus on {focus} tasks.",
        data.work_hours_str
    );

    BriefingSections {
        tasks: task_lines.join("\n"),
        calendar,
        free_slots,
        time_context,
    }
}
