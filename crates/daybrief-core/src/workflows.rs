//! Briefing, planning and review workflows.
//!
//! Each generate function compiles a prompt from the supplied sources,
//! runs the language model, appends the output to today's journal entry
//! and returns it. The compile functions are exposed separately so the
//! prompts can be inspected without running the model, and the render
//! functions are pure so every prompt layout is testable offline.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use indoc::{formatdoc, indoc};

use crate::briefing::{
    assemble_briefing, format_briefing_sections, format_note_line, format_task_line,
    BriefingData, BriefingSections, MIN_SLOT_MINUTES,
};
use crate::calendar::{drop_redundant_ooo, find_free_slots, Event};
use crate::error::{Result, SourceError};
use crate::journal::{FileJournal, JournalStore};
use crate::recap::{determine_recap_mode, RecapMode};
use crate::sources::{CalendarSource, LlmService, TaskSource};
use crate::storage::{self, Config};
use crate::task::{
    categorize_tasks, filter_actionable, filter_notes, filter_overdue, sort_by_priority, Task,
};

/// Journal section header for the daily briefing.
pub const BRIEFING_HEADER: &str = "Morning Briefing";
/// Journal section header for the weekly plan.
pub const WEEKLY_PLAN_HEADER: &str = "Weekly Plan";
/// Journal section header for the weekly review.
pub const WEEKLY_REVIEW_HEADER: &str = "Weekly Review";
/// Journal section header the recap commands append under.
pub const RECAP_HEADER: &str = "Evening Recap";

const NOT_AUTHENTICATED_NOTE: &str = "(TickTick not authenticated)";

/// Longest morning-plan excerpt included in a recap prompt, in characters.
const PLAN_EXCERPT_CHARS: usize = 2000;

/// Open the journal at its configured location, creating the directory
/// if needed.
pub fn resolve_journal(config: &Config) -> Result<FileJournal> {
    FileJournal::new(config.journal_dir())
}

/// Compile the briefing prompt, run the model and append the output to
/// today's journal entry under [`BRIEFING_HEADER`].
pub fn generate_briefing(
    config: &Config,
    tasks: &mut dyn TaskSource,
    calendar: &dyn CalendarSource,
    llm: &dyn LlmService,
    journal: &dyn JournalStore,
    now: NaiveDateTime,
) -> Result<String> {
    let prompt = compile_briefing(config, tasks, calendar, now)?;
    let output = llm.generate(&prompt)?.trim().to_string();
    journal.append(now.date(), BRIEFING_HEADER, &output)?;
    Ok(output)
}

/// Compile the weekly plan prompt, run the model and append the output
/// under [`WEEKLY_PLAN_HEADER`].
pub fn generate_weekly_plan(
    config: &Config,
    tasks: &mut dyn TaskSource,
    calendar: &dyn CalendarSource,
    llm: &dyn LlmService,
    journal: &dyn JournalStore,
    now: NaiveDateTime,
) -> Result<String> {
    let prompt = compile_week(config, tasks, calendar, now)?;
    let output = llm.generate(&prompt)?.trim().to_string();
    journal.append(now.date(), WEEKLY_PLAN_HEADER, &output)?;
    Ok(output)
}

/// Compile the weekly review prompt, run the model and append the output
/// under [`WEEKLY_REVIEW_HEADER`].
pub fn generate_weekly_review(
    config: &Config,
    tasks: &mut dyn TaskSource,
    calendar: &dyn CalendarSource,
    llm: &dyn LlmService,
    journal: &dyn JournalStore,
    now: NaiveDateTime,
) -> Result<String> {
    let prompt = compile_review(config, tasks, calendar, journal, now.date())?;
    let output = llm.generate(&prompt)?.trim().to_string();
    journal.append(now.date(), WEEKLY_REVIEW_HEADER, &output)?;
    Ok(output)
}

/// Compile the daily briefing prompt, fetching from the given sources.
///
/// Calendar events pass through OOO reconciliation before assembly. A
/// task source that is not authenticated degrades the task section to a
/// placeholder; any other source failure propagates.
pub fn compile_briefing(
    config: &Config,
    tasks: &mut dyn TaskSource,
    calendar: &dyn CalendarSource,
    now: NaiveDateTime,
) -> Result<String> {
    let today = now.date();
    let (work_start, work_end) = config.work_hours_range();

    let events = drop_redundant_ooo(&calendar.fetch_day(today)?);
    let fetched = fetch_tasks_degraded(tasks)?;
    let task_data = fetched.is_some();
    let all_tasks = fetched.unwrap_or_default();

    let data = assemble_briefing(
        &all_tasks,
        &events,
        &config.work_task_lists,
        &config.personal_task_lists,
        work_start,
        work_end,
        now,
        config.urgent_days,
    );
    let mut sections = format_briefing_sections(&data);
    if !task_data {
        sections.tasks = NOT_AUTHENTICATED_NOTE.to_string();
    }
    let notes_md = notes_markdown(&all_tasks, config.urgent_days, today);

    let template = load_template("daily-briefing.md");
    Ok(render_briefing_prompt(
        &data,
        &sections,
        &notes_md,
        config.urgent_days,
        template.as_deref(),
    ))
}

/// Compile the weekly planning prompt, covering today through Saturday.
pub fn compile_week(
    config: &Config,
    tasks: &mut dyn TaskSource,
    calendar: &dyn CalendarSource,
    now: NaiveDateTime,
) -> Result<String> {
    let today = now.date();
    let (work_start, work_end) = config.work_hours_range();

    // Window runs through the coming Saturday, inclusive of today.
    let weekday = today.weekday().num_days_from_monday();
    let days_until_saturday = (5 + 7 - weekday) % 7;
    let days_remaining = days_until_saturday + 1;
    let end_of_saturday = today + Duration::days(i64::from(days_until_saturday));

    let events = drop_redundant_ooo(&calendar.fetch_events(today, days_remaining)?);

    let mut day_events: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    let mut calendar_lines: Vec<String> = Vec::new();
    let mut current_date = None;
    for event in &events {
        let event_date = event.start.date();
        day_events.entry(event_date).or_default().push(event.clone());
        if current_date != Some(event_date) {
            if current_date.is_some() {
                calendar_lines.push(String::new());
            }
            calendar_lines.push(format!("### {}", event_date.format("%A, %B %d")));
            current_date = Some(event_date);
        }
        let location = if event.location.is_empty() {
            String::new()
        } else {
            format!(" @ {}", event.location)
        };
        calendar_lines.push(format!(
            "- {} {}{}",
            event.format_time(),
            event.title,
            location
        ));
    }
    let calendar_md = if calendar_lines.is_empty() {
        "No events this week.".to_string()
    } else {
        calendar_lines.join("\n")
    };

    let no_events: Vec<Event> = Vec::new();
    let mut free_slot_lines: Vec<String> = Vec::new();
    for offset in 0..days_remaining {
        let date = today + Duration::days(i64::from(offset));
        if date.weekday().num_days_from_monday() >= 5 {
            continue;
        }
        let day = day_events.get(&date).unwrap_or(&no_events);
        let slots = find_free_slots(day, work_start, work_end, MIN_SLOT_MINUTES, Some(date));
        let day_label = date.format("%A, %B %d");
        if slots.is_empty() {
            free_slot_lines.push(format!("**{day_label}**: No free slots"));
        } else {
            let formatted: Vec<String> = slots.iter().map(|s| s.format()).collect();
            free_slot_lines.push(format!("**{day_label}**: {}", formatted.join(", ")));
        }
    }
    let mut free_slots_md = if free_slot_lines.is_empty() {
        "No workdays remaining this week.".to_string()
    } else {
        free_slot_lines.join("\n")
    };
    if !config.deep_work_hours.is_empty() {
        free_slots_md.push_str(&format!(
            "\n\nPreferred deep work windows: {}",
            config.deep_work_hours.join(", ")
        ));
    }

    let fetched = fetch_tasks_degraded(tasks)?;
    let task_data = fetched.is_some();
    let all_tasks = fetched.unwrap_or_default();

    let tasks_md = if task_data {
        let week_tasks: Vec<Task> = all_tasks
            .iter()
            .filter(|t| {
                !t.is_note()
                    && (t.due_date.is_some_and(|due| due <= end_of_saturday) || t.priority >= 3)
            })
            .cloned()
            .collect();
        let (work, personal, other) = categorize_tasks(
            &week_tasks,
            &config.work_task_lists,
            &config.personal_task_lists,
        );
        format!(
            "### Work Tasks\n{}\n\n### Personal Tasks\n{}\n\n### Other\n{}",
            bucket_markdown(&work, today),
            bucket_markdown(&personal, today),
            bucket_markdown(&other, today)
        )
    } else {
        NOT_AUTHENTICATED_NOTE.to_string()
    };
    let notes_md = notes_markdown(&all_tasks, i64::from(days_remaining), today);

    let template = load_template("weekly-planning.md");
    Ok(render_week_prompt(
        today,
        &calendar_md,
        &free_slots_md,
        &tasks_md,
        &notes_md,
        template.as_deref(),
    ))
}

/// Compile the weekly review prompt over the last week of journals.
///
/// The next-week calendar is shown as fetched; OOO reconciliation only
/// applies to the briefing and planning prompts.
pub fn compile_review(
    config: &Config,
    tasks: &mut dyn TaskSource,
    calendar: &dyn CalendarSource,
    journal: &dyn JournalStore,
    today: NaiveDate,
) -> Result<String> {
    let entries = journal.read_range(today - Duration::days(7), today)?;
    let accomplishments_md = if entries.is_empty() {
        "No journal entries this week.".to_string()
    } else {
        entries
            .iter()
            .map(|(date, content)| format!("### {date}\n{content}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let (overdue_md, inbox_md) = match review_task_sections(tasks, config, today) {
        Ok(pair) => pair,
        Err(e) if e.is_auth() => {
            log::warn!("task source unavailable: {e}");
            (
                NOT_AUTHENTICATED_NOTE.to_string(),
                NOT_AUTHENTICATED_NOTE.to_string(),
            )
        }
        Err(e) => return Err(e.into()),
    };

    let next_week = calendar.fetch_events(today, 7)?;
    let calendar_md = if next_week.is_empty() {
        "No events scheduled.".to_string()
    } else {
        next_week
            .iter()
            .map(|e| {
                format!(
                    "- {} {}",
                    e.start.naive_local().format("%a %m/%d %H:%M"),
                    e.title
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let template = load_template("weekly-review.md");
    Ok(render_review_prompt(
        today,
        &accomplishments_md,
        &overdue_md,
        &inbox_md,
        &calendar_md,
        template.as_deref(),
    ))
}

/// Compile the context handed to the model for an evening recap session.
pub fn compile_recap_prompt(
    tasks: &mut dyn TaskSource,
    journal: &FileJournal,
    target: NaiveDate,
) -> Result<String> {
    let fetched = fetch_tasks_degraded(tasks)?;
    let task_data = fetched.is_some();
    let due_today: Vec<Task> = fetched
        .unwrap_or_default()
        .into_iter()
        .filter(|t| t.due_date == Some(target))
        .collect();

    let mode = determine_recap_mode(journal.exists(target), task_data);
    let morning_plan = if mode == RecapMode::Full {
        journal.read(target)?
    } else {
        None
    };

    Ok(render_recap_prompt(
        target,
        mode,
        morning_plan.as_deref(),
        &due_today,
        &journal.path_for(target),
    ))
}

/// Render the briefing prompt from assembled data.
///
/// With a template, `{{...}}` placeholders are substituted; otherwise the
/// built-in layout is used.
pub fn render_briefing_prompt(
    data: &BriefingData,
    sections: &BriefingSections,
    notes_md: &str,
    urgent_days: i64,
    template: Option<&str>,
) -> String {
    let notes_md = if notes_md.is_empty() { "None" } else { notes_md };

    if let Some(template) = template {
        return template
            .replace("{{DATE}}", &data.date.to_string())
            .replace("{{DAY_OF_WEEK}}", &data.day_of_week)
            .replace("{{YESTERDAY_CONTEXT}}", "")
            .replace("{{TASKS}}", &sections.tasks)
            .replace("{{NOTES}}", notes_md)
            .replace("{{CALENDAR}}", &sections.calendar)
            .replace("{{FREE_SLOTS}}", &sections.free_slots)
            .replace("{{TIME_CONTEXT}}", &sections.time_context);
    }

    formatdoc! {"
        You are a personal planning assistant. Generate a morning briefing.

        ## Date
        {date}

        ## Context
        {time_context}

        ## Today's Calendar
        {calendar}

        ## Free Time Slots
        {free_slots}

        ## Actionable Tasks
        These are tasks due within {urgent_days} days OR marked urgent and important.

        {tasks}

        ## Reminders (Notes)
        These are not tasks to complete, just time-relevant reminders to keep in mind.
        {notes}

        ## Instructions
        1. For each actionable task, recommend a specific free time slot to work on it
        2. Match task type to time of day (work tasks during work hours, personal outside)
        3. Prioritize Do-quadrant tasks first, then by due date
        4. Flag any tasks that won't fit in today's free slots
        5. Be specific with times, not vague
        ",
        date = data.date.format("%A, %B %d, %Y"),
        time_context = sections.time_context,
        calendar = sections.calendar,
        free_slots = sections.free_slots,
        urgent_days = urgent_days,
        tasks = sections.tasks,
        notes = notes_md,
    }
}

/// Render the weekly planning prompt.
pub fn render_week_prompt(
    week_start: NaiveDate,
    calendar_md: &str,
    free_slots_md: &str,
    tasks_md: &str,
    notes_md: &str,
    template: Option<&str>,
) -> String {
    let notes_md = if notes_md.is_empty() { "None" } else { notes_md };

    if let Some(template) = template {
        return template
            .replace("{{DATE}}", &week_start.to_string())
            .replace("{{DAY_OF_WEEK}}", &week_start.format("%A").to_string())
            .replace("{{CALENDAR}}", calendar_md)
            .replace("{{FREE_SLOTS}}", free_slots_md)
            .replace("{{TASKS}}", tasks_md)
            .replace("{{NOTES}}", notes_md);
    }

    formatdoc! {"
        You are a personal planning assistant. Generate a weekly plan.

        ## Week of {week_of} through Saturday

        ## Calendar
        {calendar}

        ## Free Time Slots (Workdays)
        {free_slots}

        ## Tasks (due this week or high priority)
        {tasks}

        ## Reminders (Notes)
        These are not tasks to complete, just time-relevant reminders to keep in mind.
        {notes}

        ## Instructions
        1. Suggest 3 focus areas for the rest of the week
        2. Flag any scheduling risks or conflicts
        3. Recommend specific time blocks for high-priority tasks
        4. Note any overloaded days and suggest redistribution
        5. Be specific with times and days, not vague
        ",
        week_of = week_start.format("%A, %B %d, %Y"),
        calendar = calendar_md,
        free_slots = free_slots_md,
        tasks = tasks_md,
        notes = notes_md,
    }
}

/// Render the weekly review prompt.
pub fn render_review_prompt(
    today: NaiveDate,
    accomplishments_md: &str,
    overdue_md: &str,
    inbox_md: &str,
    calendar_md: &str,
    template: Option<&str>,
) -> String {
    if let Some(template) = template {
        return template
            .replace("{{DATE}}", &today.to_string())
            .replace("{{DAY_OF_WEEK}}", &today.format("%A").to_string())
            .replace("{{RECAP_SUMMARY}}", "")
            .replace("{{ACCOMPLISHMENTS}}", accomplishments_md)
            .replace("{{OVERDUE_TASKS}}", overdue_md)
            .replace("{{STUCK_TASKS}}", "N/A")
            .replace("{{INBOX_TASKS}}", inbox_md)
            .replace("{{NEXT_WEEK_CALENDAR}}", calendar_md);
    }

    formatdoc! {"
        You are a personal planning assistant. Generate a weekly review.

        ## Week Ending {today}

        ## This Week's Journals
        {accomplishments}

        ## Overdue Tasks
        {overdue}

        ## Inbox Items
        {inbox}

        ## Next Week's Calendar
        {calendar}

        ## Instructions
        1. Summarize accomplishments
        2. Identify incomplete items and recommend action
        3. Flag calendar conflicts for next week
        4. Suggest 3 focus areas for the coming week
        ",
        today = today,
        accomplishments = accomplishments_md,
        overdue = overdue_md,
        inbox = inbox_md,
        calendar = calendar_md,
    }
}

/// Render the recap session prompt.
///
/// `morning_plan` is the day's journal entry when one exists; it is
/// excerpted rather than included whole so the prompt stays small.
pub fn render_recap_prompt(
    target: NaiveDate,
    mode: RecapMode,
    morning_plan: Option<&str>,
    due_today: &[Task],
    journal_path: &Path,
) -> String {
    let mut sections = vec![
        format!("# Evening Recap — {}", target.format("%A, %B %d, %Y")),
        format!("**Mode:** {}", mode.as_str()),
    ];

    if let Some(plan) = morning_plan {
        let plan = if plan.chars().count() > PLAN_EXCERPT_CHARS {
            let excerpt: String = plan.chars().take(PLAN_EXCERPT_CHARS).collect();
            format!("{excerpt}\n\n[... truncated ...]")
        } else {
            plan.to_string()
        };
        sections.push(format!("## This Morning's Plan\n\n{plan}"));
    }

    if !due_today.is_empty() {
        let lines: Vec<String> = due_today
            .iter()
            .take(10)
            .map(|t| format!("- {}", t.title))
            .collect();
        sections.push(format!("## Tasks Due Today\n\n{}", lines.join("\n")));
    }

    let instructions = match mode {
        RecapMode::Full => indoc! {"
            ## Your Task

            Guide me through an evening reflection by comparing my morning plan to what actually happened.

            1. Ask what got done as planned
            2. Ask what didn't happen and why
            3. Ask about any wins not in the original plan
            4. Help me crystallize one focus for tomorrow

            After our conversation, generate a recap section with YAML frontmatter containing:
            - date, mode, wins (list), blockers (list), energy, tags
            - A ## Reflection section summarizing our discussion
            - A ## Tomorrow's Focus section with the intention we identified

            Keep the conversation brief (5-7 exchanges). Be curious, not judgmental."},
        RecapMode::TasksOnly => indoc! {"
            ## Your Task

            Guide me through an evening reflection based on today's tasks.

            1. Ask what felt like a win today
            2. Ask what was harder than expected
            3. Help me set one focus for tomorrow

            After our conversation, generate a recap section with YAML frontmatter.
            Keep the conversation brief (5-7 exchanges)."},
        RecapMode::Freeform => indoc! {"
            ## Your Task

            Guide me through an open evening reflection.

            1. Ask how today went overall
            2. Ask what's worth remembering
            3. Ask what I would do differently
            4. Help me set one intention for tomorrow

            After our conversation, generate a recap section with YAML frontmatter.
            Keep the conversation brief (5-7 exchanges)."},
    };
    sections.push(instructions.to_string());

    sections.push(format!(
        "\nAppend the final recap (with '## {RECAP_HEADER}' header) to the daily journal: {}",
        journal_path.display()
    ));

    sections.join("\n\n")
}

/// Fetch all tasks, degrading to `None` when the source is not
/// authenticated. Other source failures still propagate.
fn fetch_tasks_degraded(tasks: &mut dyn TaskSource) -> Result<Option<Vec<Task>>> {
    match tasks.fetch_all() {
        Ok(all) => Ok(Some(all)),
        Err(e) if e.is_auth() => {
            log::warn!("task source unavailable: {e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn review_task_sections(
    tasks: &mut dyn TaskSource,
    config: &Config,
    today: NaiveDate,
) -> Result<(String, String), SourceError> {
    let all = tasks.fetch_all()?;
    let prioritized = sort_by_priority(&filter_actionable(&all, config.urgent_days, today), today);
    let overdue = filter_overdue(&prioritized, today);
    let overdue_md = if overdue.is_empty() {
        "None".to_string()
    } else {
        overdue
            .iter()
            .map(|t| {
                let due = t.due_date.map(|d| d.to_string()).unwrap_or_default();
                format!("- {} (due: {due})", t.title)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let inbox = tasks.fetch_inbox()?;
    let inbox_md = if inbox.is_empty() {
        "Inbox is empty".to_string()
    } else {
        inbox
            .iter()
            .map(|t| format!("- {}", t.title))
            .collect::<Vec<_>>()
            .join("\n")
    };
    Ok((overdue_md, inbox_md))
}

fn notes_markdown(tasks: &[Task], urgent_days: i64, as_of: NaiveDate) -> String {
    let notes = filter_notes(tasks, urgent_days, as_of);
    if notes.is_empty() {
        "None".to_string()
    } else {
        notes
            .iter()
            .map(|n| format_note_line(n, as_of))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn bucket_markdown(tasks: &[Task], as_of: NaiveDate) -> String {
    if tasks.is_empty() {
        "None".to_string()
    } else {
        tasks
            .iter()
            .map(|t| format_task_line(t, as_of))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn load_template(name: &str) -> Option<String> {
    std::fs::read_to_string(storage::templates_dir().join(name)).ok()
}
