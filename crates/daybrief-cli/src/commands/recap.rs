//! Recap commands, quick structured entry and deep guided sessions.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use daybrief_core::journal::{FileJournal, JournalStore};
use daybrief_core::recap::{determine_recap_mode, Recap, RecapMode};
use daybrief_core::sources::{ClaudeCli, TickTickClient};
use daybrief_core::storage::{self, Config, Tokens};
use daybrief_core::workflows::{self, RECAP_HEADER};

pub fn run_recap(date: Option<NaiveDate>, deep: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let target = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let journal = workflows::resolve_journal(&config)?;

    if journal.has_section(target, RECAP_HEADER)? {
        let answer = ask(&format!(
            "Recap for {target} already exists in journal. Add another? [y/N] "
        ))?;
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            return Ok(());
        }
    }

    if deep {
        run_deep(&config, &journal, target)
    } else {
        run_quick(&journal, target)
    }
}

pub fn run_compile(date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let target = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let journal = workflows::resolve_journal(&config)?;
    let mut tasks = TickTickClient::new(&config);
    let prompt = workflows::compile_recap_prompt(&mut tasks, &journal, target)?;
    println!("{prompt}");
    Ok(())
}

/// Structured two-minute recap collected over stdin.
fn run_quick(journal: &FileJournal, target: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let available = !Tokens::load().is_empty();
    let mode = determine_recap_mode(journal.exists(target), available);

    match mode {
        RecapMode::Full => println!("Recap for {target} (comparing to morning briefing)\n"),
        RecapMode::TasksOnly => println!("Recap for {target} (task data available)\n"),
        RecapMode::Freeform => println!("Recap for {target} (freeform reflection)\n"),
    }

    println!("What went well today? (comma-separated or freeform)");
    let wins = split_list(&ask("> ")?);

    println!("\nWhat didn't go as planned?");
    let blockers = split_list(&ask("> ")?);

    println!("\nOne focus for tomorrow?");
    let tomorrow = ask("> ")?;

    println!("\nEnergy level today? (low/medium/high, or skip)");
    let energy = ask("> ")?;

    println!("\nAny additional reflection? (optional, press enter to skip)");
    let reflection = ask("> ")?;

    let mut recap = Recap::new(target, mode);
    recap.wins = wins;
    recap.blockers = blockers;
    recap.tomorrow_focus = tomorrow;
    recap.energy = if energy.is_empty() { None } else { Some(energy) };
    recap.reflection = reflection;

    journal.append(target, RECAP_HEADER, &recap.to_markdown())?;
    println!("\n✓ Recap saved to {}", journal.path_for(target).display());
    Ok(())
}

/// Interactive session with the claude CLI over the compiled recap prompt.
fn run_deep(
    config: &Config,
    journal: &FileJournal,
    target: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tasks = TickTickClient::new(config);
    let prompt = workflows::compile_recap_prompt(&mut tasks, journal, target)?;
    let claude = ClaudeCli::in_dir(storage::home_dir());
    claude.run_interactive(&prompt)?;
    Ok(())
}

fn ask(prompt: &str) -> Result<String, std::io::Error> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
