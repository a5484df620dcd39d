//! Prompt generation commands.

use chrono::Local;
use daybrief_core::sources::{ClaudeCli, CompositeCalendar, TickTickClient};
use daybrief_core::storage::Config;
use daybrief_core::workflows;

pub fn run_morning(prompt_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut tasks = TickTickClient::new(&config);
    let calendar = CompositeCalendar::from_config(&config);
    let now = Local::now().naive_local();

    if prompt_only {
        let prompt = workflows::compile_briefing(&config, &mut tasks, &calendar, now)?;
        println!("{prompt}");
        return Ok(());
    }

    let journal = workflows::resolve_journal(&config)?;
    let llm = ClaudeCli::new();
    let output =
        workflows::generate_briefing(&config, &mut tasks, &calendar, &llm, &journal, now)?;
    println!("{output}");
    Ok(())
}

pub fn run_week(prompt_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut tasks = TickTickClient::new(&config);
    let calendar = CompositeCalendar::from_config(&config);
    let now = Local::now().naive_local();

    if prompt_only {
        let prompt = workflows::compile_week(&config, &mut tasks, &calendar, now)?;
        println!("{prompt}");
        return Ok(());
    }

    let journal = workflows::resolve_journal(&config)?;
    let llm = ClaudeCli::new();
    let output =
        workflows::generate_weekly_plan(&config, &mut tasks, &calendar, &llm, &journal, now)?;
    println!("{output}");
    Ok(())
}

pub fn run_review(prompt_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut tasks = TickTickClient::new(&config);
    let calendar = CompositeCalendar::from_config(&config);
    let journal = workflows::resolve_journal(&config)?;
    let now = Local::now().naive_local();

    if prompt_only {
        let prompt =
            workflows::compile_review(&config, &mut tasks, &calendar, &journal, now.date())?;
        println!("{prompt}");
        return Ok(());
    }

    let llm = ClaudeCli::new();
    let output =
        workflows::generate_weekly_review(&config, &mut tasks, &calendar, &llm, &journal, now)?;
    println!("{output}");
    Ok(())
}
