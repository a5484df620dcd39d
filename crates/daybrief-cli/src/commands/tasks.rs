//! Task listing commands.

use daybrief_core::sources::{TaskSource, TickTickClient};
use daybrief_core::storage::Config;
use daybrief_core::task::{filter_actionable, filter_by_project, sort_by_priority};

pub fn run_tasks(json: bool, project: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut client = TickTickClient::new(&config);
    let today = chrono::Local::now().date_naive();

    let all = client.fetch_all()?;
    let mut prioritized =
        sort_by_priority(&filter_actionable(&all, config.urgent_days, today), today);
    if let Some(project) = project {
        prioritized = filter_by_project(&prioritized, project);
    }

    if json {
        let items: Vec<serde_json::Value> = prioritized
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "priority": t.priority,
                    "due_date": t.due_date.map(|d| d.to_string()),
                    "project": t.project_name,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if prioritized.is_empty() {
        println!("No priority tasks for today.");
        return Ok(());
    }
    for task in &prioritized {
        let marker = if task.priority > 0 {
            "!".repeat(task.priority as usize)
        } else {
            " ".to_string()
        };
        let due = task
            .due_date
            .map(|d| format!(" (due {d})"))
            .unwrap_or_default();
        println!("[{marker:<3}] {}{due}", task.title);
    }
    Ok(())
}

pub fn run_inbox(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut client = TickTickClient::new(&config);
    let inbox = client.fetch_inbox()?;

    if json {
        let items: Vec<serde_json::Value> = inbox
            .iter()
            .map(|t| serde_json::json!({ "id": t.id, "title": t.title, "priority": t.priority }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if inbox.is_empty() {
        println!("Inbox is empty.");
        return Ok(());
    }
    for task in &inbox {
        println!("• {}", task.title);
    }
    Ok(())
}
