//! End-of-day recap model and its markdown form.
//!
//! A recap is stored inside the daily journal as a frontmatter block plus
//! free-text sections, so it stays greppable and hand-editable. Parsing is
//! deliberately forgiving: only a malformed envelope, date or mode is an
//! error, everything else falls back to defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RecapError;

/// How much structure the evening recap can build on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecapMode {
    /// Morning briefing exists; recap can compare plan against outcome
    Full,
    /// Task data exists but no briefing
    TasksOnly,
    /// Nothing to anchor on; free-text only
    Freeform,
}

impl RecapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecapMode::Full => "full",
            RecapMode::TasksOnly => "tasks_only",
            RecapMode::Freeform => "freeform",
        }
    }

    pub fn parse(value: &str) -> Option<RecapMode> {
        match value {
            "full" => Some(RecapMode::Full),
            "tasks_only" => Some(RecapMode::TasksOnly),
            "freeform" => Some(RecapMode::Freeform),
            _ => None,
        }
    }
}

impl Default for RecapMode {
    fn default() -> Self {
        RecapMode::Freeform
    }
}

/// Pick the richest recap mode the available data supports.
pub fn determine_recap_mode(has_briefing: bool, has_task_data: bool) -> RecapMode {
    if has_briefing {
        RecapMode::Full
    } else if has_task_data {
        RecapMode::TasksOnly
    } else {
        RecapMode::Freeform
    }
}

/// A structured end-of-day recap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recap {
    pub date: NaiveDate,
    pub mode: RecapMode,
    #[serde(default)]
    pub wins: Vec<String>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub energy: Option<String>,
    #[serde(default)]
    pub planned_tasks: Option<u32>,
    #[serde(default)]
    pub completed_tasks: Option<u32>,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub tomorrow_focus: String,
}

impl Recap {
    /// An empty recap for `date` in the given mode.
    pub fn new(date: NaiveDate, mode: RecapMode) -> Self {
        Recap {
            date,
            mode,
            wins: Vec::new(),
            blockers: Vec::new(),
            tags: Vec::new(),
            energy: None,
            planned_tasks: None,
            completed_tasks: None,
            reflection: String::new(),
            tomorrow_focus: String::new(),
        }
    }

    /// Serialize to markdown with a frontmatter block.
    ///
    /// Optional scalars and empty lists are omitted entirely, and body
    /// sections appear only when they carry text, so a minimal recap stays
    /// minimal on disk.
    pub fn to_markdown(&self) -> String {
        let mut lines = vec!["---".to_string()];
        lines.push(format!("date: {}", self.date.format("%Y-%m-%d")));
        lines.push(format!("mode: {}", self.mode.as_str()));
        if let Some(energy) = &self.energy {
            lines.push(format!("energy: \"{energy}\""));
        }
        if let Some(n) = self.planned_tasks {
            lines.push(format!("planned_tasks: {n}"));
        }
        if let Some(n) = self.completed_tasks {
            lines.push(format!("completed_tasks: {n}"));
        }
        for (key, items) in [
            ("wins", &self.wins),
            ("blockers", &self.blockers),
            ("tags", &self.tags),
        ] {
            if !items.is_empty() {
                lines.push(format!("{key}:"));
                for item in items {
                    lines.push(format!("  - \"{item}\""));
                }
            }
        }
        lines.push("---".to_string());

        if !self.reflection.is_empty() {
            lines.push(String::new());
            lines.push("## Reflection".to_string());
            lines.push(String::new());
            lines.push(self.reflection.clone());
        }
        if !self.tomorrow_focus.is_empty() {
            lines.push(String::new());
            lines.push("## Tomorrow's Focus".to_string());
            lines.push(String::new());
            lines.push(self.tomorrow_focus.clone());
        }

        lines.join("\n")
    }

    /// Parse a recap back out of its markdown form.
    ///
    /// The document must open with `---` and close the frontmatter block
    /// with another `---`. Unknown keys are ignored; a missing mode reads
    /// as freeform.
    pub fn from_markdown(content: &str) -> Result<Recap, RecapError> {
        if !content.starts_with("---") {
            return Err(RecapError::MissingFrontmatter);
        }

        let mut lines = content.lines();
        lines.next();

        let mut frontmatter = Vec::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.trim_end() == "---" {
                closed = true;
                break;
            }
            frontmatter.push(line);
        }
        if !closed {
            return Err(RecapError::IncompleteFrontmatter);
        }
        let body = lines.collect::<Vec<_>>().join("\n");

        let mut date = None;
        let mut mode = None;
        let mut energy = None;
        let mut planned_tasks = None;
        let mut completed_tasks = None;
        let mut wins = Vec::new();
        let mut blockers = Vec::new();
        let mut tags = Vec::new();

        // Name of the list currently collecting `- "item"` lines.
        let mut active_list: Option<String> = None;

        for raw in frontmatter {
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }

            if let Some(item) = line.trim_start().strip_prefix("- ") {
                let value = item.trim().trim_matches('"').to_string();
                match active_list.as_deref() {
                    Some("wins") => wins.push(value),
                    Some("blockers") => blockers.push(value),
                    Some("tags") => tags.push(value),
                    _ => {}
                }
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if value.is_empty() {
                active_list = Some(key.to_string());
                continue;
            }
            active_list = None;

            match key {
                "date" => {
                    date = Some(
                        NaiveDate::parse_from_str(value, "%Y-%m-%d")
                            .map_err(|_| RecapError::InvalidDate(value.to_string()))?,
                    );
                }
                "mode" => {
                    mode = Some(
                        RecapMode::parse(value)
                            .ok_or_else(|| RecapError::UnknownMode(value.to_string()))?,
                    );
                }
                "energy" => energy = Some(value.trim_matches('"').to_string()),
                "planned_tasks" => planned_tasks = value.parse().ok(),
                "completed_tasks" => completed_tasks = value.parse().ok(),
                _ => {}
            }
        }

        let date = date.ok_or_else(|| RecapError::InvalidDate("missing".to_string()))?;

        Ok(Recap {
            date,
            mode: mode.unwrap_or_default(),
            wins,
            blockers,
            tags,
            energy,
            planned_tasks,
            completed_tasks,
            reflection: extract_section(&body, "## Reflection"),
            tomorrow_focus: extract_section(&body, "## Tomorrow's Focus"),
        })
    }
}

/// Text under `heading`, up to the next `## ` heading or end of body.
fn extract_section(body: &str, heading: &str) -> String {
    let Some(start) = body.find(heading) else {
        return String::new();
    };
    let after = &body[start + heading.len()..];
    let end = after.find("\n## ").unwrap_or(after.len());
    after[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn full_recap() -> Recap {
        Recap {
            date: today(),
            mode: RecapMode::Full,
            wins: vec!["Completed project".to_string(), "Good meeting".to_string()],
            blockers: vec!["Slow build times".to_string()],
            tags: vec!["productive".to_string(), "focused".to_string()],
            energy: Some("high".to_string()),
            planned_tasks: Some(5),
            completed_tasks: Some(4),
            reflection: "Today went well overall.".to_string(),
            tomorrow_focus: "Finish the API integration".to_string(),
        }
    }

    #[test]
    fn to_markdown_full() {
        let md = full_recap().to_markdown();

        assert!(md.starts_with("---\n"));
        assert!(md.contains("date: 2025-01-15"));
        assert!(md.contains("mode: full"));
        assert!(md.contains("planned_tasks: 5"));
        assert!(md.contains("completed_tasks: 4"));
        assert!(md.contains("energy: \"high\""));

        assert!(md.contains("wins:"));
        assert!(md.contains("\"Completed project\""));
        assert!(md.contains("\"Good meeting\""));
        assert!(md.contains("blockers:"));
        assert!(md.contains("\"Slow build times\""));

        assert!(md.contains("## Reflection"));
        assert!(md.contains("Today went well overall."));
        assert!(md.contains("## Tomorrow's Focus"));
        assert!(md.contains("Finish the API integration"));
    }

    #[test]
    fn to_markdown_minimal() {
        let md = Recap::new(today(), RecapMode::Freeform).to_markdown();

        assert!(md.contains("date: 2025-01-15"));
        assert!(md.contains("mode: freeform"));
        assert!(!md.contains("wins:"));
        assert!(!md.contains("blockers:"));
        assert!(!md.contains("energy:"));
        assert!(!md.contains("## Reflection"));
    }

    #[test]
    fn markdown_round_trip() {
        let original = full_recap();
        let parsed = Recap::from_markdown(&original.to_markdown()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn missing_frontmatter() {
        assert_eq!(
            Recap::from_markdown("No frontmatter here"),
            Err(RecapError::MissingFrontmatter)
        );
    }

    #[test]
    fn incomplete_frontmatter() {
        assert_eq!(
            Recap::from_markdown("---\ndate: 2025-01-15"),
            Err(RecapError::IncompleteFrontmatter)
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let md = "---\ndate: 2025-01-15\nmode: freeform\n---\n\nJust some text.\n";
        let recap = Recap::from_markdown(md).unwrap();

        assert!(recap.wins.is_empty());
        assert!(recap.blockers.is_empty());
        assert_eq!(recap.energy, None);
        assert_eq!(recap.planned_tasks, None);
        assert!(recap.reflection.is_empty());
    }

    #[test]
    fn parses_lists() {
        let md = "---\ndate: 2025-01-15\nmode: full\nwins:\n  - \"First win\"\n  - \"Second win\"\nblockers:\n  - \"A blocker\"\n---\n";
        let recap = Recap::from_markdown(md).unwrap();

        assert_eq!(recap.wins, vec!["First win", "Second win"]);
        assert_eq!(recap.blockers, vec!["A blocker"]);
    }

    #[test]
    fn parses_body_sections() {
        let md = "---\ndate: 2025-01-15\nmode: full\n---\n\n## Reflection\n\nThis is the reflection text.\nIt spans multiple lines.\n\n## Tomorrow's Focus\n\nFocus on testing.\n";
        let recap = Recap::from_markdown(md).unwrap();

        assert!(recap.reflection.contains("This is the reflection text"));
        assert!(recap.reflection.contains("It spans multiple lines"));
        assert!(recap.tomorrow_focus.contains("Focus on testing"));
    }

    #[test]
    fn bad_date_is_an_error() {
        let md = "---\ndate: yesterday\nmode: full\n---\n";
        assert_eq!(
            Recap::from_markdown(md),
            Err(RecapError::InvalidDate("yesterday".to_string()))
        );
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let md = "---\ndate: 2025-01-15\nmode: vibes\n---\n";
        assert_eq!(
            Recap::from_markdown(md),
            Err(RecapError::UnknownMode("vibes".to_string()))
        );
    }

    #[test]
    fn mode_with_briefing_is_full() {
        assert_eq!(determine_recap_mode(true, true), RecapMode::Full);
        assert_eq!(determine_recap_mode(true, false), RecapMode::Full);
    }

    #[test]
    fn mode_without_briefing_follows_task_data() {
        assert_eq!(determine_recap_mode(false, true), RecapMode::TasksOnly);
        assert_eq!(determine_recap_mode(false, false), RecapMode::Freeform);
    }

    #[test]
    fn mode_string_round_trip() {
        for mode in [RecapMode::Full, RecapMode::TasksOnly, RecapMode::Freeform] {
            assert_eq!(RecapMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(RecapMode::parse("idle"), None);
    }
}
