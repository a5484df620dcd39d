//! Daily journal storage.
//!
//! One markdown file per day, named by ISO date. Sections written by the
//! workflows are separated with a `---` rule so a day's file reads as one
//! document however many commands appended to it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;

/// Storage backend for daily journal entries.
pub trait JournalStore {
    /// Journal content for a date, `None` when no entry exists.
    fn read(&self, date: NaiveDate) -> Result<Option<String>>;

    /// Write or overwrite the entry for a date.
    fn write(&self, date: NaiveDate, content: &str) -> Result<()>;

    /// Append a `## <header>` section to the entry, creating it if needed.
    fn append(&self, date: NaiveDate, section_header: &str, content: &str) -> Result<()>;

    /// Whether an entry exists for a date.
    fn exists(&self, date: NaiveDate) -> bool;

    /// Whether the entry for a date contains a given section.
    fn has_section(&self, date: NaiveDate, section_header: &str) -> Result<bool> {
        let marker = format!("## {section_header}");
        Ok(self
            .read(date)?
            .map_or(false, |content| content.contains(&marker)))
    }

    /// Dates with entries inside `[start, end]`, ascending.
    fn list_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// All entries inside `[start, end]`, keyed by date.
    fn read_range(&self, start: NaiveDate, end: NaiveDate) -> Result<BTreeMap<NaiveDate, String>> {
        let mut entries = BTreeMap::new();
        for date in self.list_dates(start, end)? {
            if let Some(content) = self.read(date)? {
                entries.insert(date, content);
            }
        }
        Ok(entries)
    }
}

/// Journal entries as markdown files in a directory.
#[derive(Debug, Clone)]
pub struct FileJournal {
    dir: PathBuf,
}

impl FileJournal {
    /// Open (and create if missing) a journal directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileJournal { dir })
    }

    /// Directory the journal lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing the entry for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{date}.md"))
    }
}

impl JournalStore for FileJournal {
    fn read(&self, date: NaiveDate) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(date)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, date: NaiveDate, content: &str) -> Result<()> {
        fs::write(self.path_for(date), content)?;
        Ok(())
    }

    fn append(&self, date: NaiveDate, section_header: &str, content: &str) -> Result<()> {
        let section = format!("## {section_header}\n\n{content}");
        let full = match self.read(date)? {
            Some(existing) => format!("{existing}\n\n---\n\n{section}"),
            None => section,
        };
        self.write(date, &full)
    }

    fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).exists()
    }

    fn list_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(stem, "%Y-%m-%d") else {
                continue;
            };
            if date >= start && date <= end {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn read_missing_is_none() {
        let dir = tempdir().unwrap();
        let journal = FileJournal::new(dir.path()).unwrap();
        assert_eq!(journal.read(day(15)).unwrap(), None);
        assert!(!journal.exists(day(15)));
    }

    #[test]
    fn append_creates_then_separates() {
        let dir = tempdir().unwrap();
        let journal = FileJournal::new(dir.path()).unwrap();

        journal
            .append(day(15), "Morning Briefing", "Plan the day.")
            .unwrap();
        assert_eq!(
            journal.read(day(15)).unwrap().unwrap(),
            "## Morning Briefing\n\nPlan the day."
        );

        journal.append(day(15), "Evening Recap", "It went.").unwrap();
        assert_eq!(
            journal.read(day(15)).unwrap().unwrap(),
            "## Morning Briefing\n\nPlan the day.\n\n---\n\n## Evening Recap\n\nIt went."
        );
    }

    #[test]
    fn write_overwrites() {
        let dir = tempdir().unwrap();
        let journal = FileJournal::new(dir.path()).unwrap();

        journal.append(day(15), "Draft", "v1").unwrap();
        journal.write(day(15), "fresh content").unwrap();
        assert_eq!(journal.read(day(15)).unwrap().unwrap(), "fresh content");
    }

    #[test]
    fn has_section_matches_headers() {
        let dir = tempdir().unwrap();
        let journal = FileJournal::new(dir.path()).unwrap();

        journal.append(day(15), "Morning Briefing", "text").unwrap();
        assert!(journal.has_section(day(15), "Morning Briefing").unwrap());
        assert!(!journal.has_section(day(15), "Evening Recap").unwrap());
        assert!(!journal.has_section(day(16), "Morning Briefing").unwrap());
    }

    #[test]
    fn list_dates_ignores_stray_files() {
        let dir = tempdir().unwrap();
        let journal = FileJournal::new(dir.path()).unwrap();

        journal.append(day(14), "A", "a").unwrap();
        journal.append(day(10), "B", "b").unwrap();
        journal.append(day(20), "C", "c").unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a journal day").unwrap();
        std::fs::write(dir.path().join("2025-01-12.txt"), "wrong extension").unwrap();

        let dates = journal.list_dates(day(10), day(15)).unwrap();
        assert_eq!(dates, vec![day(10), day(14)]);
    }

    #[test]
    fn read_range_collects_entries() {
        let dir = tempdir().unwrap();
        let journal = FileJournal::new(dir.path()).unwrap();

        journal.append(day(13), "Mon", "monday").unwrap();
        journal.append(day(15), "Wed", "wednesday").unwrap();

        let entries = journal.read_range(day(13), day(19)).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[&day(13)].contains("monday"));
        assert!(entries[&day(15)].contains("wednesday"));
    }
}
