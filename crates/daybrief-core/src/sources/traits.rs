use chrono::NaiveDate;

use crate::calendar::Event;
use crate::error::SourceError;
use crate::task::Task;

/// Read-side interface over the task service.
///
/// Methods take `&mut self` because implementations cache project metadata
/// and refresh expired credentials in place.
pub trait TaskSource {
    /// Fetch every task across all projects.
    fn fetch_all(&mut self) -> Result<Vec<Task>, SourceError>;

    /// Fetch tasks sitting in the inbox project.
    fn fetch_inbox(&mut self) -> Result<Vec<Task>, SourceError>;
}

/// Read-side interface over calendar backends.
pub trait CalendarSource {
    /// Events for `days` consecutive days starting at `start`, sorted by
    /// start time.
    fn fetch_events(&self, start: NaiveDate, days: u32) -> Result<Vec<Event>, SourceError>;

    /// Events for a single date, sorted by start time.
    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<Event>, SourceError>;
}

/// Text-generation backend that turns compiled prompts into output.
pub trait LlmService {
    fn generate(&self, prompt: &str) -> Result<String, SourceError>;
}
