//! Task model and Eisenhower classification.
//!
//! Tasks arrive from the task service as immutable value records; every
//! derived property (urgency, quadrant, days until due) is computed against
//! a caller-supplied reference date so results are reproducible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of task record.
///
/// The task service distinguishes ordinary tasks from notes (time-relevant
/// reminders that are not completable work). Unrecognized kind strings from
/// the service are treated as ordinary tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskKind {
    /// Ordinary completable task
    Text,
    /// Reminder note, excluded from actionable filtering
    Note,
}

impl TaskKind {
    /// Parse a service-supplied kind tag, falling open to `Text`.
    pub fn from_api(value: &str) -> Self {
        match value {
            "NOTE" => TaskKind::Note,
            _ => TaskKind::Text,
        }
    }
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::Text
    }
}

/// Eisenhower matrix quadrant.
///
/// Urgency and importance are both booleans, so every task lands in exactly
/// one quadrant:
///
///   Q1 Do        urgent     + important
///   Q2 Schedule  not urgent + important
///   Q3 Delegate  urgent     + not important
///   Q4 Delete    not urgent + not important
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Quadrant {
    Do,
    Schedule,
    Delegate,
    Delete,
}

impl Quadrant {
    /// Conventional quadrant number (1-4).
    pub fn number(&self) -> u8 {
        match self {
            Quadrant::Do => 1,
            Quadrant::Schedule => 2,
            Quadrant::Delegate => 3,
            Quadrant::Delete => 4,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::Do => "Do",
            Quadrant::Schedule => "Schedule",
            Quadrant::Delegate => "Delegate",
            Quadrant::Delete => "Delete",
        }
    }
}

/// A task with Eisenhower matrix classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier from the task service
    pub id: String,
    /// Task title
    pub title: String,
    /// Priority value; 3 and above counts as important
    #[serde(default)]
    pub priority: i32,
    /// Due date, if any (calendar date, no time component)
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Identifier of the owning project/list
    #[serde(default)]
    pub project_id: String,
    /// Display name of the owning project/list; may be empty
    #[serde(default)]
    pub project_name: String,
    /// Record kind
    #[serde(default)]
    pub kind: TaskKind,
}

impl Task {
    /// Whether this record is a note rather than completable work.
    pub fn is_note(&self) -> bool {
        self.kind == TaskKind::Note
    }

    /// High priority (3+) counts as important.
    pub fn is_important(&self) -> bool {
        self.priority >= 3
    }

    /// Due within `urgent_days` of `as_of`, or overdue.
    ///
    /// A task with no due date is never urgent. The bound is inclusive, so
    /// a task due in exactly `urgent_days` days is urgent, and overdue
    /// tasks stay urgent however far past due they are.
    pub fn is_urgent(&self, urgent_days: i64, as_of: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due.signed_duration_since(as_of).num_days() <= urgent_days,
            None => false,
        }
    }

    /// Classify into an Eisenhower quadrant.
    pub fn quadrant(&self, urgent_days: i64, as_of: NaiveDate) -> Quadrant {
        let important = self.is_important();
        let urgent = self.is_urgent(urgent_days, as_of);

        match (urgent, important) {
            (true, true) => Quadrant::Do,
            (false, true) => Quadrant::Schedule,
            (true, false) => Quadrant::Delegate,
            (false, false) => Quadrant::Delete,
        }
    }

    /// Label of the quadrant this task falls in.
    pub fn quadrant_label(&self, urgent_days: i64, as_of: NaiveDate) -> &'static str {
        self.quadrant(urgent_days, as_of).label()
    }

    /// Signed days until the due date; negative when overdue, `None` when
    /// undated.
    pub fn days_until_due(&self, as_of: NaiveDate) -> Option<i64> {
        self.due_date
            .map(|due| due.signed_duration_since(as_of).num_days())
    }

    /// Build a task from a raw task-service record.
    ///
    /// The service reports due dates as timestamps; only the calendar date
    /// before the `T` is kept. Absent priority defaults to 0 and an absent
    /// or unknown kind to an ordinary task. Records without an id or title
    /// are unusable and yield `None`.
    pub fn from_api(data: &Value, project_name: &str) -> Option<Task> {
        let id = data.get("id")?.as_str()?.to_string();
        let title = data.get("title")?.as_str()?.to_string();

        let due_date = data
            .get("dueDate")
            .and_then(Value::as_str)
            .and_then(|raw| raw.split('T').next())
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok());

        let kind = data
            .get("kind")
            .and_then(Value::as_str)
            .map(TaskKind::from_api)
            .unwrap_or_default();

        Some(Task {
            id,
            title,
            priority: data.get("priority").and_then(Value::as_i64).unwrap_or(0) as i32,
            due_date,
            project_id: data
                .get("projectId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            project_name: project_name.to_string(),
            kind,
        })
    }
}

/// Filter to actionable tasks: due soon OR in quadrant 1.
///
/// Notes are never actionable. The quadrant check is kept alongside the
/// urgency check even though the two coincide while they share one
/// `urgent_days` window; callers may parameterize them independently later.
pub fn filter_actionable(tasks: &[Task], urgent_days: i64, as_of: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| {
            !t.is_note()
                && (t.is_urgent(urgent_days, as_of)
                    || t.quadrant(urgent_days, as_of) == Quadrant::Do)
        })
        .cloned()
        .collect()
}

/// Split tasks into work, personal, and other categories.
///
/// Work membership is checked first, so a project name configured in both
/// lists lands in work only. Every task appears in exactly one bucket.
pub fn categorize_tasks(
    tasks: &[Task],
    work_lists: &[String],
    personal_lists: &[String],
) -> (Vec<Task>, Vec<Task>, Vec<Task>) {
    let mut work = Vec::new();
    let mut personal = Vec::new();
    let mut other = Vec::new();

    for task in tasks {
        if work_lists.contains(&task.project_name) {
            work.push(task.clone());
        } else if personal_lists.contains(&task.project_name) {
            personal.push(task.clone());
        } else {
            other.push(task.clone());
        }
    }

    (work, personal, other)
}

/// Sort tasks by priority (descending) then due date (ascending).
///
/// The sort is stable; undated tasks order after dated tasks of the same
/// priority via a large sentinel.
pub fn sort_by_priority(tasks: &[Task], as_of: NaiveDate) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| {
        (
            -i64::from(t.priority),
            t.days_until_due(as_of).unwrap_or(9999),
        )
    });
    sorted
}

/// Filter to notes that are due soon (time-relevant reminders).
///
/// Unlike urgency on ordinary tasks, a note without a due date is excluded
/// outright rather than treated as "not urgent".
pub fn filter_notes(tasks: &[Task], urgent_days: i64, as_of: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| match (t.is_note(), t.due_date) {
            (true, Some(due)) => due.signed_duration_since(as_of).num_days() <= urgent_days,
            _ => false,
        })
        .cloned()
        .collect()
}

/// Filter to overdue tasks only (due strictly before `as_of`).
pub fn filter_overdue(tasks: &[Task], as_of: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| matches!(t.due_date, Some(due) if due < as_of))
        .cloned()
        .collect()
}

/// Filter tasks to a specific project, matching the name case-insensitively.
pub fn filter_by_project(tasks: &[Task], project_name: &str) -> Vec<Task> {
    let wanted = project_name.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.project_name.to_lowercase() == wanted)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn task(id: &str, priority: i32, due: Option<NaiveDate>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            priority,
            due_date: due,
            project_id: String::new(),
            project_name: String::new(),
            kind: TaskKind::Text,
        }
    }

    fn days_from_today(days: i64) -> NaiveDate {
        today() + chrono::Duration::days(days)
    }

    #[test]
    fn important_threshold() {
        assert!(!task("a", 2, None).is_important());
        assert!(task("b", 3, None).is_important());
        assert!(task("c", 5, None).is_important());
    }

    #[test]
    fn urgent_boundary_inclusive() {
        let due_on_boundary = task("a", 0, Some(days_from_today(3)));
        let due_past_boundary = task("b", 0, Some(days_from_today(4)));
        assert!(due_on_boundary.is_urgent(3, today()));
        assert!(!due_past_boundary.is_urgent(3, today()));
    }

    #[test]
    fn overdue_always_urgent() {
        let long_overdue = task("a", 0, Some(days_from_today(-30)));
        assert!(long_overdue.is_urgent(3, today()));
    }

    #[test]
    fn no_due_date_never_urgent() {
        assert!(!task("a", 5, None).is_urgent(3, today()));
    }

    #[test]
    fn quadrant_urgent_important() {
        let t = task("a", 5, Some(today()));
        assert_eq!(t.quadrant(3, today()), Quadrant::Do);
        assert_eq!(t.quadrant_label(3, today()), "Do");
    }

    #[test]
    fn quadrant_not_urgent_not_important() {
        let t = task("a", 1, None);
        assert_eq!(t.quadrant(3, today()), Quadrant::Delete);
        assert!(!t.is_urgent(3, today()));
    }

    #[test]
    fn quadrant_important_not_urgent() {
        let t = task("a", 4, Some(days_from_today(10)));
        assert_eq!(t.quadrant(3, today()), Quadrant::Schedule);
    }

    #[test]
    fn quadrant_urgent_not_important() {
        let t = task("a", 1, Some(today()));
        assert_eq!(t.quadrant(3, today()), Quadrant::Delegate);
    }

    #[test]
    fn quadrant_total_over_input_grid() {
        let dues = [
            None,
            Some(days_from_today(-5)),
            Some(today()),
            Some(days_from_today(10)),
        ];
        for priority in 0..=5 {
            for due in dues {
                let q = task("a", priority, due).quadrant(3, today());
                assert!((1..=4).contains(&q.number()));
                assert!(!q.label().is_empty());
            }
        }
    }

    #[test]
    fn days_until_due_signed() {
        assert_eq!(
            task("a", 0, Some(days_from_today(-2))).days_until_due(today()),
            Some(-2)
        );
        assert_eq!(task("b", 0, Some(today())).days_until_due(today()), Some(0));
        assert_eq!(task("c", 0, None).days_until_due(today()), None);
    }

    #[test]
    fn from_api_parses_fields() {
        let data = json!({
            "id": "abc123",
            "title": "Write report",
            "priority": 5,
            "dueDate": "2025-01-20T00:00:00+0000",
            "projectId": "p1",
            "kind": "TEXT",
        });
        let t = Task::from_api(&data, "Eng").unwrap();
        assert_eq!(t.id, "abc123");
        assert_eq!(t.title, "Write report");
        assert_eq!(t.priority, 5);
        assert_eq!(t.due_date, Some(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()));
        assert_eq!(t.project_id, "p1");
        assert_eq!(t.project_name, "Eng");
        assert_eq!(t.kind, TaskKind::Text);
    }

    #[test]
    fn from_api_defaults() {
        let data = json!({"id": "x", "title": "Bare"});
        let t = Task::from_api(&data, "").unwrap();
        assert_eq!(t.priority, 0);
        assert_eq!(t.due_date, None);
        assert_eq!(t.kind, TaskKind::Text);
        assert!(t.project_id.is_empty());
    }

    #[test]
    fn from_api_rejects_missing_identity() {
        assert!(Task::from_api(&json!({"title": "No id"}), "").is_none());
        assert!(Task::from_api(&json!({"id": "no-title"}), "").is_none());
    }

    #[test]
    fn unknown_kind_is_ordinary() {
        let data = json!({"id": "x", "title": "t", "kind": "CHECKLIST"});
        let t = Task::from_api(&data, "").unwrap();
        assert!(!t.is_note());
    }

    #[test]
    fn note_kind_parses() {
        let data = json!({"id": "x", "title": "t", "kind": "NOTE"});
        assert!(Task::from_api(&data, "").unwrap().is_note());
    }

    #[test]
    fn actionable_excludes_notes_and_far_future() {
        let mut note = task("n", 5, Some(today()));
        note.kind = TaskKind::Note;
        let urgent = task("u", 0, Some(days_from_today(2)));
        let distant = task("d", 5, Some(days_from_today(30)));
        let undated_low = task("l", 1, None);

        let actionable = filter_actionable(&[note, urgent, distant, undated_low], 3, today());
        let ids: Vec<&str> = actionable.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["u"]);
    }

    #[test]
    fn categorize_partitions_disjointly() {
        let mut eng = task("1", 0, None);
        eng.project_name = "Eng".to_string();
        let mut home = task("2", 0, None);
        home.project_name = "Home".to_string();
        let mut misc = task("3", 0, None);
        misc.project_name = "Misc".to_string();

        let work_lists = vec!["Eng".to_string()];
        let personal_lists = vec!["Home".to_string()];
        let (work, personal, other) =
            categorize_tasks(&[eng, home, misc], &work_lists, &personal_lists);

        assert_eq!(work.len(), 1);
        assert_eq!(personal.len(), 1);
        assert_eq!(other.len(), 1);
        assert_eq!(work[0].project_name, "Eng");
        assert_eq!(personal[0].project_name, "Home");
        assert_eq!(other[0].project_name, "Misc");
    }

    #[test]
    fn categorize_overlap_goes_to_work() {
        let mut t = task("1", 0, None);
        t.project_name = "Shared".to_string();
        let both = vec!["Shared".to_string()];
        let (work, personal, other) = categorize_tasks(&[t], &both, &both);
        assert_eq!(work.len(), 1);
        assert!(personal.is_empty());
        assert!(other.is_empty());
    }

    #[test]
    fn sort_priority_descending_then_due_ascending() {
        let low_soon = task("low", 1, Some(today()));
        let high_late = task("high-late", 5, Some(days_from_today(5)));
        let high_soon = task("high-soon", 5, Some(days_from_today(1)));

        let sorted = sort_by_priority(&[low_soon, high_late, high_soon], today());
        let ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["high-soon", "high-late", "low"]);
    }

    #[test]
    fn sort_undated_after_dated_same_priority() {
        let undated = task("undated", 3, None);
        let dated = task("dated", 3, Some(days_from_today(100)));
        let sorted = sort_by_priority(&[undated, dated], today());
        let ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["dated", "undated"]);
    }

    #[test]
    fn sort_is_stable_on_equal_keys() {
        let first = task("first", 3, Some(today()));
        let second = task("second", 3, Some(today()));
        let third = task("third", 3, Some(today()));
        let sorted = sort_by_priority(&[first, second, third], today());
        let ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn notes_require_due_date() {
        let mut dated = task("dated", 0, Some(days_from_today(1)));
        dated.kind = TaskKind::Note;
        let mut undated = task("undated", 0, None);
        undated.kind = TaskKind::Note;
        let mut overdue = task("overdue", 0, Some(days_from_today(-1)));
        overdue.kind = TaskKind::Note;
        let ordinary = task("ordinary", 0, Some(today()));

        let notes = filter_notes(&[dated, undated, overdue, ordinary], 3, today());
        let ids: Vec<&str> = notes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["dated", "overdue"]);
    }

    #[test]
    fn overdue_is_strictly_before() {
        let yesterday = task("y", 0, Some(days_from_today(-1)));
        let due_today = task("t", 0, Some(today()));
        let overdue = filter_overdue(&[yesterday, due_today], today());
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, "y");
    }

    #[test]
    fn project_filter_ignores_case() {
        let mut t = task("1", 0, None);
        t.project_name = "Engineering".to_string();
        let hits = filter_by_project(&[t], "engineering");
        assert_eq!(hits.len(), 1);
    }
}
