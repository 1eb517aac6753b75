//! View projection over the task collection.
//!
//! Filtering, ordering, and edit-target lookup for display. Everything here
//! is pure: the same tasks and query always produce the same view.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::Task;

/// Stand-in due date for tasks without one, so they sort last among peers
pub const NO_DUE_DATE_SENTINEL: &str = "9999-12-31";

/// Completion filter applied to the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Parse a filter value, treating anything unrecognized as `All`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    fn keeps(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed(),
            StatusFilter::Completed => task.completed(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown status filter '{other}' (expected all|active|completed)"
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller wants to see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub status: StatusFilter,
    pub edit_id: Option<String>,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter, edit_id: Option<String>) -> Self {
        Self {
            search: search.into(),
            status,
            edit_id,
        }
    }
}

/// The projected list for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub tasks: Vec<Task>,
    pub total: usize,
    pub overdue: usize,
    pub search: String,
    pub status: StatusFilter,
    pub edit_task: Option<Task>,
}

/// Filter, sort, and resolve the edit target.
///
/// `today` only feeds the overdue count; it never affects which tasks are shown.
pub fn project(tasks: &[Task], query: &ViewQuery, today: NaiveDate) -> TaskView {
    let search = query.search.trim();
    let keyword = search.to_lowercase();

    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| keyword.is_empty() || matches_keyword(task, &keyword))
        .filter(|task| query.status.keeps(task))
        .cloned()
        .collect();
    sort_tasks(&mut visible);

    let edit_task = query
        .edit_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .and_then(|id| find_task(tasks, id))
        .cloned();

    let overdue = visible.iter().filter(|task| task.is_overdue(today)).count();

    TaskView {
        total: visible.len(),
        tasks: visible,
        overdue,
        search: search.to_string(),
        status: query.status,
        edit_task,
    }
}

/// Stable sort: incomplete before complete, then by due date, then by last update.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.completed()
            .cmp(&right.completed())
            .then_with(|| effective_due_date(left).cmp(effective_due_date(right)))
            .then_with(|| left.updated_at().cmp(&right.updated_at()))
    });
}

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id() == id)
}

fn effective_due_date(task: &Task) -> &str {
    task.due_date().unwrap_or(NO_DUE_DATE_SENTINEL)
}

fn matches_keyword(task: &Task, keyword: &str) -> bool {
    task.title().to_lowercase().contains(keyword)
        || task.description().to_lowercase().contains(keyword)
}
