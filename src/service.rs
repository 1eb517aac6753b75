//! Task commands for taskpad.
//!
//! Each operation is one request: load the full collection, validate the
//! input, apply at most one mutation, and save the collection back in full.
//! Rejected input leaves the stored document untouched. There is no locking,
//! so concurrent writers race and the last save wins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::{self, TaskView, ViewQuery};
use crate::storage::TaskStorage;
use crate::task::{self, Task, TaskFields};

/// Target state for the status command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Completed,
    Active,
}

impl TaskState {
    pub fn is_completed(self) -> bool {
        matches!(self, TaskState::Completed)
    }
}

impl FromStr for TaskState {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim() {
            "completed" => Ok(TaskState::Completed),
            "active" => Ok(TaskState::Active),
            other => Err(Error::InvalidState(other.to_string())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskState::Completed => "completed",
            TaskState::Active => "active",
        })
    }
}

/// Raw input for creating a task. Missing fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
}

/// Raw input for replacing every field of a task
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct TaskService {
    storage: TaskStorage,
}

impl TaskService {
    pub fn new(storage: TaskStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &TaskStorage {
        &self.storage
    }

    /// Filtered, sorted list for display. Always succeeds.
    pub fn view(&self, query: &ViewQuery) -> TaskView {
        let tasks = self.storage.load();
        query::project(&tasks, query, task::today())
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        let tasks = self.storage.load();
        query::find_task(&tasks, id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    pub fn create(&self, input: NewTask) -> Result<Task> {
        let mut tasks = self.storage.load();
        let title = validate_title(&input.title)?;
        let fields = TaskFields::new(
            title,
            input.description.trim(),
            input.due_date.as_deref().unwrap_or_default(),
            false,
        )?;

        let created = Task::from_fields_at(fields, task::now());
        tasks.push(created.clone());
        self.storage.save(&tasks)?;
        tracing::info!(id = created.id(), "task created");
        Ok(created)
    }

    /// Set the completion state. The id is checked before the state value.
    pub fn set_status(&self, id: &str, state: &str) -> Result<Task> {
        let mut tasks = self.storage.load();
        let index = position(&tasks, id)?;
        let state: TaskState = state.parse()?;

        let updated = tasks.remove(index).set_completed(state.is_completed());
        tasks.insert(index, updated.clone());
        self.storage.save(&tasks)?;
        tracing::info!(id, %state, "task status changed");
        Ok(updated)
    }

    /// Replace every mutable field after validating all of them.
    pub fn update(&self, id: &str, input: TaskUpdate) -> Result<Task> {
        let mut tasks = self.storage.load();
        let index = position(&tasks, id)?;
        let title = validate_title(&input.title)?;
        let fields = TaskFields::new(
            title,
            input.description.trim(),
            input.due_date.as_deref().unwrap_or_default(),
            input.completed,
        )?;

        let updated = tasks.remove(index).replace_fields(fields);
        tasks.insert(index, updated.clone());
        self.storage.save(&tasks)?;
        tracing::info!(id, "task updated");
        Ok(updated)
    }

    /// Remove a task and return it.
    pub fn delete(&self, id: &str) -> Result<Task> {
        let tasks = self.storage.load();
        let (removed, remaining): (Vec<Task>, Vec<Task>) =
            tasks.into_iter().partition(|task| task.id() == id);
        let Some(removed) = removed.into_iter().next() else {
            return Err(Error::TaskNotFound(id.to_string()));
        };

        self.storage.save(&remaining)?;
        tracing::info!(id, "task deleted");
        Ok(removed)
    }
}

/// Reject blank titles; returns the trimmed title.
pub fn validate_title(raw: &str) -> Result<&str> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    Ok(title)
}

fn position(tasks: &[Task], id: &str) -> Result<usize> {
    tasks
        .iter()
        .position(|task| task.id() == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))
}
