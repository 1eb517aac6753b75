//! Task entity for taskpad.
//!
//! Each task is persisted as one JSON object inside the collection document.
//! Records are read leniently: missing or mistyped keys fall back to defaults
//! so a partially corrupt data file still loads.
//!
//! Mutators consume the task and hand back the updated value. Callers put the
//! result back into their collection before saving.

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Calendar format for due dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used when writing `created_at` / `updated_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// `%.f` also matches an absent fraction, so both forms parse.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Current local time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Generate a fresh task id (UUID v4, simple form).
pub fn new_task_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Parse user-supplied due date text.
///
/// Blank text means "no due date". A valid date is returned in canonical
/// `YYYY-MM-DD` form.
pub fn parse_due_date(raw: &str) -> Result<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| Error::InvalidDueDate(raw.to_string()))?;
    Ok(Some(date.format(DATE_FORMAT).to_string()))
}

/// The mutable fields of a task, with the due date already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    title: String,
    description: String,
    due_date: Option<String>,
    completed: bool,
}

impl TaskFields {
    /// Validate and bundle replacement fields.
    ///
    /// Only the due date is checked here; title emptiness is the caller's rule.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
        completed: bool,
    ) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            description: description.into(),
            due_date: parse_due_date(due_date)?,
            completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: String,
    title: String,
    description: String,
    due_date: Option<String>,
    completed: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Task {
    /// Create a new, incomplete task stamped with the current time.
    pub fn create(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
    ) -> Result<Self> {
        Self::create_at(title, description, due_date, now())
    }

    pub fn create_at(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let fields = TaskFields::new(title, description, due_date, false)?;
        Ok(Self::from_fields_at(fields, now))
    }

    /// Create a task from pre-validated fields.
    pub fn from_fields_at(fields: TaskFields, now: NaiveDateTime) -> Self {
        Self {
            id: new_task_id(),
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            completed: fields.completed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Set the completion flag and refresh `updated_at`.
    ///
    /// The timestamp moves even when `completed` already has this value.
    #[must_use]
    pub fn set_completed(self, completed: bool) -> Self {
        self.set_completed_at(completed, now())
    }

    #[must_use]
    pub fn set_completed_at(mut self, completed: bool, now: NaiveDateTime) -> Self {
        self.completed = completed;
        self.updated_at = now;
        self
    }

    /// Overwrite every mutable field, refreshing `updated_at` once.
    #[must_use]
    pub fn replace_fields(self, fields: TaskFields) -> Self {
        self.replace_fields_at(fields, now())
    }

    #[must_use]
    pub fn replace_fields_at(mut self, fields: TaskFields, now: NaiveDateTime) -> Self {
        self.title = fields.title;
        self.description = fields.description;
        self.due_date = fields.due_date;
        self.completed = fields.completed;
        self.updated_at = now;
        self
    }

    /// Whether the task is incomplete and its due date lies strictly before `today`.
    ///
    /// Malformed persisted dates count as not overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.completed {
            return false;
        }
        let Some(due) = self.due_date.as_deref() else {
            return false;
        };
        NaiveDate::parse_from_str(due, DATE_FORMAT).is_ok_and(|date| date < today)
    }

    /// Due date for list display
    pub fn short_due_date(&self) -> &str {
        self.due_date.as_deref().unwrap_or("-")
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "completed"
        } else {
            "active"
        }
    }

    /// Serialize into the persisted record layout, keys in write order.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("title".to_string(), Value::String(self.title.clone()));
        record.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        record.insert(
            "due_date".to_string(),
            self.due_date
                .as_ref()
                .map(|due| Value::String(due.clone()))
                .unwrap_or(Value::Null),
        );
        record.insert("completed".to_string(), Value::Bool(self.completed));
        record.insert("id".to_string(), Value::String(self.id.clone()));
        record.insert(
            "created_at".to_string(),
            Value::String(format_timestamp(self.created_at)),
        );
        record.insert(
            "updated_at".to_string(),
            Value::String(format_timestamp(self.updated_at)),
        );
        record
    }

    /// Rebuild a task from a persisted record, defaulting anything missing.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self::from_record_at(record, now())
    }

    pub fn from_record_at(record: &Map<String, Value>, now: NaiveDateTime) -> Self {
        let id = string_field(record, "id")
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(new_task_id);
        let due_date = string_field(record, "due_date")
            .filter(|due| !due.trim().is_empty())
            .map(str::to_string);

        Self {
            id,
            title: string_field(record, "title").unwrap_or_default().to_string(),
            description: string_field(record, "description")
                .unwrap_or_default()
                .to_string(),
            due_date,
            completed: record
                .get("completed")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            created_at: timestamp_field(record, "created_at").unwrap_or(now),
            updated_at: timestamp_field(record, "updated_at").unwrap_or(now),
        }
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn string_field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn timestamp_field(record: &Map<String, Value>, key: &str) -> Option<NaiveDateTime> {
    string_field(record, key)
        .and_then(|raw| NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_PARSE_FORMAT).ok())
        .map(|value| value.trunc_subsecs(0))
}
