//! Storage layer for taskpad
//!
//! The whole task collection lives in one JSON document:
//!
//! ```text
//! ~/.taskpad_data.json        # default location
//! [
//!   { "id": "...", "title": "...", "description": "", "due_date": null,
//!     "completed": false, "created_at": "...", "updated_at": "..." },
//!   ...
//! ]
//! ```
//!
//! Every operation reads and writes the document in full. Reads never fail:
//! a missing, blank, or corrupt file is an empty collection. Writes go to a
//! temp file in the same directory and are renamed over the target.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::task::Task;

/// File name of the default data document in the user's home directory
pub const DEFAULT_DATA_FILE: &str = ".taskpad_data.json";

/// Default location of the data document, if a home directory is known
pub fn default_data_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_DATA_FILE))
}

/// Full-document store for the task collection
#[derive(Debug, Clone)]
pub struct TaskStorage {
    path: PathBuf,
}

impl TaskStorage {
    /// Open storage at `path`, creating its parent directory if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    /// Path to the backing JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every task. Unreadable input yields an empty collection.
    pub fn load(&self) -> Vec<Task> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot read task file");
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        let document: Value = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "task file is not valid JSON");
                return Vec::new();
            }
        };

        let Value::Array(entries) = document else {
            tracing::warn!(path = %self.path.display(), "task file does not hold a JSON array");
            return Vec::new();
        };

        let total = entries.len();
        let tasks: Vec<Task> = entries
            .iter()
            .filter_map(Value::as_object)
            .map(Task::from_record)
            .collect();
        if tasks.len() != total {
            tracing::warn!(
                path = %self.path.display(),
                skipped = total - tasks.len(),
                "skipped non-object task entries"
            );
        }
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        tasks
    }

    /// Replace the stored collection with `tasks`.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let records: Vec<Value> = tasks
            .iter()
            .map(|task| Value::Object(task.to_record()))
            .collect();
        let json = serde_json::to_string_pretty(&records)?;
        self.write_atomic(json.as_bytes()).map_err(|source| Error::Storage {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Write data atomically using temp file + rename
    ///
    /// A concurrent reader sees either the old document or the new one.
    fn write_atomic(&self, data: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        file.write_all(data)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, crate::task::TIMESTAMP_FORMAT).unwrap()
    }

    fn storage(temp: &TempDir) -> TaskStorage {
        TaskStorage::open(temp.path().join("tasks.json")).unwrap()
    }

    #[test]
    fn open_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/deeper/tasks.json");
        let storage = TaskStorage::open(&path).unwrap();

        assert!(path.parent().unwrap().is_dir());
        assert_eq!(storage.path(), path);
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        assert!(storage(&temp).load().is_empty());
    }

    #[test]
    fn blank_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);
        fs::write(storage.path(), "  \n\t").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);
        fs::write(storage.path(), "{ not json").unwrap();
        assert!(storage.load().is_empty());

        fs::write(storage.path(), r#"{"title": "object, not array"}"#).unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);
        fs::write(storage.path(), r#"[1, "two", {"title": "kept"}, null]"#).unwrap();

        let tasks = storage.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title(), "kept");
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);
        let now = at("2024-03-01T09:00:00");
        let tasks = vec![
            Task::create_at("first", "", "2024-03-05", now).unwrap(),
            Task::create_at("second", "描述", "", now)
                .unwrap()
                .set_completed_at(true, at("2024-03-01T10:00:00")),
        ];

        storage.save(&tasks).unwrap();
        assert_eq!(storage.load(), tasks);
    }

    #[test]
    fn save_writes_pretty_json_and_keeps_unicode() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);
        let task = Task::create("买牛奶", "", "").unwrap();

        storage.save(&[task]).unwrap();
        let content = fs::read_to_string(storage.path()).unwrap();
        assert!(content.starts_with("[\n  {"));
        assert!(content.contains("买牛奶"));
    }

    #[test]
    fn save_replaces_previous_document_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);

        storage.save(&[Task::create("one", "", "").unwrap()]).unwrap();
        storage.save(&[]).unwrap();

        assert!(storage.load().is_empty());
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        // The target path is a directory, so the final rename cannot succeed.
        let target = temp.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        let storage = TaskStorage::open(&target).unwrap();

        let err = storage.save(&[]).expect_err("save should fail");
        assert!(matches!(err, Error::Storage { .. }));
    }
}
