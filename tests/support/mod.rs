#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use taskpad::service::TaskService;
use taskpad::storage::TaskStorage;
use tempfile::TempDir;

/// A scratch home directory holding one task data file.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_data(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.data_path();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_data(&self) -> std::io::Result<String> {
        fs::read_to_string(self.data_path())
    }

    pub fn read_records(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        let value: Value = serde_json::from_str(&self.read_data()?)?;
        match value {
            Value::Array(items) => Ok(items),
            other => Err(format!("data file is not an array: {other}").into()),
        }
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join("config.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn service(&self) -> TaskService {
        TaskService::new(TaskStorage::open(self.data_path()).expect("open storage"))
    }

    /// `taskpad` isolated from the user's config and data.
    pub fn cmd(&self) -> Command {
        let mut cmd = taskpad_cmd();
        cmd.env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .arg("--data")
            .arg(self.data_path());
        cmd
    }
}

pub fn taskpad_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskpad").expect("binary");
    for var in [
        "TASKPAD_DATA",
        "TASKPAD_CONFIG",
        "TASKPAD_DEBUG",
        "TASKPAD_HOST",
        "TASKPAD_PORT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Parse stdout of a `--json` invocation.
pub fn json_stdout(output: &[u8]) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::from_slice(output)?)
}
