//! Command-line interface for taskpad
//!
//! This module defines the CLI structure using clap derive macros.
//! Task commands live in `task`, the HTTP server in `serve`.

use std::path::{Path, PathBuf};

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::service::TaskService;
use crate::storage::TaskStorage;

mod serve;
mod task;

/// taskpad - single-user task tracking
///
/// Create, edit, filter, and delete tasks stored in one JSON file.
#[derive(Parser, Debug)]
#[command(name = "taskpad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task data file (defaults to ~/.taskpad_data.json)
    #[arg(long, global = true, env = "TASKPAD_DATA")]
    pub data: Option<PathBuf>,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "TASKPAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(
        long,
        global = true,
        env = "TASKPAD_DEBUG",
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks, filtered and sorted for display
    List {
        /// Keep tasks whose title or description contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Status filter: all, active, completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Task ID selected for editing
        #[arg(long)]
        edit: Option<String>,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        due: String,
    },

    /// Mark a task completed or active
    Status {
        /// Task ID
        id: String,

        /// Target state: completed, active
        state: String,
    },

    /// Replace every field of a task
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: String,

        /// New description (empty clears it)
        #[arg(short, long, default_value = "")]
        description: String,

        /// New due date (YYYY-MM-DD, empty clears it)
        #[arg(long, default_value = "")]
        due: String,

        /// Mark the task completed
        #[arg(long)]
        completed: bool,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Serve the HTTP JSON interface
    Serve {
        /// Host to bind
        #[arg(long, env = "TASKPAD_HOST")]
        host: Option<String>,

        /// Port to bind
        #[arg(long, env = "TASKPAD_PORT")]
        port: Option<u16>,
    },
}

impl Commands {
    /// Subcommand name used to label output envelopes
    pub fn name(&self) -> &'static str {
        match self {
            Commands::List { .. } => "list",
            Commands::Add { .. } => "add",
            Commands::Status { .. } => "status",
            Commands::Update { .. } => "update",
            Commands::Delete { .. } => "delete",
            Commands::Serve { .. } => "serve",
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config = Config::resolve(self.config.as_deref())?;
        let service = open_service(&config, self.data.as_deref())?;

        match self.command {
            Commands::List { search, status, edit } => task::run_list(task::ListOptions {
                search,
                status,
                edit,
                service,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Add { title, description, due } => task::run_add(task::AddOptions {
                title,
                description,
                due,
                service,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Status { id, state } => task::run_status(task::StatusOptions {
                id,
                state,
                service,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Update {
                id,
                title,
                description,
                due,
                completed,
            } => task::run_update(task::UpdateOptions {
                id,
                title,
                description,
                due,
                completed,
                service,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { id } => task::run_delete(task::DeleteOptions {
                id,
                service,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Serve { host, port } => {
                let mut server = config.server.clone();
                if let Some(host) = host {
                    server.host = host;
                }
                if let Some(port) = port {
                    server.port = port;
                }
                serve::run(serve::ServeOptions {
                    server,
                    service,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
        }
    }
}

fn open_service(config: &Config, data: Option<&Path>) -> Result<TaskService> {
    let path = config.data_path(data)?;
    tracing::debug!(path = %path.display(), "using task file");
    Ok(TaskService::new(TaskStorage::open(path)?))
}
