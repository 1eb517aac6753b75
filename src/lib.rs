//! taskpad - single-user task tracking library
//!
//! This library provides the core functionality for the taskpad CLI and its
//! HTTP JSON shell.
//!
//! # Core Concepts
//!
//! - **Task**: a to-do entry with title, description, optional due date, and
//!   completion state
//! - **Task collection**: every task, persisted together as one JSON document
//! - **View**: the filtered, sorted projection of the collection for display
//!
//! # Module Organization
//!
//! - `task`: Task entity, mutation rules, record (de)serialization
//! - `storage`: Full-document JSON store with atomic replacement
//! - `query`: Search/status filtering, display ordering, edit-target lookup
//! - `service`: The create/status/update/delete/view commands
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output for CLI commands
//! - `cli`: Command-line interface using clap
//! - `http`: HTTP JSON interface using axum

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod query;
pub mod service;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
