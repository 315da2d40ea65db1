//! Core error types for planwise-core.
//!
//! This module defines the error hierarchy using thiserror. Each subsystem
//! gets its own focused enum, and [`CoreError`] unifies them for callers
//! that drive several subsystems at once.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for planwise-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Recurrence expansion errors
    #[error("Recurrence error: {0}")]
    Recurrence(#[from] RecurrenceError),

    /// Task store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised before a routine is expanded.
///
/// Expansion rejects bad input up front instead of walking an unbounded
/// or empty series.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// The recurrence rule cannot produce a well-formed series
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    /// The base task cannot seed a series
    #[error("Invalid base task: {0}")]
    InvalidTask(String),
}

/// Task store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Entity lookup failed
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The entity was rejected before being written
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "task",
            id: id.into(),
        }
    }

    pub fn category_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "category",
            id: id.into(),
        }
    }

    pub fn note_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "note",
            id: id.into(),
        }
    }

    pub fn suggestion_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "suggestion",
            id: id.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The data directory could not be created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Reminders must fire at or before the task itself
    #[error("Reminder ({reminder}) is later than the task date ({date})")]
    ReminderAfterDate {
        reminder: chrono::DateTime<chrono::Utc>,
        date: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
