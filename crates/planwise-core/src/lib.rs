//! # Planwise Core Library
//!
//! This library provides the core logic for Planwise, a personal task
//! planner. It follows a CLI-first layout: every operation is available
//! through the standalone `planwise` binary, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Routines**: expand one base task plus a recurrence rule into a
//!   bounded series of task instances
//! - **Suggestions**: a multi-rule heuristic engine that mines task history
//!   for habits and proposes context-dependent tasks
//! - **Notes**: free-form notes stored beside the tasks
//! - **Storage**: SQLite task store and TOML configuration
//! - **Planner**: the explicit store object that wires both engines to
//!   persistence
//!
//! Both engines read "now" and fresh identifiers through the injected
//! [`Clock`] and [`IdGenerator`] capabilities, and reason about calendar
//! days in an explicit [`LocalZone`].
//!
//! ## Key Components
//!
//! - [`RecurrenceExpander`]: routine expansion
//! - [`SuggestionEngine`]: suggestion generation
//! - [`Planner`]: task, routine, category, note and suggestion operations
//! - [`TaskDb`]: SQLite persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod clock;
pub mod error;
pub mod note;
pub mod planner;
pub mod reminder;
pub mod routine;
pub mod stats;
pub mod storage;
pub mod suggest;
pub mod task;

pub use calendar::LocalZone;
pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use error::{ConfigError, CoreError, RecurrenceError, Result, StoreError, ValidationError};
pub use note::Note;
pub use planner::Planner;
pub use reminder::{due_reminders, ReminderNotice};
pub use routine::{expand_routine, Recurrence, RecurrenceExpander, RecurrenceRule};
pub use stats::Statistics;
pub use storage::{Config, MemoryStore, TaskDb, TaskStore};
pub use suggest::{Suggestion, SuggestionEngine, SuggestionRules};
pub use task::{Category, Priority, ReminderLead, Subtask, Task, TaskDraft, TaskPatch};
