mod config;
pub mod memory;
pub mod task_db;

pub use config::{Config, RoutineConfig, TimeConfig};
pub use memory::MemoryStore;
pub use task_db::TaskDb;

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};
use crate::note::Note;
use crate::task::{Category, Task};

/// Returns `~/.config/planwise[-dev]/` based on PLANWISE_ENV.
///
/// Set PLANWISE_ENV=dev to use the development data directory, or
/// PLANWISE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PLANWISE_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PLANWISE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("planwise-dev")
            } else {
                base_dir.join("planwise")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Persistence behind the planner.
///
/// Implementations own tasks, notes and the category registry. Tasks list
/// ascending by date; notes list newest first.
pub trait TaskStore {
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError>;

    fn insert_task(&mut self, task: &Task) -> Result<(), StoreError>;

    /// Insert a batch, e.g. the instances of one routine.
    fn insert_tasks(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        for task in tasks {
            self.insert_task(task)?;
        }
        Ok(())
    }

    /// Replace a stored task. Fails with `NotFound` if the id is unknown.
    fn update_task(&mut self, task: &Task) -> Result<(), StoreError>;

    /// Returns whether a task was removed.
    fn delete_task(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Remove every instance of a routine. Returns how many were removed.
    fn delete_routine(&mut self, routine_id: &str) -> Result<usize, StoreError>;

    /// Registered categories, sorted by label.
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    fn upsert_category(&mut self, category: &Category) -> Result<(), StoreError>;

    /// Returns whether a category was removed.
    fn delete_category(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Notes, most recently updated first.
    fn list_notes(&self) -> Result<Vec<Note>, StoreError>;

    fn get_note(&self, id: &str) -> Result<Option<Note>, StoreError>;

    fn insert_note(&mut self, note: &Note) -> Result<(), StoreError>;

    /// Replace a stored note. Fails with `NotFound` if the id is unknown.
    fn update_note(&mut self, note: &Note) -> Result<(), StoreError>;

    /// Returns whether a note was removed.
    fn delete_note(&mut self, id: &str) -> Result<bool, StoreError>;
}

/// The categories seeded into an empty registry. Ids double as labels so
/// the suggestion rules' default category keys resolve.
pub fn default_categories() -> Vec<Category> {
    [
        ("Work", "bg-blue-100 text-blue-700 border-blue-200"),
        ("Personal", "bg-green-100 text-green-700 border-green-200"),
        ("Health", "bg-red-100 text-red-700 border-red-200"),
        ("Social", "bg-purple-100 text-purple-700 border-purple-200"),
        ("Other", "bg-gray-100 text-gray-700 border-gray-200"),
    ]
    .into_iter()
    .map(|(label, color)| Category {
        id: label.to_string(),
        label: label.to_string(),
        color: color.to_string(),
    })
    .collect()
}
