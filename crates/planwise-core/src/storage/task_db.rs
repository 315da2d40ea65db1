//! SQLite-based storage for tasks, subtasks, notes and the category registry.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::{data_dir, TaskStore};
use crate::error::{CoreError, StoreError};
use crate::note::Note;
use crate::task::{Category, Subtask, Task};

const TASK_COLUMNS: &str = "id, title, category, priority, date, is_completed, reminder_time,
     duration_minutes, routine_id, is_external, source";

// === Helper Functions ===

/// Parse an RFC 3339 timestamp written by [`format_datetime`].
fn parse_datetime(dt_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// A task row as stored, before its timestamps are parsed.
struct TaskRow {
    id: String,
    title: String,
    category: String,
    priority: String,
    date: String,
    is_completed: bool,
    reminder_time: Option<String>,
    duration_minutes: Option<u32>,
    routine_id: Option<String>,
    is_external: bool,
    source: Option<String>,
}

impl TaskRow {
    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            priority: row.get(3)?,
            date: row.get(4)?,
            is_completed: row.get(5)?,
            reminder_time: row.get(6)?,
            duration_minutes: row.get(7)?,
            routine_id: row.get(8)?,
            is_external: row.get(9)?,
            source: row.get(10)?,
        })
    }

    /// `None` when the row's date cannot be parsed; the row is skipped.
    fn into_task(self, subtasks: Vec<Subtask>) -> Option<Task> {
        let Some(date) = parse_datetime(&self.date) else {
            tracing::warn!(task_id = %self.id, date = %self.date, "skipping task with unparseable date");
            return None;
        };
        let reminder_time = self.reminder_time.as_deref().and_then(|raw| {
            let parsed = parse_datetime(raw);
            if parsed.is_none() {
                tracing::warn!(task_id = %self.id, reminder = %raw, "dropping unparseable reminder");
            }
            parsed
        });

        Some(Task {
            id: self.id,
            title: self.title,
            category: self.category,
            priority: self.priority.parse().unwrap_or_default(),
            date,
            is_completed: self.is_completed,
            reminder_time,
            duration_minutes: self.duration_minutes,
            routine_id: self.routine_id,
            subtasks,
            is_external: self.is_external,
            source: self.source,
        })
    }
}

/// `None` when `updated_at` cannot be parsed; the row is skipped.
fn note_from_parts(id: String, title: String, content: String, updated_at: String) -> Option<Note> {
    let Some(updated_at) = parse_datetime(&updated_at) else {
        tracing::warn!(note_id = %id, updated_at = %updated_at, "skipping note with unparseable timestamp");
        return None;
    };
    Some(Note {
        id,
        title,
        content,
        updated_at,
    })
}

fn note_parts(row: &rusqlite::Row) -> Result<(String, String, String, String), rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn write_subtasks(tx: &Transaction<'_>, task: &Task) -> Result<(), rusqlite::Error> {
    tx.execute("DELETE FROM subtasks WHERE task_id = ?1", params![task.id])?;
    for (position, subtask) in task.subtasks.iter().enumerate() {
        tx.execute(
            "INSERT INTO subtasks (id, task_id, position, title, is_completed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                subtask.id,
                task.id,
                position as i64,
                subtask.title,
                subtask.is_completed
            ],
        )?;
    }
    Ok(())
}

fn insert_task_row(tx: &Transaction<'_>, task: &Task) -> Result<(), rusqlite::Error> {
    tx.execute(
        &format!(
            "INSERT INTO tasks ({TASK_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        params![
            task.id,
            task.title,
            task.category,
            task.priority.as_str(),
            format_datetime(task.date),
            task.is_completed,
            task.reminder_time.map(format_datetime),
            task.duration_minutes,
            task.routine_id,
            task.is_external,
            task.source,
        ],
    )?;
    write_subtasks(tx, task)
}

/// SQLite database for tasks and categories.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open the database at `<data dir>/planwise.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("planwise.db");
        Ok(Self::open_path(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tasks (
                id                TEXT PRIMARY KEY,
                title             TEXT NOT NULL,
                category          TEXT NOT NULL,
                priority          TEXT NOT NULL DEFAULT 'medium',
                date              TEXT NOT NULL,
                is_completed      INTEGER NOT NULL DEFAULT 0,
                reminder_time     TEXT,
                duration_minutes  INTEGER,
                routine_id        TEXT,
                is_external       INTEGER NOT NULL DEFAULT 0,
                source            TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_routine ON tasks(routine_id);

            CREATE TABLE IF NOT EXISTS subtasks (
                id            TEXT PRIMARY KEY,
                task_id       TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                position      INTEGER NOT NULL,
                title         TEXT NOT NULL,
                is_completed  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS categories (
                id     TEXT PRIMARY KEY,
                label  TEXT NOT NULL,
                color  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL DEFAULT '',
                content     TEXT NOT NULL DEFAULT '',
                updated_at  TEXT NOT NULL
            );",
        )
    }

    /// Subtasks grouped by owning task, in checklist order.
    fn subtasks_by_task(&self) -> Result<HashMap<String, Vec<Subtask>>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT task_id, id, title, is_completed FROM subtasks ORDER BY task_id, position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Subtask {
                    id: row.get(1)?,
                    title: row.get(2)?,
                    is_completed: row.get(3)?,
                },
            ))
        })?;

        let mut grouped: HashMap<String, Vec<Subtask>> = HashMap::new();
        for row in rows {
            let (task_id, subtask) = row?;
            grouped.entry(task_id).or_default().push(subtask);
        }
        Ok(grouped)
    }

    fn subtasks_of(&self, task_id: &str) -> Result<Vec<Subtask>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, is_completed FROM subtasks WHERE task_id = ?1 ORDER BY position",
        )?;
        let subtasks = stmt
            .query_map(params![task_id], |row| {
                Ok(Subtask {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    is_completed: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(subtasks)
    }
}

impl TaskStore for TaskDb {
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut subtasks = self.subtasks_by_task()?;
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY date"))?;
        let rows = stmt
            .query_map([], TaskRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut tasks: Vec<Task> = rows
            .into_iter()
            .filter_map(|row| {
                let checklist = subtasks.remove(&row.id).unwrap_or_default();
                row.into_task(checklist)
            })
            .collect();
        // Text order matches instant order only for equal offsets.
        tasks.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(tasks)
    }

    fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                TaskRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => {
                let subtasks = self.subtasks_of(&row.id)?;
                Ok(row.into_task(subtasks))
            }
            None => Ok(None),
        }
    }

    fn insert_task(&mut self, task: &Task) -> Result<(), StoreError> {
        self.insert_tasks(std::slice::from_ref(task))
    }

    /// All-or-nothing: one transaction for the whole batch.
    fn insert_tasks(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        for task in tasks {
            task.validate()?;
        }
        let tx = self.conn.transaction()?;
        for task in tasks {
            insert_task_row(&tx, task)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> Result<(), StoreError> {
        task.validate()?;
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE tasks
             SET title = ?2, category = ?3, priority = ?4, date = ?5, is_completed = ?6,
                 reminder_time = ?7, duration_minutes = ?8, routine_id = ?9,
                 is_external = ?10, source = ?11
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.category,
                task.priority.as_str(),
                format_datetime(task.date),
                task.is_completed,
                task.reminder_time.map(format_datetime),
                task.duration_minutes,
                task.routine_id,
                task.is_external,
                task.source,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::task_not_found(&task.id));
        }
        write_subtasks(&tx, task)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_task(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn delete_routine(&mut self, routine_id: &str) -> Result<usize, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE routine_id = ?1", params![routine_id])?;
        Ok(removed)
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label, color FROM categories ORDER BY label")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    label: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn upsert_category(&mut self, category: &Category) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO categories (id, label, color) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET label = excluded.label, color = excluded.color",
            params![category.id, category.label, category.color],
        )?;
        Ok(())
    }

    fn delete_category(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, content, updated_at FROM notes")?;
        let rows = stmt
            .query_map([], note_parts)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut notes: Vec<Note> = rows
            .into_iter()
            .filter_map(|(id, title, content, updated_at)| {
                note_from_parts(id, title, content, updated_at)
            })
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    fn get_note(&self, id: &str) -> Result<Option<Note>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, content, updated_at FROM notes WHERE id = ?1",
                params![id],
                note_parts,
            )
            .optional()?;
        Ok(row.and_then(|(id, title, content, updated_at)| {
            note_from_parts(id, title, content, updated_at)
        }))
    }

    fn insert_note(&mut self, note: &Note) -> Result<(), StoreError> {
        note.validate()?;
        self.conn.execute(
            "INSERT INTO notes (id, title, content, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![note.id, note.title, note.content, format_datetime(note.updated_at)],
        )?;
        Ok(())
    }

    fn update_note(&mut self, note: &Note) -> Result<(), StoreError> {
        note.validate()?;
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?2, content = ?3, updated_at = ?4 WHERE id = ?1",
            params![note.id, note.title, note.content, format_datetime(note.updated_at)],
        )?;
        if changed == 0 {
            return Err(StoreError::note_not_found(&note.id));
        }
        Ok(())
    }

    fn delete_note(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
