//! In-process task store.

use super::TaskStore;
use crate::error::StoreError;
use crate::note::Note;
use crate::task::{Category, Task};

/// Keeps everything in vectors. Used by tests and as a scratch store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    notes: Vec<Note>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: tasks.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl TaskStore for MemoryStore {
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(tasks)
    }

    fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn insert_task(&mut self, task: &Task) -> Result<(), StoreError> {
        task.validate()?;
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::QueryFailed(format!(
                "task {} already exists",
                task.id
            )));
        }
        self.tasks.push(task.clone());
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> Result<(), StoreError> {
        task.validate()?;
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| StoreError::task_not_found(&task.id))?;
        *slot = task.clone();
        Ok(())
    }

    fn delete_task(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        Ok(self.tasks.len() != before)
    }

    fn delete_routine(&mut self, routine_id: &str) -> Result<usize, StoreError> {
        let before = self.tasks.len();
        self.tasks
            .retain(|t| t.routine_id.as_deref() != Some(routine_id));
        Ok(before - self.tasks.len())
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(categories)
    }

    fn upsert_category(&mut self, category: &Category) -> Result<(), StoreError> {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category.clone(),
            None => self.categories.push(category.clone()),
        }
        Ok(())
    }

    fn delete_category(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        Ok(self.categories.len() != before)
    }

    fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.notes.clone();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    fn get_note(&self, id: &str) -> Result<Option<Note>, StoreError> {
        Ok(self.notes.iter().find(|n| n.id == id).cloned())
    }

    fn insert_note(&mut self, note: &Note) -> Result<(), StoreError> {
        note.validate()?;
        if self.notes.iter().any(|n| n.id == note.id) {
            return Err(StoreError::QueryFailed(format!(
                "note {} already exists",
                note.id
            )));
        }
        self.notes.push(note.clone());
        Ok(())
    }

    fn update_note(&mut self, note: &Note) -> Result<(), StoreError> {
        note.validate()?;
        let slot = self
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| StoreError::note_not_found(&note.id))?;
        *slot = note.clone();
        Ok(())
    }

    fn delete_note(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        Ok(self.notes.len() != before)
    }
}
