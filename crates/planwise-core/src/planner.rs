//! The planner: an explicit store object that feeds the two engines.
//!
//! [`Planner`] owns a [`TaskStore`], the injected clock and id source, and
//! the current (ephemeral) suggestion list. The engines stay pure; all
//! persistence happens here.

use std::sync::Arc;

use crate::calendar::LocalZone;
use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::error::{Result, StoreError, ValidationError};
use crate::note::Note;
use crate::reminder::{self, ReminderNotice};
use crate::routine::{RecurrenceExpander, RecurrenceRule, DEFAULT_HORIZON_MONTHS};
use crate::stats::{self, Statistics};
use crate::storage::{default_categories, Config, TaskStore};
use crate::suggest::{Suggestion, SuggestionEngine, SuggestionRules};
use crate::task::{Category, Priority, Task, TaskDraft, TaskPatch};

pub struct Planner<S: TaskStore> {
    store: S,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    zone: LocalZone,
    rules: SuggestionRules,
    horizon_months: u32,
    suggestions: Vec<Suggestion>,
}

impl<S: TaskStore> Planner<S> {
    /// Planner on the system clock, random ids and the machine's local offset.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            zone: LocalZone::system(),
            rules: SuggestionRules::default(),
            horizon_months: DEFAULT_HORIZON_MONTHS,
            suggestions: Vec::new(),
        }
    }

    /// Apply zone, rule keys and horizon from `config`.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store)
            .with_zone(config.zone())
            .with_rules(config.suggestions.clone())
            .with_horizon_months(config.routine.horizon_months)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_zone(mut self, zone: LocalZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_rules(mut self, rules: SuggestionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_horizon_months(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    // === Tasks ===

    /// All tasks, ascending by date.
    pub fn tasks(&self) -> Result<Vec<Task>> {
        Ok(self.store.list_tasks()?)
    }

    pub fn task(&self, id: &str) -> Result<Task> {
        Ok(self
            .store
            .get_task(id)?
            .ok_or_else(|| StoreError::task_not_found(id))?)
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let task = draft.build(self.ids.as_ref(), self.zone)?;
        self.store.insert_task(&task)?;
        tracing::debug!(task_id = %task.id, "task added");
        Ok(task)
    }

    /// Apply a partial update and return the stored result.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut task = self.task(id)?;
        patch.apply(&mut task)?;
        self.store.update_task(&task)?;
        Ok(task)
    }

    /// Returns whether the task existed.
    pub fn remove_task(&mut self, id: &str) -> Result<bool> {
        Ok(self.store.delete_task(id)?)
    }

    /// Flip the completion flag.
    pub fn toggle_task(&mut self, id: &str) -> Result<Task> {
        let mut task = self.task(id)?;
        task.is_completed = !task.is_completed;
        self.store.update_task(&task)?;
        Ok(task)
    }

    /// Case-insensitive title search. An empty query matches everything.
    pub fn search(&self, query: &str) -> Result<Vec<Task>> {
        let needle = query.trim().to_lowercase();
        let mut tasks = self.store.list_tasks()?;
        if !needle.is_empty() {
            tasks.retain(|t| t.title.to_lowercase().contains(&needle));
        }
        Ok(tasks)
    }

    // === Routines ===

    /// Expand `draft` under `rule` and persist every instance. The draft
    /// itself is only a template and is not stored.
    pub fn create_routine(&mut self, draft: TaskDraft, rule: &RecurrenceRule) -> Result<Vec<Task>> {
        let base = draft.build(self.ids.as_ref(), self.zone)?;
        let expander = RecurrenceExpander::new(self.clock.as_ref(), self.ids.as_ref(), self.zone);
        let instances = expander.expand(&base, rule, self.horizon_months)?;
        self.store.insert_tasks(&instances)?;
        tracing::info!(
            routine_id = instances.first().and_then(|t| t.routine_id.as_deref()).unwrap_or(""),
            instances = instances.len(),
            "routine created"
        );
        Ok(instances)
    }

    /// Remove every instance of a routine. Returns how many were removed.
    pub fn remove_routine(&mut self, routine_id: &str) -> Result<usize> {
        Ok(self.store.delete_routine(routine_id)?)
    }

    // === Categories ===

    /// The registry, seeded with the defaults when it is empty.
    pub fn categories(&mut self) -> Result<Vec<Category>> {
        let categories = self.store.list_categories()?;
        if !categories.is_empty() {
            return Ok(categories);
        }
        for category in default_categories() {
            self.store.upsert_category(&category)?;
        }
        Ok(self.store.list_categories()?)
    }

    /// The registry for display, falling back to the defaults when empty.
    /// Unlike [`Planner::categories`] this never writes.
    pub fn category_labels(&self) -> Result<Vec<Category>> {
        let categories = self.store.list_categories()?;
        if categories.is_empty() {
            return Ok(default_categories());
        }
        Ok(categories)
    }

    pub fn add_category(&mut self, label: &str, color: &str) -> Result<Category> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyField("label").into());
        }
        let category = Category {
            id: self.ids.next_id(),
            label: label.to_string(),
            color: color.to_string(),
        };
        self.store.upsert_category(&category)?;
        Ok(category)
    }

    pub fn update_category(
        &mut self,
        id: &str,
        label: Option<&str>,
        color: Option<&str>,
    ) -> Result<Category> {
        let mut category = self
            .store
            .list_categories()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::category_not_found(id))?;
        if let Some(label) = label {
            let label = label.trim();
            if label.is_empty() {
                return Err(ValidationError::EmptyField("label").into());
            }
            category.label = label.to_string();
        }
        if let Some(color) = color {
            category.color = color.to_string();
        }
        self.store.upsert_category(&category)?;
        Ok(category)
    }

    /// Returns whether the category existed. Tasks keep their category key.
    pub fn remove_category(&mut self, id: &str) -> Result<bool> {
        Ok(self.store.delete_category(id)?)
    }

    // === Notes ===

    /// Notes, most recently updated first.
    pub fn notes(&self) -> Result<Vec<Note>> {
        Ok(self.store.list_notes()?)
    }

    pub fn note(&self, id: &str) -> Result<Note> {
        Ok(self
            .store
            .get_note(id)?
            .ok_or_else(|| StoreError::note_not_found(id))?)
    }

    /// Notes whose title or content contains `query`, ignoring case.
    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let needle = query.trim();
        let mut notes = self.store.list_notes()?;
        notes.retain(|n| n.matches(needle));
        Ok(notes)
    }

    /// Store a new note stamped with the current time. A note with neither
    /// title nor content is rejected.
    pub fn add_note(&mut self, title: &str, content: &str) -> Result<Note> {
        let note = Note {
            id: self.ids.next_id(),
            title: title.trim().to_string(),
            content: content.to_string(),
            updated_at: self.clock.now(),
        };
        self.store.insert_note(&note)?;
        tracing::debug!(note_id = %note.id, "note added");
        Ok(note)
    }

    /// Replace the given fields and bump `updated_at`.
    pub fn update_note(
        &mut self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Note> {
        let mut note = self.note(id)?;
        if let Some(title) = title {
            note.title = title.trim().to_string();
        }
        if let Some(content) = content {
            note.content = content.to_string();
        }
        note.updated_at = self.clock.now();
        self.store.update_note(&note)?;
        Ok(note)
    }

    /// Returns whether the note existed.
    pub fn remove_note(&mut self, id: &str) -> Result<bool> {
        Ok(self.store.delete_note(id)?)
    }

    // === Suggestions ===

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Recompute suggestions from the stored history, replacing the list.
    pub fn refresh_suggestions(&mut self) -> Result<&[Suggestion]> {
        let history = self.store.list_tasks()?;
        let engine = SuggestionEngine::new(self.clock.as_ref(), self.ids.as_ref(), self.zone)
            .with_rules(self.rules.clone());
        self.suggestions = engine.generate(&history);
        Ok(&self.suggestions)
    }

    /// Turn a suggestion into a medium-priority task without subtasks or
    /// reminder, and drop it from the list.
    pub fn accept_suggestion(&mut self, id: &str) -> Result<Task> {
        let index = self
            .suggestions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::suggestion_not_found(id))?;

        let suggestion = &self.suggestions[index];
        let mut task = Task::new(
            self.ids.next_id(),
            suggestion.title.clone(),
            suggestion.category.clone(),
            suggestion.suggested_date,
        );
        task.priority = Priority::Medium;
        task.duration_minutes = suggestion.duration_minutes;

        self.store.insert_task(&task)?;
        self.suggestions.remove(index);
        tracing::debug!(task_id = %task.id, suggestion_id = id, "suggestion accepted");
        Ok(task)
    }

    /// Drop one suggestion. Unknown ids are ignored; returns whether one was removed.
    pub fn reject_suggestion(&mut self, id: &str) -> bool {
        let before = self.suggestions.len();
        self.suggestions.retain(|s| s.id != id);
        self.suggestions.len() != before
    }

    // === Reminders & statistics ===

    pub fn due_reminders(&self) -> Result<Vec<ReminderNotice>> {
        let tasks = self.store.list_tasks()?;
        Ok(reminder::due_reminders(&tasks, self.clock.now()))
    }

    pub fn statistics(&self) -> Result<Statistics> {
        let categories = self.category_labels()?;
        let tasks = self.store.list_tasks()?;
        Ok(stats::compute(&tasks, &categories, self.clock.now(), self.zone))
    }
}
