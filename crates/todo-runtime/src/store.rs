//! The list plus its storage, kept in step.
//!
//! Every mutation runs against the in-memory [`TodoList`] first and is then
//! written out. When the write fails the list is put back exactly as it was,
//! so callers never observe a change that is not on disk.

use todo_core::list::{EditOutcome, EmptyEditPolicy, TodoList};
use todo_core::models::{Todo, TodoId};
use todo_core::{Result, TodoError};
use todo_data::storage::TodoStorage;
use todo_data::transfer::{self, MergeMode};
use tracing::{debug, error, info};

pub struct TodoStore {
    list: TodoList,
    storage: Box<dyn TodoStorage>,
    empty_edit: EmptyEditPolicy,
}

impl TodoStore {
    /// Load the list from `storage`.
    pub fn open(storage: impl TodoStorage + 'static) -> Result<Self> {
        let mut storage: Box<dyn TodoStorage> = Box::new(storage);
        let list = TodoList::from_todos(storage.load()?);
        info!("Opened {} with {} todos", storage.describe(), list.len());
        Ok(Self {
            list,
            storage,
            empty_edit: EmptyEditPolicy::default(),
        })
    }

    /// What [`TodoStore::edit`] does with text that trims to nothing.
    pub fn with_empty_edit_policy(mut self, policy: EmptyEditPolicy) -> Self {
        self.empty_edit = policy;
        self
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn describe(&self) -> String {
        self.storage.describe()
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    pub fn add(&mut self, text: &str) -> Result<Todo> {
        self.commit(|list| list.add(text).map(|todo| (todo, true)))
    }

    pub fn toggle(&mut self, id: TodoId) -> Result<Todo> {
        self.commit(|list| list.toggle(id).map(|todo| (todo, true)))
    }

    pub fn set_completed(&mut self, id: TodoId, completed: bool) -> Result<Todo> {
        self.commit(|list| list.set_completed(id, completed))
    }

    /// Edit using the store's empty-edit policy.
    pub fn edit(&mut self, id: TodoId, text: &str) -> Result<EditOutcome> {
        let policy = self.empty_edit;
        self.commit(|list| {
            let outcome = list.edit(id, text, policy)?;
            let changed = outcome.changed();
            Ok((outcome, changed))
        })
    }

    /// Apply an optional text change and an optional completion change as one
    /// write. Empty text is always rejected here, whatever the store policy.
    pub fn update(
        &mut self,
        id: TodoId,
        text: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Todo> {
        self.commit(|list| {
            let mut changed = false;
            let mut current = list
                .get(id)
                .cloned()
                .ok_or(TodoError::NotFound(id))?;
            if let Some(text) = text {
                let outcome = list.edit(id, text, EmptyEditPolicy::Reject)?;
                changed |= outcome.changed();
                if let EditOutcome::Updated(todo) | EditOutcome::Unchanged(todo) = outcome {
                    current = todo;
                }
            }
            if let Some(completed) = completed {
                let (todo, flipped) = list.set_completed(id, completed)?;
                changed |= flipped;
                current = todo;
            }
            Ok((current, changed))
        })
    }

    /// Remove a todo. A missing id is not an error and writes nothing.
    pub fn delete(&mut self, id: TodoId) -> Result<Option<Todo>> {
        self.commit(|list| {
            let removed = list.delete(id);
            let changed = removed.is_some();
            Ok((removed, changed))
        })
    }

    pub fn clear_completed(&mut self) -> Result<usize> {
        self.commit(|list| {
            let removed = list.clear_completed();
            Ok((removed, removed > 0))
        })
    }

    pub fn toggle_all(&mut self) -> Result<usize> {
        self.commit(|list| {
            let changed = list.toggle_all();
            Ok((changed, changed > 0))
        })
    }

    /// Merge todos read from an import file.
    pub fn import(&mut self, todos: Vec<Todo>, mode: MergeMode) -> Result<usize> {
        self.commit(|list| {
            let before = list.clone();
            let count = transfer::merge(list, todos, mode)?;
            let changed = *list != before;
            Ok((count, changed))
        })
    }

    /// Discard the in-memory list and read storage again.
    pub fn reload(&mut self) -> Result<()> {
        self.list = TodoList::from_todos(self.storage.load()?);
        debug!("Reloaded {} todos", self.list.len());
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Run `mutate` against the list and persist the result when it reports a
    /// change. On any error the list is restored from a snapshot.
    fn commit<T>(&mut self, mutate: impl FnOnce(&mut TodoList) -> Result<(T, bool)>) -> Result<T> {
        let snapshot = self.list.clone();
        let (value, changed) = match mutate(&mut self.list) {
            Ok(result) => result,
            Err(e) => {
                self.list = snapshot;
                return Err(e);
            }
        };

        if changed {
            if let Err(e) = self.storage.save(self.list.todos()) {
                error!("Failed to save todos to {}: {}", self.storage.describe(), e);
                self.list = snapshot;
                return Err(e);
            }
        }
        Ok(value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
