//! The owning todo container.
//!
//! [`TodoList`] is the single place todos live. It enforces the text
//! invariant on every write, assigns identifiers, and derives the filter,
//! search and sort views. It knows nothing about persistence; see
//! `todo_runtime::store` for the persist-or-rollback wrapper.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{Result, TodoError};
use crate::models::{validate_text, Filter, SortOrder, Todo, TodoId, TodoStats};

// ── EmptyEditPolicy ───────────────────────────────────────────────────────────

/// What `edit` does when the new text is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyEditPolicy {
    /// Refuse the edit and keep the todo unchanged.
    #[default]
    Reject,
    /// Treat a blank edit as a request to delete the todo.
    Delete,
}

impl fmt::Display for EmptyEditPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyEditPolicy::Reject => f.write_str("reject"),
            EmptyEditPolicy::Delete => f.write_str("delete"),
        }
    }
}

impl FromStr for EmptyEditPolicy {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(EmptyEditPolicy::Reject),
            "delete" => Ok(EmptyEditPolicy::Delete),
            other => Err(TodoError::Config(format!(
                "unknown empty-edit policy '{}'",
                other
            ))),
        }
    }
}

/// Result of a successful [`TodoList::edit`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The text was replaced; carries the updated todo.
    Updated(Todo),
    /// The new text equals the old one; nothing changed.
    Unchanged(Todo),
    /// The blank edit removed the todo under [`EmptyEditPolicy::Delete`].
    Deleted(Todo),
}

impl EditOutcome {
    /// Whether the list was modified.
    pub fn changed(&self) -> bool {
        !matches!(self, EditOutcome::Unchanged(_))
    }
}

// ── TodoList ──────────────────────────────────────────────────────────────────

/// In-memory list of todos in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoList {
    todos: Vec<Todo>,
    /// Next identifier to hand out. Always greater than every id in `todos`.
    /// `u64::MAX` means the ids are used up.
    next_id: u64,
}

impl TodoList {
    /// Create an empty list. Identifiers start at 1.
    pub fn new() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a list from persisted todos.
    ///
    /// Each todo is normalized first; ones with unusable text are dropped
    /// with a warning. Duplicate ids (possible in hand-edited files) are
    /// re-numbered so that every id stays unique; the first occurrence keeps
    /// its id. When the ids leave no room above them the whole list is
    /// numbered again from 1.
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        let todos: Vec<Todo> = todos
            .into_iter()
            .filter_map(|todo| {
                let id = todo.id;
                match todo.normalize() {
                    Ok(todo) => Some(todo),
                    Err(e) => {
                        warn!("Dropping stored todo {}: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        let unique = todos.iter().map(|t| t.id).collect::<HashSet<_>>().len();
        let duplicates = (todos.len() - unique) as u64;
        let max = todos.iter().map(|t| t.id.0).max().unwrap_or(0);
        // Room for one fresh id per duplicate plus the next id to hand out.
        let mut next_id = match max.checked_add(duplicates + 1) {
            Some(end) => end - duplicates,
            None => {
                warn!(max, "todo ids out of range, renumbering from 1");
                return Self::renumbered(todos);
            }
        };

        let mut seen = HashSet::new();
        let todos = todos
            .into_iter()
            .map(|mut t| {
                if !seen.insert(t.id) {
                    debug!(old = %t.id, new = next_id, "renumbering duplicate todo id");
                    t.id = TodoId(next_id);
                    seen.insert(t.id);
                    next_id += 1;
                }
                t
            })
            .collect();
        Self { todos, next_id }
    }

    fn renumbered(mut todos: Vec<Todo>) -> Self {
        for (n, todo) in (1u64..).zip(todos.iter_mut()) {
            todo.id = TodoId(n);
        }
        let next_id = todos.len() as u64 + 1;
        Self { todos, next_id }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// All todos in insertion order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Read-only subsequence matching `view`, in insertion order.
    pub fn filter(&self, view: Filter) -> Vec<&Todo> {
        self.todos.iter().filter(|t| view.matches(t)).collect()
    }

    /// Todos whose text contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.matches_query(query)).collect()
    }

    /// All todos ordered by `order`.
    pub fn sorted(&self, order: SortOrder) -> Vec<&Todo> {
        let mut out: Vec<&Todo> = self.todos.iter().collect();
        out.sort_by(|a, b| order.compare(a, b));
        out
    }

    /// Combined filter, search and sort view as shown by the front-ends.
    pub fn view(&self, filter: Filter, query: Option<&str>, order: SortOrder) -> Vec<&Todo> {
        let mut out: Vec<&Todo> = self
            .todos
            .iter()
            .filter(|t| filter.matches(t))
            .filter(|t| query.map_or(true, |q| t.matches_query(q)))
            .collect();
        out.sort_by(|a, b| order.compare(a, b));
        out
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Append a new active todo. Blank or over-long text is rejected and the
    /// list is left untouched.
    pub fn add(&mut self, text: &str) -> Result<Todo> {
        self.add_at(text, Utc::now())
    }

    /// [`add`](Self::add) with an explicit creation time.
    pub fn add_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<Todo> {
        let text = validate_text(text)?;
        let id = self.allocate_id()?;

        let todo = Todo::new(id, text, now);
        debug!(id = %todo.id, "todo added");
        self.todos.push(todo.clone());
        Ok(todo)
    }

    /// Flip the completion flag of `id`.
    pub fn toggle(&mut self, id: TodoId) -> Result<Todo> {
        let now = Utc::now();
        let todo = self.get_mut(id)?;
        let completed = !todo.completed;
        todo.set_completed(completed, now);
        debug!(%id, completed, "todo toggled");
        Ok(todo.clone())
    }

    /// Set the completion flag of `id` to an explicit value.
    ///
    /// Returns the todo and whether anything changed.
    pub fn set_completed(&mut self, id: TodoId, completed: bool) -> Result<(Todo, bool)> {
        let now = Utc::now();
        let todo = self.get_mut(id)?;
        if todo.completed == completed {
            return Ok((todo.clone(), false));
        }
        todo.set_completed(completed, now);
        Ok((todo.clone(), true))
    }

    /// Replace the text of `id`.
    ///
    /// Blank text is handled according to `policy`. Over-long text is always
    /// rejected.
    pub fn edit(&mut self, id: TodoId, text: &str, policy: EmptyEditPolicy) -> Result<EditOutcome> {
        if self.get(id).is_none() {
            return Err(TodoError::NotFound(id));
        }

        let text = match validate_text(text) {
            Ok(t) => t,
            Err(TodoError::EmptyText) if policy == EmptyEditPolicy::Delete => {
                // get() above guarantees the todo exists.
                return self
                    .delete(id)
                    .map(EditOutcome::Deleted)
                    .ok_or(TodoError::NotFound(id));
            }
            Err(e) => return Err(e),
        };

        let todo = self.get_mut(id)?;
        if todo.text == text {
            return Ok(EditOutcome::Unchanged(todo.clone()));
        }
        todo.text = text;
        todo.updated_at = Some(Utc::now());
        debug!(%id, "todo edited");
        Ok(EditOutcome::Updated(todo.clone()))
    }

    /// Remove `id`. Removing a missing id is a no-op and returns `None`.
    pub fn delete(&mut self, id: TodoId) -> Option<Todo> {
        let pos = self.todos.iter().position(|t| t.id == id)?;
        debug!(%id, "todo deleted");
        Some(self.todos.remove(pos))
    }

    /// Remove every completed todo and return how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|t| !t.completed);
        let removed = before - self.todos.len();
        if removed > 0 {
            debug!(removed, "cleared completed todos");
        }
        removed
    }

    /// Complete every todo if any is active, otherwise reopen them all.
    ///
    /// Returns the number of todos whose flag changed.
    pub fn toggle_all(&mut self) -> usize {
        let target = self.todos.iter().any(|t| !t.completed);
        let now = Utc::now();
        let mut changed = 0;
        for todo in self.todos.iter_mut().filter(|t| t.completed != target) {
            todo.set_completed(target, now);
            changed += 1;
        }
        debug!(changed, completed = target, "toggled all todos");
        changed
    }

    /// Append todos from another list, assigning fresh ids.
    ///
    /// Fails without changing the list when there are not enough ids left.
    pub fn extend_renumbered(&mut self, todos: Vec<Todo>) -> Result<usize> {
        let count = todos.len();
        let needed = count as u64;
        if self.next_id.checked_add(needed).is_none() {
            return Err(TodoError::IdsExhausted);
        }
        for mut todo in todos {
            todo.id = self.allocate_id()?;
            self.todos.push(todo);
        }
        Ok(count)
    }

    /// Hand out `next_id`. The last representable id is never issued so that
    /// `next_id` always stays above every id in the list.
    fn allocate_id(&mut self) -> Result<TodoId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(TodoError::IdsExhausted)?;
        Ok(TodoId(id))
    }

    fn get_mut(&mut self, id: TodoId) -> Result<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))
    }
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Todo>> for TodoList {
    fn from(todos: Vec<Todo>) -> Self {
        Self::from_todos(todos)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
