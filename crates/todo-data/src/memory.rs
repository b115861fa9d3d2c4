//! In-memory backend. Cloned handles share one list, so a test can keep a
//! handle and inspect what the store last saved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use todo_core::models::Todo;
use todo_core::{Result, TodoError};

use crate::storage::TodoStorage;

#[derive(Debug, Default)]
struct Shared {
    todos: Mutex<Vec<Todo>>,
    saves: AtomicUsize,
    fail_saves: AtomicUsize,
}

/// Volatile storage backed by a shared vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Shared>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `todos`.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let storage = Self::new();
        *storage.lock() = todos;
        storage
    }

    /// Make the next `count` saves fail with a write error.
    pub fn fail_next_saves(&self, count: usize) {
        self.inner.fail_saves.store(count, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    /// Copy of the currently stored list.
    pub fn stored(&self) -> Vec<Todo> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Todo>> {
        self.inner
            .todos
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TodoStorage for MemoryStorage {
    fn load(&mut self) -> Result<Vec<Todo>> {
        Ok(self.stored())
    }

    fn save(&mut self, todos: &[Todo]) -> Result<()> {
        let should_fail = self
            .inner
            .fail_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(TodoError::Io(std::io::Error::other("simulated save failure")));
        }

        *self.lock() = todos.to_vec();
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use todo_core::models::TodoId;

    fn todo(id: u64, text: &str) -> Todo {
        Todo::new(TodoId(id), text.to_string(), Utc::now())
    }

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();
        writer.save(&[todo(1, "a")]).unwrap();

        assert_eq!(storage.stored().len(), 1);
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn test_with_todos_loads_them() {
        let mut storage = MemoryStorage::with_todos(vec![todo(1, "a"), todo(2, "b")]);
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].text, "b");
    }

    #[test]
    fn test_fail_next_saves_fails_then_recovers() {
        let mut storage = MemoryStorage::with_todos(vec![todo(1, "kept")]);
        storage.fail_next_saves(1);

        assert!(storage.save(&[]).is_err());
        assert_eq!(storage.stored()[0].text, "kept");
        assert_eq!(storage.save_count(), 0);

        storage.save(&[]).unwrap();
        assert!(storage.stored().is_empty());
        assert_eq!(storage.save_count(), 1);
    }
}
