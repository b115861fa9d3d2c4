//! The storage seam between the in-memory list and wherever it is kept.

use todo_core::models::Todo;
use todo_core::Result;

/// Somewhere a todo list can be loaded from and saved to.
///
/// Implementations persist the whole list on every save; the list is small
/// enough that incremental writes are not worth the complexity.
pub trait TodoStorage: Send {
    /// Load every persisted todo. A store that has never been written to
    /// yields an empty list.
    fn load(&mut self) -> Result<Vec<Todo>>;

    /// Replace the persisted list with `todos`.
    fn save(&mut self, todos: &[Todo]) -> Result<()>;

    /// Short human-readable description used in logs and the TUI header.
    fn describe(&self) -> String;
}

impl<S: TodoStorage + ?Sized> TodoStorage for Box<S> {
    fn load(&mut self) -> Result<Vec<Todo>> {
        (**self).load()
    }

    fn save(&mut self, todos: &[Todo]) -> Result<()> {
        (**self).save(todos)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
