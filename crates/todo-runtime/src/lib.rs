//! Runtime layer for the todo list.
//!
//! [`TodoStore`] pairs the in-memory list with its storage and keeps the two
//! consistent; [`TodoService`] runs a store in a tokio task so the TUI and
//! the HTTP server can share it through cloned [`TodoHandle`]s.

pub mod service;
pub mod store;

pub use service::{ServiceError, TodoHandle, TodoPatch, TodoService};
pub use store::TodoStore;
pub use todo_core as core;
pub use todo_data as data;
