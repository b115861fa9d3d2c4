//! Domain layer for the todo list.
//!
//! Holds the [`models::Todo`] entity, the owning [`list::TodoList`]
//! container with its validated CRUD operations and filter views, the shared
//! error type, CLI settings, and the formatting and time helpers used by the
//! presentation crates.

pub mod error;
pub mod formatting;
pub mod list;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, TodoError};
pub use list::{EditOutcome, EmptyEditPolicy, TodoList};
pub use models::{Filter, SortOrder, Todo, TodoId, TodoStats};
