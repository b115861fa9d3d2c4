//! Terminal UI for the todo list.
//!
//! Provides themes, the header/footer/input components, the list view and the
//! interactive application loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod list_view;
pub mod themes;

pub use app::App;
pub use todo_core as core;
