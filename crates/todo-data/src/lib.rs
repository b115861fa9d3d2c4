//! Persistence layer for the todo list.
//!
//! Loads and saves the list through the [`TodoStorage`] trait, with a JSON
//! file backend for real use, an in-memory backend for tests and import/export
//! helpers for moving lists between files.

pub mod json_file;
pub mod memory;
pub mod storage;
pub mod transfer;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use storage::TodoStorage;
pub use todo_core as core;
