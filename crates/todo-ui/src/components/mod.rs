//! Reusable pieces of the todo screen.

pub mod footer;
pub mod header;
pub mod input;
