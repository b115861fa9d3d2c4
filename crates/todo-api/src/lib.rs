//! REST API for the todo list.
//!
//! An axum router over a shared [`TodoHandle`](todo_runtime::TodoHandle), so
//! the HTTP server sees the same list as any TUI running in the process.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{create_router, AppState};
pub use server::serve;
