//! One-shot subcommands run directly against a [`TodoStore`].
//!
//! Output goes to the supplied writer so the commands can be checked without a
//! terminal.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use todo_core::formatting::format_stats;
use todo_core::list::EditOutcome;
use todo_core::models::{Filter, SortOrder, Todo, TodoId};
use todo_core::time_utils::TimezoneHandler;
use todo_data::transfer::{self, MergeMode};
use todo_runtime::TodoStore;

/// How `list` renders timestamps.
pub struct Display<'a> {
    pub timezones: &'a TimezoneHandler,
    pub use_12h: bool,
}

pub fn add(store: &mut TodoStore, words: &[String], out: &mut impl Write) -> Result<()> {
    let todo = store.add(&words.join(" "))?;
    writeln!(out, "Added #{}: {}", todo.id, todo.text)?;
    Ok(())
}

pub fn list(
    store: &TodoStore,
    filter: Filter,
    sort: SortOrder,
    search: Option<&str>,
    json: bool,
    display: &Display<'_>,
    out: &mut impl Write,
) -> Result<()> {
    let query = search.filter(|q| !q.trim().is_empty());
    let todos = store.list().view(filter, query, sort);

    if json {
        serde_json::to_writer_pretty(&mut *out, &todos).context("encoding todos")?;
        writeln!(out)?;
        return Ok(());
    }

    if todos.is_empty() {
        match filter {
            Filter::All => writeln!(out, "No todos")?,
            other => writeln!(out, "No {} todos", other.as_str())?,
        }
        return Ok(());
    }

    let now = Utc::now();
    for todo in todos {
        writeln!(out, "{}", list_line(todo, display, now))?;
    }
    Ok(())
}

fn list_line(todo: &Todo, display: &Display<'_>, now: chrono::DateTime<Utc>) -> String {
    let mark = if todo.completed { 'x' } else { ' ' };
    let when = display
        .timezones
        .format_for_list(todo.created_at, now, display.use_12h);
    format!("[{mark}] #{:<4} {}  ({when})", todo.id.to_string(), todo.text)
}

pub fn toggle(store: &mut TodoStore, id: TodoId, out: &mut impl Write) -> Result<()> {
    let todo = store.toggle(id)?;
    let state = if todo.completed { "completed" } else { "active" };
    writeln!(out, "#{} is now {state}", todo.id)?;
    Ok(())
}

pub fn edit(store: &mut TodoStore, id: TodoId, words: &[String], out: &mut impl Write) -> Result<()> {
    match store.edit(id, &words.join(" "))? {
        EditOutcome::Updated(todo) => writeln!(out, "Updated #{}: {}", todo.id, todo.text)?,
        EditOutcome::Unchanged(todo) => writeln!(out, "#{} unchanged", todo.id)?,
        EditOutcome::Deleted(todo) => writeln!(out, "Deleted #{}: {}", todo.id, todo.text)?,
    }
    Ok(())
}

pub fn delete(store: &mut TodoStore, id: TodoId, out: &mut impl Write) -> Result<()> {
    match store.delete(id)? {
        Some(todo) => writeln!(out, "Deleted #{}: {}", todo.id, todo.text)?,
        None => writeln!(out, "No todo #{id}")?,
    }
    Ok(())
}

pub fn clear_completed(store: &mut TodoStore, out: &mut impl Write) -> Result<()> {
    let removed = store.clear_completed()?;
    writeln!(out, "Cleared {removed} completed")?;
    Ok(())
}

pub fn toggle_all(store: &mut TodoStore, out: &mut impl Write) -> Result<()> {
    store.toggle_all()?;
    let stats = store.list().stats();
    if stats.active == 0 && stats.total > 0 {
        writeln!(out, "All {} todos completed", stats.total)?;
    } else {
        writeln!(out, "All {} todos active", stats.total)?;
    }
    Ok(())
}

pub fn stats(store: &TodoStore, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", format_stats(&store.list().stats()))?;
    Ok(())
}

pub fn export(store: &TodoStore, path: &Path, out: &mut impl Write) -> Result<()> {
    let count = transfer::export_to(path, store.list().todos())?;
    writeln!(out, "Exported {count} todos to {}", path.display())?;
    Ok(())
}

pub fn import(store: &mut TodoStore, path: &Path, replace: bool, out: &mut impl Write) -> Result<()> {
    let todos = transfer::import_from(path)?;
    let mode = if replace { MergeMode::Replace } else { MergeMode::Append };
    let count = store.import(todos, mode)?;
    writeln!(out, "Imported {count} todos from {}", path.display())?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
