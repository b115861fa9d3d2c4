//! Copying a list to and from other JSON files.
//!
//! Exports are always a bare JSON array, the same shape as the data file.
//! Imports also accept the `{ "todos": [...] }` envelope written by some
//! other todo apps.

use std::path::Path;

use serde::Deserialize;
use todo_core::list::TodoList;
use todo_core::models::Todo;
use todo_core::{Result, TodoError};
use tracing::{info, warn};

use crate::json_file::write_todos;

/// How imported todos combine with the existing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Keep the current list and append the imported todos with fresh ids.
    #[default]
    Append,
    /// Discard the current list; imported ids are kept.
    Replace,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Bare(Vec<Todo>),
    Envelope { todos: Vec<Todo> },
}

/// Write `todos` to `path` as a JSON array. Returns how many were written.
pub fn export_to(path: &Path, todos: &[Todo]) -> Result<usize> {
    write_todos(path, todos)?;
    info!("Exported {} todos to {}", todos.len(), path.display());
    Ok(todos.len())
}

/// Read todos from `path`.
///
/// Unlike the data file, a missing import file is an error. Entries are
/// normalized like stored todos: unusable text is skipped with a warning.
pub fn import_from(path: &Path) -> Result<Vec<Todo>> {
    let contents = std::fs::read_to_string(path).map_err(|source| TodoError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Document =
        serde_json::from_str(&contents).map_err(|source| TodoError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    let raw = match document {
        Document::Bare(todos) | Document::Envelope { todos } => todos,
    };

    let total = raw.len();
    let todos: Vec<Todo> = raw
        .into_iter()
        .filter_map(|todo| {
            let id = todo.id;
            match todo.normalize() {
                Ok(todo) => Some(todo),
                Err(e) => {
                    warn!("Skipping imported todo {}: {}", id, e);
                    None
                }
            }
        })
        .collect();

    info!(
        "Read {} of {} todos from {}",
        todos.len(),
        total,
        path.display()
    );
    Ok(todos)
}

/// Combine `imported` into `list` according to `mode`. Returns the number of
/// todos that came from the import.
pub fn merge(list: &mut TodoList, imported: Vec<Todo>, mode: MergeMode) -> Result<usize> {
    match mode {
        MergeMode::Append => list.extend_renumbered(imported),
        MergeMode::Replace => {
            *list = TodoList::from_todos(imported);
            Ok(list.len())
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::models::TodoId;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    // ── import_from ──────────────────────────────────────────────────────────

    #[test]
    fn test_import_bare_array() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "in.json",
            r#"[{"id": 1, "text": "a", "completed": false, "createdAt": "2024-05-01T09:00:00Z"}]"#,
        );

        let todos = import_from(&path).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "a");
    }

    #[test]
    fn test_import_envelope() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "in.json",
            r#"{"todos": [
                {"id": 4, "text": "x", "completed": true, "createdAt": 1714554000000},
                {"id": 5, "text": "y", "createdAt": 1714554000000}
            ]}"#,
        );

        let todos = import_from(&path).unwrap();
        assert_eq!(todos.len(), 2);
        assert!(todos[0].completed);
        assert!(todos[0].completed_at.is_some());
        assert!(!todos[1].completed);
    }

    #[test]
    fn test_import_skips_invalid_text_and_trims() {
        let dir = TempDir::new().unwrap();
        let long = "z".repeat(501);
        let body = format!(
            r#"[
                {{"id": 1, "text": "   ", "createdAt": 0}},
                {{"id": 2, "text": "{}", "createdAt": 0}},
                {{"id": 3, "text": "  keep me ", "createdAt": 0}}
            ]"#,
            long
        );
        let path = write(&dir, "in.json", &body);

        let todos = import_from(&path).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, TodoId(3));
        assert_eq!(todos[0].text, "keep me");
    }

    #[test]
    fn test_import_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = import_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TodoError::FileRead { .. }));
    }

    #[test]
    fn test_import_garbage_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.json", r#"{"items": 3}"#);
        assert!(matches!(
            import_from(&path).unwrap_err(),
            TodoError::Corrupt { .. }
        ));
    }

    // ── export_to / merge ────────────────────────────────────────────────────

    #[test]
    fn test_export_then_import_preserves_todos() {
        let dir = TempDir::new().unwrap();
        let mut list = TodoList::new();
        list.add("one").unwrap();
        let two = list.add("two").unwrap();
        list.toggle(two.id).unwrap();

        let path = dir.path().join("out").join("backup.json");
        assert_eq!(export_to(&path, list.todos()).unwrap(), 2);
        assert_eq!(import_from(&path).unwrap(), list.todos().to_vec());
    }

    #[test]
    fn test_merge_append_renumbers() {
        let mut list = TodoList::new();
        list.add("existing").unwrap();
        let mut other = TodoList::new();
        other.add("imported").unwrap();

        let added = merge(&mut list, other.todos().to_vec(), MergeMode::Append).unwrap();
        assert_eq!(added, 1);
        let ids: Vec<u64> = list.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(list.todos()[1].text, "imported");
    }

    #[test]
    fn test_merge_replace_keeps_ids() {
        let mut list = TodoList::new();
        list.add("gone").unwrap();
        let mut other = TodoList::new();
        for text in ["a", "b", "c"] {
            other.add(text).unwrap();
        }
        other.delete(TodoId(1));

        let count = merge(&mut list, other.todos().to_vec(), MergeMode::Replace).unwrap();
        assert_eq!(count, 2);
        let ids: Vec<u64> = list.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(list.add("d").unwrap().id, TodoId(4));
    }
}
