//! JSON file backend.
//!
//! The list is stored as a pretty-printed JSON array of todos, by default at
//! `~/.todo-list/todos.json` (see `Settings::data_file_path`).

use std::path::{Path, PathBuf};

use todo_core::models::Todo;
use todo_core::settings::DEFAULT_DATA_FILE;
use todo_core::{Result, TodoError};
use tracing::{debug, info};

use crate::storage::TodoStorage;

/// Stores the list as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TodoStorage for JsonFileStorage {
    fn load(&mut self) -> Result<Vec<Todo>> {
        let todos = read_todos(&self.path)?;
        debug!("Loaded {} todos from {}", todos.len(), self.path.display());
        Ok(todos)
    }

    fn save(&mut self, todos: &[Todo]) -> Result<()> {
        write_todos(&self.path, todos)?;
        debug!("Saved {} todos to {}", todos.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ── File helpers ──────────────────────────────────────────────────────────────

/// Read a JSON array of todos from `path`.
///
/// A missing file is an empty list. A file that exists but does not parse is
/// reported as [`TodoError::Corrupt`] so it is never silently overwritten.
pub fn read_todos(path: &Path) -> Result<Vec<Todo>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No todo file at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(TodoError::FileRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&contents).map_err(|source| TodoError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `todos` to `path` atomically: the JSON goes to a sibling `.tmp`
/// file which is then renamed over the target.
pub fn write_todos(path: &Path, todos: &[Todo]) -> Result<()> {
    write_json_atomic(path, &serde_json::to_string_pretty(todos)?)
}

pub(crate) fn write_json_atomic(path: &Path, json: &str) -> Result<()> {
    let to_write_err = |source| TodoError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_err)?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, json).map_err(to_write_err)?;
    if let Err(source) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(to_write_err(source));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_DATA_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use todo_core::models::TodoId;
    use tempfile::TempDir;

    fn sample() -> Vec<Todo> {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut done = Todo::new(TodoId(2), "Walk dog".to_string(), t0);
        done.set_completed(true, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        vec![Todo::new(TodoId(1), "Buy milk".to_string(), t0), done]
    }

    // ── load ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("todos.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStorage::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_error_and_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, TodoError::Corrupt { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_loads_desktop_file_with_epoch_millis() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "text": "Ship it", "completed": false, "createdAt": 1714554000000}]"#,
        )
        .unwrap();

        let todos = JsonFileStorage::new(&path).load().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, TodoId(7));
        assert_eq!(
            todos[0].created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
        );
    }

    // ── save ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("todos.json"));
        let todos = sample();

        storage.save(&todos).unwrap();
        assert_eq!(storage.load().unwrap(), todos);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("todos.json");
        let mut storage = JsonFileStorage::new(&path);

        storage.save(&sample()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested/deeper/todos.json.tmp").exists());
    }

    #[test]
    fn test_saved_file_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        JsonFileStorage::new(&path).save(&sample()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"completedAt\""));
        assert!(!raw.contains("created_at"));
    }

    #[test]
    fn test_describe_is_path() {
        let storage = JsonFileStorage::new("/tmp/x/todos.json");
        assert_eq!(storage.describe(), "/tmp/x/todos.json");
    }
}
