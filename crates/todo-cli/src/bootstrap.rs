use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use todo_core::settings::app_dir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name of the default log inside `~/.todo-list/logs/`.
pub const DEFAULT_LOG_FILE: &str = "todo.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.todo-list/` and `~/.todo-list/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let base = app_dir();
    std::fs::create_dir_all(&base)
        .with_context(|| format!("creating {}", base.display()))?;
    std::fs::create_dir_all(logs_dir())
        .with_context(|| format!("creating {}", logs_dir().display()))?;
    Ok(())
}

pub fn logs_dir() -> PathBuf {
    app_dir().join("logs")
}

/// Where logs go when `--log-file` is not given.
pub fn default_log_file() -> PathBuf {
    logs_dir().join(DEFAULT_LOG_FILE)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a user-facing level name to an [`EnvFilter`] directive.
///
/// Unknown names are passed through so `RUST_LOG`-style directives such as
/// `todo_runtime=debug` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With a `log_file` the output is appended there without ANSI colours,
/// otherwise it goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = log_file.is_none().then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("installing the tracing subscriber")?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_home<T>(home: &Path, f: impl FnOnce() -> T) -> T {
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", home);
        let result = f();
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
        result
    }

    // ── test_ensure_directories ───────────────────────────────────────────────

    #[test]
    fn test_ensure_directories_and_default_log_path() {
        let tmp = TempDir::new().expect("tempdir");

        let (result, log_file) = with_home(tmp.path(), || (ensure_directories(), default_log_file()));
        result.expect("ensure_directories should succeed");

        let base = tmp.path().join(".todo-list");
        assert!(base.is_dir(), ".todo-list dir must exist");
        assert!(base.join("logs").is_dir(), "logs subdir must exist");
        assert_eq!(log_file, base.join("logs").join("todo.log"));
    }

    // ── test_level_directive ──────────────────────────────────────────────────

    #[test]
    fn test_level_directive_maps_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("todo_api=debug"), "todo_api=debug");
    }

    #[test]
    fn test_directives_parse_as_filters() {
        for level in ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"] {
            assert!(EnvFilter::try_new(level_directive(level)).is_ok(), "{level}");
        }
    }
}
