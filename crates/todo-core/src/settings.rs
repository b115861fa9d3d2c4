use clap::{CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::list::EmptyEditPolicy;
use crate::models::{Filter, SortOrder, TodoId};

/// Name of the per-user application directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".todo-list";

/// File name of the default todo store inside the application directory.
pub const DEFAULT_DATA_FILE: &str = "todos.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// A todo list for the terminal: CLI, interactive TUI and REST server
#[derive(Parser, Debug, Clone)]
#[command(
    name = "todo",
    about = "A todo list for the terminal: CLI, interactive TUI and REST server",
    version
)]
pub struct Settings {
    /// Path of the JSON file holding the todos
    #[arg(long, env = "TODO_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Timezone used to display timestamps (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Time format
    #[arg(long, default_value = "auto", value_parser = ["12h", "24h", "auto"])]
    pub time_format: String,

    /// Initial filter view in the TUI
    #[arg(long, default_value = "all", value_parser = ["all", "active", "completed"])]
    pub filter: String,

    /// Initial sort order in the TUI
    #[arg(long, default_value = "created", value_parser = ["created", "newest", "text", "status"])]
    pub sort: String,

    /// What an edit to blank text does
    #[arg(long, default_value = "reject", value_parser = ["reject", "delete"])]
    pub empty_edit: String,

    /// Logging level
    #[arg(long, default_value = "INFO", env = "TODO_LOG", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Operations on the todo list.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a new todo
    Add {
        /// Todo text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print todos
    List {
        /// Only show todos in this view
        #[arg(long, value_parser = ["all", "active", "completed"])]
        filter: Option<String>,
        /// Order of the printed todos
        #[arg(long, value_parser = ["created", "newest", "text", "status"])]
        sort: Option<String>,
        /// Only show todos containing this text
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Flip a todo between active and completed
    Toggle { id: TodoId },
    /// Replace the text of a todo
    Edit {
        id: TodoId,
        /// New text (words are joined with spaces)
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },
    /// Delete a todo
    Delete { id: TodoId },
    /// Delete every completed todo
    ClearCompleted,
    /// Complete every todo, or reopen them all if none is active
    ToggleAll,
    /// Print aggregate counts
    Stats,
    /// Write the todo list to another JSON file
    Export { path: PathBuf },
    /// Load todos from another JSON file
    Import {
        path: PathBuf,
        /// Replace the current list instead of appending to it
        #[arg(long)]
        replace: bool,
    },
    /// Open the interactive terminal UI (default)
    Tui,
    /// Serve the REST API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1", env = "HOST")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value = "8080", env = "PORT")]
        port: u16,
    },
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.todo-list/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_edit: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&home_dir())
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Record the filter and sort the user left the TUI with, keeping every
    /// other persisted value.
    pub fn remember_view_at(path: &Path, filter: Filter, sort: SortOrder) -> Result<(), std::io::Error> {
        let mut params = Self::load_from(path);
        params.filter = Some(filter.to_string());
        params.sort = Some(sort.to_string());
        params.save_to(path)
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and resolve `"auto"` values.
    ///
    /// Nothing is written here; call [`Settings::remember`] once logging is up.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = <Settings as CommandFactory>::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. clap keys args by field name, not by flag spelling.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "time_format") {
            if let Some(v) = last.time_format {
                settings.time_format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "filter") {
            if let Some(v) = last.filter {
                settings.filter = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "sort") {
            if let Some(v) = last.sort {
                settings.sort = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "empty_edit") {
            if let Some(v) = last.empty_edit {
                settings.empty_edit = v;
            }
        }
        Self::resolve_auto_values(settings)
    }

    /// Persist the display preferences to `config_path`. A `--clear` run
    /// leaves the file deleted. The data file is never persisted: it comes
    /// from `--data-file`, `TODO_DATA_FILE` or the default location.
    pub fn remember(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if self.clear {
            return Ok(());
        }
        LastUsedParams::from(self).save_to(config_path)
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.time_format == "auto" {
            let is_12h = crate::time_utils::detect_time_format(Some(&settings.timezone), None);
            settings.time_format = if is_12h {
                "12h".to_string()
            } else {
                "24h".to_string()
            };
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    // ── Typed accessors ───────────────────────────────────────────────────────

    /// The todo file to use: `--data-file`, else `~/.todo-list/todos.json`.
    pub fn data_file_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| app_dir().join(DEFAULT_DATA_FILE))
    }

    /// Initial filter; persisted junk falls back to [`Filter::All`].
    pub fn filter_view(&self) -> Filter {
        self.filter.parse().unwrap_or_default()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort.parse().unwrap_or_default()
    }

    pub fn empty_edit_policy(&self) -> EmptyEditPolicy {
        self.empty_edit.parse().unwrap_or_default()
    }

    /// `true` when timestamps should be shown on a 12-hour clock.
    pub fn use_12h(&self) -> bool {
        self.time_format == "12h"
    }

    /// The subcommand to run, defaulting to the TUI.
    pub fn subcommand_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            time_format: Some(s.time_format.clone()),
            filter: Some(s.filter.clone()),
            sort: Some(s.sort.clone()),
            empty_edit: Some(s.empty_edit.clone()),
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// The per-user application directory, `~/.todo-list/`.
pub fn app_dir() -> PathBuf {
    home_dir().join(APP_DIR_NAME)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
