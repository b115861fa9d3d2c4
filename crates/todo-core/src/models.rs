use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TodoError;
use crate::time_utils::lenient_timestamp;

/// Maximum number of characters allowed in a todo's text.
pub const MAX_TEXT_LEN: usize = 500;

// ── TodoId ────────────────────────────────────────────────────────────────────

/// Identifier of a todo, unique within one list.
///
/// Written as a bare number. Reading also accepts numeric strings, which is
/// how the Electron variant stores `Date.now().toString()` ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TodoId(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = TodoError;

    /// Accepts a bare number, optionally prefixed with `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(TodoId)
            .map_err(|_| TodoError::Config(format!("invalid todo id '{}'", s)))
    }
}

// ── Todo ──────────────────────────────────────────────────────────────────────

/// A single todo item.
///
/// Serialised with camelCase keys so files written by the browser and
/// desktop variants (`createdAt`, `completedAt`) load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Identifier unique within the owning list.
    pub id: TodoId,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Whether the todo has been completed.
    #[serde(default)]
    pub completed: bool,
    /// UTC timestamp when the todo was created.
    #[serde(deserialize_with = "lenient_timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// UTC timestamp when the todo was last marked complete.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp::deserialize_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// UTC timestamp of the last text edit.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp::deserialize_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Build a fresh, active todo. `text` must already be validated.
    pub fn new(id: TodoId, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: now,
            completed_at: None,
            updated_at: None,
        }
    }

    /// Set the completion flag, keeping `completed_at` consistent with it.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }

    /// Bring a todo read from a file in line with what the list guarantees:
    /// trimmed, valid text and `completed_at` present exactly when completed.
    ///
    /// A missing completion time is taken from the last edit, else creation.
    pub fn normalize(mut self) -> Result<Self, TodoError> {
        self.text = validate_text(&self.text)?;
        match (self.completed, self.completed_at) {
            (true, None) => self.completed_at = Some(self.updated_at.unwrap_or(self.created_at)),
            (false, Some(_)) => self.completed_at = None,
            _ => {}
        }
        Ok(self)
    }

    /// Case-insensitive substring match against the text.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.text.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Trim `raw` and check it is usable as todo text.
///
/// # Examples
///
/// ```
/// use todo_core::models::validate_text;
///
/// assert_eq!(validate_text("  Buy milk ").unwrap(), "Buy milk");
/// assert!(validate_text("   ").is_err());
/// ```
pub fn validate_text(raw: &str) -> Result<String, TodoError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoError::EmptyText);
    }
    let len = trimmed.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(TodoError::TextTooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(trimmed.to_string())
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// Derived, read-only view over the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo.
    #[default]
    All,
    /// Todos not yet completed.
    Active,
    /// Completed todos only.
    Completed,
}

impl Filter {
    /// All filters in display order.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether `todo` belongs in this view.
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    /// Next filter in the `all → active → completed → all` cycle.
    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            other => Err(TodoError::Config(format!("unknown filter '{}'", other))),
        }
    }
}

// ── SortOrder ─────────────────────────────────────────────────────────────────

/// Ordering applied to a view of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Oldest first (insertion order).
    #[default]
    CreatedAsc,
    /// Newest first.
    CreatedDesc,
    /// Alphabetical by text, case-insensitive.
    Text,
    /// Active todos before completed ones, then oldest first.
    Status,
}

impl SortOrder {
    /// Next order in the cycle used by the TUI.
    pub fn next(self) -> Self {
        match self {
            SortOrder::CreatedAsc => SortOrder::CreatedDesc,
            SortOrder::CreatedDesc => SortOrder::Text,
            SortOrder::Text => SortOrder::Status,
            SortOrder::Status => SortOrder::CreatedAsc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::CreatedAsc => "created",
            SortOrder::CreatedDesc => "newest",
            SortOrder::Text => "text",
            SortOrder::Status => "status",
        }
    }

    /// Compare two todos under this order. Ties fall back to id so the
    /// result is total and stable.
    pub fn compare(self, a: &Todo, b: &Todo) -> std::cmp::Ordering {
        let primary = match self {
            SortOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
            SortOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
            SortOrder::Text => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
            SortOrder::Status => a
                .completed
                .cmp(&b.completed)
                .then(a.created_at.cmp(&b.created_at)),
        };
        match self {
            SortOrder::CreatedDesc => primary.then(b.id.cmp(&a.id)),
            _ => primary.then(a.id.cmp(&b.id)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" | "oldest" | "created-asc" => Ok(SortOrder::CreatedAsc),
            "newest" | "created-desc" => Ok(SortOrder::CreatedDesc),
            "text" | "alpha" => Ok(SortOrder::Text),
            "status" => Ok(SortOrder::Status),
            other => Err(TodoError::Config(format!("unknown sort order '{}'", other))),
        }
    }
}

// ── TodoStats ─────────────────────────────────────────────────────────────────

/// Aggregate counts over a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoStats {
    /// Count the todos in `todos`.
    pub fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        todos.into_iter().fold(Self::default(), |mut acc, t| {
            acc.total += 1;
            if t.completed {
                acc.completed += 1;
            } else {
                acc.active += 1;
            }
            acc
        })
    }

    /// Completed share in percent; `0.0` for an empty list.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}
