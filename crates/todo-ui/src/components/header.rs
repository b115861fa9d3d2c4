use crate::themes::Theme;
use ratatui::text::{Line, Span};

use todo_core::formatting::format_count;
use todo_core::models::TodoStats;

/// Marks placed either side of the application title.
pub const TITLE_MARK: &str = "✔";

/// Width of the separator under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Screen header rendering three lines:
///
/// 1. Application title.
/// 2. A `─` separator.
/// 3. Counts, data source and timezone in `[ … | … | … ]` format.
pub struct Header<'a> {
    pub stats: TodoStats,
    /// Where the list is stored, usually the data file path.
    pub source: &'a str,
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(stats: TodoStats, source: &'a str, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            stats,
            source,
            timezone,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(TITLE_MARK, self.theme.header_accent),
                Span::styled(" TODO LIST ", self.theme.header),
                Span::styled(TITLE_MARK, self.theme.header_accent),
            ]),
            Line::from(Span::styled(
                "─".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(format_count(self.stats.active), self.theme.value),
                Span::styled(" active · ", self.theme.label),
                Span::styled(format_count(self.stats.completed), self.theme.value),
                Span::styled(" completed | ", self.theme.label),
                Span::styled(self.source, self.theme.dim),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone, self.theme.dim),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
