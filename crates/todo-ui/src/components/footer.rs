use ratatui::style::Style;
use ratatui::text::{Line, Span};

use todo_core::formatting::items_left;
use todo_core::models::{Filter, SortOrder};

use crate::themes::Theme;

// ── StatusMessage ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line feedback shown under the list until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    fn style(&self, theme: &Theme) -> Style {
        match self.kind {
            StatusKind::Info => theme.info,
            StatusKind::Success => theme.success,
            StatusKind::Error => theme.error,
        }
    }
}

// ── Footer ────────────────────────────────────────────────────────────────────

pub const NORMAL_HINTS: &str =
    "a add · e edit · space toggle · d delete · c clear done · A all · f filter · s sort · / search · q quit";
pub const INPUT_HINTS: &str = "enter save · esc cancel";

/// Two lines under the list: filter tabs with the counter, then either the
/// status message or key hints.
pub struct Footer<'a> {
    pub filter: Filter,
    pub sort: SortOrder,
    pub active: usize,
    pub query: Option<&'a str>,
    pub status: Option<&'a StatusMessage>,
    pub hints: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut tabs: Vec<Span<'a>> = Vec::new();
        for filter in Filter::ALL {
            let style = if filter == self.filter {
                self.theme.filter_current
            } else {
                self.theme.filter_other
            };
            tabs.push(Span::styled(capitalize(filter.as_str()), style));
            tabs.push(Span::raw("  "));
        }
        tabs.push(Span::styled(items_left(self.active), self.theme.value));
        tabs.push(Span::styled(
            format!("  sort: {}", self.sort),
            self.theme.label,
        ));
        if let Some(query) = self.query.filter(|q| !q.is_empty()) {
            tabs.push(Span::styled(
                format!("  search: \"{}\"", query),
                self.theme.info,
            ));
        }

        let second = match self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.style(self.theme))),
            None => Line::from(Span::styled(self.hints, self.theme.key_hint)),
        };

        vec![Line::from(tabs), second]
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn footer<'a>(theme: &'a Theme, status: Option<&'a StatusMessage>) -> Footer<'a> {
        Footer {
            filter: Filter::Active,
            sort: SortOrder::CreatedAsc,
            active: 1,
            query: None,
            status,
            hints: NORMAL_HINTS,
            theme,
        }
    }

    #[test]
    fn test_footer_tabs_and_counter() {
        let theme = Theme::dark();
        let lines = footer(&theme, None).to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            text_of(&lines[0]),
            "All  Active  Completed  1 item left  sort: created"
        );
    }

    #[test]
    fn test_footer_highlights_current_filter() {
        let theme = Theme::dark();
        let lines = footer(&theme, None).to_lines();
        // Spans alternate tab / spacer, so "Active" is the third span.
        assert_eq!(lines[0].spans[2].content, "Active");
        assert_eq!(lines[0].spans[2].style, theme.filter_current);
        assert_eq!(lines[0].spans[0].style, theme.filter_other);
    }

    #[test]
    fn test_footer_shows_hints_without_status() {
        let theme = Theme::dark();
        let lines = footer(&theme, None).to_lines();
        assert_eq!(text_of(&lines[1]), NORMAL_HINTS);
    }

    #[test]
    fn test_footer_shows_status_with_kind_style() {
        let theme = Theme::dark();
        let status = StatusMessage::error("Todo text must not be empty");
        let lines = footer(&theme, Some(&status)).to_lines();
        assert_eq!(text_of(&lines[1]), "Todo text must not be empty");
        assert_eq!(lines[1].spans[0].style, theme.error);
    }

    #[test]
    fn test_footer_shows_search_query() {
        let theme = Theme::dark();
        let mut f = footer(&theme, None);
        f.query = Some("milk");
        let first = text_of(&f.to_lines()[0]);
        assert!(first.ends_with("search: \"milk\""), "got: {first}");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("completed"), "Completed");
        assert_eq!(capitalize(""), "");
    }
}
