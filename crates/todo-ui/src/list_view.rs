//! The todo list itself: one row per visible todo with a checkbox, the text
//! and when it was created.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use todo_core::formatting::truncate;
use todo_core::models::{Filter, Todo};
use todo_core::time_utils::TimezoneHandler;

use crate::themes::Theme;

/// Everything needed to draw the list besides the todos.
pub struct ListContext<'a> {
    pub timezones: &'a TimezoneHandler,
    pub use_12h: bool,
    pub now: DateTime<Utc>,
    pub theme: &'a Theme,
}

/// Build the row for `todo`, fitting the text into `width` columns.
pub fn todo_line<'a>(todo: &Todo, width: u16, ctx: &ListContext<'_>) -> Line<'a> {
    let checkbox = if todo.completed { "[x] " } else { "[ ] " };
    let created = ctx
        .timezones
        .format_for_list(todo.created_at, ctx.now, ctx.use_12h);

    let fixed = checkbox.width() + created.width() + 2;
    let room = usize::from(width).saturating_sub(fixed).max(1);
    let text = truncate(&todo.text, room);
    let pad = room.saturating_sub(text.width());

    Line::from(vec![
        Span::styled(checkbox, ctx.theme.checkbox_style(todo.completed)),
        Span::styled(text, ctx.theme.todo_style(todo.completed)),
        Span::raw(" ".repeat(pad + 2)),
        Span::styled(created, ctx.theme.timestamp),
    ])
}

/// Render `todos` into `area`, highlighting `selected`.
pub fn render_list(
    frame: &mut Frame,
    area: Rect,
    todos: &[Todo],
    selected: Option<usize>,
    filter: Filter,
    ctx: &ListContext<'_>,
) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(ctx.theme.separator);

    if todos.is_empty() {
        render_empty(frame, area, block, filter, ctx.theme);
        return;
    }

    let inner_width = area.width.saturating_sub(1);
    let items: Vec<ListItem> = todos
        .iter()
        .map(|t| ListItem::new(todo_line(t, inner_width, ctx)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(ctx.theme.selected)
        .highlight_symbol("›");

    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

/// Message shown in place of the list when nothing matches.
pub fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "Nothing to do. Press 'a' to add a todo.",
        Filter::Active => "All done!",
        Filter::Completed => "Nothing completed yet.",
    }
}

fn render_empty(frame: &mut Frame, area: Rect, block: Block, filter: Filter, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(Span::styled(empty_message(filter), theme.dim)))
        .block(block)
        .centered();
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
