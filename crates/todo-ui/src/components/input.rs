use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

// ── InputBuffer ───────────────────────────────────────────────────────────────

/// Single-line text being typed, with a cursor measured in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-filled with `text`, cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Terminal columns occupied by the text before the cursor.
    pub fn cursor_column(&self) -> usize {
        let at = self.byte_index(self.cursor);
        self.text[..at].width()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

// ── InputLine ─────────────────────────────────────────────────────────────────

/// The prompt line shown while adding, editing or searching.
pub struct InputLine<'a> {
    pub prompt: &'a str,
    pub buffer: &'a InputBuffer,
    pub theme: &'a Theme,
}

impl<'a> InputLine<'a> {
    pub fn new(prompt: &'a str, buffer: &'a InputBuffer, theme: &'a Theme) -> Self {
        Self {
            prompt,
            buffer,
            theme,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(self.prompt, self.theme.input_prompt),
            Span::styled(" ", self.theme.input_prompt),
            Span::styled(self.buffer.value(), self.theme.input_text),
        ])
    }

    /// Column of the terminal cursor relative to the start of the line.
    pub fn cursor_x(&self) -> u16 {
        let col = self.prompt.width() + 1 + self.buffer.cursor_column();
        u16::try_from(col).unwrap_or(u16::MAX)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
