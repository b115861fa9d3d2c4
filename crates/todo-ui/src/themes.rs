use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Background values 0–6 are dark, anything higher is light. When the
/// variable is absent or unparseable the background is assumed dark.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    match value
        .and_then(|v| v.split(';').next_back())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
    {
        Some(bg) if bg > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// Every style the todo TUI paints with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub error: Style,

    // ── List ─────────────────────────────────────────────────────────────────
    pub todo_active: Style,
    /// Completed todos: dimmed and struck through.
    pub todo_completed: Style,
    pub checkbox_open: Style,
    pub checkbox_done: Style,
    pub timestamp: Style,
    /// Applied on top of the row style for the selected row.
    pub selected: Style,

    // ── Footer ───────────────────────────────────────────────────────────────
    pub filter_current: Style,
    pub filter_other: Style,
    pub key_hint: Style,

    // ── Input line ───────────────────────────────────────────────────────────
    pub input_prompt: Style,
    pub input_text: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            todo_active: Style::default().fg(Color::White),
            todo_completed: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            checkbox_open: Style::default().fg(Color::Gray),
            checkbox_done: Style::default().fg(Color::Green),
            timestamp: Style::default().fg(Color::DarkGray),
            selected: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),

            filter_current: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            filter_other: Style::default().fg(Color::Gray),
            key_hint: Style::default().fg(Color::DarkGray),

            input_prompt: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            input_text: Style::default().fg(Color::White),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            todo_active: Style::default().fg(Color::Black),
            todo_completed: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::CROSSED_OUT),
            checkbox_open: Style::default().fg(Color::DarkGray),
            checkbox_done: Style::default().fg(Color::Green),
            timestamp: Style::default().fg(Color::Gray),
            selected: Style::default()
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),

            filter_current: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            filter_other: Style::default().fg(Color::DarkGray),
            key_hint: Style::default().fg(Color::Gray),

            input_prompt: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            input_text: Style::default().fg(Color::Black),
        }
    }

    /// Basic 8-colour ANSI palette, no bold. Strikethrough is replaced by
    /// plain dimming since minimal terminals often ignore it.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red),

            todo_active: Style::default().fg(Color::White),
            todo_completed: Style::default().fg(Color::DarkGray),
            checkbox_open: Style::default().fg(Color::White),
            checkbox_done: Style::default().fg(Color::Green),
            timestamp: Style::default().fg(Color::DarkGray),
            selected: Style::default().add_modifier(Modifier::REVERSED),

            filter_current: Style::default().fg(Color::Yellow),
            filter_other: Style::default().fg(Color::Gray),
            key_hint: Style::default().fg(Color::DarkGray),

            input_prompt: Style::default().fg(Color::Cyan),
            input_text: Style::default().fg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names (including `"auto"`) fall
    /// back to [`Theme::auto_detect`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    pub fn todo_style(&self, completed: bool) -> Style {
        if completed {
            self.todo_completed
        } else {
            self.todo_active
        }
    }

    pub fn checkbox_style(&self, completed: bool) -> Style {
        if completed {
            self.checkbox_done
        } else {
            self.checkbox_open
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Background detection ─────────────────────────────────────────────────

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg(Some("15;0")), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg(Some("0;15")), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg(Some("0;default;7")), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg(Some("garbage")), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg(None), BackgroundType::Dark);
    }

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.checkbox_done.fg, Some(Color::Green));
        assert!(t.todo_completed.add_modifier.contains(Modifier::CROSSED_OUT));
        assert_eq!(t.selected.bg, Some(Color::DarkGray));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.todo_active.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold_or_strikethrough() {
        let t = Theme::classic();
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.error.add_modifier.contains(Modifier::BOLD));
        assert!(!t.todo_completed.add_modifier.contains(Modifier::CROSSED_OUT));
        assert!(t.selected.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("LIGHT").header.fg, Some(Color::Blue));
        assert!(!Theme::from_name("classic")
            .header
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("neon");
        assert!(t.header.fg.is_some());
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    #[test]
    fn test_todo_and_checkbox_styles() {
        let t = Theme::dark();
        assert_eq!(t.todo_style(false), t.todo_active);
        assert_eq!(t.todo_style(true), t.todo_completed);
        assert_eq!(t.checkbox_style(true).fg, Some(Color::Green));
        assert_eq!(t.checkbox_style(false).fg, Some(Color::Gray));
    }
}
