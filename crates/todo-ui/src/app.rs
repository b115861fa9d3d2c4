//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, the current view (filter, sort, search), the input
//! mode and the last list snapshot received from the [`TodoHandle`]. Key
//! presses are turned into [`Action`]s by [`App::handle_key`], which touches
//! only UI state; [`App::apply`] sends the action to the service.

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::debug;

use todo_core::list::EditOutcome;
use todo_core::models::{Filter, SortOrder, Todo, TodoId, TodoStats};
use todo_core::time_utils::TimezoneHandler;
use todo_runtime::TodoHandle;

use crate::components::footer::{Footer, StatusMessage, INPUT_HINTS, NORMAL_HINTS};
use crate::components::header::Header;
use crate::components::input::{InputBuffer, InputLine};
use crate::list_view::{self, ListContext};
use crate::themes::Theme;

// ── Mode / Action ─────────────────────────────────────────────────────────────

/// What keystrokes currently mean.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigating the list.
    #[default]
    Normal,
    /// Typing a new todo.
    Adding { input: InputBuffer },
    /// Rewriting the text of `id`.
    Editing { id: TodoId, input: InputBuffer },
    /// Typing a search query; the list narrows as you type.
    Searching { input: InputBuffer },
}

impl Mode {
    fn prompt(&self) -> Option<(&'static str, &InputBuffer)> {
        match self {
            Mode::Normal => None,
            Mode::Adding { input } => Some(("Add:", input)),
            Mode::Editing { input, .. } => Some(("Edit:", input)),
            Mode::Searching { input } => Some(("Search:", input)),
        }
    }
}

/// A change to the list requested from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Toggle(TodoId),
    Edit(TodoId, String),
    Delete(TodoId),
    ClearCompleted,
    ToggleAll,
    Quit,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the todo TUI.
pub struct App {
    pub theme: Theme,
    /// IANA name shown in the header.
    pub timezone: String,
    timezones: TimezoneHandler,
    pub use_12h: bool,
    pub filter: Filter,
    pub sort: SortOrder,
    /// Active search; empty means no search.
    pub query: String,
    pub mode: Mode,
    /// Index into the visible rows.
    pub selected: usize,
    /// Where the list lives, shown in the header.
    pub source: String,
    pub status: Option<StatusMessage>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    todos: Vec<Todo>,
}

impl App {
    pub fn new(theme_name: &str, timezone: String, use_12h: bool, filter: Filter, sort: SortOrder) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            timezones: TimezoneHandler::new(&timezone),
            timezone,
            use_12h,
            filter,
            sort,
            query: String::new(),
            mode: Mode::Normal,
            selected: 0,
            source: String::new(),
            status: None,
            should_quit: false,
            todos: Vec::new(),
        }
    }

    // ── State ─────────────────────────────────────────────────────────────────

    /// Replace the list snapshot, keeping the selection in range.
    pub fn set_todos(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.clamp_selection();
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Todos shown under the current filter, search and sort.
    pub fn visible(&self) -> Vec<Todo> {
        let query = self.query.trim();
        let mut rows: Vec<Todo> = self
            .todos
            .iter()
            .filter(|t| self.filter.matches(t))
            .filter(|t| t.matches_query(query))
            .cloned()
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }

    pub fn selected_todo(&self) -> Option<Todo> {
        self.visible().into_iter().nth(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Put the cursor on `id` if it is visible.
    fn select_id(&mut self, id: TodoId) {
        if let Some(pos) = self.visible().iter().position(|t| t.id == id) {
            self.selected = pos;
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Translate a key press into an [`Action`], updating UI-only state
    /// (selection, mode, view, input text) along the way.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        self.status = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Adding { mut input } => match key.code {
                KeyCode::Enter => {
                    let text = input.value().to_string();
                    (!text.trim().is_empty()).then_some(Action::Add(text))
                }
                KeyCode::Esc => None,
                _ => {
                    edit_input(&mut input, key);
                    self.mode = Mode::Adding { input };
                    None
                }
            },
            Mode::Editing { id, mut input } => match key.code {
                KeyCode::Enter => Some(Action::Edit(id, input.value().to_string())),
                KeyCode::Esc => None,
                _ => {
                    edit_input(&mut input, key);
                    self.mode = Mode::Editing { id, input };
                    None
                }
            },
            Mode::Searching { mut input } => {
                match key.code {
                    KeyCode::Enter => {}
                    KeyCode::Esc => self.query.clear(),
                    _ => {
                        edit_input(&mut input, key);
                        self.query = input.value().to_string();
                        self.mode = Mode::Searching { input };
                    }
                }
                self.selected = 0;
                None
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        let selected = self.selected_todo();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = usize::MAX;
                self.clamp_selection();
                None
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => selected.map(|t| Action::Toggle(t.id)),
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.mode = Mode::Adding {
                    input: InputBuffer::new(),
                };
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(todo) = selected {
                    self.mode = Mode::Editing {
                        id: todo.id,
                        input: InputBuffer::with_text(&todo.text),
                    };
                }
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => selected.map(|t| Action::Delete(t.id)),
            KeyCode::Char('c') => Some(Action::ClearCompleted),
            KeyCode::Char('A') => Some(Action::ToggleAll),
            KeyCode::Char('f') | KeyCode::Tab => {
                self.filter = self.filter.next();
                self.selected = 0;
                None
            }
            KeyCode::Char('s') => {
                self.sort = self.sort.next();
                self.status = Some(StatusMessage::info(format!("Sorted by {}", self.sort)));
                None
            }
            KeyCode::Char('/') => {
                self.mode = Mode::Searching {
                    input: InputBuffer::with_text(&self.query),
                };
                None
            }
            KeyCode::Esc => {
                self.query.clear();
                self.clamp_selection();
                None
            }
            _ => None,
        }
    }

    // ── Applying actions ──────────────────────────────────────────────────────

    /// Send `action` to the service and report the outcome in the status
    /// line. Errors never escape: they become an error status.
    pub async fn apply(&mut self, handle: &TodoHandle, action: Action) {
        debug!(?action, "applying action");
        let outcome: Result<Option<String>, String> = match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::Add(text) => match handle.add(text).await {
                Ok(todo) => {
                    self.set_todos(handle.snapshot());
                    self.select_id(todo.id);
                    Ok(Some(format!("Added #{}", todo.id)))
                }
                Err(e) => Err(e.to_string()),
            },
            Action::Toggle(id) => handle
                .toggle(id)
                .await
                .map(|_| None)
                .map_err(|e| e.to_string()),
            Action::Edit(id, text) => match handle.edit(id, text).await {
                Ok(EditOutcome::Deleted(_)) => Ok(Some(format!("Deleted #{}", id))),
                Ok(_) => Ok(None),
                Err(e) => Err(e.to_string()),
            },
            Action::Delete(id) => handle
                .delete(id)
                .await
                .map(|removed| removed.map(|t| format!("Deleted \"{}\"", t.text)))
                .map_err(|e| e.to_string()),
            Action::ClearCompleted => handle
                .clear_completed()
                .await
                .map(|n| Some(format!("Cleared {} completed", n)))
                .map_err(|e| e.to_string()),
            Action::ToggleAll => handle
                .toggle_all()
                .await
                .map(|_| None)
                .map_err(|e| e.to_string()),
        };

        self.set_todos(handle.snapshot());
        self.status = match outcome {
            Ok(Some(message)) => Some(StatusMessage::success(message)),
            Ok(None) => None,
            Err(message) => Some(StatusMessage::error(message)),
        };
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the interactive TUI against `handle`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop keeps
    /// picking up list changes made elsewhere (for example by a server
    /// sharing the same handle). Exits on `q` or `Ctrl+C` and returns the
    /// filter and sort the user left with.
    pub async fn run(mut self, handle: TodoHandle) -> io::Result<(Filter, SortOrder)> {
        self.source = handle.source().to_string();
        let mut updates = handle.subscribe();
        self.set_todos(updates.borrow_and_update().clone());

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if let Some(action) = self.handle_key(key) {
                            self.apply(&handle, action).await;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            match updates.has_changed() {
                Ok(true) => {
                    let todos = updates.borrow_and_update().clone();
                    self.set_todos(todos);
                }
                Ok(false) => {}
                Err(_) => self.should_quit = true,
            }

            if self.should_quit {
                break Ok((self.filter, self.sort));
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let input_height = if self.mode.prompt().is_some() { 1 } else { 0 };
        let [header_area, list_area, footer_area, input_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
            Constraint::Length(input_height),
        ])
        .areas(frame.area());

        let stats = TodoStats::from_todos(&self.todos);
        let header = Header::new(stats, &self.source, &self.timezone, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let rows = self.visible();
        let ctx = ListContext {
            timezones: &self.timezones,
            use_12h: self.use_12h,
            now: Utc::now(),
            theme: &self.theme,
        };
        let selected = (!rows.is_empty()).then_some(self.selected);
        list_view::render_list(frame, list_area, &rows, selected, self.filter, &ctx);

        let query = (!self.query.is_empty()).then_some(self.query.as_str());
        let footer = Footer {
            filter: self.filter,
            sort: self.sort,
            active: stats.active,
            query,
            status: self.status.as_ref(),
            hints: if input_height > 0 { INPUT_HINTS } else { NORMAL_HINTS },
            theme: &self.theme,
        };
        frame.render_widget(Paragraph::new(footer.to_lines()), footer_area);

        if let Some((prompt, input)) = self.mode.prompt() {
            let line = InputLine::new(prompt, input, &self.theme);
            let x = input_area.x.saturating_add(line.cursor_x());
            frame.render_widget(Paragraph::new(line.to_line()), input_area);
            frame.set_cursor_position(Position::new(
                x.min(input_area.right().saturating_sub(1)),
                input_area.y,
            ));
        }
    }
}

/// Apply a line-editing key to `input`.
fn edit_input(input: &mut InputBuffer, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use todo_data::MemoryStorage;
    use todo_runtime::{TodoService, TodoStore};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn chr(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(chr(c)), None);
        }
    }

    fn app() -> App {
        App::new("dark", "UTC".to_string(), false, Filter::All, SortOrder::CreatedAsc)
    }

    fn sample(ids_done: &[(u64, &str, bool)]) -> Vec<Todo> {
        ids_done
            .iter()
            .map(|&(id, text, done)| {
                let mut t = Todo::new(TodoId(id), text.to_string(), Utc::now());
                t.completed = done;
                t
            })
            .collect()
    }

    fn app_with(todos: &[(u64, &str, bool)]) -> App {
        let mut app = app();
        app.set_todos(sample(todos));
        app
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = app();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.filter, Filter::All);
        assert!(!app.should_quit);
        assert!(app.todos().is_empty());
        assert!(app.selected_todo().is_none());
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("neon", "Nowhere/Else".to_string(), true, Filter::Active, SortOrder::Text);
        assert_eq!(app.filter, Filter::Active);
        assert!(app.use_12h);
    }

    // ── Normal mode ───────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(chr('q')), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_navigation_clamps() {
        let mut app = app_with(&[(1, "a", false), (2, "b", false)]);
        app.handle_key(chr('k'));
        assert_eq!(app.selected, 0);
        app.handle_key(chr('j'));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, 1);
        app.handle_key(chr('g'));
        assert_eq!(app.selected, 0);
        app.handle_key(chr('G'));
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_toggle_delete_target_selected_row() {
        let mut app = app_with(&[(1, "a", false), (2, "b", false)]);
        app.handle_key(chr('j'));
        assert_eq!(app.handle_key(chr(' ')), Some(Action::Toggle(TodoId(2))));
        assert_eq!(app.handle_key(chr('x')), Some(Action::Toggle(TodoId(2))));
        assert_eq!(app.handle_key(chr('d')), Some(Action::Delete(TodoId(2))));
    }

    #[test]
    fn test_row_actions_on_empty_list_do_nothing() {
        let mut app = app();
        assert_eq!(app.handle_key(chr(' ')), None);
        assert_eq!(app.handle_key(chr('d')), None);
        assert_eq!(app.handle_key(chr('e')), None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_bulk_actions() {
        let mut app = app();
        assert_eq!(app.handle_key(chr('c')), Some(Action::ClearCompleted));
        assert_eq!(app.handle_key(chr('A')), Some(Action::ToggleAll));
    }

    #[test]
    fn test_filter_cycle_changes_visible_rows() {
        let mut app = app_with(&[(1, "a", false), (2, "b", true), (3, "c", false)]);
        assert_eq!(app.visible().len(), 3);

        app.handle_key(chr('f'));
        assert_eq!(app.filter, Filter::Active);
        assert_eq!(app.visible().len(), 2);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.filter, Filter::Completed);
        assert_eq!(app.selected_todo().unwrap().id, TodoId(2));

        app.handle_key(chr('f'));
        assert_eq!(app.filter, Filter::All);
    }

    #[test]
    fn test_sort_cycle_sets_status() {
        let mut app = app_with(&[(1, "b", false), (2, "a", false)]);
        app.handle_key(chr('s'));
        assert_eq!(app.sort, SortOrder::CreatedDesc);
        assert!(app.status.as_ref().unwrap().text.contains("newest"));

        app.handle_key(chr('s'));
        assert_eq!(app.sort, SortOrder::Text);
        assert_eq!(app.visible()[0].text, "a");
        // Any later key clears the status.
        app.handle_key(chr('j'));
        assert!(app.status.is_none());
    }

    // ── Input modes ───────────────────────────────────────────────────────────

    #[test]
    fn test_add_flow() {
        let mut app = app();
        app.handle_key(chr('a'));
        assert!(matches!(app.mode, Mode::Adding { .. }));

        type_text(&mut app, "Buy milkk");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Action::Add("Buy milk".to_string()))
        );
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_add_blank_or_escape_does_nothing() {
        let mut app = app();
        app.handle_key(chr('i'));
        type_text(&mut app, "   ");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(app.mode, Mode::Normal);

        app.handle_key(chr('a'));
        type_text(&mut app, "draft");
        assert_eq!(app.handle_key(key(KeyCode::Esc)), None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_q_is_text_while_typing() {
        let mut app = app();
        app.handle_key(chr('a'));
        assert_eq!(app.handle_key(chr('q')), None);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_edit_flow_prefills_text() {
        let mut app = app_with(&[(7, "Walk dog", false)]);
        app.handle_key(key(KeyCode::Enter));
        match &app.mode {
            Mode::Editing { id, input } => {
                assert_eq!(*id, TodoId(7));
                assert_eq!(input.value(), "Walk dog");
            }
            other => panic!("expected editing mode, got {other:?}"),
        }

        app.handle_key(key(KeyCode::Home));
        type_text(&mut app, "Go ");
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Action::Edit(TodoId(7), "Go Walk dog".to_string()))
        );
    }

    #[test]
    fn test_search_narrows_live_and_esc_clears() {
        let mut app = app_with(&[(1, "Buy milk", false), (2, "Walk dog", false)]);
        app.handle_key(chr('/'));
        type_text(&mut app, "MILK");
        assert_eq!(app.query, "MILK");
        assert_eq!(app.visible().len(), 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.visible().len(), 1);

        app.handle_key(key(KeyCode::Esc));
        assert!(app.query.is_empty());
        assert_eq!(app.visible().len(), 2);
    }

    #[test]
    fn test_set_todos_clamps_selection() {
        let mut app = app_with(&[(1, "a", false), (2, "b", false), (3, "c", false)]);
        app.handle_key(chr('G'));
        assert_eq!(app.selected, 2);
        app.set_todos(sample(&[(1, "a", false)]));
        assert_eq!(app.selected, 0);
    }

    // ── apply (against a live service) ────────────────────────────────────────

    fn spawn_service() -> (TodoHandle, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = TodoStore::open(storage.clone()).unwrap();
        (TodoService::spawn(store), storage)
    }

    #[tokio::test]
    async fn test_apply_add_selects_new_todo() {
        let (handle, _) = spawn_service();
        let mut app = app();
        handle.add("first").await.unwrap();
        app.set_todos(handle.snapshot());

        app.apply(&handle, Action::Add("second".to_string())).await;
        assert_eq!(app.todos().len(), 2);
        assert_eq!(app.selected_todo().unwrap().text, "second");
        assert_eq!(app.status.as_ref().unwrap().text, "Added #2");
    }

    #[tokio::test]
    async fn test_apply_error_becomes_status() {
        let (handle, storage) = spawn_service();
        let mut app = app();
        storage.fail_next_saves(1);

        app.apply(&handle, Action::Add("doomed".to_string())).await;
        assert!(app.todos().is_empty());
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, crate::components::footer::StatusKind::Error);
    }

    #[tokio::test]
    async fn test_apply_buy_milk_scenario() {
        let (handle, _) = spawn_service();
        let mut app = app();

        app.apply(&handle, Action::Add("Buy milk".to_string())).await;
        let id = app.selected_todo().unwrap().id;
        app.apply(&handle, Action::Toggle(id)).await;
        assert!(app.todos()[0].completed);
        app.apply(&handle, Action::ClearCompleted).await;
        assert!(app.todos().is_empty());
        assert_eq!(app.status.as_ref().unwrap().text, "Cleared 1 completed");

        app.apply(&handle, Action::Quit).await;
        assert!(app.should_quit);
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_does_not_panic_in_each_mode() {
        let mut app = app_with(&[(1, "Buy milk", false), (2, "Walk dog", true)]);
        for keys in [vec![], vec![chr('a')], vec![chr('e')], vec![chr('/')]] {
            app.mode = Mode::Normal;
            for k in keys {
                app.handle_key(k);
            }
            let backend = TestBackend::new(80, 20);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal.draw(|frame| app.render(frame)).unwrap();
        }
    }

    #[test]
    fn test_render_shows_header_and_counter() {
        let app = app_with(&[(1, "Buy milk", false), (2, "Walk dog", true)]);
        let backend = TestBackend::new(90, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("TODO LIST"));
        assert!(content.contains("Buy milk"));
        assert!(content.contains("1 item left"));
    }
}
