//! Application state and event handling.
//!
//! The `App` is purely synchronous: key and mouse events mutate local
//! state and may yield [`ApiCommand`]s for the background worker; worker
//! [`ApiEvent`]s flow back in through [`App::apply_event`]. Nothing here
//! performs I/O except the dark-mode persistence write.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use taskdeck_api::activity::Activity;
use taskdeck_api::comment::{Comment, NewComment};
use taskdeck_api::task::{Task, TaskDraft, TaskFilter, TaskPatch, TaskStatus};
use taskdeck_api::user::{User, UserDirectory};

use crate::board::BoardView;
use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::drag::{DragController, HitMap};
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::worker::{ApiCommand, ApiEvent};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Login / registration form.
    Login,
    /// The kanban board.
    Board,
    /// Create/edit task form.
    TaskForm,
    /// Task detail with comments.
    Detail,
    /// Delete confirmation prompt.
    ConfirmDelete,
}

/// Which login form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Username input.
    Username,
    /// Email input (registration only).
    Email,
    /// Password input.
    Password,
}

/// Login / registration form state.
#[derive(Debug, Default)]
pub struct LoginForm {
    /// Username input buffer.
    pub username: String,
    /// Email input buffer (registration mode).
    pub email: String,
    /// Password input buffer.
    pub password: String,
    /// Whether the form is in registration mode.
    pub registering: bool,
    /// Focused field.
    pub focus: Option<LoginField>,
    /// Last rejection message, shown inline.
    pub error: Option<String>,
}

impl LoginForm {
    fn focus_or_default(&self) -> LoginField {
        self.focus.unwrap_or(LoginField::Username)
    }

    fn cycle_focus(&mut self) {
        self.focus = Some(match self.focus_or_default() {
            LoginField::Username if self.registering => LoginField::Email,
            LoginField::Username | LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Username,
        });
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.focus_or_default() {
            LoginField::Username => &mut self.username,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Which task form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Title input.
    Title,
    /// Description input.
    Description,
    /// Due date input (`YYYY-MM-DD`).
    DueDate,
    /// Priority selector.
    Priority,
}

/// Create/edit task form state.
#[derive(Debug)]
pub struct TaskForm {
    /// Task being edited, `None` when creating.
    pub editing: Option<i64>,
    /// Title buffer.
    pub title: String,
    /// Description buffer.
    pub description: String,
    /// Due date buffer, `YYYY-MM-DD` or empty.
    pub due_date: String,
    /// Priority ordinal (0 low, 1 medium, 2 high).
    pub priority: i32,
    /// Column the task lands in (kept from the edited task, `todo` for
    /// new ones).
    pub status: TaskStatus,
    /// Focused field.
    pub focus: FormField,
    /// Local validation message.
    pub error: Option<String>,
}

impl TaskForm {
    fn blank() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: taskdeck_api::task::PRIORITY_MEDIUM,
            status: TaskStatus::Todo,
            focus: FormField::Title,
            error: None,
        }
    }

    fn prefilled(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority,
            status: task.status,
            focus: FormField::Title,
            error: None,
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::DueDate,
            FormField::DueDate => FormField::Priority,
            FormField::Priority => FormField::Title,
        };
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
        }
    }
}

/// Main application state.
pub struct App {
    /// Current screen.
    pub screen: Screen,
    /// Server task snapshot plus active filter.
    pub store: TaskStore,
    /// Known users, for assignee and mention resolution.
    pub users: UserDirectory,
    /// Activity feed, newest first.
    pub activities: Vec<Activity>,
    /// Comments for the task open in the detail view.
    pub comments: Vec<Comment>,
    /// The authenticated user, when a session is active.
    pub current_user: Option<User>,
    /// Login form state.
    pub login: LoginForm,
    /// Task form state.
    pub form: TaskForm,
    /// Board selection: (column index, card index).
    pub selection: (usize, usize),
    /// Task open in the detail view / pending deletion.
    pub focused_task: Option<i64>,
    /// Comment input buffer in the detail view.
    pub comment_input: String,
    /// Whether the search box has focus.
    pub search_active: bool,
    /// Search input buffer.
    pub search_input: String,
    /// Whether the activity panel is visible.
    pub show_activity: bool,
    /// Dark (default) or light palette.
    pub dark_mode: bool,
    /// Transient status-bar notification.
    pub notification: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Drag state machine for card moves.
    pub drag: DragController,
    /// Hit-test index rebuilt on every draw.
    pub hit_map: HitMap,
    debouncer: Debouncer,
    storage: Storage,
}

impl App {
    /// Creates the app on the login screen, with the persisted theme.
    #[must_use]
    pub fn new(config: &ClientConfig, storage: Storage) -> Self {
        let dark_mode = storage.dark_mode().unwrap_or(true);
        Self {
            screen: Screen::Login,
            store: TaskStore::new(),
            users: UserDirectory::default(),
            activities: Vec::new(),
            comments: Vec::new(),
            current_user: None,
            login: LoginForm::default(),
            form: TaskForm::blank(),
            selection: (0, 0),
            focused_task: None,
            comment_input: String::new(),
            search_active: false,
            search_input: String::new(),
            show_activity: false,
            dark_mode,
            notification: None,
            should_quit: false,
            drag: DragController::new(),
            hit_map: HitMap::default(),
            debouncer: Debouncer::new(config.search_debounce),
            storage,
        }
    }

    /// Projects the current snapshot for rendering and hit-testing.
    #[must_use]
    pub fn board(&self) -> BoardView {
        BoardView::project(
            self.store.tasks(),
            chrono::Local::now().date_naive(),
            &self.users,
        )
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
    }

    /// Applies a worker event, possibly yielding follow-up commands.
    pub fn apply_event(&mut self, event: ApiEvent) -> Vec<ApiCommand> {
        match event {
            ApiEvent::SessionStarted(user) => {
                tracing::debug!(user = %user.username, "session started");
                self.current_user = Some(user);
                self.login = LoginForm::default();
                self.screen = Screen::Board;
                vec![
                    ApiCommand::Refresh {
                        filter: self.store.filter().clone(),
                    },
                    ApiCommand::LoadUsers,
                    ApiCommand::LoadActivities,
                ]
            }
            ApiEvent::RestoreMissed => {
                self.screen = Screen::Login;
                Vec::new()
            }
            ApiEvent::SessionEnded => {
                self.current_user = None;
                self.store.clear();
                self.users.clear();
                self.activities.clear();
                self.comments.clear();
                self.search_input.clear();
                self.search_active = false;
                self.debouncer.cancel();
                self.drag.cancel();
                self.screen = Screen::Login;
                Vec::new()
            }
            ApiEvent::AuthFailed(message) => {
                self.login.error = Some(message);
                Vec::new()
            }
            ApiEvent::Tasks(tasks) => {
                self.store.apply_snapshot(tasks);
                self.clamp_selection();
                // A refresh can move the dragged card out from under the
                // cursor.
                self.drag.cancel();
                Vec::new()
            }
            ApiEvent::Comments { task_id, comments } => {
                if self.focused_task == Some(task_id) {
                    self.comments = comments;
                }
                Vec::new()
            }
            ApiEvent::Users(users) => {
                self.users.replace(users);
                Vec::new()
            }
            ApiEvent::Activities(activities) => {
                self.activities = activities;
                Vec::new()
            }
            ApiEvent::CsvExported(path) => {
                self.notify(format!("exported to {}", path.display()));
                Vec::new()
            }
            ApiEvent::Error(message) => {
                self.notify(message);
                Vec::new()
            }
        }
    }

    /// Fires the debounced search once its quiet period elapses.
    pub fn tick(&mut self, now: Instant) -> Option<ApiCommand> {
        let search = self.debouncer.poll(now)?;
        let mut filter = self.store.filter().clone();
        filter.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self.store.set_filter(filter.clone());
        Some(ApiCommand::Refresh { filter })
    }

    /// Handles a key event, possibly yielding commands for the worker.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        self.notification = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Board => self.handle_board_key(key),
            Screen::TaskForm => self.handle_form_key(key),
            Screen::Detail => self.handle_detail_key(key),
            Screen::ConfirmDelete => self.handle_confirm_key(key),
        }
    }

    /// Handles a mouse event on the board (drag-and-drop moves).
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<ApiCommand> {
        if self.screen != Screen::Board {
            return None;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag.press(&self.hit_map, mouse.column, mouse.row);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (id, mv) = self.drag.release(&self.hit_map, mouse.column, mouse.row)?;
                Some(ApiCommand::MoveTask { id, mv })
            }
            _ => None,
        }
    }

    // -- Login screen --------------------------------------------------------

    fn handle_login_key(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.login.registering = !self.login.registering;
            self.login.error = None;
            return Vec::new();
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.login.cycle_focus();
                Vec::new()
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(c) => {
                self.login.active_buffer().push(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.login.active_buffer().pop();
                Vec::new()
            }
            KeyCode::Esc => {
                self.should_quit = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn submit_login(&mut self) -> Vec<ApiCommand> {
        let username = self.login.username.trim().to_string();
        let password = self.login.password.clone();
        if username.is_empty() || password.is_empty() {
            self.login.error = Some("username and password are required".to_string());
            return Vec::new();
        }
        if self.login.registering {
            let email = self.login.email.trim().to_string();
            if email.is_empty() {
                self.login.error = Some("email is required".to_string());
                return Vec::new();
            }
            vec![ApiCommand::Register {
                username,
                email,
                password,
            }]
        } else {
            vec![ApiCommand::Login { username, password }]
        }
    }

    // -- Board screen --------------------------------------------------------

    fn handle_board_key(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        if self.search_active {
            return self.handle_search_key(key);
        }
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                Vec::new()
            }
            KeyCode::Char('n') => {
                self.form = TaskForm::blank();
                self.screen = Screen::TaskForm;
                Vec::new()
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task().cloned() {
                    self.form = TaskForm::prefilled(&task);
                    self.screen = Screen::TaskForm;
                }
                Vec::new()
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    self.focused_task = Some(id);
                    self.comments.clear();
                    self.comment_input.clear();
                    self.screen = Screen::Detail;
                    return vec![ApiCommand::LoadComments(id)];
                }
                Vec::new()
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    self.focused_task = Some(id);
                    self.screen = Screen::ConfirmDelete;
                }
                Vec::new()
            }
            KeyCode::Char('t') => {
                self.toggle_dark_mode();
                Vec::new()
            }
            KeyCode::Char('a') => {
                self.show_activity = !self.show_activity;
                Vec::new()
            }
            KeyCode::Char('r') => vec![ApiCommand::Refresh {
                filter: self.store.filter().clone(),
            }],
            KeyCode::Char('c') => vec![ApiCommand::ExportCsv],
            KeyCode::Char('L') => vec![ApiCommand::Logout],
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_selection(-1, 0);
                Vec::new()
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_selection(1, 0);
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(0, -1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(0, 1);
                Vec::new()
            }
            KeyCode::Esc => {
                self.drag.cancel();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        match key.code {
            KeyCode::Esc => {
                self.search_active = false;
                self.debouncer.cancel();
                Vec::new()
            }
            KeyCode::Enter => {
                self.search_active = false;
                // Immediate refresh, skipping the remaining quiet period.
                self.debouncer.cancel();
                let mut filter = self.store.filter().clone();
                filter.search = if self.search_input.trim().is_empty() {
                    None
                } else {
                    Some(self.search_input.clone())
                };
                self.store.set_filter(filter.clone());
                vec![ApiCommand::Refresh { filter }]
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.debouncer
                    .note_input(self.search_input.clone(), Instant::now());
                Vec::new()
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.debouncer
                    .note_input(self.search_input.clone(), Instant::now());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // -- Task form -----------------------------------------------------------

    fn handle_form_key(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Board;
                Vec::new()
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.form.cycle_focus();
                Vec::new()
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(' ') if self.form.focus == FormField::Priority => {
                self.form.priority = (self.form.priority + 1) % 3;
                Vec::new()
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.form.active_buffer() {
                    buf.push(c);
                }
                Vec::new()
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.form.active_buffer() {
                    buf.pop();
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn parse_form_due_date(&mut self) -> Result<Option<chrono::NaiveDate>, ()> {
        let raw = self.form.due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                self.form.error = Some("due date must be YYYY-MM-DD".to_string());
                Err(())
            }
        }
    }

    fn submit_form(&mut self) -> Vec<ApiCommand> {
        if self.form.title.trim().is_empty() {
            self.form.error = Some("title is required".to_string());
            return Vec::new();
        }
        let Ok(due_date) = self.parse_form_due_date() else {
            return Vec::new();
        };

        let title = self.form.title.trim().to_string();
        let description = Some(self.form.description.clone()).filter(|d| !d.trim().is_empty());

        let cmd = if let Some(id) = self.form.editing {
            ApiCommand::UpdateTask {
                id,
                patch: TaskPatch {
                    title: Some(title),
                    description,
                    priority: Some(self.form.priority),
                    due_date,
                    ..Default::default()
                },
            }
        } else {
            ApiCommand::CreateTask(TaskDraft {
                title,
                description,
                status: self.form.status,
                priority: self.form.priority,
                due_date,
                assignee_id: None,
            })
        };
        self.screen = Screen::Board;
        vec![cmd]
    }

    // -- Detail screen -------------------------------------------------------

    fn handle_detail_key(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Board;
                self.focused_task = None;
                self.comments.clear();
                Vec::new()
            }
            KeyCode::Enter => self.submit_comment(),
            KeyCode::Char(c) => {
                self.comment_input.push(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.comment_input.pop();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn submit_comment(&mut self) -> Vec<ApiCommand> {
        let content = self.comment_input.trim().to_string();
        if content.is_empty() {
            return Vec::new();
        }
        let (Some(task_id), Some(user)) = (self.focused_task, self.current_user.as_ref()) else {
            return Vec::new();
        };
        self.comment_input.clear();
        vec![ApiCommand::AddComment {
            task_id,
            comment: NewComment {
                author: user.username.clone(),
                content,
            },
        }]
    }

    // -- Delete confirmation -------------------------------------------------

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Vec<ApiCommand> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.screen = Screen::Board;
                match self.focused_task.take() {
                    Some(id) => vec![ApiCommand::DeleteTask(id)],
                    None => Vec::new(),
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.screen = Screen::Board;
                self.focused_task = None;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // -- Selection & theme ---------------------------------------------------

    fn selected_task(&self) -> Option<&Task> {
        let board = self.board();
        let (col, row) = self.selection;
        let id = board.columns.get(col)?.cards.get(row)?.id;
        self.store.get(id)
    }

    fn move_selection(&mut self, dx: isize, dy: isize) {
        let board = self.board();
        let (mut col, mut row) = self.selection;
        col = col
            .saturating_add_signed(dx)
            .min(board.columns.len().saturating_sub(1));
        let cards = board.columns[col].count();
        row = row
            .saturating_add_signed(dy)
            .min(cards.saturating_sub(1));
        self.selection = (col, row);
    }

    fn clamp_selection(&mut self) {
        let board = self.board();
        let (col, row) = self.selection;
        let col = col.min(board.columns.len().saturating_sub(1));
        let row = row.min(board.columns[col].count().saturating_sub(1));
        self.selection = (col, row);
    }

    /// Flips the palette and persists the choice.
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        if let Err(e) = self.storage.set_dark_mode(self.dark_mode) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
    }
}
