//! API coordinator for wiring the TUI to the async HTTP layer.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async [`ApiClient`] / [`SessionGuard`] stack. It
//! spawns a background tokio task and communicates with the main thread
//! via [`ApiCommand`] / [`ApiEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── ApiEvent ───  tokio background task
//!                     ─── ApiCommand →
//! ```
//!
//! Commands are executed strictly one at a time, so a mutation and the
//! refresh it triggers can never interleave with a later command. After
//! every successful mutation the worker re-fetches the task list with the
//! current filter (and the activity feed), so the board always shows
//! server state rather than an optimistic guess.

use std::path::PathBuf;

use tokio::sync::mpsc;

use taskdeck_api::activity::Activity;
use taskdeck_api::comment::{Comment, NewComment};
use taskdeck_api::task::{MoveRequest, Task, TaskDraft, TaskFilter, TaskPatch};
use taskdeck_api::user::User;

use crate::api::{ApiClient, ApiError};
use crate::session::SessionGuard;

/// Channel capacity for commands and events.
const CHANNEL_CAPACITY: usize = 256;

/// File name of the CSV export inside the download directory.
const EXPORT_FILE_NAME: &str = "tasks.csv";

/// Commands sent from the TUI main loop to the API background task.
#[derive(Debug)]
pub enum ApiCommand {
    /// Validate a persisted credential on startup.
    Restore,
    /// Authenticate with username/password.
    Login {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// Create an account, then authenticate with it.
    Register {
        /// Account name.
        username: String,
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// End the session and erase the persisted credential.
    Logout,
    /// Re-fetch the task list with a new filter.
    Refresh {
        /// Filter applied server-side.
        filter: TaskFilter,
    },
    /// Create a task, then refresh.
    CreateTask(TaskDraft),
    /// Update a task's fields, then refresh.
    UpdateTask {
        /// Task id.
        id: i64,
        /// Fields to change.
        patch: TaskPatch,
    },
    /// Move a task to another column, then refresh.
    MoveTask {
        /// Task id.
        id: i64,
        /// Target column and position.
        mv: MoveRequest,
    },
    /// Delete a task, then refresh.
    DeleteTask(i64),
    /// Fetch a task's comments for the detail view.
    LoadComments(i64),
    /// Post a comment, then reload that task's comments.
    AddComment {
        /// Task id.
        task_id: i64,
        /// Comment body and author.
        comment: NewComment,
    },
    /// Fetch the user directory.
    LoadUsers,
    /// Fetch the activity feed.
    LoadActivities,
    /// Download the CSV export into the configured directory.
    ExportCsv,
    /// Gracefully shut down the background task.
    Shutdown,
}

/// Events sent from the API background task to the TUI main loop.
#[derive(Debug)]
pub enum ApiEvent {
    /// A session is active (login, registration, or restore succeeded).
    SessionStarted(User),
    /// No persisted session could be restored; show the login screen.
    RestoreMissed,
    /// The session ended: explicit logout or a rejected credential on any
    /// authenticated call.
    SessionEnded,
    /// Login or registration was rejected; message for the login screen.
    AuthFailed(String),
    /// Fresh task snapshot (every fetch replaces the whole list).
    Tasks(Vec<Task>),
    /// Comments for one task.
    Comments {
        /// The task the comments belong to.
        task_id: i64,
        /// Comments in server order.
        comments: Vec<Comment>,
    },
    /// The user directory.
    Users(Vec<User>),
    /// The activity feed, newest first.
    Activities(Vec<Activity>),
    /// The CSV export was written to this path.
    CsvExported(PathBuf),
    /// A user-facing error notification.
    Error(String),
}

/// Settings the worker needs from the resolved client config.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of activity entries to request.
    pub activity_limit: usize,
    /// Directory the CSV export is written to.
    pub download_dir: PathBuf,
}

/// Spawns the API background task and returns the channel handles.
///
/// The task owns the HTTP client and the session guard; the TUI owns only
/// the channels. Dropping the command sender shuts the task down.
#[must_use]
pub fn spawn_worker(
    api: ApiClient,
    guard: SessionGuard,
    config: WorkerConfig,
) -> (mpsc::Sender<ApiCommand>, mpsc::Receiver<ApiEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(CHANNEL_CAPACITY);
    let (evt_tx, evt_rx) = mpsc::channel::<ApiEvent>(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        Worker {
            api,
            guard,
            config,
            filter: TaskFilter::default(),
            evt_tx,
        }
        .run(cmd_rx)
        .await;
    });

    (cmd_tx, evt_rx)
}

struct Worker {
    api: ApiClient,
    guard: SessionGuard,
    config: WorkerConfig,
    filter: TaskFilter,
    evt_tx: mpsc::Sender<ApiEvent>,
}

impl Worker {
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<ApiCommand>) {
        while let Some(cmd) = cmd_rx.recv().await {
            if matches!(cmd, ApiCommand::Shutdown) {
                tracing::info!("api worker shutting down");
                break;
            }
            self.handle(cmd).await;
        }
    }

    async fn emit(&self, event: ApiEvent) {
        // TUI dropped; nothing to do but discard.
        let _ = self.evt_tx.send(event).await;
    }

    /// Maps a failed call to events: a rejected credential ends the
    /// session (no notification), everything else becomes one.
    async fn fail(&mut self, err: ApiError) {
        if matches!(err, ApiError::Unauthorized(_)) {
            tracing::info!("credential rejected mid-session");
            self.guard.end_session(&mut self.api);
            self.emit(ApiEvent::SessionEnded).await;
        } else {
            let message = match err {
                ApiError::Network(e) => {
                    tracing::warn!(error = %e, "request failed");
                    "connection error, please try again".to_string()
                }
                other => other.to_string(),
            };
            self.emit(ApiEvent::Error(message)).await;
        }
    }

    async fn refresh_tasks(&mut self) {
        match self.api.list_tasks(&self.filter).await {
            Ok(tasks) => self.emit(ApiEvent::Tasks(tasks)).await,
            Err(e) => self.fail(e).await,
        }
    }

    async fn refresh_activities(&mut self) {
        match self.api.list_activities(self.config.activity_limit).await {
            Ok(activities) => self.emit(ApiEvent::Activities(activities)).await,
            Err(e) => self.fail(e).await,
        }
    }

    /// Post-mutation refresh: tasks plus the activity feed, since every
    /// mutation appends an activity entry.
    async fn refresh_after_mutation(&mut self) {
        self.refresh_tasks().await;
        self.refresh_activities().await;
    }

    async fn handle(&mut self, cmd: ApiCommand) {
        match cmd {
            ApiCommand::Restore => match self.guard.restore(&mut self.api).await {
                Ok(true) => {
                    if let Some(session) = self.guard.current() {
                        self.emit(ApiEvent::SessionStarted(session.user.clone()))
                            .await;
                    }
                }
                Ok(false) => self.emit(ApiEvent::RestoreMissed).await,
                Err(e) => {
                    self.emit(ApiEvent::RestoreMissed).await;
                    self.emit(ApiEvent::Error(e.to_string())).await;
                }
            },
            ApiCommand::Login { username, password } => {
                match self
                    .guard
                    .authenticate(&mut self.api, &username, &password)
                    .await
                {
                    Ok(session) => {
                        let user = session.user.clone();
                        self.emit(ApiEvent::SessionStarted(user)).await;
                    }
                    Err(e) => self.emit(ApiEvent::AuthFailed(e.to_string())).await,
                }
            }
            ApiCommand::Register {
                username,
                email,
                password,
            } => {
                match self
                    .guard
                    .register(&mut self.api, &username, &email, &password)
                    .await
                {
                    Ok(session) => {
                        let user = session.user.clone();
                        self.emit(ApiEvent::SessionStarted(user)).await;
                    }
                    Err(e) => self.emit(ApiEvent::AuthFailed(e.to_string())).await,
                }
            }
            ApiCommand::Logout => {
                self.guard.end_session(&mut self.api);
                self.filter = TaskFilter::default();
                self.emit(ApiEvent::SessionEnded).await;
            }
            ApiCommand::Refresh { filter } => {
                self.filter = filter;
                self.refresh_tasks().await;
            }
            ApiCommand::CreateTask(draft) => match self.api.create_task(&draft).await {
                Ok(task) => {
                    tracing::debug!(id = task.id, "task created");
                    self.refresh_after_mutation().await;
                }
                Err(e) => self.fail(e).await,
            },
            ApiCommand::UpdateTask { id, patch } => match self.api.update_task(id, &patch).await {
                Ok(_) => self.refresh_after_mutation().await,
                Err(e) => self.fail(e).await,
            },
            ApiCommand::MoveTask { id, mv } => match self.api.move_task(id, mv).await {
                Ok(_) => self.refresh_after_mutation().await,
                Err(e) => self.fail(e).await,
            },
            ApiCommand::DeleteTask(id) => match self.api.delete_task(id).await {
                Ok(()) => self.refresh_after_mutation().await,
                Err(e) => self.fail(e).await,
            },
            ApiCommand::LoadComments(task_id) => match self.api.list_comments(task_id).await {
                Ok(comments) => self.emit(ApiEvent::Comments { task_id, comments }).await,
                Err(e) => self.fail(e).await,
            },
            ApiCommand::AddComment { task_id, comment } => {
                match self.api.add_comment(task_id, &comment).await {
                    Ok(_) => {
                        match self.api.list_comments(task_id).await {
                            Ok(comments) => {
                                self.emit(ApiEvent::Comments { task_id, comments }).await;
                            }
                            Err(e) => self.fail(e).await,
                        }
                        // Comment counts on cards changed too.
                        self.refresh_after_mutation().await;
                    }
                    Err(e) => self.fail(e).await,
                }
            }
            ApiCommand::LoadUsers => match self.api.list_users().await {
                Ok(users) => self.emit(ApiEvent::Users(users)).await,
                Err(e) => self.fail(e).await,
            },
            ApiCommand::LoadActivities => self.refresh_activities().await,
            ApiCommand::ExportCsv => match self.api.export_csv().await {
                Ok(bytes) => {
                    let path = self.config.download_dir.join(EXPORT_FILE_NAME);
                    match tokio::fs::write(&path, &bytes).await {
                        Ok(()) => {
                            tracing::info!(path = %path.display(), "csv export written");
                            self.emit(ApiEvent::CsvExported(path)).await;
                        }
                        Err(e) => {
                            self.emit(ApiEvent::Error(format!("export failed: {e}")))
                                .await;
                        }
                    }
                }
                Err(e) => self.fail(e).await,
            },
            ApiCommand::Shutdown => {}
        }
    }
}
