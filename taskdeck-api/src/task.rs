//! Task wire types: the board's central record plus the request bodies
//! for the task endpoints.
//!
//! Field shapes match the backend JSON exactly: integer ids, integer
//! priority ordinals, naive ISO-8601 datetimes (the server emits no UTC
//! offset), and `due_date` as a plain calendar date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// Priority ordinal for a low-priority task.
pub const PRIORITY_LOW: i32 = 0;
/// Priority ordinal for a medium-priority task (server default).
pub const PRIORITY_MEDIUM: i32 = 1;
/// Priority ordinal for a high-priority task.
pub const PRIORITY_HIGH: i32 = 2;

/// Status of a task, i.e. which board column it lives in.
///
/// The server owns the status vocabulary. A value outside the four known
/// columns deserializes to [`TaskStatus::Unknown`] rather than failing the
/// whole fetch; the board projection drops such tasks from display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Actively being worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Completed.
    Done,
    /// Any status string the client does not recognize.
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// The four renderable board columns, in display order.
    pub const COLUMNS: [Self; 4] = [Self::Todo, Self::InProgress, Self::Review, Self::Done];

    /// Returns `true` for the four fixed column statuses.
    #[must_use]
    pub const fn is_column(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Human-readable column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Review => write!(f, "review"),
            Self::Done => write!(f, "done"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A task as returned by the server.
///
/// The client holds these as a transient snapshot; the server copy is
/// always authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: i64,
    /// Non-empty title.
    pub title: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Board column.
    pub status: TaskStatus,
    /// Priority ordinal (0 low, 1 medium, 2 high).
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Optional due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Id of the user who created the task.
    #[serde(default)]
    pub author_id: Option<i64>,
    /// Expanded author record, when the server includes it.
    #[serde(default)]
    pub author: Option<User>,
    /// Id of the assigned user, if any.
    #[serde(default)]
    pub assignee_id: Option<i64>,
    /// Expanded assignee record, when the server includes it.
    #[serde(default)]
    pub assignee: Option<User>,
    /// Creation timestamp (naive UTC).
    pub created_at: NaiveDateTime,
    /// Last-modified timestamp (naive UTC).
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    /// Number of comments on the task, when the server includes it.
    #[serde(default)]
    pub comment_count: Option<u32>,
}

const fn default_priority() -> i32 {
    PRIORITY_MEDIUM
}

/// Request body for `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title (must be non-empty; the server rejects blank titles).
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial column (server defaults to `todo` when omitted).
    pub status: TaskStatus,
    /// Priority ordinal.
    pub priority: i32,
    /// Optional due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Optional assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
}

impl TaskDraft {
    /// Creates a draft with the given title in the `todo` column at
    /// medium priority.
    #[must_use]
    pub const fn new(title: String) -> Self {
        Self {
            title,
            description: None,
            status: TaskStatus::Todo,
            priority: PRIORITY_MEDIUM,
            due_date: None,
            assignee_id: None,
        }
    }
}

/// Request body for `PUT /api/tasks/{id}`.
///
/// Every field is optional; the server only touches the fields present in
/// the body, so an empty patch is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority ordinal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// New due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// New assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
}

/// Request body for `POST /api/tasks/{id}/move` (kanban drag-drop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Target column.
    pub status: TaskStatus,
    /// Position within the target column (append semantics server-side).
    pub position: usize,
}

/// Server-side filter for `GET /api/tasks`.
///
/// All criteria are optional and combined with logical AND by the server;
/// the client passes them through as query parameters and performs no
/// local filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Column equality filter.
    pub status: Option<TaskStatus>,
    /// Priority equality filter.
    pub priority: Option<i32>,
    /// Free-text search against title/description.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Returns `true` when no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.search.is_none()
    }

    /// Renders the filter as query parameters (`status`, `priority`, `q`).
    ///
    /// Unset criteria produce no parameter; a blank search string is
    /// treated as unset so clearing the search box clears the filter.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.to_string()));
        }
        if let Some(q) = self.search.as_deref()
            && !q.trim().is_empty()
        {
            params.push(("q", q.to_string()));
        }
        params
    }
}
