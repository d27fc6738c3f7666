//! Comment wire types and best-effort mention parsing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::user::User;

/// A comment as returned by `GET /api/tasks/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Server-assigned identifier.
    pub id: i64,
    /// Parent task.
    pub task_id: i64,
    /// Author id.
    #[serde(default)]
    pub author_id: Option<i64>,
    /// Expanded author record, when the server includes it.
    #[serde(default)]
    pub author: Option<User>,
    /// Comment body.
    pub content: String,
    /// Mentioned-user ids, serialized by the server as a list literal
    /// (e.g. `"[1, 2]"`). `None` when the comment mentions nobody.
    #[serde(default)]
    pub mentions: Option<String>,
    /// Creation timestamp (naive UTC).
    pub created_at: NaiveDateTime,
    /// Last-modified timestamp (naive UTC).
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Comment {
    /// Parses the `mentions` field into user ids, best-effort.
    ///
    /// A missing or malformed mention list yields `None`; the comment is
    /// then rendered without mention highlighting. This degradation is
    /// deliberate and silent.
    #[must_use]
    pub fn mentioned_ids(&self) -> Option<Vec<i64>> {
        parse_mentions(self.mentions.as_deref()?)
    }
}

/// Parses a server mention list (`"[1, 2]"`) into user ids.
///
/// Returns `None` for anything that is not a well-formed list of integers.
#[must_use]
pub fn parse_mentions(raw: &str) -> Option<Vec<i64>> {
    serde_json::from_str(raw).ok()
}

/// Request body for `POST /api/tasks/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Display name of the commenting user.
    pub author: String,
    /// Comment body; `@username` tokens become mentions server-side.
    pub content: String,
}
