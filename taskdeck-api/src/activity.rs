//! Activity-feed wire type.
//!
//! The server appends an audit entry for task mutations and comments; the
//! client renders the most recent entries in a side panel and refreshes the
//! feed after update/move operations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::user::User;

/// An audit-trail entry as returned by `GET /api/activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Server-assigned identifier.
    pub id: i64,
    /// Acting user's id.
    pub user_id: i64,
    /// Expanded actor record, when the server includes it.
    #[serde(default)]
    pub user: Option<User>,
    /// Action verb (`created`, `updated`, `deleted`, `status_changed`,
    /// `commented`, ...). Free-form server vocabulary.
    pub action: String,
    /// Kind of entity acted on (`task`, `comment`, `user`).
    pub entity_type: String,
    /// Id of the entity acted on.
    #[serde(default)]
    pub entity_id: Option<i64>,
    /// Optional structured details (arbitrary JSON).
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    /// When the action happened (naive UTC).
    pub created_at: NaiveDateTime,
}

impl Activity {
    /// One-line summary for feed display: actor, verb, entity.
    #[must_use]
    pub fn summary(&self) -> String {
        let actor = self
            .user
            .as_ref()
            .map_or("someone", |u| u.username.as_str());
        match self.entity_id {
            Some(id) => format!("{actor} {} {} #{id}", self.action, self.entity_type),
            None => format!("{actor} {} {}", self.action, self.entity_type),
        }
    }
}
