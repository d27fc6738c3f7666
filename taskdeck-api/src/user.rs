//! User wire type and the client-side lookup table.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A user as returned by `GET /api/users` and embedded in tasks, comments,
/// and activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: i64,
    /// Unique login name, used for assignee selection and author display.
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Account creation timestamp (naive UTC).
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Client-side user lookup table, refreshed on login.
///
/// Resolves assignee and author ids to display names without a round trip.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    by_id: HashMap<i64, User>,
}

impl UserDirectory {
    /// Replaces the directory contents with a fresh user list.
    pub fn replace(&mut self, users: Vec<User>) {
        self.by_id = users.into_iter().map(|u| (u.id, u)).collect();
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&User> {
        self.by_id.get(&id)
    }

    /// Returns the username for an id, if known.
    #[must_use]
    pub fn username(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(|u| u.username.as_str())
    }

    /// All users, sorted by username for stable menus.
    #[must_use]
    pub fn sorted(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.by_id.values().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    /// Number of known users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` when no users are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Empties the directory (logout).
    pub fn clear(&mut self) {
        self.by_id.clear();
    }
}
