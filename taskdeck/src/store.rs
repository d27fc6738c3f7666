//! In-memory task store: a wholesale-replaced snapshot of the server's
//! task list.
//!
//! The store never merges or patches: every successful fetch replaces the
//! whole snapshot, so the contents are always server-consistent as of the
//! last refresh. The active filter lives here too, since a refresh always
//! re-applies it server-side.

use taskdeck_api::task::{Task, TaskFilter};

/// Snapshot container for the board's tasks.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: TaskFilter,
}

impl TaskStore {
    /// Creates an empty store with no filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot wholesale with a fresh server result.
    pub fn apply_snapshot(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// The current snapshot, in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id in the current snapshot.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The filter applied to refreshes.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Replaces the refresh filter. Takes effect on the next refresh; the
    /// current snapshot is left untouched (no client-side filtering).
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Empties the snapshot and resets the filter (logout).
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.filter = TaskFilter::default();
    }
}
