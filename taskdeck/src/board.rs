//! Board projection: the pure view-model layer between the task snapshot
//! and the terminal renderer.
//!
//! `BoardView::project` is a pure function of the snapshot (plus "now"),
//! idempotent and safe to call on every frame. All user-supplied text
//! crosses the [`sanitize`] boundary here, so the rendering adapter never
//! sees raw content. Tasks with an unrecognized status are dropped from
//! every column and every count.

use chrono::{NaiveDate, NaiveDateTime};

use taskdeck_api::activity::Activity;
use taskdeck_api::comment::Comment;
use taskdeck_api::task::{PRIORITY_HIGH, Task, TaskStatus};
use taskdeck_api::user::UserDirectory;

/// Strips terminal control characters from user-supplied text.
///
/// ESC and the other C0/C1 controls are the terminal's script-injection
/// vector: content containing them could repaint the screen or fake UI
/// elements. Newlines survive (comment bodies are multi-line); everything
/// else renders literally.
#[must_use]
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

/// Single overdue predicate, shared by card markers and the aggregate
/// stat: due date strictly before today and status not done.
#[must_use]
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.status != TaskStatus::Done && task.due_date.is_some_and(|due| due < today)
}

/// A task card ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Task id, used for hit-testing and detail lookup.
    pub id: i64,
    /// Sanitized title.
    pub title: String,
    /// Sanitized assignee name, when assigned.
    pub assignee: Option<String>,
    /// Due date, when set.
    pub due: Option<NaiveDate>,
    /// Whether the card is overdue (same predicate as the stats).
    pub overdue: bool,
    /// Whether the task carries the high-priority marker.
    pub high_priority: bool,
    /// Comment count, when the server reports one.
    pub comment_count: Option<u32>,
}

/// One of the four status columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    /// The column's status.
    pub status: TaskStatus,
    /// Cards in server order.
    pub cards: Vec<CardView>,
}

impl ColumnView {
    /// Per-column card count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// Aggregate statistics over the renderable snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardStats {
    /// All tasks in the four columns.
    pub total: usize,
    /// Tasks with status done.
    pub done: usize,
    /// Tasks with status in-progress.
    pub in_progress: usize,
    /// Tasks past their due date and not done.
    pub overdue: usize,
}

/// The projected board: four columns plus aggregate stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Columns in display order (todo, in-progress, review, done).
    pub columns: [ColumnView; 4],
    /// Aggregate statistics.
    pub stats: BoardStats,
}

impl BoardView {
    /// Projects a task snapshot into the board view model.
    ///
    /// Pure and idempotent: the same snapshot and date always produce the
    /// same view. Tasks with [`TaskStatus::Unknown`] are excluded from
    /// both display and counts.
    #[must_use]
    pub fn project(tasks: &[Task], today: NaiveDate, users: &UserDirectory) -> Self {
        let mut columns = TaskStatus::COLUMNS.map(|status| ColumnView {
            status,
            cards: Vec::new(),
        });
        let mut stats = BoardStats::default();

        for task in tasks {
            let Some(column) = columns.iter_mut().find(|c| c.status == task.status) else {
                // Unrecognized status: silently dropped from view and counts.
                continue;
            };

            stats.total += 1;
            match task.status {
                TaskStatus::Done => stats.done += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                _ => {}
            }
            let overdue = is_overdue(task, today);
            if overdue {
                stats.overdue += 1;
            }

            let assignee = task
                .assignee
                .as_ref()
                .map(|u| u.username.clone())
                .or_else(|| {
                    task.assignee_id
                        .and_then(|id| users.username(id).map(str::to_string))
                })
                .map(|name| sanitize(&name));

            column.cards.push(CardView {
                id: task.id,
                title: sanitize(&task.title),
                assignee,
                due: task.due_date,
                overdue,
                high_priority: task.priority >= PRIORITY_HIGH,
                comment_count: task.comment_count,
            });
        }

        Self { columns, stats }
    }

    /// The column holding the given status, if it is one of the four.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.status == status)
    }
}

/// A comment ready for rendering in the task detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    /// Sanitized author name.
    pub author: String,
    /// Sanitized body.
    pub content: String,
    /// Resolved mentioned usernames; empty when the mention list is
    /// missing or malformed (best-effort, silent).
    pub mentions: Vec<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

impl CommentView {
    /// Projects one server comment for display.
    #[must_use]
    pub fn project(comment: &Comment, users: &UserDirectory) -> Self {
        let author = comment
            .author
            .as_ref()
            .map(|u| u.username.clone())
            .or_else(|| {
                comment
                    .author_id
                    .and_then(|id| users.username(id).map(str::to_string))
            })
            .unwrap_or_else(|| "unknown".to_string());

        let mentions = comment
            .mentioned_ids()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| users.username(id).map(|name| sanitize(name)))
            .collect();

        Self {
            author: sanitize(&author),
            content: sanitize(&comment.content),
            mentions,
            created_at: comment.created_at,
        }
    }
}

/// One line of the activity feed, sanitized for display.
#[must_use]
pub fn activity_line(activity: &Activity) -> String {
    sanitize(&activity.summary())
}
