//! Mouse drag-and-drop for moving cards between columns.
//!
//! Every draw pass rebuilds a [`HitMap`] of card and column rectangles;
//! the [`DragController`] consumes raw press/release coordinates against
//! it. A completed drag to a different column yields exactly one
//! [`MoveRequest`]; drops on the origin column or outside the board are
//! no-ops.

use ratatui::layout::Rect;

use taskdeck_api::task::{MoveRequest, TaskStatus};

fn hit(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Screen-position index of the last rendered frame.
#[derive(Debug, Default)]
pub struct HitMap {
    cards: Vec<(i64, TaskStatus, Rect)>,
    columns: Vec<(TaskStatus, Rect, usize)>,
}

impl HitMap {
    /// Clears the map at the start of a draw pass.
    pub fn reset(&mut self) {
        self.cards.clear();
        self.columns.clear();
    }

    /// Records a card's rectangle and owning column.
    pub fn record_card(&mut self, task_id: i64, status: TaskStatus, area: Rect) {
        self.cards.push((task_id, status, area));
    }

    /// Records a column's rectangle and current card count.
    pub fn record_column(&mut self, status: TaskStatus, area: Rect, card_count: usize) {
        self.columns.push((status, area, card_count));
    }

    /// The card under the given terminal cell, if any.
    #[must_use]
    pub fn card_at(&self, column: u16, row: u16) -> Option<(i64, TaskStatus)> {
        self.cards
            .iter()
            .find(|(_, _, area)| hit(*area, column, row))
            .map(|(id, status, _)| (*id, *status))
    }

    /// The column under the given terminal cell, if any, with its card
    /// count.
    #[must_use]
    pub fn column_at(&self, column: u16, row: u16) -> Option<(TaskStatus, usize)> {
        self.columns
            .iter()
            .find(|(_, area, _)| hit(*area, column, row))
            .map(|(status, _, count)| (*status, *count))
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// The task being dragged.
    pub task_id: i64,
    /// The column the drag started in.
    pub origin: TaskStatus,
}

/// Drag state machine: press picks up a card, release drops it.
#[derive(Debug, Default)]
pub struct DragController {
    dragging: Option<DragState>,
}

impl DragController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The drag in progress, if any (used to highlight the lifted card).
    #[must_use]
    pub const fn current(&self) -> Option<&DragState> {
        self.dragging.as_ref()
    }

    /// Mouse press: picks up the card under the cursor, if any.
    pub fn press(&mut self, map: &HitMap, column: u16, row: u16) {
        self.dragging = map
            .card_at(column, row)
            .map(|(task_id, origin)| DragState { task_id, origin });
    }

    /// Mouse release: completes the drag.
    ///
    /// Returns the move to request when the drop landed on a column other
    /// than the origin. The new card is appended at the end of the target
    /// column. Any release resets the controller.
    pub fn release(&mut self, map: &HitMap, column: u16, row: u16) -> Option<(i64, MoveRequest)> {
        let drag = self.dragging.take()?;
        let (target, card_count) = map.column_at(column, row)?;
        if target == drag.origin {
            return None;
        }
        Some((
            drag.task_id,
            MoveRequest {
                status: target,
                position: card_count,
            },
        ))
    }

    /// Abandons any drag in progress (escape, screen change, refresh).
    pub fn cancel(&mut self) {
        self.dragging = None;
    }
}
