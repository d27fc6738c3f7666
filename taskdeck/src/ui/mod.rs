//! Terminal UI rendering.
//!
//! Pure rendering over the [`App`] state: `draw` dispatches on the
//! current screen and paints from the projected view models. The only
//! mutation is rebuilding the board's hit map, which drag-and-drop needs
//! to resolve mouse coordinates on the next event.

pub mod activity;
pub mod board;
pub mod detail;
pub mod form;
pub mod login;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::{App, Screen};
use theme::Theme;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = Theme::for_mode(app.dark_mode);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_area = main_chunks[0];
    let status_area = main_chunks[1];

    match app.screen {
        Screen::Login => login::render(frame, content_area, app, &theme),
        Screen::Board => board::render(frame, content_area, app, &theme),
        Screen::TaskForm => form::render(frame, content_area, app, &theme),
        Screen::Detail => detail::render(frame, content_area, app, &theme),
        Screen::ConfirmDelete => {
            board::render(frame, content_area, app, &theme);
            board::render_delete_prompt(frame, content_area, &theme);
        }
    }

    status_bar::render(frame, status_area, app, &theme);
}

/// A centered rect of the given size, clamped to `area`.
#[must_use]
pub(crate) fn centered(
    area: ratatui::layout::Rect,
    width: u16,
    height: u16,
) -> ratatui::layout::Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    ratatui::layout::Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
