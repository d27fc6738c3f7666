//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::Theme;
use crate::app::{App, Screen};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    // A pending notification takes the whole bar.
    if let Some(notification) = &app.notification {
        let line = Line::from(Span::styled(notification.clone(), theme.error_text()));
        frame.render_widget(Paragraph::new(line).style(theme.status_bar()), area);
        return;
    }

    let help_text = match app.screen {
        Screen::Login => "Enter: submit | Tab: next field | Ctrl-R: register | Esc: quit",
        Screen::Board if app.search_active => "type to search | Enter: apply | Esc: close",
        Screen::Board => {
            "n: new  e: edit  Enter: open  x: delete  /: search  a: activity  c: export  t: theme  L: logout  q: quit"
        }
        Screen::TaskForm => "Enter: save | Tab: next field | Esc: cancel",
        Screen::Detail => "type a comment, Enter: post | Esc: back",
        Screen::ConfirmDelete => "y: delete | n: keep",
    };

    let mode = if app.dark_mode { "dark" } else { "light" };
    let line = Line::from(vec![
        Span::styled("TaskDeck", theme.bold()),
        Span::raw(" \u{2502} "),
        Span::styled(mode, theme.dimmed()),
        Span::raw(" \u{2502} "),
        Span::styled(help_text, theme.dimmed()),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.status_bar()), area);
}
