//! Activity feed panel rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::theme::Theme;
use crate::app::App;
use crate::board::activity_line;

/// Render the activity feed, newest first.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let items: Vec<ListItem> = app
        .activities
        .iter()
        .map(|activity| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", activity.created_at.format("%m-%d %H:%M")),
                    theme.dimmed(),
                ),
                Span::styled(activity_line(activity), theme.normal()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled("Activity", theme.bold()))
        .borders(Borders::ALL)
        .border_style(theme.dimmed());
    frame.render_widget(List::new(items).block(block), area);
}
