//! Task detail rendering: full task fields plus the comment thread.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::Theme;
use crate::app::App;
use crate::board::{CommentView, is_overdue, sanitize};

/// Render the task detail screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let Some(task) = app.focused_task.and_then(|id| app.store.get(id)) else {
        frame.render_widget(
            Paragraph::new(Span::styled("task no longer exists", theme.dimmed())),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    // Task header.
    let header_block = Block::default()
        .title(Span::styled(
            format!("#{} {}", task.id, sanitize(&task.title)),
            theme.bold(),
        ))
        .borders(Borders::ALL)
        .border_style(theme.column_title(task.status));
    let header_inner = header_block.inner(rows[0]);
    frame.render_widget(header_block, rows[0]);

    let today = chrono::Local::now().date_naive();
    let mut header_lines = vec![Line::from(vec![
        Span::styled("status: ", theme.dimmed()),
        Span::styled(task.status.label(), theme.column_title(task.status)),
    ])];
    if let Some(due) = task.due_date {
        let style = if is_overdue(task, today) {
            theme.overdue()
        } else {
            theme.normal()
        };
        header_lines.push(Line::from(vec![
            Span::styled("due: ", theme.dimmed()),
            Span::styled(due.to_string(), style),
        ]));
    }
    if let Some(description) = &task.description {
        header_lines.push(Line::default());
        header_lines.push(Line::from(Span::styled(
            sanitize(description),
            theme.normal(),
        )));
    }
    frame.render_widget(
        Paragraph::new(header_lines).wrap(Wrap { trim: false }),
        header_inner,
    );

    // Comment thread.
    let comments_block = Block::default()
        .title(Span::styled(
            format!("Comments ({})", app.comments.len()),
            theme.bold(),
        ))
        .borders(Borders::ALL)
        .border_style(theme.dimmed());
    let comments_inner = comments_block.inner(rows[1]);
    frame.render_widget(comments_block, rows[1]);

    let mut comment_lines = Vec::new();
    for comment in &app.comments {
        let view = CommentView::project(comment, &app.users);
        let mut head = vec![
            Span::styled(view.author, theme.highlighted()),
            Span::styled(
                format!("  {}", view.created_at.format("%Y-%m-%d %H:%M")),
                theme.dimmed(),
            ),
        ];
        if !view.mentions.is_empty() {
            head.push(Span::styled(
                format!("  \u{2192} {}", view.mentions.join(", ")),
                theme.dimmed(),
            ));
        }
        comment_lines.push(Line::from(head));
        for text_line in view.content.lines() {
            comment_lines.push(Line::from(Span::styled(
                text_line.to_string(),
                theme.normal(),
            )));
        }
        comment_lines.push(Line::default());
    }
    if comment_lines.is_empty() {
        comment_lines.push(Line::from(Span::styled("no comments yet", theme.dimmed())));
    }
    frame.render_widget(
        Paragraph::new(comment_lines).wrap(Wrap { trim: false }),
        comments_inner,
    );

    // Comment input.
    let input_block = Block::default()
        .title(Span::styled("Add comment (@name to mention)", theme.dimmed()))
        .borders(Borders::ALL)
        .border_style(theme.highlighted());
    let input_inner = input_block.inner(rows[2]);
    frame.render_widget(input_block, rows[2]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(app.comment_input.clone(), theme.normal()),
            Span::styled("\u{2588}", theme.highlighted()),
        ])),
        input_inner,
    );
}
