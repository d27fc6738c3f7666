//! Create/edit task form rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use taskdeck_api::task::{PRIORITY_HIGH, PRIORITY_LOW};

use super::{centered, theme::Theme};
use crate::app::{App, FormField};

fn priority_label(priority: i32) -> &'static str {
    if priority >= PRIORITY_HIGH {
        "high"
    } else if priority <= PRIORITY_LOW {
        "low"
    } else {
        "medium"
    }
}

fn field_line<'a>(label: &'a str, value: String, focused: bool, theme: &Theme) -> Line<'a> {
    let style = if focused {
        theme.highlighted()
    } else {
        theme.dimmed()
    };
    let cursor = if focused { "\u{2588}" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>12}: "), style),
        Span::styled(format!("{value}{cursor}"), theme.normal()),
    ])
}

/// Render the task form screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let form_area = centered(area, 60, 12);

    let title = if app.form.editing.is_some() {
        "Edit task"
    } else {
        "New task"
    };
    let block = Block::default()
        .title(Span::styled(title, theme.bold()))
        .borders(Borders::ALL)
        .border_style(theme.highlighted());
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let focus = app.form.focus;
    let mut lines = vec![
        field_line(
            "title",
            app.form.title.clone(),
            focus == FormField::Title,
            theme,
        ),
        field_line(
            "description",
            app.form.description.clone(),
            focus == FormField::Description,
            theme,
        ),
        field_line(
            "due date",
            app.form.due_date.clone(),
            focus == FormField::DueDate,
            theme,
        ),
        field_line(
            "priority",
            priority_label(app.form.priority).to_string(),
            focus == FormField::Priority,
            theme,
        ),
        Line::default(),
    ];
    if let Some(error) = &app.form.error {
        lines.push(Line::from(Span::styled(error.clone(), theme.error_text())));
    }
    lines.push(Line::from(Span::styled(
        "Enter: save  Tab: next field  Space: cycle priority  Esc: cancel",
        theme.dimmed(),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
