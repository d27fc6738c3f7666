//! Login / registration form rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{centered, theme::Theme};
use crate::app::{App, LoginField};

fn field_line<'a>(
    label: &'a str,
    value: String,
    focused: bool,
    theme: &Theme,
) -> Line<'a> {
    let style = if focused {
        theme.highlighted()
    } else {
        theme.dimmed()
    };
    let cursor = if focused { "\u{2588}" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>10}: "), style),
        Span::styled(format!("{value}{cursor}"), theme.normal()),
    ])
}

/// Render the login screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let form_area = centered(area, 48, 10);

    let title = if app.login.registering {
        "Register"
    } else {
        "Sign in"
    };
    let block = Block::default()
        .title(Span::styled(title, theme.bold()))
        .borders(Borders::ALL)
        .border_style(theme.highlighted());
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let focus = app.login.focus.unwrap_or(LoginField::Username);
    let mut lines = vec![field_line(
        "username",
        app.login.username.clone(),
        focus == LoginField::Username,
        theme,
    )];
    if app.login.registering {
        lines.push(field_line(
            "email",
            app.login.email.clone(),
            focus == LoginField::Email,
            theme,
        ));
    }
    lines.push(field_line(
        "password",
        "\u{2022}".repeat(app.login.password.chars().count()),
        focus == LoginField::Password,
        theme,
    ));
    lines.push(Line::default());
    if let Some(error) = &app.login.error {
        lines.push(Line::from(Span::styled(error.clone(), theme.error_text())));
    }
    lines.push(Line::from(Span::styled(
        "Enter: submit  Tab: next field  Ctrl-R: toggle register  Esc: quit",
        theme.dimmed(),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
