//! Kanban board rendering: four status columns, stats header, search box,
//! optional activity panel.
//!
//! Every draw pass rebuilds the app's hit map so mouse drag-and-drop can
//! resolve coordinates against the exact rectangles that were painted.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use taskdeck_api::task::TaskStatus;

use super::{activity, centered, theme::Theme};
use crate::app::App;
use crate::board::{BoardView, CardView};

/// Rows a card occupies inside a column (title plus meta line).
const CARD_HEIGHT: u16 = 2;

/// Render the board screen.
pub fn render(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let board = app.board();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_stats(frame, rows[0], &board, app, theme);
    render_search(frame, rows[1], app, theme);

    let board_area = if app.show_activity {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(rows[2]);
        activity::render(frame, halves[1], app, theme);
        halves[0]
    } else {
        rows[2]
    };

    app.hit_map.reset();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(board_area);

    for (idx, column) in board.columns.iter().enumerate() {
        let column_area = columns[idx];
        app.hit_map
            .record_column(column.status, column_area, column.count());

        let title = format!("{} ({})", column.status.label(), column.count());
        let block = Block::default()
            .title(Span::styled(title, theme.column_title(column.status)))
            .borders(Borders::ALL)
            .border_style(theme.dimmed());
        let inner = block.inner(column_area);
        frame.render_widget(block, column_area);

        render_cards(frame, inner, app, theme, idx, &column.cards, column.status);
    }
}

fn render_cards(
    frame: &mut Frame,
    inner: Rect,
    app: &mut App,
    theme: &Theme,
    column_idx: usize,
    cards: &[CardView],
    status: TaskStatus,
) {
    let mut y = inner.y;
    for (row, card) in cards.iter().enumerate() {
        if y + CARD_HEIGHT > inner.y + inner.height {
            break;
        }
        let card_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);
        app.hit_map.record_card(card.id, status, card_area);

        let selected = app.selection == (column_idx, row);
        let lifted = app.drag.current().is_some_and(|d| d.task_id == card.id);

        let title_style = if selected {
            theme.selected()
        } else if lifted {
            theme.highlighted()
        } else {
            theme.normal()
        };

        let mut title_spans = Vec::new();
        if card.high_priority {
            title_spans.push(Span::styled("! ", theme.overdue()));
        }
        title_spans.push(Span::styled(card.title.clone(), title_style));

        let mut meta_spans = vec![Span::styled(format!("#{}", card.id), theme.dimmed())];
        if let Some(assignee) = &card.assignee {
            meta_spans.push(Span::styled(format!(" @{assignee}"), theme.dimmed()));
        }
        if let Some(due) = card.due {
            let style = if card.overdue {
                theme.overdue()
            } else {
                theme.dimmed()
            };
            meta_spans.push(Span::styled(format!(" due {due}"), style));
        }
        if let Some(n) = card.comment_count.filter(|&n| n > 0) {
            meta_spans.push(Span::styled(format!(" \u{1f5e8}{n}"), theme.dimmed()));
        }

        let text = vec![Line::from(title_spans), Line::from(meta_spans)];
        frame.render_widget(Paragraph::new(text), card_area);
        y += CARD_HEIGHT + 1;
    }
}

fn render_stats(frame: &mut Frame, area: Rect, board: &BoardView, app: &App, theme: &Theme) {
    let stats = board.stats;
    let user = app
        .current_user
        .as_ref()
        .map_or_else(String::new, |u| format!(" \u{2502} {}", u.username));
    let line = Line::from(vec![
        Span::styled("TaskDeck", theme.bold()),
        Span::styled(user, theme.dimmed()),
        Span::raw("  "),
        Span::styled(format!("{} tasks", stats.total), theme.normal()),
        Span::raw(" \u{2502} "),
        Span::styled(format!("{} in progress", stats.in_progress), theme.normal()),
        Span::raw(" \u{2502} "),
        Span::styled(
            format!("{} done", stats.done),
            theme.normal().fg(theme.success),
        ),
        Span::raw(" \u{2502} "),
        Span::styled(format!("{} overdue", stats.overdue), theme.overdue()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let style = if app.search_active {
        theme.highlighted()
    } else {
        theme.dimmed()
    };
    let cursor = if app.search_active { "\u{2588}" } else { "" };
    let line = Line::from(vec![
        Span::styled("search: ", style),
        Span::styled(format!("{}{cursor}", app.search_input), theme.normal()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the delete confirmation prompt over the board.
pub fn render_delete_prompt(frame: &mut Frame, area: Rect, theme: &Theme) {
    let prompt = centered(area, 40, 5);
    frame.render_widget(Clear, prompt);
    let block = Block::default()
        .title(Span::styled("Delete task", theme.bold()))
        .borders(Borders::ALL)
        .border_style(theme.error_text());
    let inner = block.inner(prompt);
    frame.render_widget(block, prompt);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Delete this task? "),
            Span::styled("y", theme.bold()),
            Span::raw(" / "),
            Span::styled("n", theme.bold()),
        ])),
        inner,
    );
}
