//! Theme and styling for the TUI, with dark and light palettes.

use ratatui::style::{Color, Modifier, Style};

use taskdeck_api::task::TaskStatus;

/// A resolved color palette plus derived styles.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Dimmed foreground (metadata, help text).
    pub fg_dim: Color,
    /// Screen background.
    pub bg: Color,
    /// Highlight color for focused elements.
    pub highlight: Color,
    /// Success indicator color.
    pub success: Color,
    /// Warning / overdue indicator color.
    pub warning: Color,
    /// Error indicator color.
    pub error: Color,
    /// Status bar background.
    pub status_bg: Color,
}

impl Theme {
    /// The default dark palette.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            fg: Color::White,
            fg_dim: Color::Gray,
            bg: Color::Black,
            highlight: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            status_bg: Color::Rgb(30, 30, 50),
        }
    }

    /// The light palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            fg: Color::Black,
            fg_dim: Color::DarkGray,
            bg: Color::White,
            highlight: Color::Blue,
            success: Color::Rgb(0, 120, 0),
            warning: Color::Rgb(180, 120, 0),
            error: Color::Rgb(180, 0, 0),
            status_bg: Color::Rgb(220, 220, 235),
        }
    }

    /// Picks the palette for the given mode.
    #[must_use]
    pub const fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    /// Normal text style.
    #[must_use]
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Dimmed text style (timestamps, metadata).
    #[must_use]
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Bold text style.
    #[must_use]
    pub fn bold(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Highlighted style (focused borders, active field).
    #[must_use]
    pub fn highlighted(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected item style (in card lists).
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Overdue marker style.
    #[must_use]
    pub fn overdue(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Error notification style.
    #[must_use]
    pub fn error_text(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Status bar background style.
    #[must_use]
    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.fg).bg(self.status_bg)
    }

    /// Title color for a status column.
    #[must_use]
    pub const fn column_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => Color::Blue,
            TaskStatus::InProgress => Color::Yellow,
            TaskStatus::Review => Color::Magenta,
            TaskStatus::Done => Color::Green,
            TaskStatus::Unknown => self.fg_dim,
        }
    }

    /// Style for a column title (bold, column color).
    #[must_use]
    pub fn column_title(&self, status: TaskStatus) -> Style {
        Style::default()
            .fg(self.column_color(status))
            .add_modifier(Modifier::BOLD)
    }
}
