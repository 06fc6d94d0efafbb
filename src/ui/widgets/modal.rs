//! Modal popups
//!
//! Shows rejected actions and notices on top of the panels until a key is
//! pressed.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// How a modal is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Info,
    Error,
}

/// A dismissable message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
}

impl Modal {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Error,
            title: "Cannot do that".to_string(),
            message: message.into(),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);

        let color = match self.kind {
            ModalKind::Info => Color::Yellow,
            ModalKind::Error => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(color));

        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(self.message.clone(), Style::default().fg(Color::White))),
            Line::from(""),
            Line::from(Span::styled("[any key] Close", Style::default().fg(Color::DarkGray))),
        ])
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(text, area);
    }
}

/// A rectangle centred in `r`, sized in percent
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
