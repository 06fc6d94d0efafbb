//! Item tooltips

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::items::{Item, Rarity};

/// Get the color for an item rarity
pub fn rarity_color(rarity: Rarity) -> Color {
    let (r, g, b) = rarity.color();
    Color::Rgb(r, g, b)
}

/// Styled tooltip lines: name in rarity color, base and slots, then stats
pub fn item_lines(item: &Item) -> Vec<Line<'static>> {
    let name_style = Style::default()
        .fg(rarity_color(item.rarity))
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(item.name.clone(), name_style)),
        Line::from(Span::styled(
            format!("{} {}", item.rarity.name(), item.base_label),
            Style::default().fg(Color::Gray),
        )),
    ];

    let slots: Vec<&str> = item.allowed_slots.iter().map(|slot| slot.name()).collect();
    let mut kind = slots.join(" / ");
    if item.is_two_handed() {
        kind.push_str(" (two-handed)");
    }
    lines.push(Line::from(Span::styled(kind, Style::default().fg(Color::DarkGray))));

    if !item.stats.is_empty() {
        lines.push(Line::from(""));
        for stat in &item.stats {
            lines.push(Line::from(Span::styled(
                stat.clone(),
                Style::default().fg(Color::Rgb(100, 180, 255)),
            )));
        }
    }
    lines
}

/// Render item details in a bordered box
pub fn render_tooltip(frame: &mut Frame, area: Rect, item: &Item) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Item ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rarity_color(item.rarity)));
    let text = Paragraph::new(item_lines(item))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}
