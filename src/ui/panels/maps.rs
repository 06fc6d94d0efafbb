//! Maps panel: start, watch and claim map runs

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::game::{ActionError, MapStatus, WorldState};
use crate::ui::panel::{Panel, PanelContext, PanelSlot, panel_block};
use crate::ui::widgets::{format_seconds, progress_bar};

#[derive(Default)]
pub struct MapsPanel {
    slot: PanelSlot,
    cursor: usize,
}

impl MapsPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

fn status_color(status: MapStatus) -> Color {
    match status {
        MapStatus::Idle => Color::Gray,
        MapStatus::Running => Color::Cyan,
        MapStatus::Completed => Color::Green,
    }
}

impl Panel for MapsPanel {
    fn title(&self) -> &'static str {
        "Maps"
    }

    fn slot(&self) -> &PanelSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut PanelSlot {
        &mut self.slot
    }

    fn draw(&self, frame: &mut Frame, area: Rect, state: &WorldState, focused: bool) {
        let block = panel_block(self.title(), focused);
        let mut lines = Vec::new();
        for (i, map) in state.maps.iter().enumerate() {
            let prefix = if focused && i == self.cursor { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}{} (T{})", prefix, map.name, map.tier),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", map.status.name()),
                    Style::default().fg(status_color(map.status)),
                ),
            ]));

            let detail = match map.status {
                MapStatus::Idle => format!("    {}  {}", format_seconds(map.duration), map.description),
                MapStatus::Running | MapStatus::Completed => {
                    let hero = map
                        .assigned_hero_id
                        .as_deref()
                        .and_then(|id| state.hero(id))
                        .map(|hero| hero.name.as_str())
                        .unwrap_or("?");
                    format!(
                        "    {} {:>3}% {} left  {}",
                        progress_bar(map.progress, 16),
                        map.progress,
                        format_seconds(map.remaining_secs()),
                        hero
                    )
                }
            };
            lines.push(Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        let state = ctx.store.state();
        let Some(map) = state.maps.get(self.cursor) else {
            return Ok(());
        };
        let (map_id, status) = (map.id.clone(), map.status);
        let count = state.maps.len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match status {
                MapStatus::Completed => {
                    let rewards = ctx.store.complete_map(&map_id)?;
                    ctx.notices.push(format!(
                        "{} xp, {} item(s) found",
                        rewards.experience,
                        rewards.stored.len() + rewards.discarded.len()
                    ));
                    if let Some(message) = rewards.overflow_message() {
                        ctx.notices.push(message);
                    }
                }
                MapStatus::Idle => {
                    let hero_id = state.active_hero().map(|hero| hero.id.clone()).ok_or(ActionError::NoActiveHero)?;
                    ctx.store.start_map(&map_id, &hero_id)?;
                }
                MapStatus::Running => {}
            },
            KeyCode::Char('x') => ctx.store.reset_map(&map_id)?,
            _ => {}
        }
        Ok(())
    }

    fn help(&self) -> &'static str {
        "↑↓ map  Enter start/claim  x reset"
    }
}
