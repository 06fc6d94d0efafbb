//! Guild panel: the roster, the active hero and recruitment

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::data::HeroClass;
use crate::game::{ActionError, WorldState};
use crate::ui::panel::{Panel, PanelContext, PanelSlot, panel_block};
use crate::ui::widgets::truncate_name;

pub struct GuildPanel {
    slot: PanelSlot,
    classes: Vec<HeroClass>,
    capacity: usize,
    /// Highlighted roster row
    cursor: usize,
    /// Class offered for recruitment
    class_cursor: usize,
}

impl GuildPanel {
    pub fn new(classes: Vec<HeroClass>, capacity: usize) -> Self {
        Self {
            slot: PanelSlot::new(),
            classes,
            capacity,
            cursor: 0,
            class_cursor: 0,
        }
    }

    fn class_name(&self, class_id: &str) -> String {
        self.classes
            .iter()
            .find(|class| class.id == class_id)
            .map(|class| class.name.clone())
            .unwrap_or_else(|| class_id.to_string())
    }
}

impl Panel for GuildPanel {
    fn title(&self) -> &'static str {
        "Guild"
    }

    fn slot(&self) -> &PanelSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut PanelSlot {
        &mut self.slot
    }

    fn draw(&self, frame: &mut Frame, area: Rect, state: &WorldState, focused: bool) {
        let block = panel_block(self.title(), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let mut lines = Vec::new();
        if state.guild.is_empty() {
            lines.push(Line::from(Span::styled(
                "No heroes yet. Recruit one below.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, hero) in state.guild.iter().enumerate() {
            let is_active = state.active_hero_id.as_deref() == Some(hero.id.as_str());
            let prefix = if focused && i == self.cursor { "> " } else { "  " };
            let marker = if is_active { "*" } else { " " };
            let status = match state.running_map_for(&hero.id) {
                Some(map) => format!(" [{}]", map.name),
                None => String::new(),
            };
            let style = if is_active {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{}{}", prefix, marker, truncate_name(&hero.name, 14)), style),
                Span::styled(
                    format!(" {} Lv {}{}", self.class_name(&hero.class_id), hero.level(), status),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let class = self
            .classes
            .get(self.class_cursor)
            .map(|class| class.name.as_str())
            .unwrap_or("-");
        let recruit = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Recruit: ", Style::default().fg(Color::Gray)),
                Span::styled(format!("< {} >", class), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(Span::styled(
                format!("{}/{} heroes", state.guild.len(), self.capacity),
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(recruit, chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        let roster = ctx.store.state().guild.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < roster {
                    self.cursor += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.class_cursor = self.class_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.class_cursor + 1 < self.classes.len() {
                    self.class_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(hero) = ctx.store.state().guild.get(self.cursor) {
                    let id = hero.id.clone();
                    ctx.store.select_hero(&id);
                }
            }
            KeyCode::Char('n') => {
                if let Some(class) = self.classes.get(self.class_cursor) {
                    let class_id = class.id.clone();
                    ctx.store.create_hero(&class_id)?;
                    self.cursor = ctx.store.state().guild.len().saturating_sub(1);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn help(&self) -> &'static str {
        "↑↓ hero  Enter select  ←→ class  n recruit"
    }
}
