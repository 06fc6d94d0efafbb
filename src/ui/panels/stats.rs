//! Stats panel: derived numbers for the active hero

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::game::{ActionError, WorldState};
use crate::progression::{attack_speed, crit_chance};
use crate::ui::panel::{Panel, PanelContext, PanelSlot, panel_block};
use crate::ui::widgets::progress_bar;

#[derive(Default)]
pub struct StatsPanel {
    slot: PanelSlot,
}

impl StatsPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

impl Panel for StatsPanel {
    fn title(&self) -> &'static str {
        "Stats"
    }

    fn slot(&self) -> &PanelSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut PanelSlot {
        &mut self.slot
    }

    fn draw(&self, frame: &mut Frame, area: Rect, state: &WorldState, focused: bool) {
        let block = panel_block(self.title(), focused);
        let Some(hero) = state.active_hero() else {
            let text = Paragraph::new(Span::styled("No hero selected", Style::default().fg(Color::DarkGray)));
            frame.render_widget(text.block(block), area);
            return;
        };

        let xp = &hero.progression;
        let percent = (xp.experience as u64 * 100 / xp.experience_to_next.max(1) as u64) as u8;
        let stats = &hero.stats;
        let lines = vec![
            Line::from(Span::styled(
                hero.name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Level {}  {}/{} xp", hero.level(), xp.experience, xp.experience_to_next),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(progress_bar(percent, 20), Style::default().fg(Color::Magenta))),
            Line::from(""),
            stat_line("Life", stats.life.to_string(), Color::Rgb(255, 100, 100)),
            stat_line("Energy Shield", stats.energy_shield.to_string(), Color::Rgb(100, 180, 255)),
            stat_line("Armour", stats.armour.to_string(), Color::Rgb(200, 200, 200)),
            stat_line("Evasion", stats.evasion.to_string(), Color::Rgb(100, 220, 120)),
            stat_line("Damage", stats.damage.to_string(), Color::Rgb(255, 180, 80)),
            stat_line("Attack Speed", format!("{:.2}/s", attack_speed(hero.level())), Color::White),
            stat_line("Crit Chance", format!("{:.1}%", crit_chance(hero.level())), Color::White),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        Ok(())
    }

    fn help(&self) -> &'static str {
        "read only"
    }
}
