//! Crafting panel: the bench, materials and the last craft

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::game::{ActionError, WorldState};
use crate::ui::drag::{DragPayload, parse_drag_payload};
use crate::ui::panel::{Panel, PanelContext, PanelSlot, panel_block};
use crate::ui::widgets::item_lines;

#[derive(Default)]
pub struct CraftingPanel {
    slot: PanelSlot,
    /// Highlighted currency row
    cursor: usize,
}

impl CraftingPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Panel for CraftingPanel {
    fn title(&self) -> &'static str {
        "Crafting"
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

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        // Bench
        let bench = &state.crafting;
        let mut bench_lines = match &bench.bench_item {
            Some(item) => item_lines(item),
            None => vec![Line::from(Span::styled(
                "Drop an item here",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        if let Some(summary) = &bench.last_craft_summary {
            bench_lines.push(Line::from(""));
            bench_lines.push(Line::from(Span::styled(
                format!("Used {} on {}", summary.material_name, summary.item_name),
                Style::default().fg(Color::Green),
            )));
        }
        let bench_block = Block::default()
            .title(" Bench ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));
        frame.render_widget(Paragraph::new(bench_lines).block(bench_block), columns[0]);

        // Materials
        let lines: Vec<Line> = state
            .currency
            .iter()
            .enumerate()
            .map(|(i, currency)| {
                let selected = bench.selected_material_id.as_deref() == Some(currency.id.as_str());
                let prefix = if focused && i == self.cursor { ">" } else { " " };
                let marker = if selected { "*" } else { " " };
                let style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if currency.amount == 0 {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(
                    format!("{}{}{:<22}{:>4}", prefix, marker, currency.name, currency.amount),
                    style,
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), columns[1]);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        let materials = ctx.store.state().currency.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < materials {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let id = ctx.store.state().currency.get(self.cursor).map(|c| c.id.clone());
                ctx.store.set_selected_crafting_material(id.as_deref());
            }
            KeyCode::Char('x') => ctx.store.set_selected_crafting_material(None),
            KeyCode::Char('c') => {
                ctx.store.craft_bench_item()?;
            }
            KeyCode::Char('r') => ctx.store.return_bench_item()?,
            KeyCode::Char('d') => {
                match ctx.drag.as_deref().and_then(parse_drag_payload) {
                    Some(DragPayload::Stash { tab_id, index, .. }) => {
                        ctx.store.place_item_in_bench_from_stash(&tab_id, index)?;
                    }
                    Some(DragPayload::Equipment { slot_id, .. }) => {
                        ctx.store.place_item_in_bench_from_equipment(slot_id)?;
                    }
                    None => {}
                }
                *ctx.drag = None;
            }
            _ => {}
        }
        Ok(())
    }

    fn help(&self) -> &'static str {
        "↑↓ material  Enter select  x clear  c craft  r return  d drop"
    }
}
