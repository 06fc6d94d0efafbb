//! Equipment panel: the active hero's slots

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::game::{ActionError, WorldState};
use crate::items::EquipSlot;
use crate::ui::drag::{DragPayload, parse_drag_payload};
use crate::ui::panel::{Panel, PanelContext, PanelSlot, panel_block};
use crate::ui::widgets::{item_lines, rarity_color, truncate_name};

#[derive(Default)]
pub struct EquipmentPanel {
    slot: PanelSlot,
    /// Index into [`EquipSlot::all`]
    cursor: usize,
}

impl EquipmentPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_slot(&self) -> EquipSlot {
        EquipSlot::all()[self.cursor.min(EquipSlot::all().len() - 1)]
    }
}

impl Panel for EquipmentPanel {
    fn title(&self) -> &'static str {
        "Equipment"
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

        let Some(hero) = state.active_hero() else {
            frame.render_widget(
                Paragraph::new(Span::styled("No hero selected", Style::default().fg(Color::DarkGray))),
                inner,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(EquipSlot::all().len() as u16), Constraint::Min(0)])
            .split(inner);

        let lines: Vec<Line> = hero
            .equipment
            .iter_slots()
            .enumerate()
            .map(|(i, (slot, item))| {
                let prefix = if focused && i == self.cursor { "> " } else { "  " };
                let label = Span::styled(
                    format!("{}{:<12}", prefix, slot.name()),
                    Style::default().fg(Color::Gray),
                );
                let content = match item {
                    Some(item) => Span::styled(
                        truncate_name(&item.name, 24),
                        Style::default().fg(rarity_color(item.rarity)).add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled("-", Style::default().fg(Color::DarkGray)),
                };
                Line::from(vec![label, content])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        if let Some(item) = hero.equipment.get(self.selected_slot()) {
            frame.render_widget(Paragraph::new(item_lines(item)), chunks[1]);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        let slot = self.selected_slot();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < EquipSlot::all().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('u') => ctx.store.unequip_item_to_stash(slot)?,
            KeyCode::Char('b') => ctx.store.place_item_in_bench_from_equipment(slot)?,
            KeyCode::Char('p') => {
                let item_type = ctx
                    .store
                    .state()
                    .active_hero()
                    .and_then(|hero| hero.equipment.get(slot))
                    .map(|item| item.item_type.clone());
                if let Some(item_type) = item_type {
                    *ctx.drag = Some(DragPayload::Equipment { slot_id: slot, item_type }.to_json());
                }
            }
            KeyCode::Char('d') => {
                match ctx.drag.as_deref().and_then(parse_drag_payload) {
                    Some(DragPayload::Stash { tab_id, index, .. }) => {
                        ctx.store.equip_item_from_stash(&tab_id, index, slot)?;
                    }
                    Some(DragPayload::Equipment { .. }) => {
                        ctx.notices.push("Unequip the item before moving it to another slot".to_string());
                        return Ok(());
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
        "↑↓ slot  u unequip  b bench  p pick up  d drop"
    }
}
