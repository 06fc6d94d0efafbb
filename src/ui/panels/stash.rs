//! Stash panel: tabs, the item grid and drag-and-drop

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::game::{ActionError, WorldState};
use crate::items::{EquipSlot, StashTab};
use crate::ui::drag::{DragPayload, parse_drag_payload};
use crate::ui::panel::{Panel, PanelContext, PanelSlot, panel_block};
use crate::ui::widgets::{GridCursor, StashGridWidget, item_lines, truncate_name};

#[derive(Default)]
pub struct StashPanel {
    slot: PanelSlot,
    cursor: GridCursor,
    /// Tab name being typed, while renaming
    rename: Option<String>,
}

impl StashPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> GridCursor {
        self.cursor
    }

    fn active_tab<'a>(&self, state: &'a WorldState) -> Option<&'a StashTab> {
        state.stash.active_tab()
    }

    /// Show the tab `offset` positions away from the active one
    fn cycle_tab(&self, ctx: &mut PanelContext<'_>, offset: isize) {
        let stash = &ctx.store.state().stash;
        let count = stash.tabs.len() as isize;
        if count == 0 {
            return;
        }
        let current = stash
            .tabs
            .iter()
            .position(|tab| tab.id == stash.active_tab_id)
            .unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(count) as usize;
        let id = stash.tabs[next].id.clone();
        ctx.store.set_active_stash_tab(&id);
    }

    fn handle_rename(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        let Some(buffer) = self.rename.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => self.rename = None,
            KeyCode::Enter => {
                let name = self.rename.take().unwrap_or_default();
                let tab_id = ctx.store.state().stash.active_tab_id.clone();
                ctx.store.rename_stash_tab(&tab_id, &name)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Drop the carried item onto the cursor cell
    fn drop_here(&mut self, tab_id: &str, index: usize, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        let Some(payload) = ctx.drag.as_deref().and_then(parse_drag_payload) else {
            *ctx.drag = None;
            return Ok(());
        };
        match payload {
            DragPayload::Stash { tab_id: from_tab, index: from, .. } => {
                if from_tab != tab_id {
                    ctx.notices.push("Items can only be moved within one tab".to_string());
                    return Ok(());
                }
                ctx.store.move_stash_item(tab_id, from, index)?;
            }
            DragPayload::Equipment { slot_id, .. } => {
                ctx.store.unequip_item_to_stash(slot_id)?;
            }
        }
        *ctx.drag = None;
        Ok(())
    }
}

impl Panel for StashPanel {
    fn title(&self) -> &'static str {
        "Stash"
    }

    fn slot(&self) -> &PanelSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut PanelSlot {
        &mut self.slot
    }

    fn captures_input(&self) -> bool {
        self.rename.is_some()
    }

    fn draw(&self, frame: &mut Frame, area: Rect, state: &WorldState, focused: bool) {
        let block = panel_block(self.title(), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(tab) = self.active_tab(state) else {
            frame.render_widget(Paragraph::new("No stash tab selected"), inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(tab.grid.rows() as u16 + 2),
                Constraint::Min(0),
            ])
            .split(inner);

        // Tab strip, or the rename prompt
        let header = match &self.rename {
            Some(buffer) => Line::from(vec![
                Span::styled("Rename: ", Style::default().fg(Color::Gray)),
                Span::styled(format!("{}_", buffer), Style::default().fg(Color::Yellow)),
            ]),
            None => Line::from(
                state
                    .stash
                    .tabs
                    .iter()
                    .map(|t| {
                        let style = if t.id == tab.id {
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::DarkGray)
                        };
                        Span::styled(format!("{} ", truncate_name(&t.name, 8)), style)
                    })
                    .collect::<Vec<_>>(),
            ),
        };
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let title = format!(" {} ({}/{}) ", tab.name, tab.grid.count(), tab.grid.len());
        let mut widget = StashGridWidget::new(&tab.grid).title(&title);
        if focused {
            widget = widget.cursor(self.cursor);
        }
        frame.render_widget(widget, chunks[1]);

        if let Some(item) = tab.grid.get(self.cursor.index(tab.grid.columns())) {
            frame.render_widget(Paragraph::new(item_lines(item)), chunks[2]);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError> {
        if self.rename.is_some() {
            return self.handle_rename(key, ctx);
        }

        let state = ctx.store.state();
        let tab_id = state.stash.active_tab_id.clone();
        let (columns, rows) = state
            .stash
            .active_tab()
            .map(|tab| (tab.grid.columns(), tab.grid.rows()))
            .unwrap_or((0, 0));
        let index = self.cursor.index(columns);
        let item = state.stash.active_tab().and_then(|tab| tab.grid.get(index)).cloned();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.move_down(rows),
            KeyCode::Left | KeyCode::Char('h') => self.cursor.move_left(),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.move_right(columns),
            KeyCode::Char('[') => self.cycle_tab(ctx, -1),
            KeyCode::Char(']') => self.cycle_tab(ctx, 1),
            KeyCode::Char('r') => {
                self.rename = Some(String::new());
            }
            KeyCode::Char('p') => {
                if let Some(item) = item {
                    let payload = DragPayload::Stash {
                        tab_id,
                        index,
                        item_type: item.item_type.clone(),
                    };
                    *ctx.drag = Some(payload.to_json());
                }
            }
            KeyCode::Char('d') => self.drop_here(&tab_id, index, ctx)?,
            KeyCode::Char('b') => {
                if item.is_some() {
                    ctx.store.place_item_in_bench_from_stash(&tab_id, index)?;
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let Some(item) = item else {
                    return Ok(());
                };
                // Prefer a free slot the item fits, else report the first one
                let equipment = ctx.store.state().active_hero().map(|hero| &hero.equipment);
                let slot = item
                    .allowed_slots
                    .iter()
                    .copied()
                    .find(|slot| equipment.is_some_and(|eq| eq.is_empty(*slot)))
                    .or_else(|| item.allowed_slots.first().copied())
                    .unwrap_or(EquipSlot::MainHand);
                ctx.store.equip_item_from_stash(&tab_id, index, slot)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn help(&self) -> &'static str {
        "arrows move  [ ] tab  p pick up  d drop  e equip  b bench  r rename"
    }
}
