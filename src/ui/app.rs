//! Main UI Application
//!
//! Lays the six panels out, routes keys to the focused one and surfaces
//! rejected actions and notices as modals.

use std::collections::VecDeque;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use super::drag::parse_drag_payload;
use super::panel::{Panel, PanelContext};
use super::panels::{CraftingPanel, EquipmentPanel, GuildPanel, MapsPanel, StashPanel, StatsPanel};
use super::widgets::Modal;
use crate::game::Store;

/// Panel order, also the number keys that focus them
pub const PANEL_GUILD: usize = 0;
pub const PANEL_STASH: usize = 1;
pub const PANEL_EQUIPMENT: usize = 2;
pub const PANEL_CRAFTING: usize = 3;
pub const PANEL_MAPS: usize = 4;
pub const PANEL_STATS: usize = 5;

/// Main UI application
pub struct App {
    panels: Vec<Box<dyn Panel>>,
    /// Index of the focused panel
    focus: usize,
    /// Pending popups, front first
    modals: VecDeque<Modal>,
    /// JSON drag payload of the carried item
    drag: Option<String>,
}

impl App {
    /// Build every panel and mount it on the store
    pub fn new(store: &Store) -> Self {
        let mut panels: Vec<Box<dyn Panel>> = vec![
            Box::new(GuildPanel::new(
                store.content().classes.clone(),
                store.config().guild_capacity,
            )),
            Box::new(StashPanel::new()),
            Box::new(EquipmentPanel::new()),
            Box::new(CraftingPanel::new()),
            Box::new(MapsPanel::new()),
            Box::new(StatsPanel::new()),
        ];
        for panel in panels.iter_mut() {
            panel.mount(store);
        }
        log::info!("Mounted {} panels", panels.len());

        Self {
            panels,
            focus: PANEL_GUILD,
            modals: VecDeque::new(),
            drag: None,
        }
    }

    /// Release every panel's subscription
    pub fn unmount_all(&mut self) {
        for panel in self.panels.iter_mut() {
            panel.unmount();
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.panels.len() {
            self.focus = index;
        }
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modals.front()
    }

    pub fn drag(&self) -> Option<&str> {
        self.drag.as_deref()
    }

    /// Queue a notice for the player
    pub fn notify(&mut self, title: &str, message: impl Into<String>) {
        self.modals.push_back(Modal::info(title, message));
    }

    /// Handle a key press. Returns true when the player wants to quit.
    pub fn handle_input(&mut self, key: KeyEvent, store: &mut Store) -> Result<bool> {
        // Global quit shortcut
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        // Any key closes the front popup
        if self.modals.pop_front().is_some() {
            return Ok(false);
        }

        if !self.panels[self.focus].captures_input() {
            match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Tab => {
                    self.focus = (self.focus + 1) % self.panels.len();
                    return Ok(false);
                }
                KeyCode::BackTab => {
                    self.focus = (self.focus + self.panels.len() - 1) % self.panels.len();
                    return Ok(false);
                }
                KeyCode::Char(c @ '1'..='6') => {
                    self.set_focus(c as usize - '1' as usize);
                    return Ok(false);
                }
                KeyCode::Esc if self.drag.is_some() => {
                    self.drag = None;
                    return Ok(false);
                }
                _ => {}
            }
        }

        let mut notices = Vec::new();
        let mut ctx = PanelContext {
            store,
            drag: &mut self.drag,
            notices: &mut notices,
        };
        if let Err(e) = self.panels[self.focus].handle_key(key, &mut ctx) {
            log::warn!("{} action rejected: {}", self.panels[self.focus].title(), e);
            self.modals.push_back(Modal::error(e.to_string()));
        }
        for notice in notices {
            self.notify("Notice", notice);
        }
        Ok(false)
    }

    /// Render every panel from its latest snapshot
    pub fn render(&self, frame: &mut Frame) {
        // Clear the entire screen first to prevent artifacts
        frame.render_widget(Clear, frame.area());

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer[0]);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Percentage(25),
            ])
            .split(rows[1]);

        let areas: [Rect; 6] = [top[0], top[1], top[2], bottom[0], bottom[1], bottom[2]];
        for (i, (panel, area)) in self.panels.iter().zip(areas).enumerate() {
            panel.render(frame, area, i == self.focus);
        }

        self.render_status(frame, outer[1]);

        if let Some(modal) = self.modals.front() {
            modal.render(frame);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.panels[self.focus].help()),
            Style::default().fg(Color::DarkGray),
        )];
        if let Some(payload) = self.drag.as_deref().and_then(parse_drag_payload) {
            spans.push(Span::styled(
                format!(" Carrying {} (Esc to cancel)", payload.describe()),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            "  Tab/1-6 focus  q quit",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
