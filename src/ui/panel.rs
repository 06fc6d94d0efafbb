//! Panel plumbing
//!
//! A panel renders the latest snapshot it received from the store and turns
//! keys into store actions. It never writes world state itself.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::game::{ActionError, Store, Subscription, WorldState};

/// Owns one store subscription and the snapshot it last delivered
#[derive(Debug, Default)]
pub struct PanelSlot {
    latest: Rc<RefCell<Option<Rc<WorldState>>>>,
    updates: Rc<Cell<u64>>,
    subscription: Option<Subscription>,
}

impl PanelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the store. Does nothing while already mounted.
    pub fn mount(&mut self, store: &Store) {
        if self.subscription.is_some() {
            return;
        }
        let latest = Rc::clone(&self.latest);
        let updates = Rc::clone(&self.updates);
        self.subscription = Some(store.subscribe(move |state| {
            *latest.borrow_mut() = Some(state);
            updates.set(updates.get() + 1);
        }));
    }

    /// Drop the subscription and the held snapshot
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        *self.latest.borrow_mut() = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// The snapshot to render from, if mounted
    pub fn snapshot(&self) -> Option<Rc<WorldState>> {
        self.latest.borrow().clone()
    }

    /// Snapshots received so far
    pub fn updates(&self) -> u64 {
        self.updates.get()
    }
}

/// Shared state a panel may touch while handling a key
pub struct PanelContext<'a> {
    pub store: &'a mut Store,
    /// JSON drag payload of the item being carried, if any
    pub drag: &'a mut Option<String>,
    /// Messages to show the player once the key is handled
    pub notices: &'a mut Vec<String>,
}

pub trait Panel {
    fn title(&self) -> &'static str;

    fn slot(&self) -> &PanelSlot;

    fn slot_mut(&mut self) -> &mut PanelSlot;

    fn mount(&mut self, store: &Store) {
        self.slot_mut().mount(store);
    }

    fn unmount(&mut self) {
        self.slot_mut().unmount();
    }

    /// Draw from `state`, rebuilding every widget
    fn draw(&self, frame: &mut Frame, area: Rect, state: &WorldState, focused: bool);

    /// Render the latest snapshot, or a placeholder while unmounted
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        match self.slot().snapshot() {
            Some(state) => self.draw(frame, area, &state, focused),
            None => {
                let block = panel_block(self.title(), focused);
                frame.render_widget(Paragraph::new("Not mounted").block(block), area);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PanelContext<'_>) -> Result<(), ActionError>;

    /// Whether the panel wants every key, global shortcuts included
    fn captures_input(&self) -> bool {
        false
    }

    /// One-line key help shown while focused
    fn help(&self) -> &'static str;
}

/// Bordered block for a panel, highlighted when focused
pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let color = if focused {
        Color::Yellow
    } else {
        Color::Rgb(100, 100, 120)
    };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}
