//! User Interface module
//!
//! Terminal UI using ratatui. Panels subscribe to the store and render its
//! snapshots; they change the world only through store actions.

pub mod app;
pub mod drag;
pub mod panel;
pub mod panels;
pub mod widgets;

pub use app::App;
pub use drag::{DragPayload, parse_drag_payload};
pub use panel::{Panel, PanelContext, PanelSlot};
