//! UI widgets

pub mod format;
pub mod modal;
pub mod stash_grid;
pub mod tooltip;

pub use format::{format_seconds, progress_bar, truncate_name};
pub use modal::{Modal, ModalKind, centered_rect};
pub use stash_grid::{GridCursor, StashGridWidget, item_glyph};
pub use tooltip::{item_lines, rarity_color, render_tooltip};
