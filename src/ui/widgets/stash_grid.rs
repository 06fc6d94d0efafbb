//! Stash grid widget for ratatui
//!
//! Renders one stash tab as a grid of single-glyph cells.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::tooltip::rarity_color;
use crate::items::{Item, StashGrid};

/// Grid cursor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub x: usize,
    pub y: usize,
}

impl GridCursor {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Cell index in a grid `columns` wide
    pub fn index(&self, columns: usize) -> usize {
        self.y * columns + self.x
    }

    /// Move cursor up
    pub fn move_up(&mut self) {
        self.y = self.y.saturating_sub(1);
    }

    /// Move cursor down
    pub fn move_down(&mut self, rows: usize) {
        if self.y + 1 < rows {
            self.y += 1;
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) {
        self.x = self.x.saturating_sub(1);
    }

    /// Move cursor right
    pub fn move_right(&mut self, columns: usize) {
        if self.x + 1 < columns {
            self.x += 1;
        }
    }
}

/// Glyph shown for an item: first letter of its base
pub fn item_glyph(item: &Item) -> char {
    item.base_label.chars().next().unwrap_or('?')
}

/// Widget for rendering a stash tab
pub struct StashGridWidget<'a> {
    grid: &'a StashGrid,
    cursor: Option<GridCursor>,
    title: &'a str,
}

impl<'a> StashGridWidget<'a> {
    pub fn new(grid: &'a StashGrid) -> Self {
        Self {
            grid,
            cursor: None,
            title: "Stash",
        }
    }

    pub fn cursor(mut self, cursor: GridCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Get the cell character and style for a given position
    fn cell_style(&self, x: usize, y: usize) -> (char, Style) {
        let is_cursor = self.cursor == Some(GridCursor::new(x, y));
        let index = y * self.grid.columns() + x;

        match self.grid.get(index) {
            Some(item) => {
                let mut style = Style::default().fg(rarity_color(item.rarity));
                if is_cursor {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                (item_glyph(item), style)
            }
            None => {
                let mut style = Style::default().fg(Color::Rgb(60, 60, 70));
                if is_cursor {
                    style = style.bg(Color::Rgb(40, 40, 50)).fg(Color::White);
                }
                ('·', style)
            }
        }
    }
}

impl<'a> Widget for StashGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));

        let inner = block.inner(area);
        block.render(area, buf);

        for y in 0..self.grid.rows() {
            for x in 0..self.grid.columns() {
                let (glyph, style) = self.cell_style(x, y);

                // Each cell is 2 characters wide for better visibility
                let cell_x = inner.x as usize + x * 2;
                let cell_y = inner.y as usize + y;
                if cell_x + 1 >= (inner.x + inner.width) as usize || cell_y >= (inner.y + inner.height) as usize {
                    continue;
                }
                let (cell_x, cell_y) = (cell_x as u16, cell_y as u16);
                if let Some(cell) = buf.cell_mut((cell_x, cell_y)) {
                    cell.set_char(glyph).set_style(style);
                }
                if let Some(cell) = buf.cell_mut((cell_x + 1, cell_y)) {
                    cell.set_char(' ').set_style(style);
                }
            }
        }
    }
}
