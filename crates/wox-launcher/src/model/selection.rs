//! Cursor bookkeeping over the accumulated results.

use wox_core::{Preview, ResultItem};

use super::window::{Window, WindowedView};

/// Direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Map a wheel delta to a direction. Positive scrolls down.
    pub fn from_wheel(delta_y: f32) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Direction::Down)
        } else if delta_y < 0.0 {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

/// Owns the cursor and the window derived from it.
///
/// The cursor is an absolute index into the result set. Keyboard and wheel
/// moves re-derive the window; hovering only moves the active row inside
/// the window that is already on screen.
#[derive(Debug, Default)]
pub struct SelectionController {
    cursor: usize,
    window: Window,
    view: WindowedView,
}

impl SelectionController {
    pub fn new(view: WindowedView) -> Self {
        Self {
            cursor: 0,
            window: Window::empty(),
            view,
        }
    }

    /// Cursor position in the full result set.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The window currently on screen.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Cursor back to the top of a fresh result set.
    pub fn reset(&mut self, len: usize) {
        self.cursor = 0;
        self.window = self.view.derive(len, 0);
    }

    /// Move one row up. No-op at the top.
    pub fn move_up(&mut self, len: usize) -> bool {
        self.cursor = self.cursor.min(len.saturating_sub(1));
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.window = self.view.derive(len, self.cursor);
        true
    }

    /// Move one row down. No-op on the last result.
    pub fn move_down(&mut self, len: usize) -> bool {
        if self.cursor + 1 >= len {
            return false;
        }
        self.cursor += 1;
        self.window = self.view.derive(len, self.cursor);
        true
    }

    /// Move in `direction`. Returns whether the cursor changed.
    pub fn step(&mut self, direction: Direction, len: usize) -> bool {
        let moved = match direction {
            Direction::Up => self.move_up(len),
            Direction::Down => self.move_down(len),
        };
        if moved {
            tracing::debug!("Cursor {:?} to {}", direction, self.cursor);
        }
        moved
    }

    /// Put the cursor on a hovered row, given the row's absolute index.
    ///
    /// Ignored if the index is out of range or not in the visible window,
    /// which happens when the pointer event raced a result set change.
    pub fn hover(&mut self, absolute: usize, len: usize) -> bool {
        if absolute >= len {
            return false;
        }
        let Some(row) = self.window.row_of(absolute) else {
            return false;
        };
        if self.cursor == absolute && self.window.active_index() == Some(row) {
            return false;
        }
        self.cursor = absolute;
        self.window.focus_row(row)
    }

    /// The result under the cursor.
    pub fn resolve_selected<'a>(&self, items: &'a [ResultItem]) -> Option<&'a ResultItem> {
        items.get(self.cursor).filter(|item| item.index == self.cursor)
    }

    /// Preview of the selected result, or an empty preview.
    pub fn selected_preview(&self, items: &[ResultItem]) -> Preview {
        self.resolve_selected(items)
            .map(|item| item.preview.clone())
            .unwrap_or_default()
    }
}
