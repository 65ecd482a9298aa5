//! The bounded visible slice of the result set.
//!
//! The window follows the cursor: it stays anchored to the top while the
//! cursor is on the first page, then slides so the cursor sits on the last
//! row. It never shows rows past the cursor once it has started sliding.

use std::ops::Range;

use wox_core::ResultItem;

/// A contiguous slice of the accumulated results plus the active row.
///
/// `active` is relative to the slice, not the full set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    start: usize,
    len: usize,
    active: Option<usize>,
}

impl Window {
    /// A window with no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Absolute indices covered by this window.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active row within the window.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Row position of an absolute index, if it is visible.
    pub fn row_of(&self, absolute: usize) -> Option<usize> {
        self.range().contains(&absolute).then(|| absolute - self.start)
    }

    /// Make `row` the active row without moving the window.
    ///
    /// Returns false if `row` is not in the window.
    pub fn focus_row(&mut self, row: usize) -> bool {
        if row < self.len {
            self.active = Some(row);
            true
        } else {
            false
        }
    }

    /// Borrow the visible items out of the full result set.
    ///
    /// Clamped to `items`, so a window derived from a longer set never
    /// panics.
    pub fn slice<'a>(&self, items: &'a [ResultItem]) -> &'a [ResultItem] {
        let end = self.range().end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

/// Derives windows of at most `shown_item_count` rows.
#[derive(Debug, Clone, Copy)]
pub struct WindowedView {
    shown_item_count: usize,
}

impl Default for WindowedView {
    fn default() -> Self {
        Self::new(10)
    }
}

impl WindowedView {
    /// Create a view showing `shown_item_count` rows. Zero is treated as one.
    pub fn new(shown_item_count: usize) -> Self {
        Self {
            shown_item_count: shown_item_count.max(1),
        }
    }

    pub fn shown_item_count(&self) -> usize {
        self.shown_item_count
    }

    /// Window over `len` results with the cursor at `cursor`.
    ///
    /// An out-of-range cursor is clamped to the last result.
    pub fn derive(&self, len: usize, cursor: usize) -> Window {
        if len == 0 {
            return Window::empty();
        }

        let shown = self.shown_item_count;
        let cursor = cursor.min(len - 1);

        if cursor < shown {
            Window {
                start: 0,
                len: len.min(shown),
                active: Some(cursor),
            }
        } else {
            Window {
                start: cursor + 1 - shown,
                len: shown,
                active: Some(shown - 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(window: &Window) -> String {
        let range = window.range();
        match window.active_index() {
            Some(active) => format!("{}..{} active={}", range.start, range.end, active),
            None => format!("{}..{} inactive", range.start, range.end),
        }
    }

    #[test]
    fn test_first_page_is_top_anchored() {
        let view = WindowedView::default();
        let window = view.derive(25, 3);
        insta::assert_snapshot!(describe(&window), @"0..10 active=3");
    }

    #[test]
    fn test_past_first_page_pins_cursor_to_last_row() {
        let view = WindowedView::default();
        let window = view.derive(25, 12);
        insta::assert_snapshot!(describe(&window), @"3..13 active=9");
        assert_eq!(window.row_of(12), window.active_index());
    }

    #[test]
    fn test_boundary_cursor_positions() {
        let view = WindowedView::default();
        assert_eq!(describe(&view.derive(25, 9)), "0..10 active=9");
        assert_eq!(describe(&view.derive(25, 10)), "1..11 active=9");
        assert_eq!(describe(&view.derive(25, 24)), "15..25 active=9");
    }

    #[test]
    fn test_empty_set_has_no_active_row() {
        let window = WindowedView::default().derive(0, 0);
        assert!(window.is_empty());
        assert_eq!(window.active_index(), None);
        insta::assert_snapshot!(describe(&window), @"0..0 inactive");
    }

    #[test]
    fn test_short_set_shows_everything() {
        let view = WindowedView::default();
        for cursor in 0..4 {
            let window = view.derive(4, cursor);
            assert_eq!(window.range(), 0..4);
            assert_eq!(window.active_index(), Some(cursor));
        }
    }

    #[test]
    fn test_cursor_past_end_is_clamped() {
        let window = WindowedView::default().derive(12, 40);
        assert_eq!(describe(&window), "2..12 active=9");
    }

    #[test]
    fn test_window_length_never_exceeds_shown_count() {
        let view = WindowedView::new(3);
        for len in 0..8 {
            for cursor in 0..len.max(1) {
                let window = view.derive(len, cursor);
                assert_eq!(window.len(), len.min(3));
                if let Some(active) = window.active_index() {
                    assert_eq!(window.start() + active, cursor);
                }
            }
        }
    }

    #[test]
    fn test_focus_row_keeps_window() {
        let mut window = WindowedView::default().derive(25, 12);
        assert!(window.focus_row(2));
        assert_eq!(window.range(), 3..13);
        assert_eq!(window.active_index(), Some(2));
        assert!(!window.focus_row(10));
    }

    #[test]
    fn test_slice_is_clamped_to_items() {
        let items: Vec<_> = (0..5).map(|i| ResultItem::new(i.to_string(), "q")).collect();
        let window = WindowedView::default().derive(25, 12);
        assert!(window.slice(&items).is_empty());

        let window = WindowedView::default().derive(5, 1);
        assert_eq!(window.slice(&items).len(), 5);
    }
}
