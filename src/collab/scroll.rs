// File: src/collab/scroll.rs
use std::ops::Range;

/// Best-effort request to bring a row of the current group into view.
pub trait Scroller {
    fn ensure_visible(&mut self, group_index: usize, word_index: usize);
}

/// A fixed-height window over the rows of one group.
#[derive(Debug, Clone)]
pub struct ViewportScroller {
    visible_rows: usize,
    group_index: Option<usize>,
    top: usize,
}

impl ViewportScroller {
    pub fn new(visible_rows: usize) -> Self {
        Self {
            visible_rows: visible_rows.max(1),
            group_index: None,
            top: 0,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    /// Rows to draw for a group of `len` entries. A window left over from a
    /// longer group is pulled back so it still ends on the last row.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.top.min(len.saturating_sub(self.visible_rows));
        start..(start + self.visible_rows).min(len)
    }
}

impl Scroller for ViewportScroller {
    fn ensure_visible(&mut self, group_index: usize, word_index: usize) {
        if self.group_index != Some(group_index) {
            self.group_index = Some(group_index);
            self.top = 0;
        }
        if word_index < self.top {
            self.top = word_index;
        } else if word_index >= self.top + self.visible_rows {
            self.top = word_index + 1 - self.visible_rows;
        }
    }
}

pub struct NullScroller;

impl Scroller for NullScroller {
    fn ensure_visible(&mut self, _group_index: usize, _word_index: usize) {}
}
