//! Viewport tracker - single writer of the active index
//!
//! Turns settled scroll offsets into a discrete slot index. Intermediate
//! frames never reach this type; the host reports only momentum-settled
//! positions, drag boundaries and layout width.

use crate::utils::{index_for_offset, is_valid_width, offset_for_index};

#[derive(Debug, Clone, Default)]
pub struct ViewportTracker {
    item_count: usize,
    active_index: usize,
    is_dragging: bool,
    viewport_width: f64,
}

impl ViewportTracker {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            ..Self::default()
        }
    }

    /// Dataset replaced: snap back to the first slot.
    ///
    /// Drag state is kept, a finger on the surface stays there across a
    /// dataset swap.
    pub fn reset(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.active_index = 0;
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Active slot, `None` while the dataset is empty
    pub fn active_index(&self) -> Option<usize> {
        (self.item_count > 0).then_some(self.active_index)
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Record the page width. Returns false (and keeps the old width) when invalid.
    pub fn set_viewport_width(&mut self, width: f64) -> bool {
        if !is_valid_width(width) {
            return false;
        }
        self.viewport_width = width;
        true
    }

    /// Returns true if the drag was registered (non-empty dataset)
    pub fn begin_drag(&mut self) -> bool {
        if self.item_count == 0 {
            return false;
        }
        self.is_dragging = true;
        true
    }

    /// Always releases the drag; returns false when the dataset is empty
    pub fn end_drag(&mut self) -> bool {
        self.is_dragging = false;
        self.item_count > 0
    }

    /// Apply a settled offset. Returns the new index only when it changed.
    pub fn settle(&mut self, offset: f64) -> Option<usize> {
        let index = index_for_offset(offset, self.viewport_width, self.item_count)?;
        if index == self.active_index {
            return None;
        }
        self.active_index = index;
        Some(index)
    }

    /// Offset the surface must scroll to for `index`, if it exists and layout is known
    pub fn offset_for(&self, index: usize) -> Option<f64> {
        if index >= self.item_count {
            return None;
        }
        offset_for_index(index, self.viewport_width)
    }
}
