//! Scroll-driven row virtualization.
//!
//! The virtualizer owns scroll offset, viewport height, row count and row
//! height. Mutations only mark the cached window dirty; the window of rows
//! to render is recomputed lazily on the next read, so a burst of scroll and
//! resize events costs one computation.
//!
//! Cell size comes from a two-phase protocol: [`CellMeasure`] starts out
//! pending, the host renders one real cell and reports its bounding box
//! once, and from then on row heights are estimates derived from that
//! measurement.

use std::ops::Range;

use crate::layout::CellSize;

/// Rows whose span intersects `[scroll_offset, scroll_offset + viewport_height]`,
/// widened by `overscan` on each side and clamped to `0..row_count`.
pub fn visible_row_range(
    scroll_offset: f64,
    viewport_height: f64,
    row_height: f64,
    row_count: usize,
    overscan: usize,
) -> Range<usize> {
    if row_count == 0 {
        return 0..0;
    }
    if !row_height.is_finite() || row_height <= 0.0 {
        return 0..row_count;
    }
    let offset = if scroll_offset.is_finite() {
        scroll_offset.max(0.0)
    } else {
        0.0
    };
    let viewport = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };
    // Float-to-int casts saturate at usize::MAX for offsets far past the end.
    let first = (offset / row_height).floor() as usize;
    let last_exclusive =
        (((offset + viewport) / row_height).ceil() as usize).max(first.saturating_add(1));

    let start = first.saturating_sub(overscan).min(row_count - 1);
    let end = last_exclusive
        .saturating_add(overscan)
        .min(row_count)
        .max(start + 1);
    start..end
}

#[derive(Debug, Clone)]
pub struct Virtualizer {
    row_count: usize,
    row_height: f64,
    viewport_height: f64,
    scroll_offset: f64,
    overscan: usize,
    cached_window: Range<usize>,
    dirty: bool,
    version: u64,
}

impl Virtualizer {
    pub fn new(overscan: usize) -> Self {
        Self {
            row_count: 0,
            row_height: 0.0,
            viewport_height: 0.0,
            scroll_offset: 0.0,
            overscan,
            cached_window: 0..0,
            dirty: true,
            version: 0,
        }
    }

    /// Bumped on every change that can move the window.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.version = self.version.wrapping_add(1);
    }

    pub fn set_row_count(&mut self, row_count: usize) {
        if self.row_count != row_count {
            self.row_count = row_count;
            self.mark_dirty();
        }
    }

    pub fn set_row_height(&mut self, row_height: f64) {
        if self.row_height != row_height {
            self.row_height = row_height;
            self.mark_dirty();
        }
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        if self.viewport_height != viewport_height {
            self.viewport_height = viewport_height;
            self.mark_dirty();
        }
    }

    pub fn set_scroll_offset(&mut self, scroll_offset: f64) {
        if self.scroll_offset != scroll_offset {
            self.scroll_offset = scroll_offset;
            self.mark_dirty();
        }
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.overscan != overscan {
            self.overscan = overscan;
            self.mark_dirty();
        }
    }

    /// Back to the top of the grid.
    pub fn reset_scroll(&mut self) {
        self.set_scroll_offset(0.0);
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Height of the scroll container so native scrollbars reflect every row.
    pub fn total_height(&self) -> f64 {
        self.row_count as f64 * self.row_height
    }

    pub fn row_top(&self, row: usize) -> f64 {
        row as f64 * self.row_height
    }

    pub fn visible_rows(&mut self) -> Range<usize> {
        if self.dirty {
            self.cached_window = visible_row_range(
                self.scroll_offset,
                self.viewport_height,
                self.row_height,
                self.row_count,
                self.overscan,
            );
            self.dirty = false;
        }
        self.cached_window.clone()
    }
}

/// One-shot cell measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CellMeasure {
    #[default]
    Pending,
    Measured(CellSize),
}

impl CellMeasure {
    /// Records the first settled size; later reports are ignored.
    ///
    /// Returns true when this call froze the measurement.
    pub fn record(&mut self, size: CellSize) -> bool {
        match self {
            Self::Pending if size.is_settled() => {
                *self = Self::Measured(size);
                true
            }
            _ => false,
        }
    }

    pub fn size(&self) -> Option<CellSize> {
        match self {
            Self::Pending => None,
            Self::Measured(size) => Some(*size),
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }

    pub fn reset(&mut self) {
        *self = Self::Pending;
    }
}
