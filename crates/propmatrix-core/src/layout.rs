//! Grid geometry for the matrix view.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Rendered size of one grid cell, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size is usable once layout has produced positive finite extents.
    pub fn is_settled(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// `max(1, floor((container_width + gap) / (cell_width + gap)))`.
pub fn column_count(container_width: f64, cell_width: f64, gap: f64) -> usize {
    let stride = cell_width + gap;
    let span = container_width + gap;
    if !stride.is_finite() || stride <= 0.0 || !span.is_finite() || span <= 0.0 {
        return 1;
    }
    ((span / stride).floor() as usize).max(1)
}

pub fn row_count(item_count: usize, columns: usize) -> usize {
    item_count.div_ceil(columns.max(1))
}

/// Derived grid geometry; recomputed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub columns: usize,
    pub row_count: usize,
    pub cell: CellSize,
    pub gap: f64,
}

impl GridGeometry {
    pub fn compute(container_width: f64, cell: CellSize, gap: f64, item_count: usize) -> Self {
        let columns = column_count(container_width, cell.width, gap);
        Self {
            columns,
            row_count: row_count(item_count, columns),
            cell,
            gap,
        }
    }

    /// Fixed row height estimate: measured cell height plus gap.
    pub fn row_height(&self) -> f64 {
        self.cell.height + self.gap
    }

    pub fn total_height(&self) -> f64 {
        self.row_count as f64 * self.row_height()
    }

    pub fn row_top(&self, row: usize) -> f64 {
        row as f64 * self.row_height()
    }

    /// Indices into the visible sequence laid out on `row`.
    pub fn row_items(&self, row: usize, item_count: usize) -> Range<usize> {
        let start = (row * self.columns).min(item_count);
        let end = (start + self.columns).min(item_count);
        start..end
    }
}
