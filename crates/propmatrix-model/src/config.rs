//! Tunable matrix constants.

use serde::{Deserialize, Serialize};

/// Product constants for the matrix view.
///
/// None of these are derived from an invariant; they are defaults that
/// hosts and the CLI may override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Maximum number of combinations to enumerate.
    pub limit: usize,
    /// Strings longer than this are shortened with an ellipsis in labels.
    pub label_max_chars: usize,
    /// Gap between grid cells, in pixels.
    pub gap: f64,
    /// Extra rows rendered above and below the viewport.
    pub overscan_rows: usize,
    /// Cell size assumed before the first cell is measured.
    pub default_cell_width: f64,
    pub default_cell_height: f64,
    /// Render every combination without virtualization.
    pub full_render: bool,
}

impl MatrixConfig {
    pub const DEFAULT_LIMIT: usize = 100;
    pub const DEFAULT_LABEL_MAX_CHARS: usize = 15;

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_full_render(mut self, enable: bool) -> Self {
        self.full_render = enable;
        self
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            label_max_chars: Self::DEFAULT_LABEL_MAX_CHARS,
            gap: 16.0,
            overscan_rows: 2,
            default_cell_width: 220.0,
            default_cell_height: 160.0,
            full_render: false,
        }
    }
}
