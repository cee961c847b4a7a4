//! Prop-combination engine and matrix view.
//!
//! - [`generator`]: Cartesian product over dimensions with a hard limit
//! - [`query`]: pure filtering and stable multi-key sorting
//! - [`layout`] / [`virtualizer`]: grid geometry and the visible row window
//! - [`cell`] / [`selection`]: failure-isolated cell rendering and the
//!   expanded single-cell view
//! - [`view`]: the [`MatrixView`] controller composing all of the above
//! - [`store`]: persisted key-value preferences with change notification

pub mod cell;
pub mod generator;
pub mod layout;
pub mod observer;
pub mod query;
pub mod selection;
pub mod store;
pub mod view;
pub mod virtualizer;

pub use cell::{CellContent, CellNode, RenderError, RenderFn, render_cell};
pub use generator::{LABEL_SEPARATOR, format_value, generate, generate_for, generate_with};
pub use layout::{CellSize, GridGeometry, column_count, row_count};
pub use observer::{ResizeSource, Subscription};
pub use query::{apply_filters, apply_sort, apply_view, compare, passes};
pub use selection::{Key, Selection, ViewMode};
pub use store::{FileStore, KeyValueStore, ListenerId, MemoryStore, ObservableStore, StoreError};
pub use view::{
    Body, FULL_RENDER_KEY, FilterChip, Header, MatrixFrame, MatrixView, RowNode, Story,
};
pub use virtualizer::{CellMeasure, Virtualizer, visible_row_range};
