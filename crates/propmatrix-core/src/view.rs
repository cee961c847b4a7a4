//! The matrix view controller.
//!
//! [`MatrixView`] owns one registered story and composes the generator, the
//! filter and sort engine, grid layout, virtualization, measurement and
//! selection. Host events come in through the `on_*` methods and state
//! mutators; [`MatrixView::frame`] turns the current state into a
//! renderer-agnostic [`MatrixFrame`].
//!
//! Generation is memoized on the identity of the schema `Arc`; the visible
//! sequence is memoized on the generation version plus the filter and sort
//! state, so unrelated events never regenerate or re-sort.

use std::sync::Arc;

use propmatrix_model::{
    Dimension, FilterState, GenerationResult, MatrixConfig, ModelError, PropValue,
    PropertyCombination, SortDirection, SortKey, SortState,
};
use propmatrix_schema::{SchemaError, extract_dimensions};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cell::{CellNode, RenderError, RenderFn, render_cell};
use crate::generator::generate_for;
use crate::layout::{CellSize, GridGeometry};
use crate::observer::{ResizeSource, Subscription};
use crate::query::apply_view;
use crate::selection::{Key, Selection, ViewMode};
use crate::store::{KeyValueStore, StoreError};
use crate::virtualizer::{CellMeasure, Virtualizer};

/// Preference key holding the full-render toggle.
pub const FULL_RENDER_KEY: &str = "propmatrix.fullRender";

/// A component registration: display title, schema and render callback.
pub struct Story<N> {
    pub title: String,
    pub schema: Arc<Value>,
    pub render: Box<RenderFn<N>>,
}

impl<N> Story<N> {
    pub fn new(
        title: impl Into<String>,
        schema: Arc<Value>,
        render: impl Fn(&PropertyCombination) -> Result<N, RenderError> + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            schema,
            render: Box::new(render),
        }
    }
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixFrame<N> {
    pub header: Header,
    pub body: Body<N>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub title: String,
    /// Combinations left after filtering.
    pub shown: usize,
    /// Combinations produced by the generator.
    pub generated: usize,
    /// Full Cartesian-product size.
    pub total: u64,
    pub truncation_notice: Option<String>,
    pub filters: Vec<FilterChip>,
    pub sort: Vec<SortKey>,
    /// Whether the reset affordance has anything to reset.
    pub can_reset: bool,
}

/// Active filter on one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChip {
    pub dimension: String,
    pub label: String,
    pub values: Vec<PropValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Body<N> {
    /// Every combination was filtered out.
    Empty,
    /// Only the first cell, rendered so the host can report its size.
    Measuring { cell: CellNode<N> },
    Virtual {
        total_height: f64,
        columns: usize,
        rows: Vec<RowNode<N>>,
    },
    /// Static grid of every visible combination.
    Full {
        columns: usize,
        cells: Vec<CellNode<N>>,
    },
    Expanded { cell: CellNode<N> },
}

/// One absolutely positioned grid row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowNode<N> {
    pub index: usize,
    pub top: f64,
    pub cells: Vec<CellNode<N>>,
}

#[derive(Debug, Clone)]
struct VisibleMemo {
    generation_version: u64,
    filters: FilterState,
    sort: SortState,
    ordinals: Vec<usize>,
}

pub struct MatrixView<N> {
    story: Story<N>,
    config: MatrixConfig,
    generation: GenerationResult,
    generation_version: u64,
    filters: FilterState,
    sort: SortState,
    selection: Selection,
    memo: Option<VisibleMemo>,
    recomputations: u64,
    virtualizer: Virtualizer,
    container_width: f64,
    measure: CellMeasure,
    full_render: bool,
    preferences: Option<Box<dyn KeyValueStore>>,
    subscription: Option<Subscription>,
}

impl<N> MatrixView<N> {
    pub fn new(story: Story<N>, config: MatrixConfig) -> Result<Self, SchemaError> {
        let dimensions = extract_dimensions(&story.schema)?;
        let generation = generate_for(&dimensions, &config);
        debug!(
            title = %story.title,
            dimensions = dimensions.len(),
            generated = generation.len(),
            total = generation.total,
            "matrix view created"
        );
        Ok(Self {
            virtualizer: Virtualizer::new(config.overscan_rows),
            full_render: config.full_render,
            story,
            config,
            generation,
            generation_version: 0,
            filters: FilterState::new(),
            sort: SortState::new(),
            selection: Selection::default(),
            memo: None,
            recomputations: 0,
            container_width: 0.0,
            measure: CellMeasure::default(),
            preferences: None,
            subscription: None,
        })
    }

    /// Attaches a preference store; a stored full-render flag overrides the
    /// configured one.
    pub fn with_preferences(mut self, store: Box<dyn KeyValueStore>) -> Self {
        if let Some(full_render) = store.get_as::<bool>(FULL_RENDER_KEY) {
            self.full_render = full_render;
        }
        self.preferences = Some(store);
        self
    }

    pub fn title(&self) -> &str {
        &self.story.title
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn generation(&self) -> &GenerationResult {
        &self.generation
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.generation.dimensions
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Number of times the visible sequence has been recomputed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Replaces the schema. Returns false without regenerating when `schema`
    /// is the same `Arc` as the current one.
    ///
    /// A new schema resets filters, sort and selection.
    pub fn set_schema(&mut self, schema: Arc<Value>) -> Result<bool, SchemaError> {
        if Arc::ptr_eq(&self.story.schema, &schema) {
            return Ok(false);
        }
        let dimensions = extract_dimensions(&schema)?;
        self.story.schema = schema;
        self.install(&dimensions);
        Ok(true)
    }

    /// Swaps in another story, regenerating only if its schema differs.
    pub fn set_story(&mut self, story: Story<N>) -> Result<bool, SchemaError> {
        let Story {
            title,
            schema,
            render,
        } = story;
        let changed = self.set_schema(schema)?;
        self.story.title = title;
        self.story.render = render;
        Ok(changed)
    }

    fn install(&mut self, dimensions: &[Dimension]) {
        self.generation = generate_for(dimensions, &self.config);
        self.generation_version = self.generation_version.wrapping_add(1);
        self.filters.clear();
        self.sort.clear();
        self.selection.clear();
        self.memo = None;
        self.virtualizer.reset_scroll();
        debug!(
            generated = self.generation.len(),
            total = self.generation.total,
            truncated = self.generation.truncated,
            "regenerated combinations"
        );
    }

    fn dimension(&self, name: &str) -> Result<&Dimension, ModelError> {
        self.generation
            .dimension(name)
            .ok_or_else(|| ModelError::UnknownDimension {
                name: name.to_string(),
            })
    }

    pub fn toggle_filter(&mut self, dimension: &str, value: PropValue) -> Result<(), ModelError> {
        let dimension = self
            .generation
            .dimension(dimension)
            .ok_or_else(|| ModelError::UnknownDimension {
                name: dimension.to_string(),
            })?;
        self.filters.toggle_value(dimension, value)
    }

    pub fn set_filter(
        &mut self,
        dimension: &str,
        values: impl IntoIterator<Item = PropValue>,
    ) -> Result<(), ModelError> {
        let dimension = self
            .generation
            .dimension(dimension)
            .ok_or_else(|| ModelError::UnknownDimension {
                name: dimension.to_string(),
            })?;
        self.filters.set_allowed(dimension, values)
    }

    pub fn clear_filter(&mut self, dimension: &str) {
        self.filters.clear_dimension(dimension);
    }

    pub fn toggle_sort(&mut self, field: &str) -> Result<(), ModelError> {
        self.dimension(field)?;
        self.sort.toggle(field);
        Ok(())
    }

    pub fn set_sort_direction(
        &mut self,
        field: &str,
        direction: SortDirection,
    ) -> Result<(), ModelError> {
        self.dimension(field)?;
        self.sort.set_direction(field, direction);
        Ok(())
    }

    pub fn remove_sort(&mut self, field: &str) {
        self.sort.remove(field);
    }

    /// Clears filters, sort and selection and scrolls back to the top.
    pub fn reset_all(&mut self) {
        self.filters.clear();
        self.sort.clear();
        self.selection.clear();
        self.virtualizer.reset_scroll();
    }

    fn refresh_visible(&mut self) {
        let fresh = self.memo.as_ref().is_some_and(|memo| {
            memo.generation_version == self.generation_version
                && memo.filters == self.filters
                && memo.sort == self.sort
        });
        if fresh {
            return;
        }
        let ordinals: Vec<usize> = apply_view(&self.generation.combinations, &self.filters, &self.sort)
            .into_iter()
            .map(|combination| combination.ordinal)
            .collect();
        self.selection.rebase(&ordinals);
        self.recomputations += 1;
        debug!(
            shown = ordinals.len(),
            generated = self.generation.len(),
            "recomputed visible combinations"
        );
        self.memo = Some(VisibleMemo {
            generation_version: self.generation_version,
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            ordinals,
        });
    }

    /// Ordinals of the filtered and sorted combinations, in display order.
    pub fn visible_ordinals(&mut self) -> &[usize] {
        self.refresh_visible();
        self.memo
            .as_ref()
            .map_or(&[][..], |memo| memo.ordinals.as_slice())
    }

    pub fn visible(&mut self) -> Vec<&PropertyCombination> {
        self.refresh_visible();
        let ordinals = self
            .memo
            .as_ref()
            .map_or(&[][..], |memo| memo.ordinals.as_slice());
        ordinals
            .iter()
            .filter_map(|&ordinal| self.generation.combinations.get(ordinal))
            .collect()
    }

    /// Expands the combination at `position` in the visible sequence.
    ///
    /// Out-of-range positions leave the grid showing and return false.
    pub fn select(&mut self, position: usize) -> bool {
        self.refresh_visible();
        let ordinals = self
            .memo
            .as_ref()
            .map_or(&[][..], |memo| memo.ordinals.as_slice());
        self.selection.select(position, ordinals)
    }

    /// Returns to the grid; the grid starts again from the top.
    pub fn back(&mut self) {
        self.selection.clear();
        self.virtualizer.reset_scroll();
    }

    /// Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape if self.selection.is_selected() => {
                self.back();
                true
            }
            _ => false,
        }
    }

    pub fn mode(&mut self) -> ViewMode {
        let len = self.visible_ordinals().len();
        self.selection.mode(len)
    }

    pub fn selected(&mut self) -> Option<&PropertyCombination> {
        let len = self.visible_ordinals().len();
        let ordinal = self.selection.resolve(len).and(self.selection.ordinal())?;
        self.generation.combinations.get(ordinal)
    }

    /// Registers the resize observer, disposing any previous one, and
    /// restarts cell measurement.
    pub fn mount(&mut self, source: &dyn ResizeSource) {
        self.subscription = Some(source.observe());
        self.measure.reset();
        debug!("matrix view mounted");
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
        self.measure.reset();
        debug!("matrix view unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.container_width = width;
        self.virtualizer.set_viewport_height(height);
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.virtualizer.set_scroll_offset(offset);
    }

    /// One-shot measurement callback for the first rendered cell.
    ///
    /// Returns true when this report froze the cell size.
    pub fn on_cell_measured(&mut self, size: CellSize) -> bool {
        let frozen = self.measure.record(size);
        if frozen {
            debug!(width = size.width, height = size.height, "cell size measured");
        }
        frozen
    }

    pub fn scroll_offset(&self) -> f64 {
        self.virtualizer.scroll_offset()
    }

    /// Measured cell size, or the configured estimate until measured.
    pub fn cell_size(&self) -> CellSize {
        self.measure.size().unwrap_or(CellSize::new(
            self.config.default_cell_width,
            self.config.default_cell_height,
        ))
    }

    pub fn geometry(&mut self) -> GridGeometry {
        let len = self.visible_ordinals().len();
        GridGeometry::compute(self.container_width, self.cell_size(), self.config.gap, len)
    }

    pub fn full_render(&self) -> bool {
        self.full_render
    }

    /// Toggles full-render mode and persists it to the preference store.
    pub fn set_full_render(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.full_render = enabled;
        if let Some(store) = self.preferences.as_mut() {
            store.set_as(FULL_RENDER_KEY, &enabled)?;
        }
        Ok(())
    }

    pub fn frame(&mut self) -> MatrixFrame<N> {
        self.refresh_visible();
        let header = self.header();
        let body = self.body();
        MatrixFrame { header, body }
    }

    fn header(&self) -> Header {
        let shown = self.memo.as_ref().map_or(0, |memo| memo.ordinals.len());
        let filters = self
            .filters
            .iter()
            .map(|(dimension, allowed)| {
                let found = self.generation.dimension(dimension);
                let mut values: Vec<PropValue> = allowed.iter().cloned().collect();
                if let Some(found) = found {
                    // Declared order; values outside the dimension go last.
                    values.sort_by_key(|value| {
                        found
                            .values()
                            .iter()
                            .position(|candidate| candidate == value)
                            .unwrap_or(usize::MAX)
                    });
                }
                FilterChip {
                    dimension: dimension.to_string(),
                    label: found.map_or_else(|| dimension.to_string(), |found| found.label.clone()),
                    values,
                }
            })
            .collect();
        Header {
            title: self.story.title.clone(),
            shown,
            generated: self.generation.len(),
            total: self.generation.total,
            truncation_notice: self.generation.truncation_notice(),
            filters,
            sort: self.sort.keys().to_vec(),
            can_reset: self.filters.is_active() || !self.sort.is_empty(),
        }
    }

    fn body(&mut self) -> Body<N> {
        let cell = self.cell_size();
        let ordinals = self
            .memo
            .as_ref()
            .map_or(&[][..], |memo| memo.ordinals.as_slice());
        let combinations = &self.generation.combinations;
        let render: &RenderFn<N> = &*self.story.render;
        let render_at = |position: usize| {
            let ordinal = *ordinals.get(position)?;
            let combination = combinations.get(ordinal)?;
            Some(render_cell(combination, position, render))
        };

        if ordinals.is_empty() {
            return Body::Empty;
        }
        if let Some(position) = self.selection.resolve(ordinals.len())
            && let Some(cell) = render_at(position)
        {
            return Body::Expanded { cell };
        }

        let geometry =
            GridGeometry::compute(self.container_width, cell, self.config.gap, ordinals.len());
        if self.full_render {
            return Body::Full {
                columns: geometry.columns,
                cells: (0..ordinals.len()).filter_map(render_at).collect(),
            };
        }
        if !self.measure.is_measured() {
            return match render_at(0) {
                Some(cell) => Body::Measuring { cell },
                None => Body::Empty,
            };
        }

        self.virtualizer.set_row_count(geometry.row_count);
        self.virtualizer.set_row_height(geometry.row_height());
        let rows = self
            .virtualizer
            .visible_rows()
            .map(|row| RowNode {
                index: row,
                top: geometry.row_top(row),
                cells: geometry
                    .row_items(row, ordinals.len())
                    .filter_map(render_at)
                    .collect(),
            })
            .collect();
        Body::Virtual {
            total_height: geometry.total_height(),
            columns: geometry.columns,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Arc<Value> {
        Arc::new(json!({
            "_def": {
                "typeName": "ZodObject",
                "shape": {
                    "disabled": { "_def": { "typeName": "ZodBoolean" } },
                    "size": { "_def": { "typeName": "ZodEnum", "values": ["sm", "lg"] } }
                }
            }
        }))
    }

    fn view() -> MatrixView<String> {
        let story = Story::new("Button", schema(), |combination: &PropertyCombination| {
            Ok(combination.label.clone())
        });
        MatrixView::new(story, MatrixConfig::default()).unwrap()
    }

    #[test]
    fn same_schema_arc_does_not_regenerate() {
        let mut view = view();
        let schema = Arc::clone(&view.story.schema);
        assert!(!view.set_schema(schema).unwrap());
        assert!(view.set_schema(self::schema()).unwrap());
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        let mut view = view();
        let err = view
            .toggle_filter("color", PropValue::text("red"))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownDimension {
                name: "color".to_string()
            }
        );
        assert!(view.toggle_sort("color").is_err());
    }
}
