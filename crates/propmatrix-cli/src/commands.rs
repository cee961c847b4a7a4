//! Command implementations. Each returns a report; printing lives in
//! [`crate::summary`].

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use propmatrix_core::{
    CellSize, GridGeometry, Header, KeyValueStore, MatrixView, Story, Virtualizer,
};
use propmatrix_model::{
    FieldDescriptor, MatrixConfig, PropValue, PropertyCombination, SortDirection, SortKey,
};
use propmatrix_schema::{SchemaIntrospector, SchemaLayout, humanize};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, info_span};

/// One `--filter DIM=VALUE` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub dimension: String,
    pub value: String,
}

pub fn parse_filter(raw: &str) -> Result<FilterArg, String> {
    let (dimension, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DIM=VALUE, got `{raw}`"))?;
    let dimension = dimension.trim();
    if dimension.is_empty() {
        return Err(format!("missing dimension in `{raw}`"));
    }
    Ok(FilterArg {
        dimension: dimension.to_string(),
        value: value.trim().to_string(),
    })
}

pub fn parse_sort(raw: &str) -> Result<SortKey, String> {
    let (field, direction) = match raw.rsplit_once(':') {
        Some((field, "asc")) => (field, SortDirection::Asc),
        Some((field, "desc")) => (field, SortDirection::Desc),
        Some((_, other)) => return Err(format!("unknown sort direction `{other}`")),
        None => (raw, SortDirection::Asc),
    };
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field in `{raw}`"));
    }
    Ok(SortKey {
        field: field.to_string(),
        direction,
    })
}

pub fn load_schema(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse schema {}", path.display()))
}

/// Reads the matrix config, falling back to defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<MatrixConfig> {
    let Some(path) = path else {
        return Ok(MatrixConfig::default());
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded matrix config");
    Ok(config)
}

/// Display title derived from the schema file name.
pub fn story_title(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(|stem| stem.strip_suffix(".schema").unwrap_or(stem))
        .map(humanize)
        .unwrap_or_default()
}

pub struct InspectReport {
    pub layout: SchemaLayout,
    pub controls: Vec<FieldDescriptor>,
    /// Names of the controls that also contribute a dimension.
    pub dimensions: Vec<String>,
    pub defaults: Vec<(String, PropValue)>,
}

impl InspectReport {
    pub fn is_dimension(&self, name: &str) -> bool {
        self.dimensions.iter().any(|dimension| dimension == name)
    }
}

pub fn inspect(schema: &Value) -> Result<InspectReport> {
    let introspector = SchemaIntrospector::detect(schema).context("detect schema layout")?;
    let controls = introspector.controls(schema).context("extract controls")?;
    let dimensions = controls
        .iter()
        .filter_map(FieldDescriptor::dimension)
        .map(|dimension| dimension.name)
        .collect();
    let defaults = introspector
        .defaults(schema)
        .context("derive defaults")?
        .into_iter()
        .collect();
    info!(
        layout = introspector.layout().as_str(),
        controls = controls.len(),
        "inspected schema"
    );
    Ok(InspectReport {
        layout: introspector.layout(),
        controls,
        dimensions,
        defaults,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionColumn {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinationRow {
    pub ordinal: usize,
    pub label: String,
    pub props: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    #[serde(flatten)]
    pub header: Header,
    pub full_render: bool,
    pub dimensions: Vec<DimensionColumn>,
    pub combinations: Vec<CombinationRow>,
}

/// Builds the matrix view for `schema`, applies the filters and sort keys
/// and collects the visible combinations.
///
/// Full-render mode is read from `preferences`; `full_render` overrides it
/// and is written back for later runs.
pub fn matrix(
    title: &str,
    schema: Value,
    config: &MatrixConfig,
    filters: &[FilterArg],
    sorts: &[SortKey],
    preferences: Box<dyn KeyValueStore>,
    full_render: Option<bool>,
) -> Result<MatrixReport> {
    let span = info_span!("matrix", title = %title);
    let _guard = span.enter();

    let story = Story::new(title, Arc::new(schema), |_: &PropertyCombination| Ok(()));
    let mut view: MatrixView<()> = MatrixView::new(story, config.clone())
        .context("build matrix view")?
        .with_preferences(preferences);
    if let Some(enabled) = full_render {
        view.set_full_render(enabled)
            .context("save full-render preference")?;
    }

    let mut grouped: BTreeMap<&str, Vec<PropValue>> = BTreeMap::new();
    for filter in filters {
        let dimension = view
            .generation()
            .dimension(&filter.dimension)
            .ok_or_else(|| anyhow!("unknown dimension `{}`", filter.dimension))?;
        let value = dimension
            .values()
            .iter()
            .find(|value| value.to_string() == filter.value)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "`{}` is not a value of dimension `{}`",
                    filter.value,
                    filter.dimension
                )
            })?;
        grouped
            .entry(filter.dimension.as_str())
            .or_default()
            .push(value);
    }
    for (dimension, values) in grouped {
        view.set_filter(dimension, values)?;
    }
    for key in sorts {
        view.set_sort_direction(&key.field, key.direction)?;
    }

    let header = view.frame().header;
    let combinations = view
        .visible()
        .into_iter()
        .map(|combination| CombinationRow {
            ordinal: combination.ordinal,
            label: combination.label.clone(),
            props: combination.to_json(),
        })
        .collect();
    let dimensions = view
        .dimensions()
        .iter()
        .map(|dimension| DimensionColumn {
            name: dimension.name.clone(),
            label: dimension.label.clone(),
        })
        .collect();
    info!(shown = header.shown, total = header.total, "built matrix");
    Ok(MatrixReport {
        header,
        full_render: view.full_render(),
        dimensions,
        combinations,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutInput {
    pub width: f64,
    pub items: usize,
    pub cell: CellSize,
    pub gap: f64,
    pub scroll: f64,
    pub viewport: f64,
    pub overscan: usize,
}

impl LayoutInput {
    /// Input with cell size, gap and overscan taken from `config`.
    pub fn from_config(width: f64, items: usize, config: &MatrixConfig) -> Self {
        Self {
            width,
            items,
            cell: CellSize::new(config.default_cell_width, config.default_cell_height),
            gap: config.gap,
            scroll: 0.0,
            viewport: 0.0,
            overscan: config.overscan_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub columns: usize,
    pub rows: usize,
    pub row_height: f64,
    pub total_height: f64,
    pub visible_rows: Range<usize>,
    pub visible_items: Range<usize>,
}

pub fn layout(input: &LayoutInput) -> LayoutReport {
    let geometry = GridGeometry::compute(input.width, input.cell, input.gap, input.items);
    let mut virtualizer = Virtualizer::new(input.overscan);
    virtualizer.set_row_count(geometry.row_count);
    virtualizer.set_row_height(geometry.row_height());
    virtualizer.set_viewport_height(input.viewport);
    virtualizer.set_scroll_offset(input.scroll);
    let visible_rows = virtualizer.visible_rows();

    let visible_items = if visible_rows.is_empty() {
        0..0
    } else {
        let first = geometry.row_items(visible_rows.start, input.items);
        let last = geometry.row_items(visible_rows.end - 1, input.items);
        first.start..last.end
    };
    LayoutReport {
        columns: geometry.columns,
        rows: geometry.row_count,
        row_height: geometry.row_height(),
        total_height: geometry.total_height(),
        visible_rows,
        visible_items,
    }
}
