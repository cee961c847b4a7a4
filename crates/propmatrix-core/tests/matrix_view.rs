use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use propmatrix_core::{
    Body, CellContent, CellSize, FULL_RENDER_KEY, Key, KeyValueStore, MatrixView, MemoryStore,
    ObservableStore, RenderError, ResizeSource, Story, Subscription, ViewMode,
};
use propmatrix_model::{MatrixConfig, PropValue, PropertyCombination};
use serde_json::{Value, json};

fn boolean(type_name: &str) -> Value {
    json!({ "_def": { "typeName": type_name } })
}

fn button_schema() -> Arc<Value> {
    Arc::new(json!({
        "_def": {
            "typeName": "ZodObject",
            "shape": {
                "primary": boolean("ZodBoolean"),
                "disabled": boolean("ZodBoolean"),
                "loading": boolean("ZodBoolean"),
                "onClick": boolean("ZodFunction")
            }
        }
    }))
}

fn render(combination: &PropertyCombination) -> Result<String, RenderError> {
    let flag = |name: &str| combination.get(name).and_then(PropValue::as_bool);
    if flag("disabled") == Some(true) && flag("loading") == Some(true) {
        return Err(RenderError::new("spinner cannot be disabled"));
    }
    Ok(format!("<Button {}>", combination.label))
}

fn view_with(config: MatrixConfig) -> MatrixView<String> {
    let story = Story::new("Button", button_schema(), render);
    MatrixView::new(story, config).unwrap()
}

fn view() -> MatrixView<String> {
    view_with(MatrixConfig::default())
}

#[derive(Default)]
struct CountingSource {
    observed: Rc<Cell<usize>>,
    disposed: Rc<Cell<usize>>,
}

impl ResizeSource for CountingSource {
    fn observe(&self) -> Subscription {
        self.observed.set(self.observed.get() + 1);
        let disposed = Rc::clone(&self.disposed);
        Subscription::new(move || disposed.set(disposed.get() + 1))
    }
}

fn labels(view: &mut MatrixView<String>) -> String {
    view.visible()
        .iter()
        .map(|combination| combination.label.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn visible_sequence_is_memoized() {
    let mut view = view();
    view.frame();
    view.frame();
    view.on_scroll(120.0);
    view.on_resize(800.0, 600.0);
    view.frame();
    assert_eq!(view.recomputations(), 1);

    view.toggle_filter("primary", PropValue::Bool(true)).unwrap();
    assert_eq!(view.visible_ordinals(), &[4, 5, 6, 7]);
    assert_eq!(view.recomputations(), 2);

    view.toggle_filter("primary", PropValue::Bool(true)).unwrap();
    assert_eq!(view.visible_ordinals().len(), 8);
    assert_eq!(view.recomputations(), 3);
}

#[test]
fn remounting_disposes_previous_observer() {
    let source = CountingSource::default();
    let mut view = view();

    view.mount(&source);
    view.mount(&source);
    assert_eq!(source.observed.get(), 2);
    assert_eq!(source.disposed.get(), 1);

    view.unmount();
    assert_eq!(source.disposed.get(), 2);
    assert!(!view.is_mounted());

    view.mount(&source);
    drop(view);
    assert_eq!(source.disposed.get(), 3);
}

#[test]
fn measures_first_cell_before_virtualizing() {
    let source = CountingSource::default();
    let mut view = view();
    view.mount(&source);
    view.on_resize(800.0, 150.0);

    let Body::Measuring { cell } = view.frame().body else {
        panic!("expected measuring phase");
    };
    assert_eq!(cell.position, 0);
    assert_eq!(cell.label, "!primary, !disabled, !loading");

    assert!(!view.on_cell_measured(CellSize::new(0.0, 0.0)));
    assert!(view.on_cell_measured(CellSize::new(220.0, 100.0)));
    assert!(!view.on_cell_measured(CellSize::new(500.0, 500.0)));

    let Body::Virtual {
        total_height,
        columns,
        rows,
    } = view.frame().body
    else {
        panic!("expected virtualized grid");
    };
    assert_eq!(columns, 3);
    assert_eq!(total_height, 348.0);
    let positions: Vec<Vec<usize>> = rows
        .iter()
        .map(|row| row.cells.iter().map(|cell| cell.position).collect())
        .collect();
    assert_eq!(positions, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7]]);
    assert_eq!(rows[2].top, 232.0);

    view.mount(&source);
    assert!(matches!(view.frame().body, Body::Measuring { .. }));
}

#[test]
fn virtual_window_follows_scroll() {
    let config = MatrixConfig {
        overscan_rows: 0,
        ..MatrixConfig::default()
    };
    let mut view = view_with(config);
    view.on_resize(220.0, 100.0);
    view.on_cell_measured(CellSize::new(220.0, 84.0));
    view.on_scroll(450.0);

    let Body::Virtual { columns, rows, .. } = view.frame().body else {
        panic!("expected virtualized grid");
    };
    assert_eq!(columns, 1);
    let indices: Vec<usize> = rows.iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![4, 5]);
}

#[test]
fn render_failures_stay_in_their_cell() {
    let mut view = view().with_preferences(Box::new(MemoryStore::new()));
    view.set_full_render(true).unwrap();

    let Body::Full { cells, .. } = view.frame().body else {
        panic!("expected full grid");
    };
    assert_eq!(cells.len(), 8);
    let failed: Vec<&str> = cells
        .iter()
        .filter(|cell| cell.is_failed())
        .map(|cell| cell.label.as_str())
        .collect();
    assert_eq!(
        failed,
        vec!["!primary, disabled, loading", "primary, disabled, loading"]
    );
    assert_eq!(
        cells[0].content,
        CellContent::Rendered {
            node: "<Button !primary, !disabled, !loading>".to_string()
        }
    );
}

#[test]
fn full_render_preference_is_persisted_and_restored() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let mut store = ObservableStore::new(MemoryStore::new());
    store.subscribe(move |key, value| sink.borrow_mut().push((key.to_string(), value.cloned())));

    let mut view = view().with_preferences(Box::new(store));
    assert!(!view.full_render());
    view.set_full_render(true).unwrap();
    assert_eq!(
        *changes.borrow(),
        vec![(FULL_RENDER_KEY.to_string(), Some(json!(true)))]
    );

    let mut stored = MemoryStore::new();
    stored.set(FULL_RENDER_KEY, json!(true)).unwrap();
    let restored = self::view().with_preferences(Box::new(stored));
    assert!(restored.full_render());
}

#[test]
fn out_of_range_selection_keeps_grid() {
    let mut view = view();
    assert!(!view.select(99));
    assert_eq!(view.mode(), ViewMode::Grid);
}

#[test]
fn selection_follows_combination_through_sort() {
    let mut view = view();
    assert!(view.select(1));
    assert_eq!(view.mode(), ViewMode::Expanded { position: 1 });

    view.toggle_sort("loading").unwrap();
    view.toggle_sort("loading").unwrap();
    assert_eq!(view.mode(), ViewMode::Expanded { position: 0 });
    let Body::Expanded { cell } = view.frame().body else {
        panic!("expected expanded cell");
    };
    assert_eq!(cell.label, "!primary, !disabled, loading");
}

#[test]
fn filtering_out_selection_returns_to_grid() {
    let mut view = view();
    view.select(7);
    view.toggle_filter("primary", PropValue::Bool(false)).unwrap();
    assert_eq!(view.mode(), ViewMode::Grid);
    assert!(view.selected().is_none());
}

#[test]
fn escape_returns_to_grid_from_top() {
    let mut view = view();
    view.on_scroll(300.0);
    assert!(!view.handle_key(Key::Escape));
    assert!(view.select(2));
    assert!(!view.handle_key(Key::Enter));
    assert!(view.handle_key(Key::Escape));
    assert_eq!(view.mode(), ViewMode::Grid);
    assert_eq!(view.scroll_offset(), 0.0);
}

#[test]
fn reset_all_clears_view_state() {
    let mut view = view();
    view.toggle_filter("disabled", PropValue::Bool(true)).unwrap();
    view.toggle_sort("loading").unwrap();
    view.toggle_sort("loading").unwrap();

    insta::assert_json_snapshot!(view.frame().header, @r#"
    {
      "title": "Button",
      "shown": 4,
      "generated": 8,
      "total": 8,
      "truncation_notice": null,
      "filters": [
        {
          "dimension": "disabled",
          "label": "Disabled",
          "values": [
            true
          ]
        }
      ],
      "sort": [
        {
          "field": "loading",
          "direction": "desc"
        }
      ],
      "can_reset": true
    }
    "#);

    view.reset_all();
    let header = view.frame().header;
    assert!(!header.can_reset);
    assert_eq!(header.shown, 8);
}

#[test]
fn sorted_labels() {
    let mut view = view();
    view.toggle_sort("loading").unwrap();
    view.toggle_sort("loading").unwrap();
    insta::assert_snapshot!(labels(&mut view), @r"
    !primary, !disabled, loading
    !primary, disabled, loading
    primary, !disabled, loading
    primary, disabled, loading
    !primary, !disabled, !loading
    !primary, disabled, !loading
    primary, !disabled, !loading
    primary, disabled, !loading
    ");
}

#[test]
fn truncated_generation_can_filter_to_empty() {
    let mut view = view_with(MatrixConfig::default().with_limit(2));
    let header = view.frame().header;
    assert_eq!(
        header.truncation_notice.as_deref(),
        Some("Showing 2 of 8 combinations")
    );

    view.toggle_filter("disabled", PropValue::Bool(true)).unwrap();
    assert!(matches!(view.frame().body, Body::Empty));
}

#[test]
fn new_schema_resets_view_state() {
    let mut view = view();
    view.toggle_filter("primary", PropValue::Bool(true)).unwrap();
    view.select(0);

    let changed = view
        .set_schema(Arc::new(json!({
            "_def": {
                "typeName": "ZodObject",
                "shape": {
                    "size": { "_def": { "typeName": "ZodEnum", "values": ["sm", "md", "lg"] } }
                }
            }
        })))
        .unwrap();
    assert!(changed);
    assert!(!view.filters().is_active());
    assert_eq!(view.mode(), ViewMode::Grid);
    assert_eq!(view.visible_ordinals().len(), 3);
    assert!(view.toggle_filter("primary", PropValue::Bool(true)).is_err());
}

#[test]
fn filter_chip_lists_values_in_declared_order() {
    let schema = Arc::new(json!({
        "_def": {
            "typeName": "ZodObject",
            "shape": {
                "size": { "_def": { "typeName": "ZodEnum", "values": ["sm", "md", "lg"] } }
            }
        }
    }));
    let story = Story::new("Badge", schema, |combination: &PropertyCombination| {
        Ok(combination.label.clone())
    });
    let mut view = MatrixView::new(story, MatrixConfig::default()).unwrap();
    view.toggle_filter("size", PropValue::text("lg")).unwrap();
    view.toggle_filter("size", PropValue::text("sm")).unwrap();

    let chips = view.frame().header.filters;
    assert_eq!(chips.len(), 1);
    assert_eq!(
        chips[0].values,
        vec![PropValue::text("sm"), PropValue::text("lg")]
    );
}
