//! Integration tests for the command implementations.

use std::fs;
use std::path::PathBuf;

use propmatrix_cli::commands::{
    FilterArg, LayoutInput, inspect, layout, load_config, load_schema, matrix, parse_filter,
    parse_sort,
};
use propmatrix_cli::preferences::open_preferences;
use propmatrix_cli::summary::{controls_table, layout_table, matrix_table};
use propmatrix_core::{CellSize, FULL_RENDER_KEY, KeyValueStore, MemoryStore};
use propmatrix_model::{MatrixConfig, PropValue};
use propmatrix_schema::SchemaLayout;
use serde_json::{Value, json};
use tempfile::TempDir;

fn node(type_name: &str, extra: Value) -> Value {
    let mut def = json!({ "typeName": type_name });
    if let (Some(def), Some(extra)) = (def.as_object_mut(), extra.as_object()) {
        def.extend(extra.clone());
    }
    json!({ "_def": def })
}

fn button_schema() -> Value {
    node(
        "ZodObject",
        json!({
            "shape": {
                "disabled": node("ZodBoolean", json!({})),
                "size": node("ZodEnum", json!({ "values": ["sm", "lg"] })),
                "label": node("ZodDefault", json!({
                    "defaultValue": "Click me",
                    "innerType": node("ZodString", json!({ "description": "Button text" }))
                })),
                "icon": node("ZodOptional", json!({ "innerType": node("ZodString", json!({})) })),
                "onClick": node("ZodFunction", json!({}))
            }
        }),
    )
}

fn memory() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn inspect_lists_controls_and_dimensions() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "button.json", &button_schema().to_string());

    let report = inspect(&load_schema(&path).unwrap()).unwrap();
    assert_eq!(report.layout, SchemaLayout::V3);
    let names: Vec<&str> = report
        .controls
        .iter()
        .map(|control| control.name.as_str())
        .collect();
    assert_eq!(names, vec!["disabled", "size", "label", "icon"]);
    assert_eq!(report.dimensions, vec!["disabled", "size", "label"]);
    assert!(!report.is_dimension("icon"));
    assert_eq!(
        report.defaults,
        vec![
            ("disabled".to_string(), PropValue::Bool(false)),
            ("size".to_string(), PropValue::text("sm")),
            ("label".to_string(), PropValue::text("Click me")),
        ]
    );

    let table = controls_table(&report).to_string();
    assert!(table.contains("Button text"));
    assert!(table.contains("sm | lg"));
}

#[test]
fn unreadable_schema_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{ nope");
    let error = load_schema(&path).unwrap_err();
    assert!(format!("{error:#}").contains("broken.json"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "matrix.toml", "limit = 3\nfull_render = true\n");

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.limit, 3);
    assert!(config.full_render);
    assert_eq!(config.label_max_chars, MatrixConfig::DEFAULT_LABEL_MAX_CHARS);
    assert_eq!(load_config(None).unwrap(), MatrixConfig::default());
}

#[test]
fn matrix_applies_filters_and_sort() {
    let filters = vec![parse_filter("size=lg").unwrap()];
    let sorts = vec![parse_sort("disabled:desc").unwrap()];
    let schema = node(
        "ZodObject",
        json!({
            "shape": {
                "disabled": node("ZodBoolean", json!({})),
                "size": node("ZodEnum", json!({ "values": ["sm", "lg"] }))
            }
        }),
    );

    let report = matrix(
        "Button",
        schema,
        &MatrixConfig::default(),
        &filters,
        &sorts,
        memory(),
        None,
    )
    .unwrap();
    insta::assert_json_snapshot!(report, @r#"
    {
      "title": "Button",
      "shown": 2,
      "generated": 4,
      "total": 4,
      "truncation_notice": null,
      "filters": [
        {
          "dimension": "size",
          "label": "Size",
          "values": [
            "lg"
          ]
        }
      ],
      "sort": [
        {
          "field": "disabled",
          "direction": "desc"
        }
      ],
      "can_reset": true,
      "full_render": false,
      "dimensions": [
        {
          "name": "disabled",
          "label": "Disabled"
        },
        {
          "name": "size",
          "label": "Size"
        }
      ],
      "combinations": [
        {
          "ordinal": 3,
          "label": "disabled, lg",
          "props": {
            "disabled": true,
            "size": "lg"
          }
        },
        {
          "ordinal": 1,
          "label": "!disabled, lg",
          "props": {
            "disabled": false,
            "size": "lg"
          }
        }
      ]
    }
    "#);

    let table = matrix_table(&report).to_string();
    assert!(table.contains("disabled, lg"));
    assert!(!table.contains("sm"));
}

#[test]
fn matrix_discloses_truncation() {
    let config = MatrixConfig::default().with_limit(3);
    let report = matrix("Button", button_schema(), &config, &[], &[], memory(), None).unwrap();
    assert_eq!(report.combinations.len(), 3);
    assert_eq!(report.header.total, 4);
    assert_eq!(
        report.header.truncation_notice.as_deref(),
        Some("Showing 3 of 4 combinations")
    );
}

#[test]
fn matrix_rejects_unknown_filter_values() {
    let unknown_value = vec![FilterArg {
        dimension: "size".to_string(),
        value: "xl".to_string(),
    }];
    let error = matrix(
        "Button",
        button_schema(),
        &MatrixConfig::default(),
        &unknown_value,
        &[],
        memory(),
        None,
    )
    .unwrap_err();
    assert!(error.to_string().contains("xl"));

    let unknown_dimension = vec![parse_filter("color=red").unwrap()];
    let config = MatrixConfig::default();
    assert!(
        matrix("Button", button_schema(), &config, &unknown_dimension, &[], memory(), None)
            .is_err()
    );
    let unknown_sort = vec![parse_sort("color").unwrap()];
    assert!(
        matrix("Button", button_schema(), &config, &[], &unknown_sort, memory(), None).is_err()
    );
}

#[test]
fn layout_reports_geometry_and_window() {
    let mut input = LayoutInput::from_config(800.0, 100, &MatrixConfig::default());
    input.cell = CellSize::new(220.0, 100.0);
    input.viewport = 150.0;
    input.scroll = 1160.0;

    let report = layout(&input);
    assert_eq!(report.columns, 3);
    assert_eq!(report.rows, 34);
    assert_eq!(report.row_height, 116.0);
    assert_eq!(report.total_height, 3944.0);
    assert_eq!(report.visible_rows, 8..14);
    assert_eq!(report.visible_items, 24..42);

    let table = layout_table(&report).to_string();
    assert!(table.contains("8..14"));
    assert!(table.contains("3944"));
}

#[test]
fn full_render_flag_is_remembered_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config").join("preferences.json");
    let run = |full_render: Option<bool>| {
        let preferences = open_preferences(Some(&path));
        matrix(
            "Button",
            button_schema(),
            &MatrixConfig::default(),
            &[],
            &[],
            preferences,
            full_render,
        )
        .unwrap()
        .full_render
    };

    assert!(!run(None));
    assert!(run(Some(true)));
    assert!(run(None));
    assert!(!run(Some(false)));
    assert!(!run(None));

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, json!({ FULL_RENDER_KEY: false }));
}

#[test]
fn layout_clamps_scroll_far_past_the_end() {
    let mut input = LayoutInput::from_config(800.0, 100, &MatrixConfig::default());
    input.cell = CellSize::new(220.0, 100.0);
    input.viewport = 600.0;
    input.scroll = 1e30;

    let report = layout(&input);
    assert_eq!(report.visible_rows, 33..34);
    assert_eq!(report.visible_items, 99..100);
}

#[test]
fn layout_without_items_has_empty_window() {
    let report = layout(&LayoutInput::from_config(800.0, 0, &MatrixConfig::default()));
    assert_eq!(report.rows, 0);
    assert_eq!(report.visible_rows, 0..0);
    assert_eq!(report.visible_items, 0..0);
}
