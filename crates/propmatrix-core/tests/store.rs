use std::fs;

use propmatrix_core::{FileStore, KeyValueStore};
use serde_json::json;

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs").join("viewer.json");

    let mut store = FileStore::open(&path);
    assert_eq!(store.get("propmatrix.fullRender"), None);
    store.set_as("propmatrix.fullRender", &true).unwrap();
    store.set("theme", json!("dark")).unwrap();

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get_as::<bool>("propmatrix.fullRender"), Some(true));
    assert_eq!(reopened.get("theme"), Some(json!("dark")));
}

#[test]
fn file_store_remove_rewrites_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("viewer.json");

    let mut store = FileStore::open(&path);
    store.set("theme", json!("dark")).unwrap();
    store.remove("theme").unwrap();

    assert_eq!(FileStore::open(&path).get("theme"), None);
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("viewer.json");
    fs::write(&path, "{ not json").unwrap();

    let mut store = FileStore::open(&path);
    assert_eq!(store.get("theme"), None);
    store.set("theme", json!("light")).unwrap();
    assert_eq!(FileStore::open(&path).get("theme"), Some(json!("light")));
}
