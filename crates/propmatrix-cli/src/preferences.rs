//! Viewer preferences on disk.
//!
//! Preferences are stored as JSON in the platform-specific config folder:
//! - macOS: ~/Library/Application Support/dev.propmatrix.propmatrix/
//! - Windows: %APPDATA%/propmatrix/propmatrix/config/
//! - Linux: ~/.config/propmatrix/

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use propmatrix_core::{FileStore, KeyValueStore, MemoryStore, ObservableStore};
use tracing::{debug, info, warn};

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "propmatrix";
const APP_NAME: &str = "propmatrix";
const PREFERENCES_FILENAME: &str = "preferences.json";

/// Path to the preferences file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn preferences_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(PREFERENCES_FILENAME))
}

/// Opens the preference store at `path`, or at [`preferences_path`].
///
/// Without any usable location preferences live in memory for this run.
pub fn open_preferences(path: Option<&Path>) -> Box<dyn KeyValueStore> {
    let Some(path) = path.map(Path::to_path_buf).or_else(preferences_path) else {
        warn!("Could not determine preferences path, changes will not be saved");
        return Box::new(MemoryStore::new());
    };
    debug!(path = %path.display(), "opening preferences");
    let mut store = ObservableStore::new(FileStore::open(path));
    store.subscribe(|key, value| info!(key, ?value, "preference changed"));
    Box::new(store)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn explicit_path_is_reopened() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILENAME);

        let mut store = open_preferences(Some(&path));
        assert_eq!(store.get("theme"), None);
        store.set("theme", json!("dark")).unwrap();
        drop(store);

        assert!(path.exists());
        assert_eq!(open_preferences(Some(&path)).get("theme"), Some(json!("dark")));
    }
}
