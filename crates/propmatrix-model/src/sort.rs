//! Multi-key sort state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered sort keys, highest priority first, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction(&self, field: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|key| key.field == field)
            .map(|key| key.direction)
    }

    /// Appends `field` ascending, or flips its direction in place.
    pub fn toggle(&mut self, field: &str) {
        if let Some(key) = self.keys.iter_mut().find(|key| key.field == field) {
            key.direction = key.direction.toggled();
        } else {
            self.keys.push(SortKey {
                field: field.to_string(),
                direction: SortDirection::Asc,
            });
        }
    }

    /// Sets the direction for `field`, appending it when absent.
    pub fn set_direction(&mut self, field: &str, direction: SortDirection) {
        if let Some(key) = self.keys.iter_mut().find(|key| key.field == field) {
            key.direction = direction;
        } else {
            self.keys.push(SortKey {
                field: field.to_string(),
                direction,
            });
        }
    }

    /// Drops `field`, keeping the relative order of the remaining keys.
    pub fn remove(&mut self, field: &str) {
        self.keys.retain(|key| key.field != field);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
