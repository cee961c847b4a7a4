//! Per-dimension value allowlists.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::Dimension;
use crate::value::PropValue;

/// Allowed values per dimension name.
///
/// An empty or absent set means the dimension is unrestricted. Sets only
/// hold values drawn from their dimension, which the mutators enforce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    allowed: BTreeMap<String, BTreeSet<PropValue>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allowed set for a dimension; `None` when unrestricted.
    pub fn allowed(&self, dimension: &str) -> Option<&BTreeSet<PropValue>> {
        self.allowed.get(dimension).filter(|set| !set.is_empty())
    }

    /// Iterates restricted dimensions and their allowed values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<PropValue>)> {
        self.allowed
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(name, set)| (name.as_str(), set))
    }

    pub fn is_active(&self) -> bool {
        self.iter().next().is_some()
    }

    /// Adds `value` to the dimension's allowlist, or removes it if present.
    pub fn toggle_value(&mut self, dimension: &Dimension, value: PropValue) -> Result<()> {
        ensure_member(dimension, &value)?;
        let set = self.allowed.entry(dimension.name.clone()).or_default();
        if !set.remove(&value) {
            set.insert(value);
        }
        if set.is_empty() {
            self.allowed.remove(&dimension.name);
        }
        Ok(())
    }

    /// Replaces the dimension's allowlist.
    pub fn set_allowed(
        &mut self,
        dimension: &Dimension,
        values: impl IntoIterator<Item = PropValue>,
    ) -> Result<()> {
        let mut set = BTreeSet::new();
        for value in values {
            ensure_member(dimension, &value)?;
            set.insert(value);
        }
        if set.is_empty() {
            self.allowed.remove(&dimension.name);
        } else {
            self.allowed.insert(dimension.name.clone(), set);
        }
        Ok(())
    }

    pub fn clear_dimension(&mut self, dimension: &str) {
        self.allowed.remove(dimension);
    }

    pub fn clear(&mut self) {
        self.allowed.clear();
    }
}

fn ensure_member(dimension: &Dimension, value: &PropValue) -> Result<()> {
    if dimension.contains(value) {
        Ok(())
    } else {
        Err(ModelError::ValueNotInDimension {
            dimension: dimension.name.clone(),
            value: value.clone(),
        })
    }
}
