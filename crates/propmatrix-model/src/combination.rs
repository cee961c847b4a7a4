//! Generated property combinations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::field::Dimension;
use crate::value::PropValue;

/// Label of the single combination produced for a schema with no dimensions.
pub const NO_PROPS_LABEL: &str = "(no props)";

/// One point in the Cartesian product of all dimensions.
///
/// `values` holds one entry per dimension in dimension order. Combinations
/// are immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCombination {
    /// Position in generation order.
    pub ordinal: usize,
    pub values: IndexMap<String, PropValue>,
    pub label: String,
}

impl PropertyCombination {
    pub fn get(&self, field: &str) -> Option<&PropValue> {
        self.values.get(field)
    }

    /// The props bundle as a JSON object, for handing to a render callback.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
                .collect(),
        )
    }
}

/// Output of the combination generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub combinations: Vec<PropertyCombination>,
    /// True Cartesian-product size, saturating at `u64::MAX`.
    pub total: u64,
    /// `combinations.len() < total`.
    pub truncated: bool,
    pub dimensions: Vec<Dimension>,
}

impl GenerationResult {
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.name == name)
    }

    /// User-facing disclosure of truncation, if any.
    pub fn truncation_notice(&self) -> Option<String> {
        self.truncated.then(|| {
            format!(
                "Showing {} of {} combinations",
                self.combinations.len(),
                self.total
            )
        })
    }
}
