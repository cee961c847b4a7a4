//! Field descriptors and combination dimensions.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::PropValue;

/// The interactive control generated for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Number,
    Boolean,
    Select,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
        }
    }

    /// Whether the control enumerates a closed value set.
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Self::Boolean | Self::Select)
    }
}

/// Everything derived from one supported schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Declared key within the object schema.
    pub name: String,
    /// Human label derived from `name` alone.
    pub label: String,
    /// Author-supplied help text, shown as a tooltip.
    pub description: Option<String>,
    pub control: ControlKind,
    /// Effective default used to seed the control.
    pub default_value: Option<PropValue>,
    /// True when the schema declared the default (not a fallback).
    pub declared_default: bool,
    /// Discrete values this field can take, in declaration order.
    pub values: Vec<PropValue>,
    /// True for booleans, closed sets and literals.
    pub enumerable: bool,
    pub optional: bool,
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Returns the combination dimension for this field, if it is one.
    ///
    /// Booleans, closed sets and fixed literals always qualify. Free-form
    /// text and numbers only qualify with a declared default, which becomes
    /// their single value.
    pub fn dimension(&self) -> Option<Dimension> {
        let values = if self.enumerable {
            self.values.clone()
        } else if self.declared_default {
            self.default_value.clone().into_iter().collect()
        } else {
            return None;
        };
        Dimension::new(self.name.clone(), self.label.clone(), values).ok()
    }
}

/// A combinatorial axis: a field with at least one enumerable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub label: String,
    values: Vec<PropValue>,
}

impl Dimension {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        values: Vec<PropValue>,
    ) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(ModelError::EmptyDimension { name });
        }
        Ok(Self {
            name,
            label: label.into(),
            values,
        })
    }

    /// Boolean dimension with values `[false, true]`.
    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            values: vec![PropValue::Bool(false), PropValue::Bool(true)],
        }
    }

    pub fn values(&self) -> &[PropValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &PropValue) -> bool {
        self.values.contains(value)
    }
}
