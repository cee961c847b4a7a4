//! Versioned reflection adapters.

use propmatrix_model::PropValue;
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::v3::ZodV3Introspector;
use crate::v4::ZodV4Introspector;

/// Internal layout of a dumped schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaLayout {
    /// `_def.typeName` nodes.
    V3,
    /// `_zod.def.type` nodes.
    V4,
}

impl SchemaLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V3 => "v3",
            Self::V4 => "v4",
        }
    }
}

/// The base type found after unwrapping a field.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    Boolean,
    String,
    Number,
    /// Closed set of permitted values, in declaration order.
    Enum(Vec<PropValue>),
    /// One or more fixed literal values.
    Literal(Vec<PropValue>),
    /// Anything else, tagged with its type name.
    Unsupported(String),
}

/// One step of the unwrap chain.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    Wrapper {
        inner: &'a Value,
        default: Option<&'a Value>,
        optional: bool,
        nullable: bool,
    },
    Base(BaseType),
}

/// Reflection over one schema library layout.
///
/// Implementations only read the dump; unsupported shapes are reported as
/// [`BaseType::Unsupported`] rather than errors.
pub trait FieldIntrospector {
    fn layout(&self) -> SchemaLayout;

    /// Declared fields of an object schema, in declaration order.
    fn fields<'a>(&self, schema: &'a Value) -> Result<Vec<(&'a str, &'a Value)>>;

    /// Author-supplied description attached to this node, if any.
    fn description<'a>(&self, node: &'a Value) -> Option<&'a str>;

    fn classify<'a>(&self, node: &'a Value) -> NodeKind<'a>;
}

/// Detects the layout from version-specific markers on the root node.
pub fn detect_layout(schema: &Value) -> Result<SchemaLayout> {
    if schema.get("_zod").is_some_and(Value::is_object) {
        Ok(SchemaLayout::V4)
    } else if schema
        .get("_def")
        .and_then(|def| def.get("typeName"))
        .is_some_and(Value::is_string)
    {
        Ok(SchemaLayout::V3)
    } else {
        Err(SchemaError::UnrecognizedLayout)
    }
}

pub(crate) fn introspector_for(layout: SchemaLayout) -> Box<dyn FieldIntrospector> {
    match layout {
        SchemaLayout::V3 => Box::new(ZodV3Introspector),
        SchemaLayout::V4 => Box::new(ZodV4Introspector),
    }
}

/// Literal values from a JSON array, skipping anything non-scalar.
pub(crate) fn scalar_values(values: &[Value]) -> Vec<PropValue> {
    values
        .iter()
        .filter_map(|value| PropValue::try_from(value).ok())
        .collect()
}

/// Values of an enum-like object, dropping numeric reverse-mapping keys.
pub(crate) fn enum_object_values(entries: &serde_json::Map<String, Value>) -> Vec<PropValue> {
    entries
        .iter()
        .filter(|(key, _)| key.parse::<f64>().is_err())
        .filter_map(|(_, value)| PropValue::try_from(value).ok())
        .collect()
}
