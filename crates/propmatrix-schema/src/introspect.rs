//! Controls, dimensions and defaults derived from an object schema.

use indexmap::IndexMap;
use propmatrix_model::{ControlKind, Dimension, FieldDescriptor, PropValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::{
    BaseType, FieldIntrospector, NodeKind, SchemaLayout, detect_layout, introspector_for,
};
use crate::error::{Result, SchemaError};
use crate::label::humanize;

/// Upper bound on wrapper layers followed for one field.
///
/// Malformed or cyclic dumps stop here and the field is dropped.
pub const MAX_UNWRAP_DEPTH: usize = 16;

/// What the unwrap chain of a single field yielded.
struct Unwrapped<'a> {
    base: BaseType,
    default: Option<&'a Value>,
    description: Option<&'a str>,
    optional: bool,
    nullable: bool,
}

/// Introspector bound to the layout detected from one schema.
pub struct SchemaIntrospector {
    adapter: Box<dyn FieldIntrospector>,
}

impl SchemaIntrospector {
    /// Detects the layout once; every field is then read with that adapter.
    pub fn detect(schema: &Value) -> Result<Self> {
        let layout = detect_layout(schema)?;
        debug!(?layout, "detected schema layout");
        Ok(Self {
            adapter: introspector_for(layout),
        })
    }

    pub fn with_adapter(adapter: Box<dyn FieldIntrospector>) -> Self {
        Self { adapter }
    }

    pub fn layout(&self) -> SchemaLayout {
        self.adapter.layout()
    }

    /// One descriptor per supported field, in declaration order.
    ///
    /// Unsupported fields are dropped without error.
    pub fn controls(&self, schema: &Value) -> Result<Vec<FieldDescriptor>> {
        let fields = self.adapter.fields(schema)?;
        Ok(fields
            .into_iter()
            .filter_map(|(name, node)| {
                let unwrapped = self.unwrap_field(name, node)?;
                describe(name, unwrapped)
            })
            .collect())
    }

    /// Fields that act as combination axes, in declaration order.
    pub fn dimensions(&self, schema: &Value) -> Result<Vec<Dimension>> {
        Ok(self
            .controls(schema)?
            .iter()
            .filter_map(FieldDescriptor::dimension)
            .collect())
    }

    /// Default props bundle.
    ///
    /// The bulk pass takes every field's declared default. It fails when a
    /// declared default is not a representable scalar, or when a required
    /// supported field declares none; defaults are then rebuilt field by
    /// field from [`Self::controls`], which fills required fields with their
    /// implied default and only covers supported fields.
    pub fn defaults(&self, schema: &Value) -> Result<IndexMap<String, PropValue>> {
        match self.bulk_defaults(schema) {
            Ok(defaults) => Ok(defaults),
            Err(error @ SchemaError::InvalidDefault { .. }) => {
                warn!(%error, "default parsing failed, rebuilding per field");
                self.per_field_defaults(schema)
            }
            Err(error @ SchemaError::MissingDefault { .. }) => {
                debug!(%error, "rebuilding defaults per field");
                self.per_field_defaults(schema)
            }
            Err(error) => Err(error),
        }
    }

    fn per_field_defaults(&self, schema: &Value) -> Result<IndexMap<String, PropValue>> {
        Ok(self
            .controls(schema)?
            .into_iter()
            .filter(|control| control.declared_default || !control.optional)
            .filter_map(|control| control.default_value.map(|value| (control.name, value)))
            .collect())
    }

    fn bulk_defaults(&self, schema: &Value) -> Result<IndexMap<String, PropValue>> {
        let mut defaults = IndexMap::new();
        for (name, node) in self.adapter.fields(schema)? {
            let Some(unwrapped) = self.unwrap_field(name, node) else {
                continue;
            };
            let Some(raw) = unwrapped.default else {
                if !unwrapped.optional && describe(name, unwrapped).is_some() {
                    return Err(SchemaError::MissingDefault {
                        field: name.to_string(),
                    });
                }
                continue;
            };
            let value = PropValue::try_from(raw).map_err(|source| SchemaError::InvalidDefault {
                field: name.to_string(),
                source,
            })?;
            defaults.insert(name.to_string(), value);
        }
        Ok(defaults)
    }

    fn unwrap_field<'a>(&self, name: &str, node: &'a Value) -> Option<Unwrapped<'a>> {
        let mut current = node;
        let mut default = None;
        let mut description = None;
        let mut optional = false;
        let mut nullable = false;

        for _ in 0..MAX_UNWRAP_DEPTH {
            if description.is_none() {
                description = self.adapter.description(current);
            }
            match self.adapter.classify(current) {
                NodeKind::Wrapper {
                    inner,
                    default: layer_default,
                    optional: layer_optional,
                    nullable: layer_nullable,
                } => {
                    // The outermost default is the one applied at parse time.
                    if default.is_none() {
                        default = layer_default;
                    }
                    optional |= layer_optional;
                    nullable |= layer_nullable;
                    current = inner;
                }
                NodeKind::Base(base) => {
                    return Some(Unwrapped {
                        base,
                        default,
                        description,
                        optional,
                        nullable,
                    });
                }
            }
        }
        debug!(field = name, "wrapper chain too deep, dropping field");
        None
    }
}

fn describe(name: &str, unwrapped: Unwrapped<'_>) -> Option<FieldDescriptor> {
    let declared = unwrapped.default.and_then(|raw| match PropValue::try_from(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(field = name, %error, "ignoring non-scalar default");
            None
        }
    });

    let (control, values, fallback, enumerable) = match unwrapped.base {
        BaseType::Boolean => (
            ControlKind::Boolean,
            vec![PropValue::Bool(false), PropValue::Bool(true)],
            PropValue::Bool(false),
            true,
        ),
        BaseType::Enum(values) => {
            let first = values.first()?.clone();
            (ControlKind::Select, values, first, true)
        }
        BaseType::Literal(values) => {
            let literal = values.first()?.clone();
            let control = match literal {
                PropValue::Text(_) => ControlKind::Select,
                PropValue::Bool(_) => ControlKind::Boolean,
                PropValue::Number(_) => ControlKind::Number,
                PropValue::Null => {
                    debug!(field = name, "dropping null literal field");
                    return None;
                }
            };
            (control, values, literal, true)
        }
        BaseType::String => {
            let value = declared.clone().unwrap_or_else(|| PropValue::text(""));
            (ControlKind::Text, vec![value.clone()], value, false)
        }
        BaseType::Number => {
            let value = declared.clone().unwrap_or(PropValue::Number(0.0));
            (ControlKind::Number, vec![value.clone()], value, false)
        }
        BaseType::Unsupported(type_name) => {
            debug!(field = name, %type_name, "dropping unsupported field");
            return None;
        }
    };

    Some(FieldDescriptor {
        name: name.to_string(),
        label: humanize(name),
        description: unwrapped.description.map(str::to_string),
        control,
        declared_default: declared.is_some(),
        default_value: Some(declared.unwrap_or(fallback)),
        values,
        enumerable,
        optional: unwrapped.optional,
        nullable: unwrapped.nullable,
    })
}

/// Descriptors for every supported field of `schema`.
pub fn extract_controls(schema: &Value) -> Result<Vec<FieldDescriptor>> {
    SchemaIntrospector::detect(schema)?.controls(schema)
}

/// Combination dimensions of `schema`, in declaration order.
pub fn extract_dimensions(schema: &Value) -> Result<Vec<Dimension>> {
    SchemaIntrospector::detect(schema)?.dimensions(schema)
}

/// Default props bundle for `schema`.
pub fn schema_defaults(schema: &Value) -> Result<IndexMap<String, PropValue>> {
    SchemaIntrospector::detect(schema)?.defaults(schema)
}
