//! Adapter for the `_zod.def.type` layout.

use serde_json::Value;

use crate::adapter::{
    BaseType, FieldIntrospector, NodeKind, SchemaLayout, enum_object_values, scalar_values,
};
use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZodV4Introspector;

fn def(node: &Value) -> Option<&Value> {
    node.get("_zod").and_then(|zod| zod.get("def"))
}

fn type_tag(node: &Value) -> &str {
    def(node)
        .and_then(|def| def.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

fn literal_values(node: &Value) -> Option<Vec<Value>> {
    if type_tag(node) != "literal" {
        return None;
    }
    def(node)
        .and_then(|def| def.get("values"))
        .and_then(Value::as_array)
        .cloned()
}

impl FieldIntrospector for ZodV4Introspector {
    fn layout(&self) -> SchemaLayout {
        SchemaLayout::V4
    }

    fn fields<'a>(&self, schema: &'a Value) -> Result<Vec<(&'a str, &'a Value)>> {
        let tag = type_tag(schema);
        if tag != "object" {
            return Err(SchemaError::NotAnObject {
                found: tag.to_string(),
            });
        }
        Ok(def(schema)
            .and_then(|def| def.get("shape"))
            .and_then(Value::as_object)
            .map(|shape| shape.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default())
    }

    // Descriptions live in the metadata registry, flattened onto the node.
    fn description<'a>(&self, node: &'a Value) -> Option<&'a str> {
        node.get("description").and_then(Value::as_str)
    }

    fn classify<'a>(&self, node: &'a Value) -> NodeKind<'a> {
        let Some(def) = def(node) else {
            return NodeKind::Base(BaseType::Unsupported("unknown".to_string()));
        };
        let tag = type_tag(node);
        let unsupported = || NodeKind::Base(BaseType::Unsupported(tag.to_string()));
        match tag {
            "optional" | "nullable" | "default" | "prefault" | "readonly" => {
                let Some(inner) = def.get("innerType") else {
                    return unsupported();
                };
                let default = matches!(tag, "default" | "prefault")
                    .then(|| def.get("defaultValue"))
                    .flatten();
                NodeKind::Wrapper {
                    inner,
                    default,
                    optional: tag == "optional",
                    nullable: tag == "nullable",
                }
            }
            "boolean" => NodeKind::Base(BaseType::Boolean),
            "string" => NodeKind::Base(BaseType::String),
            "number" | "int" => NodeKind::Base(BaseType::Number),
            "enum" => match def.get("entries").and_then(Value::as_object) {
                Some(entries) => NodeKind::Base(BaseType::Enum(enum_object_values(entries))),
                None => unsupported(),
            },
            "literal" => match def.get("values").and_then(Value::as_array) {
                Some(values) if values.len() == 1 => {
                    NodeKind::Base(BaseType::Literal(scalar_values(values)))
                }
                Some(values) => NodeKind::Base(BaseType::Enum(scalar_values(values))),
                None => unsupported(),
            },
            "union" => {
                let Some(options) = def.get("options").and_then(Value::as_array) else {
                    return unsupported();
                };
                let literals: Option<Vec<Vec<Value>>> = options.iter().map(literal_values).collect();
                match literals {
                    Some(groups) if !groups.is_empty() => {
                        let values: Vec<Value> = groups.into_iter().flatten().collect();
                        NodeKind::Base(BaseType::Enum(scalar_values(&values)))
                    }
                    _ => unsupported(),
                }
            }
            _ => unsupported(),
        }
    }
}
