//! Adapter for the `_def.typeName` layout.

use serde_json::Value;

use crate::adapter::{
    BaseType, FieldIntrospector, NodeKind, SchemaLayout, enum_object_values, scalar_values,
};
use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZodV3Introspector;

fn def(node: &Value) -> Option<&Value> {
    node.get("_def")
}

fn type_name(node: &Value) -> &str {
    def(node)
        .and_then(|def| def.get("typeName"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

fn wrap<'a>(
    def: &'a Value,
    key: &str,
    name: &str,
    default: Option<&'a Value>,
    optional: bool,
    nullable: bool,
) -> NodeKind<'a> {
    match def.get(key) {
        Some(inner) => NodeKind::Wrapper {
            inner,
            default,
            optional,
            nullable,
        },
        None => NodeKind::Base(BaseType::Unsupported(name.to_string())),
    }
}

impl ZodV3Introspector {
    fn literal_of(&self, node: &Value) -> Option<Value> {
        (type_name(node) == "ZodLiteral")
            .then(|| def(node).and_then(|def| def.get("value")).cloned())
            .flatten()
    }

    fn union_of_literals(&self, options: &[Value]) -> BaseType {
        let literals: Option<Vec<Value>> = options.iter().map(|o| self.literal_of(o)).collect();
        match literals {
            Some(values) if !values.is_empty() => BaseType::Enum(scalar_values(&values)),
            _ => BaseType::Unsupported("ZodUnion".to_string()),
        }
    }
}

impl FieldIntrospector for ZodV3Introspector {
    fn layout(&self) -> SchemaLayout {
        SchemaLayout::V3
    }

    fn fields<'a>(&self, schema: &'a Value) -> Result<Vec<(&'a str, &'a Value)>> {
        let name = type_name(schema);
        if name != "ZodObject" {
            return Err(SchemaError::NotAnObject {
                found: name.to_string(),
            });
        }
        Ok(def(schema)
            .and_then(|def| def.get("shape"))
            .and_then(Value::as_object)
            .map(|shape| shape.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default())
    }

    fn description<'a>(&self, node: &'a Value) -> Option<&'a str> {
        def(node)
            .and_then(|def| def.get("description"))
            .and_then(Value::as_str)
    }

    fn classify<'a>(&self, node: &'a Value) -> NodeKind<'a> {
        let Some(def) = def(node) else {
            return NodeKind::Base(BaseType::Unsupported("unknown".to_string()));
        };
        let name = type_name(node);
        let wrapper = |key: &str, default: Option<&'a Value>, optional: bool, nullable: bool| {
            wrap(def, key, name, default, optional, nullable)
        };
        match name {
            "ZodOptional" => wrapper("innerType", None, true, false),
            "ZodNullable" => wrapper("innerType", None, false, true),
            "ZodDefault" => wrapper("innerType", def.get("defaultValue"), false, false),
            "ZodReadonly" => wrapper("innerType", None, false, false),
            "ZodEffects" => wrapper("schema", None, false, false),
            "ZodBoolean" => NodeKind::Base(BaseType::Boolean),
            "ZodString" => NodeKind::Base(BaseType::String),
            "ZodNumber" => NodeKind::Base(BaseType::Number),
            "ZodEnum" => NodeKind::Base(
                def.get("values")
                    .and_then(Value::as_array)
                    .map_or_else(
                        || BaseType::Unsupported(name.to_string()),
                        |values| BaseType::Enum(scalar_values(values)),
                    ),
            ),
            "ZodNativeEnum" => NodeKind::Base(
                def.get("values")
                    .and_then(Value::as_object)
                    .map_or_else(
                        || BaseType::Unsupported(name.to_string()),
                        |entries| BaseType::Enum(enum_object_values(entries)),
                    ),
            ),
            "ZodLiteral" => NodeKind::Base(match def.get("value") {
                Some(value) => BaseType::Literal(scalar_values(std::slice::from_ref(value))),
                None => BaseType::Unsupported(name.to_string()),
            }),
            "ZodUnion" => NodeKind::Base(
                def.get("options")
                    .and_then(Value::as_array)
                    .map_or_else(
                        || BaseType::Unsupported(name.to_string()),
                        |options| self.union_of_literals(options),
                    ),
            ),
            other => NodeKind::Base(BaseType::Unsupported(other.to_string())),
        }
    }
}
