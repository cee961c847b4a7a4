//! Schema introspection for the prop-combination matrix.
//!
//! A story registers an object-shaped validation schema, dumped as JSON from
//! the validation library's internal representation. This crate reflects
//! over that dump and derives, per field, the control to render and the
//! values the field contributes to combination generation.
//!
//! Two internal layouts are understood, each through its own
//! [`FieldIntrospector`] adapter. The layout is detected once per schema:
//!
//! - [`SchemaLayout::V3`]: nodes carry `_def.typeName` (`ZodBoolean`, ...)
//! - [`SchemaLayout::V4`]: nodes carry `_zod.def.type` (`boolean`, ...)
//!
//! # Example
//!
//! ```
//! use propmatrix_schema::extract_dimensions;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "_def": {
//!         "typeName": "ZodObject",
//!         "shape": {
//!             "disabled": { "_def": { "typeName": "ZodBoolean" } },
//!             "size": { "_def": { "typeName": "ZodEnum", "values": ["sm", "lg"] } }
//!         }
//!     }
//! });
//! let dimensions = extract_dimensions(&schema).unwrap();
//! assert_eq!(dimensions.len(), 2);
//! assert_eq!(dimensions[0].label, "Disabled");
//! ```

mod adapter;
mod error;
mod introspect;
pub mod label;
mod v3;
mod v4;

pub use adapter::{BaseType, FieldIntrospector, NodeKind, SchemaLayout, detect_layout};
pub use error::{Result, SchemaError};
pub use introspect::{
    MAX_UNWRAP_DEPTH, SchemaIntrospector, extract_controls, extract_dimensions, schema_defaults,
};
pub use label::humanize;
pub use v3::ZodV3Introspector;
pub use v4::ZodV4Introspector;
