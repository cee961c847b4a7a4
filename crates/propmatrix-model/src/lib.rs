//! Data model for the prop-combination matrix.
//!
//! These types are shared by the schema introspector, the combination
//! generator, the filter/sort engine and the matrix view:
//!
//! - [`PropValue`]: a scalar property value with a total order
//! - [`FieldDescriptor`] / [`Dimension`]: what a schema field contributes
//! - [`PropertyCombination`] / [`GenerationResult`]: points of the Cartesian product
//! - [`FilterState`] / [`SortState`]: user-session view state
//! - [`MatrixConfig`]: tunable product constants

pub mod combination;
pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod sort;
pub mod value;

pub use combination::{GenerationResult, NO_PROPS_LABEL, PropertyCombination};
pub use config::MatrixConfig;
pub use error::{ModelError, Result};
pub use field::{ControlKind, Dimension, FieldDescriptor};
pub use filter::FilterState;
pub use sort::{SortDirection, SortKey, SortState};
pub use value::PropValue;
