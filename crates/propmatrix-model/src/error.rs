use thiserror::Error;

use crate::value::PropValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("dimension '{name}' must have at least one value")]
    EmptyDimension { name: String },
    #[error("unknown dimension '{name}'")]
    UnknownDimension { name: String },
    #[error("value {value} is not a member of dimension '{dimension}'")]
    ValueNotInDimension { dimension: String, value: PropValue },
    #[error("unsupported property value: {0}")]
    UnsupportedValue(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
