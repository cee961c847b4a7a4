use propmatrix_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The root carries neither a `_def` nor a `_zod` marker.
    #[error("unrecognized schema layout: expected a `_def` or `_zod` marker on the root")]
    UnrecognizedLayout,

    #[error("schema root is not an object schema (found {found})")]
    NotAnObject { found: String },

    #[error("invalid default for field '{field}'")]
    InvalidDefault {
        field: String,
        #[source]
        source: ModelError,
    },

    /// A required field declares no default to parse.
    #[error("required field '{field}' has no default")]
    MissingDefault { field: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
