use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum JsonLdError {
    #[error("Invalid context: {message}")]
    InvalidContext { message: String },

    #[error("Invalid IRI mapping for term '{term}'")]
    InvalidIriMapping { term: String },

    #[error("@language cannot be used for values with a specified @type")]
    LanguageWithType,

    #[error("Sequential values within sequential values not allowed at path: {path:?}")]
    NestedSequence { path: Vec<JsonValue> },

    #[error("Invalid JSON-LD structure at {path:?}: {message}")]
    InvalidStructure { path: Vec<JsonValue>, message: String },
}

pub type Result<T> = std::result::Result<T, JsonLdError>;
