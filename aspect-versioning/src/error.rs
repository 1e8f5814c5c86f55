//! Versioning error types

use aspect_graph_json_ld::adapter::AdapterError;
use aspect_graph_json_ld::JsonLdError;
use thiserror::Error;

/// Errors from a diff invocation
///
/// Every variant aborts the whole invocation; there is no partial payload.
#[derive(Error, Debug)]
pub enum VersioningError {
    /// A top-level graph node has no `@id`, or only a blank node label
    #[error("Graph node has no identifier: {node}")]
    MissingIdentifier { node: String },

    /// An existing node's `@id` is not `<persistent>/version/<hash>/<info>`
    #[error("Invalid versioned IRI: {iri}")]
    InvalidVersionedIri { iri: String },

    #[error("Document contains {count} graphs; only one is supported")]
    MultipleGraphsUnsupported { count: usize },

    /// A stored node lacks `prov:wasDerivedFrom`
    #[error("Versioned node {iri} has no provenance")]
    MissingProvenance { iri: String },

    #[error("Invalid IRI: {iri}")]
    InvalidIri { iri: String },

    /// Two input nodes share a persistent IRI
    #[error("Duplicate persistent identifier in input: {iri}")]
    DuplicateIdentifier { iri: String },

    #[error("Invalid node: {message}")]
    InvalidNode { message: String },

    #[error("JSON-LD error: {0}")]
    JsonLd(#[from] JsonLdError),

    #[error("Triple materialization error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl VersioningError {
    pub fn invalid_node(message: impl Into<String>) -> Self {
        VersioningError::InvalidNode {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        VersioningError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VersioningError>;
