//! Minimal JSON-LD processing for versioned graph documents
//!
//! - Context parsing
//! - IRI and document expansion
//! - Compaction against the empty context (absolute IRIs, unwrapped values)
//! - Canonical JSON (RFC 8785, optionally with arrays treated as sets)
//! - Triple emission into `aspect-graph-ir` sinks
//!
//! # Example
//!
//! ```
//! use aspect_graph_json_ld::{expand, expand_iri, parse_context, to_absolute};
//! use serde_json::json;
//!
//! let ctx = parse_context(&json!({
//!     "sor": "http://rdf.equinor.com/ontology/sor#",
//!     "@vocab": "http://rdf.equinor.com/ontology/mel#"
//! })).unwrap();
//! assert_eq!(expand_iri("MelRow", &ctx), "http://rdf.equinor.com/ontology/mel#MelRow");
//!
//! let doc = json!({
//!     "@context": {"sor": "http://rdf.equinor.com/ontology/sor#"},
//!     "@id": "sor:Row1",
//!     "sor:name": "Row one"
//! });
//! let absolute = to_absolute(&expand(&doc).unwrap());
//! assert_eq!(absolute, json!({
//!     "@id": "http://rdf.equinor.com/ontology/sor#Row1",
//!     "http://rdf.equinor.com/ontology/sor#name": "Row one"
//! }));
//! ```

pub mod compact;
pub mod context;
pub mod error;
pub mod expand;
pub mod iri;
pub mod normalize;

// GraphSink adapter for emitting triples to aspect-graph-ir
pub mod adapter;

pub use compact::to_absolute;
pub use context::{Container, ContextEntry, ParsedContext, TypeValue};
pub use error::{JsonLdError, Result};
pub use normalize::{Algorithm, NormalizeOptions};

use serde_json::Value as JsonValue;

/// Parse a JSON-LD context (string, object, array, or null)
pub fn parse_context(context: &JsonValue) -> Result<ParsedContext> {
    ParsedContext::parse(None, context)
}

/// Expand a compact IRI using @vocab resolution (properties and types)
pub fn expand_iri(compact_iri: &str, context: &ParsedContext) -> String {
    expand::iri(compact_iri, context, true)
}

/// Expand a JSON-LD document using its embedded `@context`
pub fn expand(document: &JsonValue) -> Result<JsonValue> {
    expand_with_context(document, &ParsedContext::new())
}

/// Expand a document starting from an externally supplied context
pub fn expand_with_context(document: &JsonValue, context: &ParsedContext) -> Result<JsonValue> {
    expand::node(document, context)
}

/// Canonical JSON with arrays treated as unordered sets (`@list` excepted)
pub fn normalize_data(data: &JsonValue) -> String {
    normalize::normalize_with_options(
        data,
        &NormalizeOptions {
            algorithm: Algorithm::UnorderedSets,
        },
    )
}
