//! Versioned, content-addressed graph diff engine
//!
//! Given the current truth as a JSON-LD graph and the previously stored
//! snapshot, compute the node versions to write and the versions to delete.
//!
//! # Design
//!
//! - **Persistent vs versioned IRIs**: every tracked node has a stable IRI;
//!   each distinct content gets `<persistent>/version/<hash>/<info>`
//! - **Canonical hashing**: SHA-256 per canonical N-Triples line, XOR
//!   combined, with blank nodes relabeled from their own structure
//! - **Edge reification**: references between tracked nodes become edge
//!   records addressed by their triple
//! - **Provenance**: every new version points at its predecessor via
//!   `prov:wasDerivedFrom` (`rdf:nil` for the first)
//!
//! # Example
//!
//! ```
//! use aspect_versioning::{handle_graph_complete_update_with_config, DiffConfig};
//! use serde_json::json;
//!
//! let input = json!({
//!     "@context": {
//!         "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
//!         "sor": "http://rdf.equinor.com/ontology/sor#"
//!     },
//!     "@graph": [{"@id": "sor:Row1", "rdfs:label": "An empty MEL Row"}]
//! });
//!
//! let config = DiffConfig::default().with_version_info("2022-05-01");
//! let payload = handle_graph_complete_update_with_config(&input, &json!({}), &config).unwrap();
//! assert_eq!(payload.update.len(), 1);
//! assert!(payload.delete.is_empty());
//! ```

pub mod config;
pub mod diff;
pub mod document;
pub mod entity;
mod error;
pub mod hash;
pub mod iri;
pub mod payload;
pub mod reify;

pub use config::{DiffConfig, ReservedProperties, VersionInfoPolicy};
pub use diff::{DiffEngine, DiffMode};
pub use entity::{Content, NodeRecord, PersistentEntity, Provenance, RecordKind, VersionedEntity};
pub use error::{Result, VersioningError};
pub use iri::{IriRef, ValueRef, VersionHash, VersionedIri};
pub use payload::UpdatePayload;

use serde_json::Value as JsonValue;

/// Treat `input` as the whole current truth; stored nodes it lacks are deleted
pub fn handle_graph_complete_update(input: &JsonValue, existing: &JsonValue) -> Result<UpdatePayload> {
    handle_graph_complete_update_with_config(input, existing, &DiffConfig::default())
}

pub fn handle_graph_complete_update_with_config(
    input: &JsonValue,
    existing: &JsonValue,
    config: &DiffConfig,
) -> Result<UpdatePayload> {
    DiffEngine::new(config.clone()).diff(input, existing, DiffMode::CompleteUpdate)
}

/// Treat `input` as additions and updates only; nothing is deleted
pub fn handle_graph_entries(input: &JsonValue, existing: &JsonValue) -> Result<UpdatePayload> {
    handle_graph_entries_with_config(input, existing, &DiffConfig::default())
}

pub fn handle_graph_entries_with_config(
    input: &JsonValue,
    existing: &JsonValue,
    config: &DiffConfig,
) -> Result<UpdatePayload> {
    DiffEngine::new(config.clone()).diff(input, existing, DiffMode::Entries)
}
