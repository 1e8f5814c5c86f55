//! The update/delete payload handed to the store

use crate::document::graph_nodes;
use crate::entity::{NodeRecord, VersionedEntity};
use crate::error::Result;
use crate::iri::{IriRef, VersionedIri};
use aspect_vocab::jsonld;
use rustc_hash::FxHashSet;
use serde_json::{json, Value as JsonValue};

/// Result of one diff invocation
///
/// Every record in `update` is versioned; use [`UpdatePayload::updates`] for
/// the typed view.
#[derive(Clone, Debug, Default)]
pub struct UpdatePayload {
    pub update: Vec<NodeRecord>,
    pub delete: Vec<VersionedIri>,
}

impl UpdatePayload {
    pub fn is_empty(&self) -> bool {
        self.update.is_empty() && self.delete.is_empty()
    }

    pub fn updates(&self) -> impl Iterator<Item = VersionedEntity<'_>> + '_ {
        self.update.iter().filter_map(NodeRecord::as_versioned)
    }

    /// ```json
    /// {"update": {"@graph": [..], "@context": {"@version": "1.1"}}, "delete": [..]}
    /// ```
    pub fn to_json(&self) -> JsonValue {
        let graph: Vec<JsonValue> = self.updates().map(|entity| entity.to_json()).collect();
        let delete: Vec<&str> = self.delete.iter().map(VersionedIri::as_str).collect();
        json!({
            "update": {
                "@graph": graph,
                "@context": { "@version": "1.1" }
            },
            "delete": delete
        })
    }

    /// The store snapshot after applying this payload to `existing`
    ///
    /// Deleted versions are dropped, as is every stored version of an updated
    /// persistent IRI. Updates are appended in payload order.
    pub fn apply_to(&self, existing: &JsonValue) -> Result<JsonValue> {
        let deleted: FxHashSet<&str> = self.delete.iter().map(VersionedIri::as_str).collect();
        let superseded: FxHashSet<&IriRef> = self
            .updates()
            .map(|entity| entity.version().persistent_iri())
            .collect();

        let mut graph = Vec::new();
        for node in graph_nodes(existing)? {
            let id = node
                .get(jsonld::ID)
                .and_then(JsonValue::as_str)
                .unwrap_or_default();
            if deleted.contains(id) {
                continue;
            }
            let version = VersionedIri::parse(id)?;
            if superseded.contains(version.persistent_iri()) {
                continue;
            }
            graph.push(JsonValue::Object(node));
        }
        graph.extend(self.updates().map(|entity| entity.to_json()));

        Ok(json!({
            "@context": { "@version": "1.1" },
            "@graph": graph
        }))
    }
}
