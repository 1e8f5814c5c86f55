//! Diff engine: classify input nodes against the stored snapshot
//!
//! One invocation is a pure batch transform over two fully materialized node
//! lists. Both sides are indexed by persistent IRI, so matching is linear in
//! the number of nodes.

use crate::config::DiffConfig;
use crate::document::{graph_nodes, node_identifier};
use crate::entity::{Content, NodeRecord};
use crate::error::{Result, VersioningError};
use crate::hash::{content_eq, content_hash};
use crate::iri::{IriRef, ValueRef, VersionHash, VersionedIri};
use crate::payload::UpdatePayload;
use crate::reify::{flatten_reified, reify_node, PersistentIris};
use aspect_vocab::jsonld;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde_json::Value as JsonValue;

/// Whether nodes missing from the input are deleted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffMode {
    /// Input is the whole current truth; absent nodes are deleted
    CompleteUpdate,
    /// Input is a partial set of additions and updates; nothing is deleted
    Entries,
}

impl DiffMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffMode::CompleteUpdate => "complete",
            DiffMode::Entries => "entries",
        }
    }
}

/// Outcome for one reified input record
enum Classified {
    New(VersionHash),
    Updated(VersionHash, VersionedIri),
    Unchanged,
}

pub struct DiffEngine {
    config: DiffConfig,
}

impl DiffEngine {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Map `f` over `records`, on the rayon pool when parallelism is enabled.
    /// Output order follows input order either way. Workers run inside the
    /// caller's span.
    fn map_records<T, F>(&self, records: &[NodeRecord], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&NodeRecord) -> T + Sync + Send,
    {
        if self.config.parallel {
            let parent = tracing::Span::current();
            records
                .par_iter()
                .map(|record| {
                    let _p = parent.enter();
                    f(record)
                })
                .collect()
        } else {
            records.iter().map(f).collect()
        }
    }

    pub fn diff(
        &self,
        input: &JsonValue,
        existing: &JsonValue,
        mode: DiffMode,
    ) -> Result<UpdatePayload> {
        let input_nodes = graph_nodes(input)?;
        let existing_nodes = graph_nodes(existing)?;

        let span = tracing::info_span!(
            "graph_diff",
            mode = mode.as_str(),
            input_nodes = input_nodes.len(),
            existing_nodes = existing_nodes.len(),
            rayon_threads = rayon::current_num_threads()
        );
        let _guard = span.enter();

        let info = self.config.version_info.resolve();

        let input_records = input_nodes
            .into_iter()
            .map(|node| Ok(NodeRecord::entity(node_identifier(&node)?, node)))
            .collect::<Result<Vec<_>>>()?;
        let stored_records = existing_nodes
            .iter()
            .map(NodeRecord::from_stored_node)
            .collect::<Result<Vec<_>>>()?;

        let universe: PersistentIris = input_records
            .iter()
            .chain(stored_records.iter())
            .map(|record| record.persistent_iri().as_str().to_string())
            .collect();

        // Reify
        let reserved = &self.config.reserved;
        let reified = flatten_reified(self.map_records(&input_records, |record| {
            reify_node(record, &universe, reserved)
        }));
        tracing::debug!(
            entities = input_records.len(),
            reified = reified.len(),
            "reified input"
        );

        // Existing, back in persistent form; the last stored version of an IRI wins
        let mut stored: Vec<NodeRecord> = Vec::with_capacity(stored_records.len());
        let mut stored_index: FxHashMap<IriRef, usize> =
            FxHashMap::with_capacity_and_hasher(stored_records.len(), Default::default());
        for record in stored_records {
            let record = record.with_content(unversion_content(record.content(), &universe));
            match stored_index.get(record.persistent_iri()) {
                Some(&pos) => {
                    tracing::debug!(
                        iri = %record.persistent_iri(),
                        dropped = ?stored[pos].version().map(VersionedIri::as_str),
                        "duplicate stored version; keeping the later one"
                    );
                    stored[pos] = record;
                }
                None => {
                    stored_index.insert(record.persistent_iri().clone(), stored.len());
                    stored.push(record);
                }
            }
        }
        tracing::debug!(parsed = stored.len(), "parsed existing");

        // Match and classify
        let mut input_index: FxHashMap<&IriRef, usize> =
            FxHashMap::with_capacity_and_hasher(reified.len(), Default::default());
        for (pos, record) in reified.iter().enumerate() {
            if input_index.insert(record.persistent_iri(), pos).is_some() {
                return Err(VersioningError::DuplicateIdentifier {
                    iri: record.persistent_iri().to_string(),
                });
            }
        }

        let classified = self
            .map_records(&reified, |record| {
                classify(record, stored_index.get(record.persistent_iri()).map(|&pos| &stored[pos]))
            })
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let mut versioned = Vec::new();
        let (mut new, mut updated, mut unchanged) = (0usize, 0usize, 0usize);
        for (record, outcome) in reified.iter().zip(classified) {
            match outcome {
                Classified::New(hash) => {
                    new += 1;
                    versioned.push(record.first_version(&hash, &info));
                }
                Classified::Updated(hash, previous) => {
                    updated += 1;
                    versioned.push(record.derived_version(&hash, &info, &previous));
                }
                Classified::Unchanged => unchanged += 1,
            }
        }
        tracing::debug!(new, updated, unchanged, "classified input");

        // Version map: stored versions overlaid by the ones minted here
        let mut versions: FxHashMap<String, String> =
            FxHashMap::with_capacity_and_hasher(stored.len() + versioned.len(), Default::default());
        for record in stored.iter().chain(versioned.iter()) {
            if let Some(version) = record.version() {
                versions.insert(
                    record.persistent_iri().as_str().to_string(),
                    version.as_str().to_string(),
                );
            }
        }

        let update: Vec<NodeRecord> = versioned
            .iter()
            .map(|record| record.with_content(rewrite_content(record.content(), &versions)))
            .collect();

        let delete: Vec<VersionedIri> = match mode {
            DiffMode::CompleteUpdate => stored
                .iter()
                .filter(|record| !input_index.contains_key(record.persistent_iri()))
                .filter_map(|record| record.version().cloned())
                .collect(),
            DiffMode::Entries => Vec::new(),
        };
        tracing::debug!(deleted = delete.len(), "assembled payload");

        Ok(UpdatePayload { update, delete })
    }
}

fn classify(record: &NodeRecord, stored: Option<&NodeRecord>) -> Result<Classified> {
    tracing::trace!(iri = %record.persistent_iri(), stored = stored.is_some(), "classify");
    match stored {
        None => Ok(Classified::New(content_hash(
            record.persistent_iri().as_str(),
            record.content(),
        )?)),
        Some(previous) if content_eq(previous.content(), record.content())? => {
            Ok(Classified::Unchanged)
        }
        Some(previous) => {
            let hash = content_hash(record.persistent_iri().as_str(), record.content())?;
            let version = previous.version().cloned().ok_or_else(|| {
                VersioningError::invalid_node(format!(
                    "stored node {} has no version",
                    previous.persistent_iri()
                ))
            })?;
            Ok(Classified::Updated(hash, version))
        }
    }
}

/// Walk string values outside `@type` and literal value objects
fn map_refs(value: &JsonValue, f: &impl Fn(&str) -> Option<String>) -> JsonValue {
    match value {
        JsonValue::String(s) => f(s).map_or_else(|| value.clone(), JsonValue::String),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(|v| map_refs(v, f)).collect()),
        JsonValue::Object(map) if map.contains_key(jsonld::VALUE) => value.clone(),
        JsonValue::Object(map) => JsonValue::Object(map_content(map, f)),
        other => other.clone(),
    }
}

fn map_content(content: &Content, f: &impl Fn(&str) -> Option<String>) -> Content {
    content
        .iter()
        .map(|(key, value)| {
            let value = if key == jsonld::TYPE {
                value.clone()
            } else {
                map_refs(value, f)
            };
            (key.clone(), value)
        })
        .collect()
}

/// Versioned references to tracked nodes, back to their persistent IRI
fn unversion_content(content: &Content, universe: &PersistentIris) -> Content {
    map_content(content, &|s: &str| match ValueRef::classify(s) {
        ValueRef::Versioned(v) if universe.contains(v.persistent_iri().as_str()) => {
            Some(v.persistent_iri().as_str().to_string())
        }
        _ => None,
    })
}

/// Persistent references to their current version
fn rewrite_content(content: &Content, versions: &FxHashMap<String, String>) -> Content {
    map_content(content, &|s: &str| versions.get(s).cloned())
}
