//! Canonical content hashing
//!
//! A node's content is hashed over its RDF triples, not over its JSON layout:
//!
//! 1. Blank nodes are relabeled bottom-up. Each anonymous sub-object gets
//!    `_:c<sha256 of its canonical JSON without @id>`, so identical
//!    sub-structures get identical labels whatever label the input used.
//! 2. `{"@id": subject, ...content}` is expanded and materialized as triples.
//! 3. The graph is canonicalized and rendered as one N-Triples line per triple.
//! 4. Each line is SHA-256 hashed and the digests are XOR-combined, so the
//!    result does not depend on emission order.
//!
//! Content with no triples, such as an entity whose only properties were
//! references moved out into edges, hashes to the all-zero digest.

use crate::entity::Content;
use crate::error::Result;
use crate::iri::VersionHash;
use aspect_graph_ir::GraphCollectorSink;
use aspect_graph_json_ld::{adapter::to_graph_events, expand, normalize_data};
use aspect_vocab::{jsonld, prov};
use serde_json::{Map, Value as JsonValue};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Subject used when comparing content independently of identity
pub const PLACEHOLDER_SUBJECT: &str = "urn:aspect:self";

/// Canonical N-Triples lines of `content` stated about `subject`
pub fn canonical_lines(subject: &str, content: &Content) -> Result<BTreeSet<String>> {
    let mut node = Map::new();
    node.insert(jsonld::ID.to_string(), JsonValue::String(subject.to_string()));
    for (key, value) in content {
        if key == jsonld::ID || key == prov::WAS_DERIVED_FROM {
            continue;
        }
        node.insert(key.clone(), relabel_blank_nodes(value));
    }

    let expanded = expand(&JsonValue::Object(node))?;
    let mut sink = GraphCollectorSink::new();
    to_graph_events(&expanded, &mut sink)?;

    let mut graph = sink.finish();
    graph.canonicalize();
    Ok(graph.ntriples_lines().into_iter().collect())
}

/// XOR of the per-line SHA-256 digests
pub fn combine_lines<'a>(lines: impl IntoIterator<Item = &'a String>) -> VersionHash {
    let mut acc = [0u8; 32];
    for line in lines {
        let digest = Sha256::digest(line.as_bytes());
        for (a, b) in acc.iter_mut().zip(digest.iter()) {
            *a ^= b;
        }
    }
    VersionHash::from_bytes(acc)
}

pub fn content_hash(subject: &str, content: &Content) -> Result<VersionHash> {
    Ok(combine_lines(&canonical_lines(subject, content)?))
}

/// Content equality, independent of identifier, property order and blank labels
pub fn content_eq(a: &Content, b: &Content) -> Result<bool> {
    Ok(canonical_lines(PLACEHOLDER_SUBJECT, a)? == canonical_lines(PLACEHOLDER_SUBJECT, b)?)
}

fn is_anonymous(map: &Map<String, JsonValue>) -> bool {
    match map.get(jsonld::ID) {
        None => true,
        Some(JsonValue::String(id)) => id.starts_with(jsonld::BLANK_PREFIX),
        Some(_) => false,
    }
}

/// Replace blank node labels with labels derived from their own structure
fn relabel_blank_nodes(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(relabel_blank_nodes).collect()),
        JsonValue::Object(map) if map.contains_key(jsonld::VALUE) => value.clone(),
        JsonValue::Object(map) if map.contains_key(jsonld::LIST) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), relabel_blank_nodes(v)))
                .collect(),
        ),
        JsonValue::Object(map) => {
            let mut node: Map<String, JsonValue> = map
                .iter()
                .filter(|(k, _)| k.as_str() != jsonld::ID)
                .map(|(k, v)| (k.clone(), relabel_blank_nodes(v)))
                .collect();

            let id = if is_anonymous(map) {
                let canonical = normalize_data(&JsonValue::Object(node.clone()));
                let digest = Sha256::digest(canonical.as_bytes());
                JsonValue::String(format!("{}c{}", jsonld::BLANK_PREFIX, hex::encode(digest)))
            } else {
                map.get(jsonld::ID).cloned().unwrap_or(JsonValue::Null)
            };
            node.insert(jsonld::ID.to_string(), id);
            JsonValue::Object(node)
        }
        scalar => scalar.clone(),
    }
}
