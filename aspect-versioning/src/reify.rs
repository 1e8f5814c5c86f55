//! Edge reification
//!
//! References from an entity to another tracked node (any IRI in the
//! persistent-IRI universe) are moved out of the entity's content into edge
//! records of their own. An edge's identifier is derived from its triple:
//!
//! ```text
//! <subject>/<sha256(predicate) hex, 32 chars>/<sha256(object) hex, 32 chars>
//! ```
//!
//! so the same triple always reifies to the same edge.
//!
//! A reference found inside an anonymous sub-object still gets the top-level
//! entity as its subject. The property steps leading to it are kept on the
//! edge under [`NESTED_PATH`], so [`inline_edges`] can put it back where it
//! was. A step is the property IRI, followed by `" <index>"` when the
//! sub-object sat in an array. For such edges the predicate segment of the
//! identifier hashes the steps and the predicate joined by newlines.

use crate::config::ReservedProperties;
use crate::entity::{Content, NodeRecord};
use crate::iri::IriRef;
use aspect_vocab::{jsonld, rdf};
use rustc_hash::FxHashSet;
use serde_json::{json, Value as JsonValue};
use sha2::{Digest, Sha256};

/// Persistent IRIs known to the current invocation
pub type PersistentIris = FxHashSet<String>;

/// Edge property holding the steps to a reference found in a sub-object
pub const NESTED_PATH: &str = "urn:aspect:nestedPath";

const EDGE_SEGMENT_LEN: usize = 32;

fn edge_segment(iri: &str) -> String {
    let mut hex = hex::encode(Sha256::digest(iri.as_bytes()));
    hex.truncate(EDGE_SEGMENT_LEN);
    hex
}

pub fn edge_iri(subject: &IriRef, predicate: &str, object: &str) -> IriRef {
    subject.join_segments(&[&edge_segment(predicate), &edge_segment(object)])
}

/// Build the edge record for `subject predicate object`
///
/// `object_form` is the value as it appeared in the entity: a plain string,
/// or an `{"@id": ..}` reference.
fn make_edge(
    subject: &IriRef,
    path: &[String],
    predicate: &str,
    object: &str,
    object_form: JsonValue,
) -> NodeRecord {
    let mut content = Content::new();
    content.insert(rdf::SUBJECT.to_string(), json!({ "@id": subject.as_str() }));
    content.insert(rdf::PREDICATE.to_string(), json!({ "@id": predicate }));
    content.insert(rdf::OBJECT.to_string(), object_form);
    if path.is_empty() {
        return NodeRecord::edge(edge_iri(subject, predicate, object), content);
    }

    let steps: Vec<JsonValue> = path.iter().map(|step| json!({ "@value": step })).collect();
    content.insert(NESTED_PATH.to_string(), json!({ "@list": steps }));
    let position = format!("{}\n{predicate}", path.join("\n"));
    NodeRecord::edge(edge_iri(subject, &position, object), content)
}

struct Reifier<'a> {
    subject: &'a IriRef,
    universe: &'a PersistentIris,
    reserved: &'a ReservedProperties,
    /// Steps from the entity down to the sub-object being walked
    path: Vec<String>,
    edges: Vec<NodeRecord>,
}

impl Reifier<'_> {
    /// IRI of a value that references a tracked node, if any
    fn external_target(&self, value: &JsonValue) -> Option<String> {
        let candidate = match value {
            JsonValue::String(s) => s.as_str(),
            JsonValue::Object(map) => map.get(jsonld::ID)?.as_str()?,
            _ => return None,
        };
        self.universe.contains(candidate).then(|| candidate.to_string())
    }

    fn properties(&mut self, content: &Content) -> Content {
        let mut kept = Content::new();
        for (key, value) in content {
            if self.reserved.contains(key) {
                kept.insert(key.clone(), value.clone());
            } else if let Some(value) = self.value(key, None, value) {
                kept.insert(key.clone(), value);
            }
        }
        kept
    }

    /// The part of `value` that stays inline; `None` drops the property
    ///
    /// `index` is the position among the kept members when `value` is an
    /// array member.
    fn value(&mut self, predicate: &str, index: Option<usize>, value: &JsonValue) -> Option<JsonValue> {
        if let Some(target) = self.external_target(value) {
            let object_form = match value {
                JsonValue::Object(_) => json!({ "@id": target }),
                other => other.clone(),
            };
            self.edges.push(make_edge(
                self.subject,
                &self.path,
                predicate,
                &target,
                object_form,
            ));
            return None;
        }

        match value {
            JsonValue::Array(items) => {
                let mut kept = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(item) = self.value(predicate, Some(kept.len()), item) {
                        kept.push(item);
                    }
                }
                (!kept.is_empty()).then_some(JsonValue::Array(kept))
            }
            JsonValue::Object(map) if map.contains_key(jsonld::VALUE) || map.contains_key(jsonld::LIST) => {
                Some(value.clone())
            }
            JsonValue::Object(map) => {
                self.path.push(match index {
                    Some(i) => format!("{predicate} {i}"),
                    None => predicate.to_string(),
                });
                let inner = self.properties(map);
                self.path.pop();
                Some(JsonValue::Object(inner))
            }
            scalar => Some(scalar.clone()),
        }
    }
}

/// Split one entity into its stripped form and the edges it references
///
/// Edge records pass through unchanged.
pub fn reify_node(
    record: &NodeRecord,
    persistent_iris: &PersistentIris,
    reserved: &ReservedProperties,
) -> (NodeRecord, Vec<NodeRecord>) {
    if record.is_edge() {
        return (record.clone(), Vec::new());
    }

    let mut reifier = Reifier {
        subject: record.persistent_iri(),
        universe: persistent_iris,
        reserved,
        path: Vec::new(),
        edges: Vec::new(),
    };
    let content = reifier.properties(record.content());
    (record.with_content(content), reifier.edges)
}

/// Flatten per-node results: each entity followed by its edges, edges
/// deduplicated by identifier
pub fn flatten_reified(parts: Vec<(NodeRecord, Vec<NodeRecord>)>) -> Vec<NodeRecord> {
    let mut seen: FxHashSet<IriRef> =
        FxHashSet::with_capacity_and_hasher(parts.len(), Default::default());
    let mut out = Vec::with_capacity(parts.len());
    for (entity, edges) in parts {
        out.push(entity);
        for edge in edges {
            if seen.insert(edge.persistent_iri().clone()) {
                out.push(edge);
            }
        }
    }
    out
}

pub fn reify_all_edges(
    records: &[NodeRecord],
    persistent_iris: &PersistentIris,
    reserved: &ReservedProperties,
) -> Vec<NodeRecord> {
    flatten_reified(
        records
            .iter()
            .map(|record| reify_node(record, persistent_iris, reserved))
            .collect(),
    )
}

/// Steps recorded on an edge: `(property, array index)`
fn nested_steps(edge_content: &Content) -> Vec<(&str, Option<usize>)> {
    let Some(steps) = edge_content
        .get(NESTED_PATH)
        .and_then(|v| v.get(jsonld::LIST))
        .and_then(JsonValue::as_array)
    else {
        return Vec::new();
    };

    steps
        .iter()
        .filter_map(|step| step.get(jsonld::VALUE).unwrap_or(step).as_str())
        .map(|step| match step.rsplit_once(' ') {
            Some((property, index)) => match index.parse::<usize>() {
                Ok(index) => (property, Some(index)),
                Err(_) => (step, None),
            },
            None => (step, None),
        })
        .collect()
}

fn descend<'c>(content: &'c mut Content, steps: &[(&str, Option<usize>)]) -> Option<&'c mut Content> {
    let mut target = content;
    for (property, index) in steps {
        let value = target.get_mut(*property)?;
        let value = match index {
            Some(i) if value.is_array() => value.as_array_mut()?.get_mut(*i)?,
            _ => value,
        };
        target = value.as_object_mut()?;
    }
    Some(target)
}

/// Put edges back at their (subject, path, predicate) position
///
/// Only edges whose subject is `stripped` are used. The result is
/// content-equal to the entity before reification.
pub fn inline_edges(stripped: &NodeRecord, edges: &[NodeRecord]) -> NodeRecord {
    let subject = stripped.persistent_iri().as_str();
    let mut content = stripped.content().clone();

    for edge in edges.iter().filter(|e| e.is_edge()) {
        let edge_content = edge.content();
        let id_of = |key: &str| {
            edge_content
                .get(key)
                .and_then(|v| v.get(jsonld::ID))
                .and_then(JsonValue::as_str)
        };
        let (Some(edge_subject), Some(predicate), Some(object)) = (
            id_of(rdf::SUBJECT),
            id_of(rdf::PREDICATE),
            edge_content.get(rdf::OBJECT),
        ) else {
            continue;
        };
        if edge_subject != subject {
            continue;
        }
        let Some(target) = descend(&mut content, &nested_steps(edge_content)) else {
            tracing::debug!(edge = %edge.persistent_iri(), "nested position not found; edge skipped");
            continue;
        };

        match target.get_mut(predicate) {
            Some(JsonValue::Array(items)) => items.push(object.clone()),
            Some(existing) => {
                let previous = existing.take();
                *existing = JsonValue::Array(vec![previous, object.clone()]);
            }
            None => {
                target.insert(predicate.to_string(), object.clone());
            }
        }
    }

    stripped.with_content(content)
}
