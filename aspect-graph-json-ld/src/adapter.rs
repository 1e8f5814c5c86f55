//! GraphSink adapter for expanded JSON-LD
//!
//! Walks the output of [`crate::expand`] and emits triples:
//!
//! - `@type` becomes `rdf:type`
//! - `_:label` ids keep their identity across the document
//! - embedded nodes emit their own triples, whether or not they carry an `@id`
//! - `@list` members are emitted with their position
//! - `@json` values are stored in canonical JSON form
//!
//! Named graphs and `@reverse` are not supported; nested `@graph` keys are
//! ignored.
//!
//! # Example
//!
//! ```
//! use aspect_graph_json_ld::{expand, adapter::to_graph_events};
//! use aspect_graph_ir::GraphCollectorSink;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "@context": {"sor": "http://rdf.equinor.com/ontology/sor#"},
//!     "@id": "sor:Row1",
//!     "sor:hasChild": {"@id": "sor:Row2", "sor:name": "second"}
//! });
//!
//! let expanded = expand(&doc).unwrap();
//! let mut sink = GraphCollectorSink::new();
//! to_graph_events(&expanded, &mut sink).unwrap();
//!
//! // Row1 hasChild Row2, Row2 name "second"
//! assert_eq!(sink.graph().len(), 2);
//! ```

use aspect_graph_ir::{Datatype, GraphSink, LiteralValue, TermId};
use aspect_vocab::{jsonld, rdf};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Invalid expanded JSON-LD: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;

/// Convert expanded JSON-LD (array or object) to GraphSink events
pub fn to_graph_events<S: GraphSink>(expanded: &Value, sink: &mut S) -> Result<()> {
    match expanded {
        Value::Array(nodes) => {
            for node in nodes {
                emit_node(node, sink, None)?;
            }
            Ok(())
        }
        Value::Object(_) => emit_node(expanded, sink, None).map(|_| ()),
        _ => Err(AdapterError::InvalidStructure(
            "Expected expanded array or object".to_string(),
        )),
    }
}

fn id_term<S: GraphSink>(id: &Value, sink: &mut S) -> Result<TermId> {
    let id = id
        .as_str()
        .ok_or_else(|| AdapterError::InvalidStructure("@id must be a string".to_string()))?;
    Ok(match id.strip_prefix(jsonld::BLANK_PREFIX) {
        Some(label) => sink.term_blank(Some(label)),
        None => sink.term_iri(id),
    })
}

fn as_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Emit the triples of one node and return its subject term
///
/// `subject` is passed for anonymous embedded nodes so the parent's object
/// and the embedded subject share one blank node.
fn emit_node<S: GraphSink>(node: &Value, sink: &mut S, subject: Option<TermId>) -> Result<TermId> {
    let obj = node
        .as_object()
        .ok_or_else(|| AdapterError::InvalidStructure("Expected node to be an object".to_string()))?;

    let subject = match (subject, obj.get(jsonld::ID)) {
        (Some(forced), _) => forced,
        (None, Some(id)) => id_term(id, sink)?,
        (None, None) => sink.term_blank(None),
    };

    for (key, value) in obj {
        if key == jsonld::TYPE {
            let predicate = sink.term_iri(rdf::TYPE);
            for ty in as_items(value) {
                if let Some(iri) = ty.as_str() {
                    let object = match iri.strip_prefix(jsonld::BLANK_PREFIX) {
                        Some(label) => sink.term_blank(Some(label)),
                        None => sink.term_iri(iri),
                    };
                    sink.emit_triple(subject, predicate, object);
                }
            }
            continue;
        }
        if key.starts_with('@') {
            continue;
        }

        let predicate = sink.term_iri(key);
        for item in as_items(value) {
            if let Some(list) = item.as_object().and_then(|o| o.get(jsonld::LIST)) {
                let members = list.as_array().ok_or_else(|| {
                    AdapterError::InvalidStructure("@list value must be an array".to_string())
                })?;
                for (index, member) in members.iter().enumerate() {
                    if member.as_object().is_some_and(|o| o.contains_key(jsonld::LIST)) {
                        return Err(AdapterError::InvalidStructure(
                            "Nested @list is not allowed".to_string(),
                        ));
                    }
                    if let Some(object) = object_term(member, sink)? {
                        sink.emit_list_item(subject, predicate, object, index as i32);
                    }
                }
            } else if let Some(object) = object_term(item, sink)? {
                sink.emit_triple(subject, predicate, object);
            }
        }
    }

    Ok(subject)
}

/// Term for a single (non-list) value, emitting embedded node triples on the way
fn object_term<S: GraphSink>(value: &Value, sink: &mut S) -> Result<Option<TermId>> {
    match value {
        Value::Object(obj) => {
            if let Some(literal) = obj.get(jsonld::VALUE) {
                return Ok(literal_term(literal, obj, sink));
            }
            if let Some(id) = obj.get(jsonld::ID) {
                let term = id_term(id, sink)?;
                if obj.len() > 1 {
                    emit_node(value, sink, Some(term))?;
                }
                return Ok(Some(term));
            }
            let blank = sink.term_blank(None);
            emit_node(value, sink, Some(blank))?;
            Ok(Some(blank))
        }
        Value::Null => Ok(None),
        scalar => Ok(native_literal(scalar, None, sink)),
    }
}

fn native_literal<S: GraphSink>(value: &Value, datatype: Option<Datatype>, sink: &mut S) -> Option<TermId> {
    match value {
        Value::String(s) => Some(sink.term_literal(s, datatype.unwrap_or_else(Datatype::xsd_string), None)),
        Value::Bool(b) => Some(sink.term_literal_value(
            LiteralValue::Boolean(*b),
            datatype.unwrap_or_else(Datatype::xsd_boolean),
        )),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(sink.term_literal_value(
                    LiteralValue::Integer(i),
                    datatype.unwrap_or_else(Datatype::xsd_integer),
                ))
            } else {
                n.as_f64().map(|f| {
                    sink.term_literal_value(
                        LiteralValue::Double(f),
                        datatype.unwrap_or_else(Datatype::xsd_double),
                    )
                })
            }
        }
        _ => None,
    }
}

fn literal_term<S: GraphSink>(value: &Value, obj: &Map<String, Value>, sink: &mut S) -> Option<TermId> {
    let datatype = obj.get(jsonld::TYPE).and_then(Value::as_str).map(Datatype::from_iri);
    let language = obj.get("@language").and_then(Value::as_str);

    match (value, language) {
        (Value::String(s), Some(lang)) => Some(sink.term_literal(s, Datatype::rdf_lang_string(), Some(lang))),
        (Value::Object(_) | Value::Array(_), _) => {
            if datatype.as_ref().is_some_and(Datatype::is_json) {
                let canonical = crate::normalize::normalize(value);
                Some(sink.term_literal_value(
                    LiteralValue::Json(Arc::from(canonical.as_str())),
                    Datatype::rdf_json(),
                ))
            } else {
                None
            }
        }
        _ => native_literal(value, datatype, sink),
    }
}
