//! Flatten JSON-LD documents into top-level nodes with absolute IRIs

use crate::entity::Content;
use crate::error::{Result, VersioningError};
use crate::iri::IriRef;
use aspect_graph_json_ld::{expand, to_absolute};
use aspect_vocab::jsonld;
use serde_json::Value as JsonValue;

/// Top-level nodes of a document, each compacted to absolute IRIs
///
/// `{"@context": .., "@graph": [..]}` yields its nodes, a bare node object
/// yields itself, and `{}` or `null` yields nothing. Named graphs are
/// rejected.
pub fn graph_nodes(document: &JsonValue) -> Result<Vec<Content>> {
    let mut nodes = match expand(document)? {
        JsonValue::Array(items) => items,
        JsonValue::Object(map) if map.is_empty() => Vec::new(),
        node @ JsonValue::Object(_) => vec![node],
        JsonValue::Null => Vec::new(),
        other => {
            return Err(VersioningError::invalid_node(format!(
                "expected a graph or node object, got: {}",
                other
            )))
        }
    };

    // A top-level array holding a single graph wrapper
    if let [JsonValue::Object(only)] = nodes.as_slice() {
        if only.len() == 1 {
            if let Some(JsonValue::Array(inner)) = only.get(jsonld::GRAPH) {
                nodes = inner.clone();
            }
        }
    }

    let named = nodes
        .iter()
        .filter(|node| node.get(jsonld::GRAPH).is_some())
        .count();
    if named > 0 {
        let default = usize::from(named < nodes.len() || !document.is_array());
        return Err(VersioningError::MultipleGraphsUnsupported {
            count: named + default,
        });
    }

    nodes
        .iter()
        .map(|node| match to_absolute(node) {
            JsonValue::Object(map) => Ok(map),
            other => Err(VersioningError::invalid_node(format!(
                "graph member is not a node object: {}",
                other
            ))),
        })
        .collect()
}

/// The persistent identifier of an input node
pub fn node_identifier(node: &Content) -> Result<IriRef> {
    match node.get(jsonld::ID).and_then(JsonValue::as_str) {
        Some(id) if !id.starts_with(jsonld::BLANK_PREFIX) => IriRef::parse(id),
        _ => Err(VersioningError::MissingIdentifier {
            node: JsonValue::Object(node.clone()).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context() -> JsonValue {
        json!({
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "@vocab": "http://rdf.equinor.com/ontology/mel#",
            "sor": "http://rdf.equinor.com/ontology/sor#",
            "@version": "1.1"
        })
    }

    #[test]
    fn test_graph_document() {
        let doc = json!({
            "@context": context(),
            "@graph": [
                {"@id": "sor:Row1", "@type": "MelRow", "rdfs:label": "An empty MEL Row"},
                {"@id": "sor:Row2", "@type": "MelRow", "rdfs:label": "The second MEL Row"}
            ]
        });

        let nodes = graph_nodes(&doc).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            JsonValue::Object(nodes[0].clone()),
            json!({
                "@id": "http://rdf.equinor.com/ontology/sor#Row1",
                "@type": "http://rdf.equinor.com/ontology/mel#MelRow",
                "http://www.w3.org/2000/01/rdf-schema#label": "An empty MEL Row"
            })
        );
    }

    #[test]
    fn test_single_node_graph() {
        let doc = json!({
            "@context": context(),
            "@graph": [{"@id": "sor:Row1", "rdfs:label": "An empty MEL Row"}]
        });
        assert_eq!(graph_nodes(&doc).unwrap().len(), 1);
    }

    #[test]
    fn test_bare_node_and_empty_documents() {
        let bare = json!({"@context": context(), "@id": "sor:Row1", "rdfs:label": "x"});
        assert_eq!(graph_nodes(&bare).unwrap().len(), 1);

        assert!(graph_nodes(&json!({})).unwrap().is_empty());
        assert!(graph_nodes(&JsonValue::Null).unwrap().is_empty());
        assert!(graph_nodes(&json!({"@context": context(), "@graph": []})).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_graphs_rejected() {
        let doc = json!([
            {"@context": context(), "@graph": [{"@id": "sor:Row1"}]},
            {"@context": context(), "@graph": [{"@id": "sor:Row2"}]}
        ]);
        assert!(matches!(
            graph_nodes(&doc),
            Err(VersioningError::MultipleGraphsUnsupported { count: 2 })
        ));

        let named = json!({
            "@context": context(),
            "@id": "sor:Graph1",
            "@graph": [{"@id": "sor:Row1"}]
        });
        assert!(matches!(
            graph_nodes(&named),
            Err(VersioningError::MultipleGraphsUnsupported { count: 2 })
        ));
    }

    #[test]
    fn test_wrapped_single_graph_is_accepted() {
        let doc = json!([{"@context": context(), "@graph": [{"@id": "sor:Row1", "rdfs:label": "x"}]}]);
        assert_eq!(graph_nodes(&doc).unwrap().len(), 1);
    }

    #[test]
    fn test_node_identifier() {
        let node = |v: JsonValue| v.as_object().cloned().unwrap();

        assert_eq!(
            node_identifier(&node(json!({"@id": "http://rdf.equinor.com/ontology/sor#Row1"})))
                .unwrap()
                .as_str(),
            "http://rdf.equinor.com/ontology/sor#Row1"
        );
        assert!(matches!(
            node_identifier(&node(json!({"http://example.org/p": "x"}))),
            Err(VersioningError::MissingIdentifier { .. })
        ));
        assert!(matches!(
            node_identifier(&node(json!({"@id": "_:b0"}))),
            Err(VersioningError::MissingIdentifier { .. })
        ));
    }
}
