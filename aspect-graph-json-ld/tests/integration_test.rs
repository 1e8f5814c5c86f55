//! End-to-end checks on MEL-style documents: context, expansion, absolute
//! compaction, canonical JSON and triple emission

use aspect_graph_ir::GraphCollectorSink;
use aspect_graph_json_ld::{
    adapter::to_graph_events, expand, normalize_data, parse_context, to_absolute, TypeValue,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn mel_context() -> Value {
    json!({
        "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
        "@vocab": "http://rdf.equinor.com/ontology/mel#",
        "sor": "http://rdf.equinor.com/ontology/sor#",
        "@version": "1.1"
    })
}

fn mel_document(label: &str) -> Value {
    json!({
        "@context": mel_context(),
        "@graph": [{
            "@id": "sor:Row1",
            "@type": "MelRow",
            "rdfs:label": label
        }]
    })
}

#[test]
fn test_mel_context() {
    let ctx = parse_context(&mel_context()).unwrap();
    assert_eq!(ctx.vocab.as_deref(), Some("http://rdf.equinor.com/ontology/mel#"));
    assert_eq!(ctx.version.as_deref(), Some("1.1"));
    assert_eq!(
        ctx.get("sor").and_then(|e| e.id.as_deref()),
        Some("http://rdf.equinor.com/ontology/sor#")
    );
}

#[test]
fn test_typed_term_definition() {
    let ctx = parse_context(&json!({
        "imf": "http://imf.imfid.org/ontology/imf#",
        "hasChild": {"@id": "imf:hasChild", "@type": "@id"}
    }))
    .unwrap();

    let entry = ctx.get("hasChild").unwrap();
    assert_eq!(entry.id.as_deref(), Some("http://imf.imfid.org/ontology/imf#hasChild"));
    assert_eq!(entry.type_, Some(TypeValue::Id));
}

#[test]
fn test_expand_and_absolute_form() {
    let expanded = expand(&mel_document("An empty MEL Row")).unwrap();
    assert_eq!(
        to_absolute(&expanded),
        json!({
            "@id": "http://rdf.equinor.com/ontology/sor#Row1",
            "@type": "http://rdf.equinor.com/ontology/mel#MelRow",
            "http://www.w3.org/2000/01/rdf-schema#label": "An empty MEL Row"
        })
    );
}

#[test]
fn test_id_coercion_produces_reference() {
    let doc = json!({
        "@context": {
            "imf": "http://imf.imfid.org/ontology/imf#",
            "sor": "http://rdf.equinor.com/ontology/sor#",
            "hasChild": {"@id": "imf:hasChild", "@type": "@id"}
        },
        "@id": "sor:Row1",
        "hasChild": "sor:Row2"
    });

    assert_eq!(
        to_absolute(&expand(&doc).unwrap()),
        json!({
            "@id": "http://rdf.equinor.com/ontology/sor#Row1",
            "http://imf.imfid.org/ontology/imf#hasChild": {"@id": "http://rdf.equinor.com/ontology/sor#Row2"}
        })
    );
}

#[test]
fn test_normalize_data_ignores_array_order() {
    let a = json!({"http://example.org/p": ["x", "y", {"@id": "http://example.org/z"}]});
    let b = json!({"http://example.org/p": [{"@id": "http://example.org/z"}, "y", "x"]});
    assert_eq!(normalize_data(&a), normalize_data(&b));

    let list_a = json!({"http://example.org/p": {"@list": ["x", "y"]}});
    let list_b = json!({"http://example.org/p": {"@list": ["y", "x"]}});
    assert_ne!(normalize_data(&list_a), normalize_data(&list_b));
}

#[test]
fn test_document_to_triples() {
    let expanded = expand(&mel_document("The second MEL Row")).unwrap();
    let mut sink = GraphCollectorSink::new();
    to_graph_events(&expanded, &mut sink).unwrap();

    let mut graph = sink.finish();
    graph.canonicalize();
    assert_eq!(
        graph.ntriples_lines(),
        vec![
            "<http://rdf.equinor.com/ontology/sor#Row1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://rdf.equinor.com/ontology/mel#MelRow> .".to_string(),
            "<http://rdf.equinor.com/ontology/sor#Row1> <http://www.w3.org/2000/01/rdf-schema#label> \"The second MEL Row\" .".to_string(),
        ]
    );
}
