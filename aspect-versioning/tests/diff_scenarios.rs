//! End-to-end diff scenarios on MEL row graphs

use aspect_versioning::{
    handle_graph_complete_update_with_config, handle_graph_entries_with_config, DiffConfig,
    Provenance, UpdatePayload, VersionedIri, VersioningError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};

const ROW1: &str = "http://rdf.equinor.com/ontology/sor#Row1";
const ROW2: &str = "http://rdf.equinor.com/ontology/sor#Row2";
const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const HAS_CHILD: &str = "http://imf.imfid.org/ontology/imf#hasChild";
const RDF_SUBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject";
const RDF_OBJECT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#object";
const STORED_V1: &str =
    "http://rdf.equinor.com/ontology/sor#Row1/version/29110145432144214285/2022-05-01";

fn context() -> JsonValue {
    json!({
        "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
        "@vocab": "http://rdf.equinor.com/ontology/mel#",
        "sor": "http://rdf.equinor.com/ontology/sor#",
        "imf": "http://imf.imfid.org/ontology/imf#",
        "@version": "1.1"
    })
}

fn graph(nodes: JsonValue) -> JsonValue {
    json!({"@context": context(), "@graph": nodes})
}

fn row(id: &str, label: &str) -> JsonValue {
    json!({"@id": id, "@type": "MelRow", "rdfs:label": label})
}

fn config(info: &str) -> DiffConfig {
    DiffConfig::default().with_version_info(info)
}

fn complete(input: &JsonValue, existing: &JsonValue) -> UpdatePayload {
    handle_graph_complete_update_with_config(input, existing, &config("r1")).unwrap()
}

/// Row1 as stored by an earlier writer
fn stored_row1() -> JsonValue {
    graph(json!([{
        "@id": "sor:Row1/version/29110145432144214285/2022-05-01",
        "@type": ["http://rdf.equinor.com/ontology/mel#MelRow"],
        "rdfs:label": "An empty MEL Row",
        "http://www.w3.org/ns/prov#wasDerivedFrom": "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"
    }]))
}

fn edge_input() -> JsonValue {
    graph(json!([
        {
            "@id": "sor:Row1",
            "@type": "MelRow",
            "rdfs:label": "An empty MEL Row",
            "imf:hasChild": ROW2
        },
        row("sor:Row2", "The second MEL Row")
    ]))
}

fn empty_store() -> JsonValue {
    json!({})
}

fn update_ids(payload: &UpdatePayload) -> Vec<String> {
    payload
        .updates()
        .map(|entity| entity.version().persistent_iri().to_string())
        .collect()
}

#[test]
fn new_entity_starts_a_provenance_chain() {
    let payload = complete(&graph(json!([row("sor:Row1", "An empty MEL Row")])), &empty_store());

    assert!(payload.delete.is_empty());
    let updates: Vec<_> = payload.updates().collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].version().persistent_iri().as_str(), ROW1);
    assert_eq!(updates[0].version().version_info(), "r1");
    assert_eq!(updates[0].provenance(), &Provenance::None);

    let out = payload.to_json();
    assert_eq!(
        out["update"]["@graph"][0]["http://www.w3.org/ns/prov#wasDerivedFrom"],
        json!({"@id": "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"})
    );
    assert_eq!(out["update"]["@context"], json!({"@version": "1.1"}));
}

#[test]
fn unchanged_entity_produces_nothing() {
    let payload = complete(&graph(json!([row("sor:Row1", "An empty MEL Row")])), &stored_row1());
    assert!(payload.is_empty());
}

#[test]
fn changed_entity_derives_from_stored_version() {
    let payload = complete(
        &graph(json!([row("sor:Row1", "A different MEL Row")])),
        &stored_row1(),
    );

    assert!(payload.delete.is_empty());
    let updates: Vec<_> = payload.updates().collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].provenance(),
        &Provenance::DerivedFrom(VersionedIri::parse(STORED_V1).unwrap())
    );
    assert_ne!(updates[0].version().as_str(), STORED_V1);
    assert_eq!(updates[0].content()[LABEL], json!("A different MEL Row"));
}

#[test]
fn missing_entity_is_deleted() {
    let payload = complete(&graph(json!([row("sor:Row2", "The second MEL Row")])), &stored_row1());

    assert_eq!(
        payload.delete.iter().map(VersionedIri::as_str).collect::<Vec<_>>(),
        vec![STORED_V1]
    );
    assert_eq!(update_ids(&payload), vec![ROW2.to_string()]);
}

#[test]
fn entries_mode_never_deletes() {
    let payload = handle_graph_entries_with_config(
        &graph(json!([row("sor:Row2", "The second MEL Row")])),
        &stored_row1(),
        &config("r1"),
    )
    .unwrap();

    assert!(payload.delete.is_empty());
    assert_eq!(update_ids(&payload), vec![ROW2.to_string()]);
}

#[test]
fn references_are_reified_and_point_at_current_versions() {
    let payload = complete(&edge_input(), &empty_store());
    let updates: Vec<_> = payload.updates().collect();
    assert_eq!(updates.len(), 3);

    let row1 = updates[0];
    let edge = updates[1];
    let row2 = updates[2];
    assert_eq!(row1.version().persistent_iri().as_str(), ROW1);
    assert!(!row1.content().contains_key(HAS_CHILD));
    assert!(edge.record().is_edge());
    assert_eq!(row2.version().persistent_iri().as_str(), ROW2);

    assert_eq!(edge.content()[RDF_SUBJECT], json!({"@id": row1.version().as_str()}));
    assert_eq!(edge.content()[RDF_OBJECT], json!(row2.version().as_str()));
}

#[test]
fn edge_against_unchanged_stored_row() {
    let payload = complete(&edge_input(), &stored_row1());

    assert!(payload.delete.is_empty());
    let updates: Vec<_> = payload.updates().collect();
    assert_eq!(updates.len(), 2);
    assert!(updates[0].record().is_edge());
    assert_eq!(
        updates[0].content()[RDF_SUBJECT],
        json!({"@id": STORED_V1}),
        "edge subject points at the stored version of Row1"
    );
    assert_eq!(updates[1].version().persistent_iri().as_str(), ROW2);
}

#[test]
fn applying_a_diff_makes_the_next_diff_empty() {
    for input in [edge_input(), graph(json!([row("sor:Row1", "An empty MEL Row")]))] {
        let first = complete(&input, &empty_store());
        let store = first.apply_to(&empty_store()).unwrap();

        let second = complete(&input, &store);
        assert!(second.is_empty(), "second diff: {}", second.to_json());

        let store = second.apply_to(&store).unwrap();
        assert!(complete(&input, &store).is_empty());
    }
}

#[test]
fn nested_reference_survives_a_store_round_trip() {
    let input = graph(json!([
        {
            "@id": "sor:Row1",
            "@type": "MelRow",
            "http://example.org/quantity": {
                "http://example.org/value": "12",
                "http://example.org/about": {"@id": "sor:Row2"}
            }
        },
        row("sor:Row2", "The second MEL Row")
    ]));

    let first = complete(&input, &empty_store());
    assert_eq!(first.update.len(), 3);
    let store = first.apply_to(&empty_store()).unwrap();
    assert!(complete(&input, &store).is_empty());
}

#[test]
fn entity_holding_only_references_gets_the_zero_hash() {
    let input = graph(json!([
        {"@id": "sor:Row1", "imf:hasChild": ROW2},
        row("sor:Row2", "The second MEL Row")
    ]));

    let payload = complete(&input, &empty_store());
    let row1 = payload
        .updates()
        .find(|entity| entity.version().persistent_iri().as_str() == ROW1)
        .unwrap();
    assert_eq!(row1.version().version_hash(), "0".repeat(64));
}

#[test]
fn property_order_is_irrelevant() {
    let store = complete(&edge_input(), &empty_store())
        .apply_to(&empty_store())
        .unwrap();

    let reordered = graph(json!([
        {"rdfs:label": "The second MEL Row", "@type": "MelRow", "@id": "sor:Row2"},
        {
            "imf:hasChild": ROW2,
            "rdfs:label": "An empty MEL Row",
            "@id": "sor:Row1",
            "@type": "MelRow"
        }
    ]));
    assert!(complete(&reordered, &store).is_empty());
}

#[test]
fn changing_a_referenced_row_reversions_only_that_row() {
    let first = complete(&edge_input(), &empty_store());
    let store = first.apply_to(&empty_store()).unwrap();
    let old_row2 = first.updates().nth(2).unwrap().version().clone();

    let changed = graph(json!([
        {
            "@id": "sor:Row1",
            "@type": "MelRow",
            "rdfs:label": "An empty MEL Row",
            "imf:hasChild": ROW2
        },
        row("sor:Row2", "A renamed second row")
    ]));
    let payload = complete(&changed, &store);

    assert!(payload.delete.is_empty());
    let updates: Vec<_> = payload.updates().collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].provenance(), &Provenance::DerivedFrom(old_row2));
}

#[test]
fn dropping_a_reference_deletes_its_edge() {
    let first = complete(&edge_input(), &empty_store());
    let store = first.apply_to(&empty_store()).unwrap();
    let edge_version = first.updates().nth(1).unwrap().version().clone();

    let without_edge = graph(json!([
        row("sor:Row1", "An empty MEL Row"),
        row("sor:Row2", "The second MEL Row")
    ]));
    let payload = complete(&without_edge, &store);

    assert!(payload.update.is_empty());
    assert_eq!(payload.delete, vec![edge_version]);
}

#[test]
fn duplicate_stored_versions_delete_the_latest_once() {
    let store = graph(json!([
        {
            "@id": "sor:Row1/version/aaaa/1",
            "rdfs:label": "First",
            "http://www.w3.org/ns/prov#wasDerivedFrom": {"@id": "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"}
        },
        {
            "@id": "sor:Row1/version/bbbb/2",
            "rdfs:label": "Second",
            "http://www.w3.org/ns/prov#wasDerivedFrom": {"@id": format!("{ROW1}/version/aaaa/1")}
        }
    ]));

    let payload = complete(&graph(json!([row("sor:Row2", "The second MEL Row")])), &store);
    assert_eq!(
        payload.delete.iter().map(VersionedIri::as_str).collect::<Vec<_>>(),
        vec![format!("{ROW1}/version/bbbb/2")]
    );

    let same_as_latest = graph(json!([{"@id": "sor:Row1", "rdfs:label": "Second"}]));
    assert!(complete(&same_as_latest, &store).is_empty());
}

#[test]
fn parallel_and_sequential_agree() {
    let parallel = handle_graph_complete_update_with_config(
        &edge_input(),
        &stored_row1(),
        &config("r1").with_parallel(true),
    )
    .unwrap();
    let sequential = handle_graph_complete_update_with_config(
        &edge_input(),
        &stored_row1(),
        &config("r1").with_parallel(false),
    )
    .unwrap();
    assert_eq!(parallel.to_json(), sequential.to_json());
}

#[test]
fn larger_graph_against_stored_rows() {
    let size = 50;
    let input = graph(JsonValue::Array(
        (1..=size)
            .map(|i| row(&format!("sor:Row{i}"), &format!("Empty MEL Row {i}")))
            .collect(),
    ));
    let store = complete(&input, &empty_store()).apply_to(&empty_store()).unwrap();

    let mut changed = input.clone();
    changed["@graph"][0] = row("sor:Row1", "Changed");
    let payload = complete(&changed, &store);
    assert_eq!(update_ids(&payload), vec![ROW1.to_string()]);
    assert!(payload.delete.is_empty());
}

#[test]
fn missing_identifier_is_an_error() {
    let input = graph(json!([{"@type": "MelRow", "rdfs:label": "No id"}]));
    let err = handle_graph_complete_update_with_config(&input, &empty_store(), &config("r1")).unwrap_err();
    assert!(matches!(err, VersioningError::MissingIdentifier { .. }));
}

#[test]
fn unversioned_stored_node_is_an_error() {
    let store = graph(json!([{
        "@id": "sor:Row1",
        "rdfs:label": "An empty MEL Row",
        "http://www.w3.org/ns/prov#wasDerivedFrom": "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"
    }]));
    let err = handle_graph_complete_update_with_config(
        &graph(json!([row("sor:Row1", "An empty MEL Row")])),
        &store,
        &config("r1"),
    )
    .unwrap_err();
    assert!(matches!(err, VersioningError::InvalidVersionedIri { .. }));
}

#[test]
fn stored_node_without_provenance_is_an_error() {
    let store = graph(json!([{
        "@id": "sor:Row1/version/h/1",
        "rdfs:label": "An empty MEL Row"
    }]));
    let err = handle_graph_complete_update_with_config(&graph(json!([])), &store, &config("r1"))
        .unwrap_err();
    assert!(matches!(err, VersioningError::MissingProvenance { .. }));
}

#[test]
fn multiple_graphs_are_rejected() {
    let input = json!([
        graph(json!([row("sor:Row1", "A")])),
        graph(json!([row("sor:Row2", "B")]))
    ]);
    let err = handle_graph_complete_update_with_config(&input, &empty_store(), &config("r1"))
        .unwrap_err();
    assert!(matches!(err, VersioningError::MultipleGraphsUnsupported { count: 2 }));
}

#[test]
fn duplicate_input_identifiers_are_rejected() {
    let input = graph(json!([row("sor:Row1", "A"), row("sor:Row1", "B")]));
    let err = handle_graph_complete_update_with_config(&input, &empty_store(), &config("r1"))
        .unwrap_err();
    assert!(matches!(err, VersioningError::DuplicateIdentifier { .. }));
}

#[test]
fn empty_documents_give_empty_payloads() {
    assert!(complete(&graph(json!([])), &empty_store()).is_empty());
    assert!(complete(&empty_store(), &empty_store()).is_empty());
}
