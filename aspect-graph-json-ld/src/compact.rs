//! Compaction against an empty context
//!
//! Expanded JSON-LD wraps every value in an array and every literal in a
//! value object. Compacting with an empty context keeps absolute IRIs as keys
//! but unwraps those layers again, giving a form that is easy to walk and
//! compare:
//!
//! - single-element arrays become their element (except under `@list`)
//! - `{"@value": x}` without type or language becomes `x`
//! - node references stay `{"@id": ..}`
//! - `@type` with one entry becomes a string

use serde_json::{Map, Value as JsonValue};

/// Compact an expanded document (or fragment) against the empty context
///
/// # Example
///
/// ```
/// use aspect_graph_json_ld::compact::to_absolute;
/// use serde_json::json;
///
/// let expanded = json!([{
///     "@id": "http://rdf.equinor.com/ontology/sor#Row1",
///     "@type": ["http://rdf.equinor.com/ontology/mel#MelRow"],
///     "http://www.w3.org/2000/01/rdf-schema#label": [{"@value": "An empty MEL Row"}]
/// }]);
///
/// assert_eq!(
///     to_absolute(&expanded),
///     json!({
///         "@id": "http://rdf.equinor.com/ontology/sor#Row1",
///         "@type": "http://rdf.equinor.com/ontology/mel#MelRow",
///         "http://www.w3.org/2000/01/rdf-schema#label": "An empty MEL Row"
///     })
/// );
/// ```
pub fn to_absolute(expanded: &JsonValue) -> JsonValue {
    match expanded {
        JsonValue::Array(items) => unwrap_single(items.iter().map(to_absolute).collect()),
        JsonValue::Object(map) => compact_object(map),
        scalar => scalar.clone(),
    }
}

fn unwrap_single(mut items: Vec<JsonValue>) -> JsonValue {
    if items.len() == 1 {
        items.remove(0)
    } else {
        JsonValue::Array(items)
    }
}

fn compact_object(map: &Map<String, JsonValue>) -> JsonValue {
    if let Some(value) = map.get("@value") {
        if map.len() == 1 {
            return value.clone();
        }
        return JsonValue::Object(map.clone());
    }

    let mut out = Map::new();
    for (key, value) in map {
        let compacted = match key.as_str() {
            "@id" => value.clone(),
            // Lists keep their array shape regardless of length
            "@list" => match value {
                JsonValue::Array(items) => JsonValue::Array(items.iter().map(to_absolute).collect()),
                other => to_absolute(other),
            },
            _ => to_absolute(value),
        };
        out.insert(key.clone(), compacted);
    }
    JsonValue::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_multiple_nodes_stay_an_array() {
        let expanded = json!([
            {"@id": "http://example.org/a"},
            {"@id": "http://example.org/b"}
        ]);
        assert_eq!(
            to_absolute(&expanded),
            json!([{"@id": "http://example.org/a"}, {"@id": "http://example.org/b"}])
        );
    }

    #[test]
    fn test_typed_and_tagged_literals_keep_value_objects() {
        let expanded = json!({
            "@id": "http://example.org/a",
            "http://example.org/p": [
                {"@value": "5", "@type": "http://www.w3.org/2001/XMLSchema#integer"},
                {"@value": "hei", "@language": "no"}
            ]
        });
        assert_eq!(
            to_absolute(&expanded),
            json!({
                "@id": "http://example.org/a",
                "http://example.org/p": [
                    {"@value": "5", "@type": "http://www.w3.org/2001/XMLSchema#integer"},
                    {"@value": "hei", "@language": "no"}
                ]
            })
        );
    }

    #[test]
    fn test_single_item_list_keeps_array() {
        let expanded = json!({
            "http://example.org/p": [{"@list": [{"@value": 1}]}]
        });
        assert_eq!(
            to_absolute(&expanded),
            json!({"http://example.org/p": {"@list": [1]}})
        );
    }

    #[test]
    fn test_nested_blank_node_is_compacted_recursively() {
        let expanded = json!({
            "@id": "http://example.org/a",
            "http://example.org/p": [{
                "http://example.org/q": [{"@value": "x"}]
            }]
        });
        assert_eq!(
            to_absolute(&expanded),
            json!({
                "@id": "http://example.org/a",
                "http://example.org/p": {"http://example.org/q": "x"}
            })
        );
    }
}
