use crate::context::{Container, ContextEntry, ParsedContext, TypeValue};
use crate::error::{JsonLdError, Result};
use crate::iri;
use serde_json::{json, Map, Value as JsonValue};

/// Exact term match in the active context
fn match_exact(compact_iri: &str, context: &ParsedContext) -> Option<(String, ContextEntry)> {
    context.get(compact_iri).map(|entry| {
        let iri = entry.id.clone().unwrap_or_else(|| compact_iri.to_string());
        (iri, entry.clone())
    })
}

/// Prefix match for compact IRIs such as "sor:Row1"
fn match_prefix(compact_iri: &str, context: &ParsedContext) -> Option<(String, ContextEntry)> {
    let (prefix, suffix) = iri::parse_prefix(compact_iri)?;
    let namespace = context.get(prefix)?.id.as_ref()?;
    let full_iri = format!("{}{}", namespace, suffix);
    // Type coercion of a prefixed form is found under the expanded key
    let entry = context.get(&full_iri).cloned().unwrap_or_default();
    Some((full_iri, entry))
}

/// Fall back to @vocab (properties, types) or @base (@id values)
fn match_default(compact_iri: &str, context: &ParsedContext, vocab: bool) -> Option<String> {
    if iri::any_iri(compact_iri) || compact_iri.starts_with('@') {
        return None;
    }
    let default = if vocab {
        context.vocab.as_deref()
    } else {
        context.base.as_deref()
    }?;
    Some(if vocab {
        format!("{}{}", default, compact_iri)
    } else {
        iri::join(default, compact_iri)
    })
}

/// Expansion details: the expanded IRI and any term definition that applies.
///
/// `vocab` selects @vocab resolution (properties and classes) over @base
/// resolution (@id values).
pub fn details(
    compact_iri: &str,
    context: &ParsedContext,
    vocab: bool,
) -> (String, Option<ContextEntry>) {
    if vocab {
        if let Some((iri, entry)) = match_exact(compact_iri, context) {
            return (iri, Some(entry));
        }
    }

    if let Some((iri, entry)) = match_prefix(compact_iri, context) {
        return (iri, Some(entry));
    }

    match match_default(compact_iri, context, vocab) {
        Some(iri) => (iri, None),
        None => (compact_iri.to_string(), None),
    }
}

/// Expand a single IRI
pub fn iri(compact_iri: &str, context: &ParsedContext, vocab: bool) -> String {
    details(compact_iri, context, vocab).0
}

fn child_path(path: &[JsonValue], step: JsonValue) -> Vec<JsonValue> {
    let mut next = path.to_vec();
    next.push(step);
    next
}

/// The single wrapped value of a `{"@list": ..}` or `{"@set": ..}` object
fn wrapped<'a>(map: &'a Map<String, JsonValue>, keyword: &str) -> Option<&'a JsonValue> {
    let extra_ok = map.len() == 1 || (map.len() == 2 && map.contains_key("@index"));
    map.get(keyword).filter(|_| extra_ok)
}

/// Expand a property value according to the term definition that applies
fn parse_node_value(
    value: &JsonValue,
    entry: Option<&ContextEntry>,
    context: &ParsedContext,
    path: &[JsonValue],
) -> Result<Vec<JsonValue>> {
    let type_val = entry.and_then(|e| e.type_.as_ref());

    match value {
        JsonValue::Null => Ok(vec![]),

        JsonValue::Bool(_) | JsonValue::Number(_) => {
            let mut obj = Map::new();
            obj.insert("@value".to_string(), value.clone());
            if let Some(TypeValue::Iri(t)) = type_val {
                obj.insert("@type".to_string(), json!(t));
            }
            Ok(vec![JsonValue::Object(obj)])
        }

        JsonValue::String(s) => {
            match type_val {
                Some(TypeValue::Id) => return Ok(vec![json!({"@id": iri(s, context, false)})]),
                Some(TypeValue::Vocab) => return Ok(vec![json!({"@id": iri(s, context, true)})]),
                _ => {}
            }

            let lang = match entry.and_then(|e| e.language.as_ref()) {
                Some(explicit) => explicit.as_ref(),
                None => context.language.as_ref(),
            };

            let mut obj = Map::new();
            obj.insert("@value".to_string(), json!(s));
            match (type_val, lang) {
                (Some(TypeValue::Iri(_)), Some(_)) => return Err(JsonLdError::LanguageWithType),
                (Some(TypeValue::Iri(t)), None) => {
                    obj.insert("@type".to_string(), json!(t));
                }
                (_, Some(lang)) => {
                    obj.insert("@language".to_string(), json!(lang));
                }
                _ => {}
            }
            Ok(vec![JsonValue::Object(obj)])
        }

        JsonValue::Array(arr) => {
            let mut results = Vec::new();
            for (i, item) in arr.iter().enumerate() {
                let item_path = child_path(path, json!(i));
                if item.is_array() {
                    return Err(JsonLdError::NestedSequence { path: item_path });
                }
                results.extend(parse_node_value(item, entry, context, &item_path)?);
            }

            if entry.is_some_and(|e| e.has_container(&Container::List)) {
                return Ok(vec![json!({"@list": results})]);
            }
            Ok(results)
        }

        JsonValue::Object(map) => {
            if type_val == Some(&TypeValue::Json) {
                return Ok(vec![json!({"@value": value, "@type": "@json"})]);
            }

            if let Some(list_val) = wrapped(map, "@list") {
                let items = parse_node_value(
                    list_val,
                    None,
                    context,
                    &child_path(path, json!("@list")),
                )?;
                return Ok(vec![json!({"@list": items})]);
            }

            if let Some(set_val) = wrapped(map, "@set") {
                return parse_node_value(set_val, entry, context, &child_path(path, json!("@set")));
            }

            if map.contains_key("@value") {
                return parse_value_object(map, entry, context, path);
            }

            if entry.is_some_and(|e| e.has_container(&Container::Language)) {
                let mut results = Vec::new();
                for (lang, v) in map {
                    let values: Vec<&JsonValue> = match v {
                        JsonValue::Array(arr) => arr.iter().collect(),
                        other => vec![other],
                    };
                    for text in values.into_iter().filter_map(|v| v.as_str()) {
                        results.push(json!({"@value": text, "@language": lang}));
                    }
                }
                return Ok(results);
            }

            Ok(vec![expand_node_internal(value, context, path)?])
        }
    }
}

/// Expand a `{"@value": ..}` object
fn parse_value_object(
    map: &Map<String, JsonValue>,
    entry: Option<&ContextEntry>,
    context: &ParsedContext,
    path: &[JsonValue],
) -> Result<Vec<JsonValue>> {
    let val = map.get("@value").ok_or_else(|| JsonLdError::InvalidStructure {
        path: path.to_vec(),
        message: "value object without @value".to_string(),
    })?;

    if val.is_null() {
        return Ok(vec![]);
    }

    let type_iri = match map.get("@type").and_then(|t| t.as_str()) {
        Some(t) => Some(iri(t, context, true)),
        None => entry.and_then(|e| match &e.type_ {
            Some(TypeValue::Iri(t)) => Some(t.clone()),
            _ => None,
        }),
    };

    let lang = map
        .get("@language")
        .and_then(|l| l.as_str())
        .map(str::to_string);

    let mut obj = Map::new();
    obj.insert("@value".to_string(), val.clone());
    match (type_iri, lang) {
        (Some(_), Some(_)) => return Err(JsonLdError::LanguageWithType),
        (Some(t), None) => {
            obj.insert("@type".to_string(), json!(t));
        }
        (None, Some(l)) => {
            obj.insert("@language".to_string(), json!(l));
        }
        (None, None) => {}
    }

    Ok(vec![JsonValue::Object(obj)])
}

/// Expanded @type values of a node
fn parse_type(node_map: &Map<String, JsonValue>, context: &ParsedContext) -> Vec<String> {
    let type_val = node_map
        .get(&context.type_key)
        .or_else(|| node_map.get("@type"));

    match type_val {
        Some(JsonValue::String(s)) => vec![iri(s, context, true)],
        Some(JsonValue::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| iri(s, context, true))
            .collect(),
        _ => vec![],
    }
}

/// Expand one node object (or array of node objects)
fn expand_node_internal(
    node: &JsonValue,
    context: &ParsedContext,
    path: &[JsonValue],
) -> Result<JsonValue> {
    let map = match node {
        JsonValue::Array(arr) => {
            let expanded = arr
                .iter()
                .enumerate()
                .map(|(i, item)| expand_node_internal(item, context, &child_path(path, json!(i))))
                .collect::<Result<Vec<_>>>()?;
            return Ok(JsonValue::Array(expanded));
        }
        JsonValue::Object(map) => map,
        other => return Ok(other.clone()),
    };

    let context = match map.get("@context") {
        Some(local) => ParsedContext::parse(Some(context), local)?,
        None => context.clone(),
    };

    let mut result = Map::new();

    let types = parse_type(map, &context);
    if !types.is_empty() {
        result.insert("@type".to_string(), json!(types));
    }

    for (k, v) in map {
        if k == "@context" || k == "@type" || *k == context.type_key {
            continue;
        }

        let key_path = child_path(path, json!(k));
        let (expanded_key, entry) = details(k, &context, true);

        match expanded_key.as_str() {
            "@graph" => {
                let graph = expand_node_internal(v, &context, &key_path)?;
                result.insert("@graph".to_string(), graph);
            }
            "@id" => {
                if let JsonValue::String(s) = v {
                    result.insert("@id".to_string(), json!(iri(s, &context, false)));
                }
            }
            _ if expanded_key.starts_with('@') => {}
            _ => {
                let values = parse_node_value(v, entry.as_ref(), &context, &key_path)?;
                if values.is_empty() {
                    continue;
                }
                match result.get_mut(&expanded_key) {
                    Some(JsonValue::Array(existing)) => existing.extend(values),
                    _ => {
                        result.insert(expanded_key, JsonValue::Array(values));
                    }
                }
            }
        }
    }

    Ok(JsonValue::Object(result))
}

/// True for `{"@context": .., "@graph": ..}` wrappers around the default graph
fn is_default_graph(map: &Map<String, JsonValue>) -> bool {
    map.contains_key("@graph") && map.keys().all(|k| k == "@context" || k == "@graph")
}

/// Expand a JSON-LD document
///
/// A default-graph wrapper expands to the array of its nodes; any other
/// document expands node by node.
pub fn node(document: &JsonValue, context: &ParsedContext) -> Result<JsonValue> {
    match document {
        JsonValue::Object(map) if is_default_graph(map) => {
            let context = match map.get("@context") {
                Some(local) => ParsedContext::parse(Some(context), local)?,
                None => context.clone(),
            };
            match map.get("@graph") {
                Some(graph) => expand_node_internal(graph, &context, &[json!("@graph")]),
                None => Ok(JsonValue::Array(vec![])),
            }
        }
        JsonValue::Object(_) | JsonValue::Array(_) => expand_node_internal(document, context, &[]),
        other => Ok(other.clone()),
    }
}
