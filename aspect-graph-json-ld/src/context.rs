use crate::error::{JsonLdError, Result};
use crate::iri;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Container types for JSON-LD @container values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    List,
    Set,
    Language,
    Index,
}

/// Term @type coercion: a keyword or a datatype IRI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeValue {
    Id,          // @id - value is an IRI reference
    Vocab,       // @vocab
    Json,        // @json - JSON literal
    Iri(String), // datatype IRI
}

/// A single term definition
#[derive(Debug, Clone, Default)]
pub struct ContextEntry {
    /// The expanded IRI (@id)
    pub id: Option<String>,
    /// Type coercion (@type)
    pub type_: Option<TypeValue>,
    /// Containers (@container)
    pub container: Vec<Container>,
    /// Language tag (@language); `Some(None)` means explicitly cleared
    pub language: Option<Option<String>>,
}

impl ContextEntry {
    pub fn has_container(&self, container: &Container) -> bool {
        self.container.contains(container)
    }
}

/// The fully parsed active context
#[derive(Debug, Clone)]
pub struct ParsedContext {
    /// Key aliased to @type (defaults to "@type")
    pub type_key: String,
    /// Default vocabulary (@vocab)
    pub vocab: Option<String>,
    /// Base IRI (@base)
    pub base: Option<String>,
    /// Default language (@language)
    pub language: Option<String>,
    /// JSON-LD processing version (@version), kept in its lexical form
    pub version: Option<String>,
    /// Term definitions
    pub terms: HashMap<String, ContextEntry>,
}

impl Default for ParsedContext {
    fn default() -> Self {
        Self {
            type_key: "@type".to_string(),
            vocab: None,
            base: None,
            language: None,
            version: None,
            terms: HashMap::new(),
        }
    }
}

impl ParsedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ContextEntry> {
        self.terms.get(key)
    }

    /// Parse a context value (string, map, array, or null) on top of `base_context`
    pub fn parse(base_context: Option<&ParsedContext>, context: &JsonValue) -> Result<ParsedContext> {
        let active = base_context.cloned().unwrap_or_default();

        match context {
            // null resets the active context
            JsonValue::Null => Ok(ParsedContext::default()),

            JsonValue::String(s) => {
                // Remote contexts are not fetched; a bare IRI acts as @vocab
                let mut active = active;
                active.vocab = Some(iri::add_trailing_slash(s));
                Ok(active)
            }

            JsonValue::Object(map) => match map.get("@context") {
                Some(inner) => Self::parse(Some(&active), inner),
                None => parse_context_map(&active, map),
            },

            JsonValue::Array(arr) => arr
                .iter()
                .try_fold(active, |acc, ctx| Self::parse(Some(&acc), ctx)),

            _ => Err(JsonLdError::InvalidContext {
                message: format!("Invalid context type: {}", context),
            }),
        }
    }
}

/// Compute @vocab, resolving empty and relative values against @base
fn compute_vocab(
    base_context: &ParsedContext,
    context: &Map<String, JsonValue>,
    value: &JsonValue,
) -> Result<Option<String>> {
    let base = context
        .get("@base")
        .and_then(|v| v.as_str())
        .or(base_context.base.as_deref());

    match value {
        JsonValue::String(s) if s.is_empty() => Ok(base.map(iri::add_trailing_slash)),
        JsonValue::String(s) if !iri::is_absolute(s) => Ok(Some(match base {
            Some(base) => iri::join(base, s),
            None => iri::add_trailing_slash(s),
        })),
        JsonValue::String(s) => Ok(Some(iri::add_trailing_slash(s))),
        JsonValue::Null => Ok(None),
        _ => Err(JsonLdError::InvalidContext {
            message: format!("@vocab must be a string, got: {}", value),
        }),
    }
}

/// Parse a context object
fn parse_context_map(base: &ParsedContext, map: &Map<String, JsonValue>) -> Result<ParsedContext> {
    let mut result = base.clone();

    // Keywords first: term definitions may depend on @vocab
    for (key, value) in map.iter() {
        match key.as_str() {
            "@vocab" => result.vocab = compute_vocab(base, map, value)?,
            "@base" => result.base = value.as_str().map(str::to_string),
            "@language" => result.language = value.as_str().map(str::to_string),
            "@version" => {
                result.version = match value {
                    JsonValue::String(s) => Some(s.clone()),
                    JsonValue::Number(n) => Some(n.to_string()),
                    _ => None,
                }
            }
            _ => {}
        }
    }

    let default_vocab = result.vocab.clone();

    for (key, value) in map.iter() {
        if key.starts_with('@') {
            continue;
        }
        let entry = parse_context_entry(key, value, map, base, default_vocab.as_deref())?;
        if entry.id.as_deref() == Some("@type") {
            result.type_key = key.clone();
        }
        result.terms.insert(key.clone(), entry);
    }

    Ok(result)
}

/// Follow term-to-term references within one context object
fn recursively_get_id(
    term: &str,
    context: &Map<String, JsonValue>,
    visited: &mut Vec<String>,
) -> Result<String> {
    if visited.iter().any(|v| v == term) {
        return Err(JsonLdError::InvalidIriMapping {
            term: term.to_string(),
        });
    }

    match context.get(term) {
        Some(JsonValue::String(s)) if s == term => Err(JsonLdError::InvalidIriMapping {
            term: term.to_string(),
        }),
        Some(JsonValue::String(s)) if !s.contains(':') && !s.starts_with('@') => {
            visited.push(term.to_string());
            recursively_get_id(s, context, visited)
        }
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Object(map)) => Ok(map
            .get("@id")
            .and_then(|id| id.as_str())
            .unwrap_or(term)
            .to_string()),
        _ => Ok(term.to_string()),
    }
}

/// Resolve a compact IRI or vocab-relative term while parsing a context
fn resolve_compact_iri(
    value: &str,
    context: &Map<String, JsonValue>,
    base_context: &ParsedContext,
    default_vocab: Option<&str>,
) -> String {
    if let Some((prefix, suffix)) = iri::parse_prefix(value) {
        let local = context.get(prefix).and_then(|v| match v {
            JsonValue::String(s) => Some(s.as_str()),
            JsonValue::Object(m) => m.get("@id").and_then(|id| id.as_str()),
            _ => None,
        });
        if let Some(ns) = local {
            return format!("{}{}", ns, suffix);
        }
        if let Some(ns) = base_context.get(prefix).and_then(|e| e.id.as_deref()) {
            return format!("{}{}", ns, suffix);
        }
    }

    match default_vocab {
        Some(vocab) if !value.starts_with('@') && !iri::any_iri(value) => {
            format!("{}{}", vocab, value)
        }
        _ => value.to_string(),
    }
}

fn parse_type_value(
    value: &JsonValue,
    context: &Map<String, JsonValue>,
    base_context: &ParsedContext,
    default_vocab: Option<&str>,
) -> Result<Option<TypeValue>> {
    match value {
        JsonValue::String(s) => {
            let resolved = resolve_compact_iri(s, context, base_context, default_vocab);
            Ok(Some(match resolved.as_str() {
                "@id" => TypeValue::Id,
                "@vocab" => TypeValue::Vocab,
                "@json" => TypeValue::Json,
                _ => TypeValue::Iri(resolved),
            }))
        }
        JsonValue::Null => Ok(None),
        _ => Err(JsonLdError::InvalidContext {
            message: format!("@type must be a string, got: {}", value),
        }),
    }
}

fn parse_container(value: &JsonValue) -> Result<Vec<Container>> {
    let parse_one = |v: &JsonValue| match v.as_str() {
        Some("@list") => Ok(Container::List),
        Some("@set") => Ok(Container::Set),
        Some("@language") => Ok(Container::Language),
        Some("@index") => Ok(Container::Index),
        _ => Err(JsonLdError::InvalidContext {
            message: format!("Unknown @container value: {}", v),
        }),
    };

    match value {
        JsonValue::Array(arr) => arr.iter().map(parse_one).collect(),
        other => parse_one(other).map(|c| vec![c]),
    }
}

fn parse_context_entry(
    key: &str,
    value: &JsonValue,
    original_context: &Map<String, JsonValue>,
    base_context: &ParsedContext,
    default_vocab: Option<&str>,
) -> Result<ContextEntry> {
    match value {
        JsonValue::String(_) => {
            let mut visited = Vec::new();
            let resolved = recursively_get_id(key, original_context, &mut visited)?;
            Ok(ContextEntry {
                id: Some(resolve_compact_iri(
                    &resolved,
                    original_context,
                    base_context,
                    default_vocab,
                )),
                ..Default::default()
            })
        }

        JsonValue::Null => Ok(ContextEntry::default()),

        JsonValue::Object(map) => {
            let mut entry = ContextEntry::default();

            for (k, v) in map.iter() {
                match k.as_str() {
                    "@id" => {
                        entry.id = v.as_str().map(|s| {
                            resolve_compact_iri(s, original_context, base_context, default_vocab)
                        });
                    }
                    "@type" => {
                        entry.type_ =
                            parse_type_value(v, original_context, base_context, default_vocab)?;
                    }
                    "@container" => entry.container = parse_container(v)?,
                    "@language" => entry.language = Some(v.as_str().map(str::to_string)),
                    _ => {}
                }
            }

            if entry.id.is_none() {
                entry.id = Some(resolve_compact_iri(
                    key,
                    original_context,
                    base_context,
                    default_vocab,
                ));
            }

            Ok(entry)
        }

        _ => Err(JsonLdError::InvalidContext {
            message: format!("Invalid context entry for key '{}': {}", key, value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mel_context() -> JsonValue {
        json!({
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "@vocab": "http://rdf.equinor.com/ontology/mel#",
            "sor": "http://rdf.equinor.com/ontology/sor#",
            "@version": "1.1"
        })
    }

    #[test]
    fn test_prefixes_and_vocab() {
        let ctx = ParsedContext::parse(None, &mel_context()).unwrap();
        assert_eq!(ctx.vocab.as_deref(), Some("http://rdf.equinor.com/ontology/mel#"));
        assert_eq!(
            ctx.get("sor").unwrap().id.as_deref(),
            Some("http://rdf.equinor.com/ontology/sor#")
        );
        assert_eq!(ctx.version.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_numeric_version_is_kept_lexically() {
        let ctx = ParsedContext::parse(None, &json!({"@version": 1.1})).unwrap();
        assert_eq!(ctx.version.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_term_referencing_term() {
        let ctx = ParsedContext::parse(
            None,
            &json!({
                "imf": "http://imf.imfid.org/ontology/imf#",
                "child": "hasChild",
                "hasChild": "imf:hasChild"
            }),
        )
        .unwrap();
        assert_eq!(
            ctx.get("child").unwrap().id.as_deref(),
            Some("http://imf.imfid.org/ontology/imf#hasChild")
        );
    }

    #[test]
    fn test_cyclic_term_is_rejected() {
        assert!(ParsedContext::parse(None, &json!({"a": "b", "b": "a"})).is_err());
        assert!(ParsedContext::parse(None, &json!({"foo": "foo"})).is_err());
    }

    #[test]
    fn test_expanded_term_definition() {
        let ctx = ParsedContext::parse(
            None,
            &json!({
                "imf": "http://imf.imfid.org/ontology/imf#",
                "parts": {"@id": "imf:hasPart", "@type": "@id", "@container": "@list"}
            }),
        )
        .unwrap();
        let entry = ctx.get("parts").unwrap();
        assert_eq!(entry.id.as_deref(), Some("http://imf.imfid.org/ontology/imf#hasPart"));
        assert_eq!(entry.type_, Some(TypeValue::Id));
        assert!(entry.has_container(&Container::List));
    }

    #[test]
    fn test_sequential_contexts_and_null_reset() {
        let ctx = ParsedContext::parse(
            None,
            &json!([{"sor": "http://rdf.equinor.com/ontology/sor#"}, {"rdfs": "http://www.w3.org/2000/01/rdf-schema#"}]),
        )
        .unwrap();
        assert!(ctx.get("sor").is_some());
        assert!(ctx.get("rdfs").is_some());

        let reset = ParsedContext::parse(Some(&ctx), &JsonValue::Null).unwrap();
        assert!(reset.terms.is_empty());
    }
}
