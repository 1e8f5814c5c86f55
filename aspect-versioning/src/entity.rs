//! Node records: persistent entities, reified edges and their versions
//!
//! One [`NodeRecord`] type covers every variant. Constructors decide which
//! fields are set; nothing mutates a record after construction, and every
//! transformation returns a new one.

use crate::error::{Result, VersioningError};
use crate::iri::{IriRef, VersionHash, VersionedIri};
use aspect_vocab::{jsonld, prov, rdf};
use serde_json::{json, Map, Value as JsonValue};

/// Property -> value map of a node, in absolute-IRI form
pub type Content = Map<String, JsonValue>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Entity,
    Edge,
}

/// `prov:wasDerivedFrom` of a versioned node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// First version; serialized as `rdf:nil`
    None,
    DerivedFrom(VersionedIri),
}

impl Provenance {
    pub fn as_str(&self) -> &str {
        match self {
            Provenance::None => rdf::NIL,
            Provenance::DerivedFrom(previous) => previous.as_str(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        json!({ "@id": self.as_str() })
    }

    /// Accepts a bare string or an `{"@id": ..}` reference
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let text = match value {
            JsonValue::String(s) => s.as_str(),
            JsonValue::Object(map) => map.get(jsonld::ID).and_then(JsonValue::as_str).ok_or_else(|| {
                VersioningError::invalid_node(format!("provenance without @id: {}", value))
            })?,
            JsonValue::Array(items) if items.len() == 1 => return Self::from_json(&items[0]),
            other => {
                return Err(VersioningError::invalid_node(format!(
                    "provenance must be an IRI, got: {}",
                    other
                )))
            }
        };
        if text == rdf::NIL {
            Ok(Provenance::None)
        } else {
            VersionedIri::parse(text).map(Provenance::DerivedFrom)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    persistent_iri: IriRef,
    kind: RecordKind,
    content: Content,
    version: Option<VersionedIri>,
    provenance: Option<Provenance>,
}

/// Drop identity and provenance keys; they never count as content
fn business_content(mut content: Content) -> Content {
    content.remove(jsonld::ID);
    content.remove(prov::WAS_DERIVED_FROM);
    content
}

impl NodeRecord {
    /// An unversioned entity as read from an input document
    pub fn entity(persistent_iri: IriRef, content: Content) -> Self {
        NodeRecord {
            persistent_iri,
            kind: RecordKind::Entity,
            content: business_content(content),
            version: None,
            provenance: None,
        }
    }

    /// An unversioned reified edge
    pub fn edge(edge_iri: IriRef, content: Content) -> Self {
        NodeRecord {
            kind: RecordKind::Edge,
            ..Self::entity(edge_iri, content)
        }
    }

    /// Version this record for the first time (`wasDerivedFrom rdf:nil`)
    pub fn first_version(&self, hash: &VersionHash, info: &str) -> Self {
        self.versioned(hash, info, Provenance::None)
    }

    /// Version this record as the successor of `previous`
    pub fn derived_version(&self, hash: &VersionHash, info: &str, previous: &VersionedIri) -> Self {
        self.versioned(hash, info, Provenance::DerivedFrom(previous.clone()))
    }

    fn versioned(&self, hash: &VersionHash, info: &str, provenance: Provenance) -> Self {
        NodeRecord {
            version: Some(VersionedIri::new(&self.persistent_iri, &hash.to_hex(), info)),
            provenance: Some(provenance),
            ..self.clone()
        }
    }

    /// Parse a node from the existing store
    ///
    /// The `@id` must be a versioned IRI and provenance must be present.
    pub fn from_stored_node(node: &Content) -> Result<Self> {
        let id = match node.get(jsonld::ID) {
            Some(JsonValue::String(id)) if !id.starts_with(jsonld::BLANK_PREFIX) => id,
            _ => {
                return Err(VersioningError::MissingIdentifier {
                    node: JsonValue::Object(node.clone()).to_string(),
                })
            }
        };
        let version = VersionedIri::parse(id)?;
        let provenance = node
            .get(prov::WAS_DERIVED_FROM)
            .ok_or_else(|| VersioningError::MissingProvenance { iri: id.clone() })
            .and_then(Provenance::from_json)?;

        let content = business_content(node.clone());
        let kind = if [rdf::SUBJECT, rdf::PREDICATE, rdf::OBJECT]
            .iter()
            .all(|key| content.contains_key(*key))
        {
            RecordKind::Edge
        } else {
            RecordKind::Entity
        };

        Ok(NodeRecord {
            persistent_iri: version.persistent_iri().clone(),
            kind,
            content,
            version: Some(version),
            provenance: Some(provenance),
        })
    }

    /// Same identity and version, different content
    pub fn with_content(&self, content: Content) -> Self {
        NodeRecord {
            content: business_content(content),
            ..self.clone()
        }
    }

    pub fn persistent_iri(&self) -> &IriRef {
        &self.persistent_iri
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn is_edge(&self) -> bool {
        self.kind == RecordKind::Edge
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn version(&self) -> Option<&VersionedIri> {
        self.version.as_ref()
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    pub fn as_persistent(&self) -> PersistentEntity<'_> {
        PersistentEntity { record: self }
    }

    /// `None` unless both version and provenance are set
    pub fn as_versioned(&self) -> Option<VersionedEntity<'_>> {
        match (&self.version, &self.provenance) {
            (Some(version), Some(provenance)) => Some(VersionedEntity {
                record: self,
                version,
                provenance,
            }),
            _ => None,
        }
    }
}

/// Persistent view: identity plus business content
#[derive(Clone, Copy, Debug)]
pub struct PersistentEntity<'a> {
    record: &'a NodeRecord,
}

impl<'a> PersistentEntity<'a> {
    pub fn persistent_iri(&self) -> &'a IriRef {
        &self.record.persistent_iri
    }

    pub fn content(&self) -> &'a Content {
        &self.record.content
    }

    /// `{"@id": persistent, ...content}`
    pub fn to_json(&self) -> JsonValue {
        let mut node = Map::new();
        node.insert(jsonld::ID.to_string(), json!(self.persistent_iri().as_str()));
        node.extend(self.content().iter().map(|(k, v)| (k.clone(), v.clone())));
        JsonValue::Object(node)
    }
}

/// Versioned view: version and provenance are guaranteed present
#[derive(Clone, Copy, Debug)]
pub struct VersionedEntity<'a> {
    record: &'a NodeRecord,
    version: &'a VersionedIri,
    provenance: &'a Provenance,
}

impl<'a> VersionedEntity<'a> {
    pub fn record(&self) -> &'a NodeRecord {
        self.record
    }

    pub fn version(&self) -> &'a VersionedIri {
        self.version
    }

    pub fn provenance(&self) -> &'a Provenance {
        self.provenance
    }

    pub fn content(&self) -> &'a Content {
        &self.record.content
    }

    /// `{"@id": versioned, prov:wasDerivedFrom: {"@id": ..}, ...content}`
    pub fn to_json(&self) -> JsonValue {
        let mut node = Map::new();
        node.insert(jsonld::ID.to_string(), json!(self.version.as_str()));
        node.insert(prov::WAS_DERIVED_FROM.to_string(), self.provenance.to_json());
        node.extend(self.content().iter().map(|(k, v)| (k.clone(), v.clone())));
        JsonValue::Object(node)
    }
}
