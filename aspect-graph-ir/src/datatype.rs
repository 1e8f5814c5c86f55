//! RDF literal datatypes
//!
//! There is no "untyped" literal in this IR. Plain strings default to
//! `xsd:string` and language-tagged strings use `rdf:langString`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Datatype IRIs re-exported from the vocab crate
pub mod iri {
    pub use aspect_vocab::rdf::{JSON as RDF_JSON, LANG_STRING as RDF_LANG_STRING};
    pub use aspect_vocab::xsd::{
        BOOLEAN as XSD_BOOLEAN, DOUBLE as XSD_DOUBLE, INTEGER as XSD_INTEGER, STRING as XSD_STRING,
    };
}

/// RDF literal datatype
///
/// `JsonLdJson` is the JSON-LD `@json` type. It renders as `rdf:JSON` but is
/// kept apart so callers can recognize JSON literals without string compares.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Datatype {
    /// Expanded datatype IRI
    Iri(Arc<str>),
    /// JSON-LD `@json`
    JsonLdJson,
}

impl Datatype {
    /// Datatype from an expanded IRI, recognizing `@json` and `rdf:JSON`
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        let iri = iri.as_ref();
        if iri == iri::RDF_JSON || iri == "@json" {
            Datatype::JsonLdJson
        } else {
            Datatype::Iri(Arc::from(iri))
        }
    }

    pub fn xsd_string() -> Self {
        Datatype::Iri(Arc::from(iri::XSD_STRING))
    }

    pub fn xsd_boolean() -> Self {
        Datatype::Iri(Arc::from(iri::XSD_BOOLEAN))
    }

    pub fn xsd_integer() -> Self {
        Datatype::Iri(Arc::from(iri::XSD_INTEGER))
    }

    pub fn xsd_double() -> Self {
        Datatype::Iri(Arc::from(iri::XSD_DOUBLE))
    }

    pub fn rdf_lang_string() -> Self {
        Datatype::Iri(Arc::from(iri::RDF_LANG_STRING))
    }

    pub fn rdf_json() -> Self {
        Datatype::JsonLdJson
    }

    /// The expanded IRI of this datatype
    pub fn as_iri(&self) -> &str {
        match self {
            Datatype::Iri(iri) => iri,
            Datatype::JsonLdJson => iri::RDF_JSON,
        }
    }

    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == iri::XSD_STRING
    }

    pub fn is_lang_string(&self) -> bool {
        self.as_iri() == iri::RDF_LANG_STRING
    }

    pub fn is_json(&self) -> bool {
        self.as_iri() == iri::RDF_JSON
    }
}

impl PartialEq for Datatype {
    fn eq(&self, other: &Self) -> bool {
        self.as_iri() == other.as_iri()
    }
}

impl Eq for Datatype {}

impl Hash for Datatype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_iri().hash(state);
    }
}

impl PartialOrd for Datatype {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Datatype {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_iri().cmp(other.as_iri())
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_iri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_datatype_is_recognized_in_both_spellings() {
        assert!(Datatype::from_iri("@json").is_json());
        assert!(Datatype::from_iri(iri::RDF_JSON).is_json());
        assert_eq!(Datatype::JsonLdJson, Datatype::from_iri(iri::RDF_JSON));
    }

    #[test]
    fn string_checks() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(!Datatype::xsd_integer().is_xsd_string());
        assert!(Datatype::rdf_lang_string().is_lang_string());
        assert_ne!(Datatype::xsd_double(), Datatype::xsd_integer());
    }
}
