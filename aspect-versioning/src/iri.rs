//! Persistent and versioned identifiers
//!
//! A versioned IRI has the fixed shape `<persistent>/version/<hash>/<info>`.
//! Only the last three `/`-segments are structural, so the persistent part may
//! itself contain `/` segments and `#` fragments.

use crate::error::{Result, VersioningError};
use aspect_graph_json_ld::iri::{is_absolute, is_blank_node};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

const VERSION_SEGMENT: &str = "version";

/// An absolute IRI, compared by its full string form (fragment included)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IriRef(Arc<str>);

impl IriRef {
    /// Parse an absolute IRI: it needs a scheme and may not contain whitespace.
    /// Blank node labels are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        if is_blank_node(text) || !is_absolute(text) || text.chars().any(char::is_whitespace) {
            return Err(VersioningError::InvalidIri {
                iri: text.to_string(),
            });
        }
        Ok(IriRef(Arc::from(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `/segment` for each segment. Segments must not contain whitespace.
    pub(crate) fn join_segments(&self, segments: &[&str]) -> IriRef {
        let mut iri = self.0.to_string();
        for segment in segments {
            iri.push('/');
            iri.push_str(segment);
        }
        IriRef(Arc::from(iri))
    }
}

impl fmt::Display for IriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for IriRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Content hash of a node's canonical triple set
///
/// XOR of the SHA-256 digests of each canonical N-Triples line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VersionHash([u8; 32]);

impl VersionHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        VersionHash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for VersionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// `<persistent>/version/<hash>/<info>`
///
/// The hash and info segments are kept verbatim. Stored versions may carry
/// hashes from another hashing scheme; parsing never checks them against
/// content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionedIri {
    full: Arc<str>,
    persistent: IriRef,
    hash: Arc<str>,
    info: Arc<str>,
}

impl VersionedIri {
    pub fn new(persistent: &IriRef, hash: &str, info: &str) -> Self {
        VersionedIri {
            full: Arc::from(Self::format(persistent, hash, info)),
            persistent: persistent.clone(),
            hash: Arc::from(hash),
            info: Arc::from(info),
        }
    }

    pub fn format(persistent: &IriRef, hash: &str, info: &str) -> String {
        format!("{}/{}/{}/{}", persistent, VERSION_SEGMENT, hash, info)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || VersioningError::InvalidVersionedIri {
            iri: text.to_string(),
        };

        // Reversed: info, hash, "version", persistent
        let segments: Vec<&str> = text.rsplitn(4, '/').collect();
        let &[info, hash, marker, persistent] = &segments[..] else {
            return Err(invalid());
        };
        if marker != VERSION_SEGMENT || persistent.is_empty() {
            return Err(invalid());
        }
        let persistent = IriRef::parse(persistent).map_err(|_| invalid())?;

        Ok(VersionedIri {
            full: Arc::from(text),
            persistent,
            hash: Arc::from(hash),
            info: Arc::from(info),
        })
    }

    pub fn persistent_iri(&self) -> &IriRef {
        &self.persistent
    }

    pub fn version_hash(&self) -> &str {
        &self.hash
    }

    pub fn version_info(&self) -> &str {
        &self.info
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for VersionedIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl Serialize for VersionedIri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full)
    }
}

/// What a string value inside node content refers to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueRef {
    Versioned(VersionedIri),
    Plain(IriRef),
    /// Not an IRI; left untouched wherever it appears
    Literal,
}

impl ValueRef {
    pub fn classify(text: &str) -> ValueRef {
        if let Ok(versioned) = VersionedIri::parse(text) {
            ValueRef::Versioned(versioned)
        } else if let Ok(iri) = IriRef::parse(text) {
            ValueRef::Plain(iri)
        } else {
            ValueRef::Literal
        }
    }
}
