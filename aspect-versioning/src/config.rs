//! Diff configuration
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! parallel = false
//! version_info = { fixed = "2022-05-01" }
//!
//! [reserved]
//! properties = ["@id", "@type", "http://www.w3.org/ns/prov#wasDerivedFrom"]
//! ```

use crate::error::{Result, VersioningError};
use aspect_vocab::{jsonld, prov};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Properties that are never reified and never rewritten as references
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReservedProperties {
    pub properties: Vec<String>,
}

impl Default for ReservedProperties {
    fn default() -> Self {
        Self {
            properties: vec![
                jsonld::ID.to_string(),
                jsonld::TYPE.to_string(),
                prov::WAS_DERIVED_FROM.to_string(),
            ],
        }
    }
}

impl ReservedProperties {
    pub fn contains(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }
}

/// How the `<info>` segment of newly minted versions is chosen
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionInfoPolicy {
    /// Seconds since the Unix epoch at the start of the invocation
    #[default]
    UnixSeconds,
    /// A caller-supplied value, e.g. a release tag
    Fixed(String),
}

impl VersionInfoPolicy {
    /// Resolve to the info segment shared by every version in one invocation
    pub fn resolve(&self) -> String {
        match self {
            VersionInfoPolicy::UnixSeconds => chrono::Utc::now().timestamp().to_string(),
            VersionInfoPolicy::Fixed(info) => info.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiffConfig {
    pub reserved: ReservedProperties,
    pub version_info: VersionInfoPolicy,
    /// Fan reification and hashing out over the rayon pool
    pub parallel: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            reserved: ReservedProperties::default(),
            version_info: VersionInfoPolicy::default(),
            parallel: true,
        }
    }
}

impl DiffConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VersioningError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VersioningError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_toml_str(&content)
    }

    pub fn with_version_info(mut self, info: impl Into<String>) -> Self {
        self.version_info = VersionInfoPolicy::Fixed(info.into());
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
