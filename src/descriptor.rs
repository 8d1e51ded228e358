//! Plugin Descriptors
//!
//! Immutable identity and metadata for a registered plugin. A descriptor is
//! validated once at construction and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, PluginResult};

/// Plugin metadata and identity
///
/// The `id` is the stable unique key within a registry. Tags are descriptive
/// category keywords consulted as an ordering tie-break; they are lowercased
/// at construction but keep their declared order for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Stable unique identifier
    id: String,

    /// Human-readable name
    pub name: String,

    /// Plugin version string
    pub version: String,

    /// Short description
    pub description: String,

    /// Plugin author
    pub author: String,

    /// Category tags, lowercase, declared order preserved
    tags: Vec<String>,
}

impl PluginDescriptor {
    /// Create a new descriptor
    ///
    /// Fails with [`PluginError::InvalidMetadata`] when the id is empty after
    /// trimming.
    pub fn new<S: Into<String>>(id: S, name: S, version: S) -> PluginResult<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(PluginError::invalid_metadata("plugin id must not be empty"));
        }
        Ok(Self {
            id,
            name: name.into(),
            version: version.into(),
            description: String::new(),
            author: String::new(),
            tags: Vec::new(),
        })
    }

    /// Set the description
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Set the author
    pub fn with_author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = author.into();
        self
    }

    /// Set category tags
    ///
    /// Tags are trimmed and lowercased; empty entries are dropped. Declared
    /// order is preserved for display, scoring is order-independent.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// The unique plugin id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The normalized category tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl std::fmt::Display for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.id, self.version)
    }
}
