//! Generator configuration.
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! ordering = "dependency"
//! name_tag_key = "Name"
//!
//! [default_tags]
//! ManagedBy = "infragraph"
//! Environment = "dev"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default key of the tag that carries the node label.
pub const DEFAULT_NAME_TAG_KEY: &str = "Name";

/// Order in which blocks appear in the output.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockOrdering {
    /// Canvas order
    #[default]
    Input,
    /// Upstream resources before their dependents
    Dependency,
}

impl std::fmt::Display for BlockOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Dependency => write!(f, "dependency"),
        }
    }
}

/// Options for a [`crate::Generator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Block ordering
    pub ordering: BlockOrdering,
    /// Tag key that carries the node label
    pub name_tag_key: String,
    /// Tags added to every primary block, after the name tag
    pub default_tags: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ordering: BlockOrdering::default(),
            name_tag_key: DEFAULT_NAME_TAG_KEY.to_string(),
            default_tags: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when the file does not exist and
    /// [`Error::ConfigParse`] when its contents are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::parse(&text).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!(
            path = %path.display(),
            ordering = %config.ordering,
            "Loaded generator configuration"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] when the text is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text).map_err(|message| Error::ConfigParse {
            path: "<inline>".into(),
            message,
        })
    }

    /// Replace the ordering, returning the config.
    #[must_use]
    pub fn with_ordering(mut self, ordering: BlockOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(text).map_err(|e| e.to_string())?;
        if config.name_tag_key.trim().is_empty() {
            return Err("`name_tag_key` must not be empty".to_string());
        }
        if config.default_tags.contains_key(&config.name_tag_key) {
            return Err(format!(
                "`default_tags` must not redefine the name tag `{}`",
                config.name_tag_key
            ));
        }
        Ok(config)
    }
}
