//! Configuration management and validation.
//!
//! Provides the extractor configuration: specification column names, the
//! namespace binding used by selectors, the optional-length sentinel and the
//! post-extraction default value table. Configuration can be loaded from a
//! TOML file; every field falls back to its default.

use crate::constants::{
    self, DEFAULT_BIRTH_DATE, DEFAULT_BSNR, DEFAULT_LANR, FHIR_NAMESPACE_PREFIX,
    FHIR_NAMESPACE_URI, OPTIONAL_LENGTH_MARKER, SELECTOR_FREE_ATTRIBUTES, attributes,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Header names of the specification CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationColumns {
    pub attribute: String,
    pub id: String,
    pub description: String,
    pub length: String,
    pub representation: String,
    pub profile: String,
    pub adaptation: String,
    pub selector: String,
}

impl Default for SpecificationColumns {
    fn default() -> Self {
        Self {
            attribute: constants::columns::ATTRIBUTE.to_string(),
            id: constants::columns::ID.to_string(),
            description: constants::columns::DESCRIPTION.to_string(),
            length: constants::columns::LENGTH.to_string(),
            representation: constants::columns::REPRESENTATION.to_string(),
            profile: constants::columns::PROFILE.to_string(),
            adaptation: constants::columns::ADAPTATION.to_string(),
            selector: constants::columns::SELECTOR.to_string(),
        }
    }
}

/// The single prefix -> namespace binding available to selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl Default for NamespaceBinding {
    fn default() -> Self {
        Self {
            prefix: FHIR_NAMESPACE_PREFIX.to_string(),
            uri: FHIR_NAMESPACE_URI.to_string(),
        }
    }
}

impl NamespaceBinding {
    /// Selector fragment marking a namespaced path step, e.g. `fhir:`
    pub fn path_marker(&self) -> String {
        format!("{}:", self.prefix)
    }
}

/// Global configuration for specification parsing and extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Specification CSV header names
    pub columns: SpecificationColumns,

    /// Namespace binding used when evaluating selectors
    pub namespace: NamespaceBinding,

    /// Word in the length column marking a field as optional
    pub optional_marker: String,

    /// Attributes that are allowed to have no selector text
    pub selector_free_attributes: Vec<String>,

    /// Values substituted for empty attributes after extraction
    pub defaults: BTreeMap<String, String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert(attributes::LA_NR.to_string(), DEFAULT_LANR.to_string());
        defaults.insert(attributes::BS_NR.to_string(), DEFAULT_BSNR.to_string());
        defaults.insert(
            attributes::PAT_GEB.to_string(),
            DEFAULT_BIRTH_DATE.to_string(),
        );

        Self {
            columns: SpecificationColumns::default(),
            namespace: NamespaceBinding::default(),
            optional_marker: OPTIONAL_LENGTH_MARKER.to_string(),
            selector_free_attributes: SELECTOR_FREE_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            defaults,
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read configuration file {}", path.display()),
                e,
            )
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the namespace binding
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespace = NamespaceBinding {
            prefix: prefix.into(),
            uri: uri.into(),
        };
        self
    }

    /// Set the specification column names
    pub fn with_columns(mut self, columns: SpecificationColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Add or replace a post-extraction default value
    pub fn with_default(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(attribute.into(), value.into());
        self
    }

    /// Remove all post-extraction default values
    pub fn without_defaults(mut self) -> Self {
        self.defaults.clear();
        self
    }

    /// Get the post-extraction default for an attribute
    pub fn default_for(&self, attribute: &str) -> Option<&str> {
        self.defaults.get(attribute).map(String::as_str)
    }

    /// Check whether an attribute may have no selector text
    pub fn is_selector_free(&self, attribute: &str) -> bool {
        self.selector_free_attributes.iter().any(|a| a == attribute)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.namespace.prefix.trim().is_empty() {
            return Err(Error::configuration("Namespace prefix cannot be empty"));
        }

        if self.namespace.uri.trim().is_empty() {
            return Err(Error::configuration("Namespace URI cannot be empty"));
        }

        if self.columns.attribute.trim().is_empty() {
            return Err(Error::configuration(
                "Attribute column name cannot be empty",
            ));
        }

        if self.columns.selector.trim().is_empty() {
            return Err(Error::configuration("Selector column name cannot be empty"));
        }

        if self.optional_marker.trim().is_empty() {
            return Err(Error::configuration("Optional marker cannot be empty"));
        }

        Ok(())
    }
}
