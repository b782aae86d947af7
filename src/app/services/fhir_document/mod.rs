//! Namespace-aware FHIR-XML document access
//!
//! This module parses an eRezept bundle once with `sxd-document` and
//! evaluates XPath selectors against it with `sxd-xpath`, always under the
//! single `fhir` → `http://hl7.org/fhir` namespace binding (configurable).
//!
//! ## Architecture
//!
//! - [`DocumentAccessor`] - the read seam the extraction engine depends on
//! - [`FhirDocument`] - parsed document implementing the seam
//! - [`xpath`] - prefix checks, anchoring and scalar conversion
//!
//! ## Usage
//!
//! ```rust
//! use erezept_extractor::{DocumentAccessor, FhirDocument};
//!
//! let xml = r#"<Bundle xmlns="http://hl7.org/fhir"><id value="abc"/></Bundle>"#;
//! let document = FhirDocument::parse(xml).unwrap();
//! assert_eq!(document.select("//fhir:id/@value").unwrap(), vec!["abc"]);
//! ```

pub mod xpath;

#[cfg(test)]
pub mod tests;

use crate::config::NamespaceBinding;
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use sxd_document::{Package, parser};
use tracing::debug;

pub use xpath::SelectorError;

/// Read access to a parsed document by selector
///
/// The extraction engine only depends on this trait, so tests can substitute
/// canned documents.
pub trait DocumentAccessor {
    /// Evaluate a selector and return the scalar value of every result,
    /// in document order
    fn select(&self, selector: &str) -> std::result::Result<Vec<String>, SelectorError>;

    /// First result of a selector, if any
    fn select_first(&self, selector: &str) -> std::result::Result<Option<String>, SelectorError> {
        Ok(self.select(selector)?.into_iter().next())
    }
}

/// A parsed FHIR-XML document
pub struct FhirDocument {
    package: Package,
    binding: NamespaceBinding,
}

impl fmt::Debug for FhirDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FhirDocument")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl FhirDocument {
    /// Parse a document using the default `fhir` namespace binding
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with_binding(xml, NamespaceBinding::default())
    }

    /// Parse a document with an explicit namespace binding
    pub fn parse_with_binding(xml: &str, binding: NamespaceBinding) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        if xml.trim().is_empty() {
            return Err(Error::document_parse("Document is empty"));
        }

        let package = parser::parse(xml)
            .map_err(|e| Error::document_parse(format!("Malformed FHIR-XML: {:?}", e)))?;
        Ok(Self { package, binding })
    }

    /// Read and parse a document from disk
    pub fn from_file(path: &Path, binding: NamespaceBinding) -> Result<Self> {
        if !path.exists() {
            return Err(Error::document_not_found(path.display().to_string()));
        }

        let xml = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read FHIR document {}", path.display()), e)
        })?;

        debug!("Loaded FHIR document from {}", path.display());
        Self::parse_with_binding(&xml, binding)
    }
}

impl DocumentAccessor for FhirDocument {
    fn select(&self, selector: &str) -> std::result::Result<Vec<String>, SelectorError> {
        xpath::evaluate(&self.package.as_document(), selector, &self.binding)
    }
}
