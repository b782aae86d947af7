//! End-to-end extraction runs
//!
//! The facade wires parser, table, engine and validator together for one
//! (document, specification) pair and always hands back a complete
//! [`ExtractionOutcome`]. Fatal input problems are turned into an
//! unsuccessful outcome with a single error message instead of an `Err`.
//!
//! ## Architecture
//!
//! - [`DocumentSource`] / [`SpecificationSource`] - where inputs come from
//! - [`ExtractionFacade::run`] - parse, validate table, extract, validate values
//! - [`ExtractionFacade::run_batch`] - one table, many documents
//! - [`reports`] - specification-only queries (profiles, complex rows, quality report)
//!
//! ## Usage
//!
//! ```rust
//! use erezept_extractor::{DocumentSource, ExtractionFacade, ExtractorConfig, SpecificationSource};
//!
//! let csv = "Attribut,ID,Profile,Partieller XPath\n\
//!            id,1,https://example.org/Bundle,//fhir:Bundle/fhir:id/@value\n";
//! let xml = r#"<Bundle xmlns="http://hl7.org/fhir"><id value="abc"/></Bundle>"#;
//!
//! let facade = ExtractionFacade::new(ExtractorConfig::default());
//! let outcome = facade.run(
//!     &DocumentSource::Xml(xml.to_string()),
//!     &SpecificationSource::Csv(csv.to_string()),
//! );
//! assert!(outcome.success);
//! assert_eq!(outcome.extraction.text("id").as_deref(), Some("abc"));
//! ```

pub mod reports;

#[cfg(test)]
pub mod tests;

use crate::app::models::{ExtractionOutcome, ValidationIssue};
use crate::app::services::consistency_validator::ConsistencyValidator;
use crate::app::services::fhir_document::{DocumentAccessor, FhirDocument};
use crate::app::services::field_extractor::FieldExtractionEngine;
use crate::app::services::specification_parser::{ParsedSpecifications, SpecificationParser};
use crate::app::services::specification_table::SpecificationTable;
use crate::config::ExtractorConfig;
use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Where a FHIR document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Xml(String),
}

/// Where a specification table is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecificationSource {
    Path(PathBuf),
    Csv(String),
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Path(path) => write!(f, "{}", path.display()),
            DocumentSource::Xml(xml) => write!(f, "<inline XML, {} bytes>", xml.len()),
        }
    }
}

impl fmt::Display for SpecificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecificationSource::Path(path) => write!(f, "{}", path.display()),
            SpecificationSource::Csv(csv) => write!(f, "<inline CSV, {} bytes>", csv.len()),
        }
    }
}

/// Orchestrates complete extraction runs
#[derive(Debug, Clone, Default)]
pub struct ExtractionFacade {
    config: ExtractorConfig,
    parser: SpecificationParser,
    engine: FieldExtractionEngine,
    validator: ConsistencyValidator,
}

impl ExtractionFacade {
    /// Create a facade whose services all share one configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            parser: SpecificationParser::new(config.clone()),
            engine: FieldExtractionEngine::new(config.clone()),
            validator: ConsistencyValidator::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract one document against one specification table
    ///
    /// Never fails: a missing or unreadable input yields an outcome with
    /// `success == false` and one error describing the failure.
    pub fn run(
        &self,
        document: &DocumentSource,
        specification: &SpecificationSource,
    ) -> ExtractionOutcome {
        info!(
            "Starting AVD extraction from {} using specifications {}",
            document, specification
        );

        match self.try_run(document, specification) {
            Ok(outcome) => outcome,
            Err(e) => failed_outcome(&e),
        }
    }

    /// Extract several documents against one specification table
    ///
    /// The table is parsed once. Each document gets its own outcome, in input
    /// order; an unusable specification source fails every document.
    pub fn run_batch(
        &self,
        documents: &[DocumentSource],
        specification: &SpecificationSource,
    ) -> Vec<ExtractionOutcome> {
        info!(
            "Starting AVD batch extraction of {} documents using specifications {}",
            documents.len(),
            specification
        );

        let table = match self.load_specifications(specification) {
            Ok(parsed) => parsed.into_table().0,
            Err(e) => {
                let outcome = failed_outcome(&e);
                return vec![outcome; documents.len()];
            }
        };

        documents
            .iter()
            .map(|source| match self.load_document(source) {
                Ok(document) => self.run_with_table(&document, &table),
                Err(e) => failed_outcome(&e),
            })
            .collect()
    }

    /// Extract a document file using a specification CSV file
    pub fn extract_from_file(&self, document_path: &Path, specification_path: &Path) -> ExtractionOutcome {
        self.run(
            &DocumentSource::Path(document_path.to_path_buf()),
            &SpecificationSource::Path(specification_path.to_path_buf()),
        )
    }

    /// Extract XML content using a specification CSV file
    pub fn extract_from_xml(&self, xml: &str, specification_path: &Path) -> ExtractionOutcome {
        self.run(
            &DocumentSource::Xml(xml.to_string()),
            &SpecificationSource::Path(specification_path.to_path_buf()),
        )
    }

    /// Extract an already loaded document against an already parsed table
    ///
    /// Used for batches where the table is parsed once and shared by every
    /// document of the run.
    pub fn run_with_table<D: DocumentAccessor + ?Sized>(
        &self,
        document: &D,
        table: &SpecificationTable,
    ) -> ExtractionOutcome {
        let specification_issues = self.validator.validate_table(table.specifications());
        if !specification_issues.is_empty() {
            warn!(
                "Specification validation issues found: {}",
                join_messages(&specification_issues)
            );
        }

        let extraction = self.engine.extract(document, table);
        let value_validation = self.validator.validate_values(&extraction, table.specifications());
        let success = !extraction.has_errors();

        info!(
            "AVD extraction completed. Success: {}, Values: {}, Errors: {}",
            success,
            extraction.values.len(),
            extraction.errors.len()
        );

        ExtractionOutcome {
            extraction,
            specifications: table.specifications().to_vec(),
            specification_issues,
            value_validation,
            success,
        }
    }

    /// Parse a specification source
    pub fn load_specifications(&self, source: &SpecificationSource) -> Result<ParsedSpecifications> {
        match source {
            SpecificationSource::Path(path) => self.parser.parse_file(path),
            SpecificationSource::Csv(csv) => self.parser.parse_csv_str(csv),
        }
    }

    /// Load a document source under the configured namespace binding
    pub fn load_document(&self, source: &DocumentSource) -> Result<FhirDocument> {
        let binding = self.config.namespace.clone();
        match source {
            DocumentSource::Path(path) => FhirDocument::from_file(path, binding),
            DocumentSource::Xml(xml) => FhirDocument::parse_with_binding(xml, binding),
        }
    }

    fn try_run(
        &self,
        document: &DocumentSource,
        specification: &SpecificationSource,
    ) -> Result<ExtractionOutcome> {
        let (table, row_issues) = self.load_specifications(specification)?.into_table();
        info!(
            "Loaded {} specifications ({} rows skipped)",
            table.len(),
            row_issues.len()
        );

        let document = self.load_document(document)?;
        Ok(self.run_with_table(&document, &table))
    }
}

fn failed_outcome(e: &Error) -> ExtractionOutcome {
    error!("AVD extraction failed: {}", e);
    ExtractionOutcome::failed(format!("Extraction failed: {}", e))
}

fn join_messages(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
