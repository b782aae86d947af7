//! eRezept AVD Extractor Library
//!
//! A Rust library for extracting AVD billing attributes from German electronic
//! prescription (eRezept) FHIR-XML documents, driven by an externally maintained
//! CSV table of field specifications.
//!
//! This library provides tools for:
//! - Parsing the AVD specification CSV into typed field specifications
//! - Evaluating XPath selectors against namespaced FHIR-XML documents
//! - Resolving attributes with cross-field business rules (LANR, BSNR/IK chains)
//! - Validating specification tables and extracted values
//! - Assembling complete, JSON-serialisable extraction results

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod consistency_validator;
        pub mod extraction_facade;
        pub mod fhir_document;
        pub mod field_extractor;
        pub mod specification_parser;
        pub mod specification_table;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ExtractedValue, ExtractionOutcome, ExtractionResult, FieldSpecification, IssueKind,
    LengthRule, Representation, ValidationIssue,
};
pub use app::services::extraction_facade::{DocumentSource, ExtractionFacade, SpecificationSource};
pub use app::services::fhir_document::{DocumentAccessor, FhirDocument, SelectorError};
pub use config::ExtractorConfig;

/// Result type alias for the extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for specification loading, document parsing and configuration
///
/// Field-level extraction problems never surface here: the engine records them
/// in the [`ExtractionResult`] and keeps going.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in '{origin}': {message}")]
    CsvParsing {
        origin: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Specification file does not exist
    #[error("Specification file not found: {path}")]
    SpecificationNotFound { path: String },

    /// Specification source exists but cannot be used
    #[error("Specification source unusable: {message}")]
    SpecificationSource { message: String },

    /// FHIR document file does not exist
    #[error("FHIR document not found: {path}")]
    DocumentNotFound { path: String },

    /// FHIR document is not well-formed XML
    #[error("FHIR document parsing error: {message}")]
    DocumentParse { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        origin: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            origin: origin.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a specification not found error
    pub fn specification_not_found(path: impl Into<String>) -> Self {
        Self::SpecificationNotFound { path: path.into() }
    }

    /// Create a specification source error
    pub fn specification_source(message: impl Into<String>) -> Self {
        Self::SpecificationSource {
            message: message.into(),
        }
    }

    /// Create a document not found error
    pub fn document_not_found(path: impl Into<String>) -> Self {
        Self::DocumentNotFound { path: path.into() }
    }

    /// Create a document parsing error
    pub fn document_parse(message: impl Into<String>) -> Self {
        Self::DocumentParse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            origin: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}
