//! Field extraction engine
//!
//! Resolves every specification of a table against one FHIR document and
//! collects values, per-field errors and warnings without ever aborting the
//! batch.
//!
//! ## Architecture
//!
//! - [`engine`] - resolution strategy per specification and type coercion
//! - [`handlers`] - closed set of business-logic handlers (`la_nr`,
//!   `la_nr_v`, `bs_nr`) and the per-run context they share
//! - [`post_process`] - default values and required-field warnings
//!
//! ## Usage
//!
//! ```rust
//! use erezept_extractor::{ExtractorConfig, FhirDocument, FieldSpecification};
//! use erezept_extractor::app::services::field_extractor::FieldExtractionEngine;
//! use erezept_extractor::app::services::specification_table::SpecificationTable;
//!
//! let document = FhirDocument::parse(
//!     r#"<Bundle xmlns="http://hl7.org/fhir"><type value="document"/></Bundle>"#,
//! )
//! .unwrap();
//! let table = SpecificationTable::new(vec![
//!     FieldSpecification::new("typ", 1).with_selectors(vec!["//fhir:type/@value"]),
//! ]);
//!
//! let result = FieldExtractionEngine::new(ExtractorConfig::default()).extract(&document, &table);
//! assert_eq!(result.text("typ").as_deref(), Some("document"));
//! ```

pub mod engine;
pub mod handlers;
pub mod post_process;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use engine::{FieldExtractionEngine, Resolution};
pub use handlers::{BusinessHandler, RunContext};
