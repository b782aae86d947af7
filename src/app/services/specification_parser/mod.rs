//! AVD specification CSV parser
//!
//! Turns the externally maintained AVD table into typed
//! [`FieldSpecification`](crate::app::models::FieldSpecification) entries.
//! Business-rule annotations (`{{ ... }}`) are collected as prose and the
//! remaining selector-shaped lines become the candidate selectors.
//!
//! ## Architecture
//!
//! - [`parser`] - CSV reading and row → specification conversion
//! - [`selectors`] - business-rule and selector splitting of the XPath column
//!
//! ## Usage
//!
//! ```rust
//! use erezept_extractor::ExtractorConfig;
//! use erezept_extractor::app::services::specification_parser::SpecificationParser;
//!
//! let csv = "Attribut,ID,Länge,Partieller XPath\nrezept_id,1,..20,//fhir:Bundle/fhir:identifier/fhir:value/@value\n";
//! let parsed = SpecificationParser::new(ExtractorConfig::default())
//!     .parse_csv_str(csv)
//!     .unwrap();
//! assert_eq!(parsed.specifications[0].attribute, "rezept_id");
//! ```

pub mod parser;
pub mod selectors;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::{ParsedSpecifications, SpecificationParser, SpecificationRow};
pub use selectors::{SelectorText, split_selector_text};
