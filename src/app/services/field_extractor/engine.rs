//! Specification-driven extraction of one document
//!
//! Every specification is resolved independently; a failing selector is
//! recorded against its attribute and the run continues with the next one.

use super::handlers::{
    BusinessHandler, RunContext, resolve_primary_prescriber, resolve_provider_facility,
    resolve_responsible_prescriber,
};
use super::post_process::apply_post_processing;
use crate::app::models::{ExtractedValue, ExtractionResult, FieldSpecification, Representation};
use crate::app::services::fhir_document::{DocumentAccessor, SelectorError};
use crate::app::services::specification_table::SpecificationTable;
use crate::app::services::specification_parser::selectors::strip_business_rules;
use crate::config::ExtractorConfig;
use crate::constants::BUSINESS_RULE_OPEN;
use tracing::{debug, info, warn};

/// How a specification is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No selector text at all
    NoSelector,
    /// Dedicated or generic business-logic handler
    Handler(BusinessHandler),
    /// First non-empty of several selectors
    Fallback,
    /// Exactly one selector
    Single,
    /// Selector lines recovered from the raw text
    Raw,
}

impl Resolution {
    /// Pick the resolution strategy for a specification
    pub fn for_specification(specification: &FieldSpecification) -> Self {
        if specification.selectors.is_empty() && specification.raw_selector_text.trim().is_empty() {
            Resolution::NoSelector
        } else if specification.has_business_rules()
            || specification.raw_selector_text.contains(BUSINESS_RULE_OPEN)
        {
            Resolution::Handler(BusinessHandler::for_attribute(&specification.attribute))
        } else if specification.selectors.len() > 1 {
            Resolution::Fallback
        } else if specification.selectors.len() == 1 {
            Resolution::Single
        } else {
            Resolution::Raw
        }
    }
}

/// Extraction engine applying a specification table to documents
#[derive(Debug, Clone, Default)]
pub struct FieldExtractionEngine {
    config: ExtractorConfig,
}

impl FieldExtractionEngine {
    /// Create an engine with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every attribute of the table from a document
    pub fn extract<D: DocumentAccessor + ?Sized>(
        &self,
        document: &D,
        table: &SpecificationTable,
    ) -> ExtractionResult {
        self.extract_specifications(document, table.specifications())
    }

    /// Extract the given specifications, in order, from a document
    pub fn extract_specifications<D: DocumentAccessor + ?Sized>(
        &self,
        document: &D,
        specifications: &[FieldSpecification],
    ) -> ExtractionResult {
        info!(
            "Starting AVD extraction with {} specifications",
            specifications.len()
        );

        let mut result = ExtractionResult::new();
        let mut context = RunContext::default();

        for specification in specifications {
            let resolution = Resolution::for_specification(specification);

            if resolution == Resolution::NoSelector {
                result.warnings.push(format!(
                    "No selector provided for attribute '{}'",
                    specification.attribute
                ));
                result.set_value(&specification.attribute, ExtractedValue::Absent);
                continue;
            }

            match self.resolve(document, specification, resolution, &mut context) {
                Ok(value) => {
                    if !value.is_absent() {
                        debug!("Extracted {}: {}", specification.attribute, value);
                    }
                    result.set_value(&specification.attribute, value);
                }
                Err(e) => {
                    warn!(
                        "Extraction failed for attribute {}: {}",
                        specification.attribute, e
                    );
                    result.errors.push(format!(
                        "Failed to extract attribute '{}' (ID: {}): {}",
                        specification.attribute, specification.id, e
                    ));
                    result.set_value(&specification.attribute, ExtractedValue::Absent);
                }
            }
        }

        apply_post_processing(&mut result, specifications, &self.config);

        info!(
            "AVD extraction completed. Extracted {} values, {} errors, {} warnings",
            result.populated_count(),
            result.errors.len(),
            result.warnings.len()
        );

        result
    }

    fn resolve<D: DocumentAccessor + ?Sized>(
        &self,
        document: &D,
        specification: &FieldSpecification,
        resolution: Resolution,
        context: &mut RunContext,
    ) -> Result<ExtractedValue, SelectorError> {
        match resolution {
            Resolution::NoSelector => Ok(ExtractedValue::Absent),
            Resolution::Handler(BusinessHandler::PrimaryPrescriber) => {
                resolve_primary_prescriber(document, context)
            }
            Resolution::Handler(BusinessHandler::ResponsiblePrescriber) => {
                resolve_responsible_prescriber(document, context)
            }
            Resolution::Handler(BusinessHandler::ProviderFacility) => {
                resolve_provider_facility(document)
            }
            Resolution::Handler(BusinessHandler::Generic) | Resolution::Fallback => {
                first_non_empty(document, &specification.selectors, specification.representation)
            }
            Resolution::Single => evaluate_selector(
                document,
                &specification.selectors[0],
                specification.representation,
            ),
            Resolution::Raw => {
                let lines = raw_selector_lines(
                    &specification.raw_selector_text,
                    &self.config.namespace.path_marker(),
                );
                first_non_empty(document, &lines, specification.representation)
            }
        }
    }
}

/// Evaluate one selector and coerce its first result
pub fn evaluate_selector<D: DocumentAccessor + ?Sized>(
    document: &D,
    selector: &str,
    representation: Representation,
) -> Result<ExtractedValue, SelectorError> {
    match document.select_first(selector)? {
        Some(value) if !value.is_empty() => Ok(coerce(value, representation)),
        _ => Ok(ExtractedValue::Absent),
    }
}

/// First selector that yields a non-empty value, in order
pub fn first_non_empty<D: DocumentAccessor + ?Sized, S: AsRef<str>>(
    document: &D,
    selectors: &[S],
    representation: Representation,
) -> Result<ExtractedValue, SelectorError> {
    for selector in selectors {
        let value = evaluate_selector(document, selector.as_ref(), representation)?;
        if !value.is_empty() {
            return Ok(value);
        }
    }
    Ok(ExtractedValue::Absent)
}

/// Numeric representations become integers when they parse, else stay text
///
/// A parse that would not print back to the same digits (leading zeros, a
/// sign) counts as a failure, so identifiers such as `"01234567"` keep
/// their length.
pub fn coerce(value: String, representation: Representation) -> ExtractedValue {
    match representation {
        Representation::Numeric => {
            let digits = value.trim();
            match digits.parse::<i64>() {
                Ok(number) if number.to_string() == digits => ExtractedValue::Integer(number),
                _ => ExtractedValue::Text(value),
            }
        }
        Representation::Alphanumeric | Representation::Unspecified => ExtractedValue::Text(value),
    }
}

/// Lines of raw selector text that contain the namespaced path marker
fn raw_selector_lines(raw: &str, path_marker: &str) -> Vec<String> {
    strip_business_rules(raw)
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(path_marker))
        .map(str::to_string)
        .collect()
}
