//! Test utilities for the consistency validator

use crate::app::models::{ExtractedValue, ExtractionResult, FieldSpecification};
use crate::app::services::consistency_validator::ConsistencyValidator;
use crate::config::ExtractorConfig;


pub fn validator() -> ConsistencyValidator {
    ConsistencyValidator::new(ExtractorConfig::default())
}

/// Complete specification that passes table validation
pub fn complete_spec(attribute: &str, id: i32) -> FieldSpecification {
    FieldSpecification::new(attribute, id)
        .with_profile("https://fhir.kbv.de/StructureDefinition/KBV_PR_ERP_Bundle|1.1.0")
        .with_raw_selector_text(format!("//fhir:{}/@value", attribute))
        .with_selectors(vec![format!("//fhir:{}/@value", attribute)])
}

/// Extraction result holding the given text values
pub fn result_with(values: &[(&str, ExtractedValue)]) -> ExtractionResult {
    let mut result = ExtractionResult::new();
    for (attribute, value) in values {
        result.set_value(*attribute, value.clone());
    }
    result
}

pub fn text(value: &str) -> ExtractedValue {
    ExtractedValue::Text(value.to_string())
}
