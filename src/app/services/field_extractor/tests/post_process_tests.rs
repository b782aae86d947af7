//! Tests for default values and required-field warnings

use super::*;
use crate::app::models::{ExtractedValue, ExtractionResult, FieldSpecification};
use crate::app::services::field_extractor::post_process::{
    apply_default_values, apply_post_processing, warn_empty_required_fields,
};
use crate::config::ExtractorConfig;

#[test]
fn test_birth_date_default_applied() {
    let document = MockDocument::new();
    let spec = FieldSpecification::new("pat_geb", 5)
        .with_length("10")
        .with_selectors(vec!["//fhir:Patient/fhir:birthDate/@value"]);

    let result = engine().extract_specifications(&document, &[spec]);

    assert_eq!(result.text("pat_geb").as_deref(), Some("000000"));
    assert!(result.warnings.is_empty());
}

#[test]
fn test_required_warning_after_defaults() {
    let document = MockDocument::new();
    let specs = vec![
        FieldSpecification::new("rezept_id", 1)
            .with_length("..20")
            .with_selectors(vec!["A"]),
        FieldSpecification::new("zuzahlung", 2)
            .with_length("leer oder ..8")
            .with_selectors(vec!["B"]),
    ];

    let result = engine().extract_specifications(&document, &specs);

    assert_eq!(result.warnings, vec!["Required field 'rezept_id' is empty"]);
}

#[test]
fn test_optional_empty_never_warned() {
    let mut result = ExtractionResult::new();
    result.set_value("a", ExtractedValue::Absent);
    result.set_value("b", ExtractedValue::Text(String::new()));

    let specs = vec![
        FieldSpecification::new("a", 1).with_length("leer oder 9"),
        FieldSpecification::new("b", 2).with_length("leer"),
    ];
    warn_empty_required_fields(&mut result, &specs);

    assert!(result.warnings.is_empty());
}

#[test]
fn test_defaults_leave_populated_values_alone() {
    let mut result = ExtractionResult::new();
    result.set_value("la_nr", ExtractedValue::Text("123456789".to_string()));
    result.set_value("bs_nr", ExtractedValue::Text(String::new()));

    let specs = vec![FieldSpecification::new("la_nr", 1), FieldSpecification::new("bs_nr", 2)];
    apply_default_values(&mut result, &specs, &ExtractorConfig::default());

    assert_eq!(result.text("la_nr").as_deref(), Some("123456789"));
    assert_eq!(result.text("bs_nr").as_deref(), Some("0"));
}

#[test]
fn test_configured_defaults_replace_builtin_table() {
    let mut result = ExtractionResult::new();
    result.set_value("pat_geb", ExtractedValue::Absent);
    result.set_value("kh_ik", ExtractedValue::Absent);

    let specs = vec![
        FieldSpecification::new("pat_geb", 1).with_length("leer"),
        FieldSpecification::new("kh_ik", 2).with_length("leer"),
    ];
    let config = ExtractorConfig::default()
        .without_defaults()
        .with_default("kh_ik", "000000000");
    apply_post_processing(&mut result, &specs, &config);

    assert_eq!(result.value("pat_geb"), Some(&ExtractedValue::Absent));
    assert_eq!(result.text("kh_ik").as_deref(), Some("000000000"));
}

#[test]
fn test_defaults_only_for_declared_specifications() {
    let mut result = ExtractionResult::new();
    apply_default_values(&mut result, &[], &ExtractorConfig::default());
    assert!(result.values.is_empty());
}
