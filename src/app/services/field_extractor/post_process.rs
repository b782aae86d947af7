//! Post-extraction pass: default values and required-field warnings

use crate::app::models::{ExtractedValue, ExtractionResult, FieldSpecification};
use crate::config::ExtractorConfig;
use tracing::debug;

/// Run the post pass over a finished extraction
///
/// Defaults are applied first, so the required-field warnings only report
/// attributes that are still empty afterwards.
pub fn apply_post_processing(
    result: &mut ExtractionResult,
    specifications: &[FieldSpecification],
    config: &ExtractorConfig,
) {
    apply_default_values(result, specifications, config);
    warn_empty_required_fields(result, specifications);
}

/// Substitute configured defaults for empty attributes
pub fn apply_default_values(
    result: &mut ExtractionResult,
    specifications: &[FieldSpecification],
    config: &ExtractorConfig,
) {
    for specification in specifications {
        if !result.is_empty_value(&specification.attribute) {
            continue;
        }

        if let Some(default) = config.default_for(&specification.attribute) {
            debug!(
                "Applying default value '{}' to {}",
                default, specification.attribute
            );
            result.set_value(
                &specification.attribute,
                ExtractedValue::Text(default.to_string()),
            );
        }
    }
}

/// Warn about every required specification whose value is empty
pub fn warn_empty_required_fields(
    result: &mut ExtractionResult,
    specifications: &[FieldSpecification],
) {
    let missing: Vec<String> = specifications
        .iter()
        .filter(|spec| !spec.is_optional() && result.is_empty_value(&spec.attribute))
        .map(|spec| format!("Required field '{}' is empty", spec.attribute))
        .collect();

    result.warnings.extend(missing);
}
