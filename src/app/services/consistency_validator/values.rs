//! Extracted value validation

use super::ConsistencyValidator;
use crate::app::models::{
    ExtractionResult, FieldSpecification, IssueKind, LengthKind, Representation, ValidationIssue,
    ValueValidation,
};
use tracing::debug;

impl ConsistencyValidator {
    /// Check every extracted value against its specification
    ///
    /// Each specification is checked for presence, length and representation.
    /// The result is never modified and all specifications are visited even
    /// after an issue was found.
    pub fn validate_values(
        &self,
        result: &ExtractionResult,
        specifications: &[FieldSpecification],
    ) -> ValueValidation {
        let issues: Vec<ValidationIssue> = specifications
            .iter()
            .flat_map(|spec| value_issues(result, spec))
            .collect();

        debug!(
            "Validated {} values against {} specifications, {} issues",
            result.values.len(),
            specifications.len(),
            issues.len()
        );
        ValueValidation::from_issues(issues)
    }
}

fn value_issues(result: &ExtractionResult, spec: &FieldSpecification) -> Vec<ValidationIssue> {
    let text = result
        .value(&spec.attribute)
        .and_then(|value| value.as_text())
        .filter(|text| !text.is_empty());

    let Some(text) = text else {
        if spec.is_optional() {
            return Vec::new();
        }
        return vec![ValidationIssue::new(
            &spec.attribute,
            IssueKind::MissingRequired,
            format!(
                "Required field '{}' (ID: {}) is missing",
                spec.attribute, spec.id
            ),
        )];
    };

    let mut issues = Vec::new();

    if !spec.length_rule.accepts(&text) {
        let message = match spec.length_rule.kind {
            LengthKind::Exact => format!(
                "Field '{}' must be exactly {} characters",
                spec.attribute, spec.length_rule.value
            ),
            _ => format!(
                "Field '{}' exceeds maximum length of {}",
                spec.attribute, spec.length_rule.value
            ),
        };
        issues.push(ValidationIssue::new(
            &spec.attribute,
            IssueKind::LengthViolation,
            message,
        ));
    }

    if spec.representation == Representation::Numeric && !text.chars().all(|c| c.is_ascii_digit())
    {
        issues.push(ValidationIssue::new(
            &spec.attribute,
            IssueKind::TypeViolation,
            format!(
                "Field '{}' must contain only numeric characters",
                spec.attribute
            ),
        ));
    }

    issues
}
