//! Specification table validation

use super::ConsistencyValidator;
use crate::app::models::{FieldSpecification, IssueKind, ValidationIssue};
use indexmap::IndexMap;
use tracing::debug;

impl ConsistencyValidator {
    /// Check a specification table for completeness and uniqueness
    ///
    /// Per-row issues come first in table order, followed by duplicate IDs and
    /// duplicate attributes in order of first appearance. Non-positive IDs are
    /// reported as invalid and left out of the duplicate check.
    pub fn validate_table(&self, specifications: &[FieldSpecification]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for spec in specifications {
            issues.extend(self.row_issues(spec));
        }

        // ID -> (row count, distinct attribute names in table order)
        let mut ids: IndexMap<i32, (usize, Vec<&str>)> = IndexMap::new();
        let mut attributes: IndexMap<&str, usize> = IndexMap::new();
        for spec in specifications {
            if spec.id > 0 {
                let (count, names) = ids.entry(spec.id).or_default();
                *count += 1;
                if !spec.attribute.is_empty() && !names.contains(&spec.attribute.as_str()) {
                    names.push(spec.attribute.as_str());
                }
            }
            if !spec.attribute.is_empty() {
                *attributes.entry(spec.attribute.as_str()).or_default() += 1;
            }
        }

        for (id, (_, names)) in ids.iter().filter(|(_, (count, _))| *count > 1) {
            let names = names.join(", ");
            issues.push(ValidationIssue::new(
                names.as_str(),
                IssueKind::SpecDuplicateId,
                format!("Duplicate specification ID found: {} ({})", id, names),
            ));
        }

        for (attribute, _) in attributes.iter().filter(|(_, count)| **count > 1) {
            issues.push(ValidationIssue::new(
                *attribute,
                IssueKind::SpecDuplicateAttribute,
                format!("Duplicate specification attribute found: {}", attribute),
            ));
        }

        debug!(
            "Validated {} specifications, {} issues",
            specifications.len(),
            issues.len()
        );
        issues
    }

    fn row_issues(&self, spec: &FieldSpecification) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if spec.attribute.trim().is_empty() {
            issues.push(ValidationIssue::new(
                "",
                IssueKind::SpecMissingAttribute,
                format!("Specification with ID {} has no attribute name", spec.id),
            ));
        }

        if spec.id <= 0 {
            issues.push(ValidationIssue::new(
                &spec.attribute,
                IssueKind::SpecInvalidId,
                format!(
                    "Specification '{}' has invalid ID: {}",
                    spec.attribute, spec.id
                ),
            ));
        }

        if spec.raw_selector_text.trim().is_empty()
            && spec.selectors.is_empty()
            && !self.config.is_selector_free(&spec.attribute)
        {
            issues.push(ValidationIssue::new(
                &spec.attribute,
                IssueKind::SpecMissingSelector,
                format!("Specification '{}' has no selector expression", spec.attribute),
            ));
        }

        if spec.profile.trim().is_empty() {
            issues.push(ValidationIssue::new(
                &spec.attribute,
                IssueKind::SpecMissingProfile,
                format!("Specification '{}' has no FHIR profile", spec.attribute),
            ));
        }

        issues
    }
}
