//! Grouping and filtering queries over the specification table

use super::SpecificationTable;
use crate::app::models::FieldSpecification;
use crate::constants::CONDITIONAL_KEYWORDS;
use std::collections::BTreeMap;

impl SpecificationTable {
    /// Group specifications by FHIR profile
    ///
    /// A specification listing several profiles (one per line) appears in
    /// every group; specifications without a profile are skipped.
    ///
    /// # Returns
    /// Map of profile URL to specifications, ordered by profile URL
    pub fn group_by_profile(&self) -> BTreeMap<String, Vec<&FieldSpecification>> {
        let mut grouped: BTreeMap<String, Vec<&FieldSpecification>> = BTreeMap::new();
        for specification in &self.specifications {
            for profile in specification.profiles() {
                grouped
                    .entry(profile.to_string())
                    .or_default()
                    .push(specification);
            }
        }
        grouped
    }

    /// Specifications that need more than a plain selector lookup
    ///
    /// A specification is complex when it carries business rules, requires
    /// adaptation, lists several selectors, or its raw selector text uses a
    /// German conditional word.
    pub fn complex_specifications(&self) -> Vec<&FieldSpecification> {
        self.specifications
            .iter()
            .filter(|spec| is_complex(spec))
            .collect()
    }

    /// Specifications that must yield a value
    pub fn required(&self) -> Vec<&FieldSpecification> {
        self.specifications
            .iter()
            .filter(|spec| !spec.is_optional())
            .collect()
    }

    /// Specifications whose value may be empty
    pub fn optional(&self) -> Vec<&FieldSpecification> {
        self.specifications
            .iter()
            .filter(|spec| spec.is_optional())
            .collect()
    }

    /// Specifications carrying business-rule annotations
    pub fn with_business_rules(&self) -> Vec<&FieldSpecification> {
        self.specifications
            .iter()
            .filter(|spec| spec.has_business_rules())
            .collect()
    }

    /// Attribute names in table order
    pub fn attributes(&self) -> Vec<&str> {
        self.specifications
            .iter()
            .map(|spec| spec.attribute.as_str())
            .collect()
    }
}

/// Whether a specification needs special handling
pub fn is_complex(specification: &FieldSpecification) -> bool {
    specification.has_business_rules()
        || specification.requires_adaptation
        || specification.selectors.len() > 1
        || CONDITIONAL_KEYWORDS
            .iter()
            .any(|keyword| specification.raw_selector_text.contains(keyword))
}
