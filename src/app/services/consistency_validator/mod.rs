//! Consistency checks for specification tables and extracted values
//!
//! Both checks are purely additive: they report [`ValidationIssue`]s, never
//! mutate their input and never stop at the first finding.
//!
//! ## Architecture
//!
//! - [`table`] - completeness and uniqueness of the specification table
//! - [`values`] - presence, length and representation of extracted values
//!
//! [`ValidationIssue`]: crate::app::models::ValidationIssue

use crate::config::ExtractorConfig;

pub mod table;
pub mod values;

#[cfg(test)]
pub mod tests;

/// Validator for specification tables and extraction results
#[derive(Debug, Clone, Default)]
pub struct ConsistencyValidator {
    config: ExtractorConfig,
}

impl ConsistencyValidator {
    /// Create a validator with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}
