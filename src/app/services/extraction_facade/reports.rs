//! Specification-only queries

use super::{ExtractionFacade, SpecificationSource};
use crate::app::models::{FieldSpecification, IssueKind, SpecificationReport, ValidationIssue};
use crate::Result;
use std::collections::BTreeMap;
use tracing::{error, info};

impl ExtractionFacade {
    /// Specifications grouped by FHIR profile
    pub fn specifications_by_profile(
        &self,
        source: &SpecificationSource,
    ) -> Result<BTreeMap<String, Vec<FieldSpecification>>> {
        let (table, _) = self.load_specifications(source)?.into_table();
        Ok(table
            .group_by_profile()
            .into_iter()
            .map(|(profile, specs)| (profile, specs.into_iter().cloned().collect()))
            .collect())
    }

    /// Specifications that need business logic or manual adaptation
    pub fn complex_specifications(
        &self,
        source: &SpecificationSource,
    ) -> Result<Vec<FieldSpecification>> {
        let (table, _) = self.load_specifications(source)?.into_table();
        Ok(table.complex_specifications().into_iter().cloned().collect())
    }

    /// Quality report for a specification table
    ///
    /// Skipped rows and table issues are both listed. An unusable source gives
    /// an unsuccessful report carrying one issue.
    pub fn validate_specifications(&self, source: &SpecificationSource) -> SpecificationReport {
        let parsed = match self.load_specifications(source) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Specification validation failed: {}", e);
                return SpecificationReport {
                    validation_issues: vec![ValidationIssue::new(
                        "",
                        IssueKind::SpecSourceUnavailable,
                        format!("Validation failed: {}", e),
                    )],
                    success: false,
                    ..Default::default()
                };
            }
        };

        let (table, mut issues) = parsed.into_table();
        issues.extend(self.validator.validate_table(table.specifications()));

        let report = SpecificationReport {
            total_specifications: table.len(),
            complex_specifications: table.complex_specifications().len(),
            profile_groups: table.group_by_profile().into_keys().collect(),
            success: issues.is_empty(),
            validation_issues: issues,
        };
        info!("Specification report: {}", report.summary());
        report
    }
}
