//! Test utilities for the specification table

use crate::app::services::specification_parser::SpecificationParser;
use crate::app::services::specification_parser::tests::sample_specification_csv;
use crate::app::services::specification_table::SpecificationTable;
use crate::config::ExtractorConfig;


/// Table parsed from the sample AVD CSV
pub fn sample_table() -> SpecificationTable {
    let parsed = SpecificationParser::new(ExtractorConfig::default())
        .parse_csv_str(&sample_specification_csv())
        .unwrap();
    SpecificationTable::new(parsed.specifications)
}
