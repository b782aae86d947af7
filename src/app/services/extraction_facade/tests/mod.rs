//! Test utilities for the extraction facade

use crate::app::services::extraction_facade::{DocumentSource, ExtractionFacade, SpecificationSource};
use crate::app::services::fhir_document::tests::sample_bundle;
use crate::app::services::specification_parser::tests::sample_specification_csv;
use crate::config::ExtractorConfig;


pub fn facade() -> ExtractionFacade {
    ExtractionFacade::new(ExtractorConfig::default())
}

pub fn sample_document() -> DocumentSource {
    DocumentSource::Xml(sample_bundle())
}

pub fn sample_specification() -> SpecificationSource {
    SpecificationSource::Csv(sample_specification_csv())
}
