//! Business-logic handlers for attributes with cross-field rules
//!
//! The set of handlers is closed: an attribute either maps to one of the
//! dedicated handlers through [`HANDLER_TABLE`] or falls back to
//! [`BusinessHandler::Generic`]. The `{{ ... }}` annotations in the
//! specification are documentation only and never drive control flow.

use crate::app::models::ExtractedValue;
use crate::app::services::fhir_document::{DocumentAccessor, SelectorError};
use crate::constants::{DEFAULT_BSNR, DEFAULT_LANR, attributes, qualification_codes, systems};
use std::sync::LazyLock;
use tracing::debug;

/// Dedicated resolution logic for one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessHandler {
    /// `la_nr`: assistant LANR, else responsible LANR, else default
    PrimaryPrescriber,
    /// `la_nr_v`: responsible LANR, only when an assistant was found
    ResponsiblePrescriber,
    /// `bs_nr`: facility BSNR, else institution IK, else default
    ProviderFacility,
    /// First non-empty result of the specification's own selectors
    Generic,
}

/// Attribute name → dedicated handler
pub const HANDLER_TABLE: &[(&str, BusinessHandler)] = &[
    (attributes::LA_NR, BusinessHandler::PrimaryPrescriber),
    (attributes::LA_NR_V, BusinessHandler::ResponsiblePrescriber),
    (attributes::BS_NR, BusinessHandler::ProviderFacility),
];

impl BusinessHandler {
    /// Handler responsible for an attribute
    pub fn for_attribute(attribute: &str) -> Self {
        HANDLER_TABLE
            .iter()
            .find(|(name, _)| *name == attribute)
            .map(|(_, handler)| *handler)
            .unwrap_or(BusinessHandler::Generic)
    }
}

/// State shared between handlers within a single extraction run
///
/// Created fresh for every run and dropped when the run ends, so nothing
/// leaks into the extracted values or into later runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// The primary prescriber was resolved from a physician in training
    pub assistant_found: bool,
}

fn practitioner_lanr_selector(code_predicate: &str) -> String {
    format!(
        "//fhir:Practitioner/fhir:qualification/fhir:code/fhir:coding[fhir:system/@value='{qt}' and {codes}]/../../../fhir:identifier[fhir:system/@value='{anr}']/fhir:value",
        qt = systems::QUALIFICATION_TYPE,
        codes = code_predicate,
        anr = systems::LANR,
    )
}

/// LANR of a practitioner qualified as physician in training
pub static ASSISTANT_LANR_SELECTOR: LazyLock<String> = LazyLock::new(|| {
    practitioner_lanr_selector(&format!(
        "fhir:code/@value='{}'",
        qualification_codes::ASSISTANT
    ))
});

/// LANR of a practitioner qualified as physician or responsible person
pub static RESPONSIBLE_LANR_SELECTOR: LazyLock<String> = LazyLock::new(|| {
    practitioner_lanr_selector(&format!(
        "(fhir:code/@value='{}' or fhir:code/@value='{}')",
        qualification_codes::PHYSICIAN,
        qualification_codes::RESPONSIBLE
    ))
});

/// Facility number of the practice
pub static BSNR_SELECTOR: LazyLock<String> = LazyLock::new(|| {
    format!(
        "//fhir:identifier[fhir:system/@value='{}']/fhir:value",
        systems::BSNR
    )
});

/// Institution IK under either known naming system
pub static IKNR_SELECTOR: LazyLock<String> = LazyLock::new(|| {
    format!(
        "//fhir:identifier[fhir:system/@value='{}' or fhir:system/@value='{}']/fhir:value",
        systems::IKNR,
        systems::IKNR_LEGACY
    )
});

/// First non-empty raw value of a selector, without type coercion
fn first_text<D: DocumentAccessor + ?Sized>(
    document: &D,
    selector: &str,
) -> Result<Option<String>, SelectorError> {
    Ok(document
        .select_first(selector)?
        .filter(|value| !value.is_empty()))
}

/// Resolve the primary prescriber LANR
///
/// The assistant is tried before the responsible physician. When an
/// assistant is found the run context remembers it for `la_nr_v`.
pub fn resolve_primary_prescriber<D: DocumentAccessor + ?Sized>(
    document: &D,
    context: &mut RunContext,
) -> Result<ExtractedValue, SelectorError> {
    if let Some(lanr) = first_text(document, &ASSISTANT_LANR_SELECTOR)? {
        debug!("Primary prescriber resolved from physician in training");
        context.assistant_found = true;
        return Ok(ExtractedValue::Text(lanr));
    }

    if let Some(lanr) = first_text(document, &RESPONSIBLE_LANR_SELECTOR)? {
        return Ok(ExtractedValue::Text(lanr));
    }

    Ok(ExtractedValue::Text(DEFAULT_LANR.to_string()))
}

/// Resolve the responsible prescriber LANR
///
/// Only populated when the primary prescriber was an assistant; otherwise
/// the value is absent, never a default.
pub fn resolve_responsible_prescriber<D: DocumentAccessor + ?Sized>(
    document: &D,
    context: &RunContext,
) -> Result<ExtractedValue, SelectorError> {
    if !context.assistant_found {
        return Ok(ExtractedValue::Absent);
    }

    Ok(first_text(document, &RESPONSIBLE_LANR_SELECTOR)?
        .map(ExtractedValue::Text)
        .unwrap_or(ExtractedValue::Absent))
}

/// Resolve the provider facility: BSNR, then IK, then `"0"`
pub fn resolve_provider_facility<D: DocumentAccessor + ?Sized>(
    document: &D,
) -> Result<ExtractedValue, SelectorError> {
    if let Some(bsnr) = first_text(document, &BSNR_SELECTOR)? {
        return Ok(ExtractedValue::Text(bsnr));
    }

    if let Some(ik) = first_text(document, &IKNR_SELECTOR)? {
        debug!("Provider facility resolved from institution IK");
        return Ok(ExtractedValue::Text(ik));
    }

    Ok(ExtractedValue::Text(DEFAULT_BSNR.to_string()))
}
