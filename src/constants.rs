//! Application constants for the eRezept AVD extractor
//!
//! This module contains namespace bindings, KBV/gematik naming-system URIs,
//! specification column names and the default values used throughout the
//! extraction pipeline.

// =============================================================================
// XML Namespaces
// =============================================================================

/// Prefix used by specification selectors for the FHIR namespace
pub const FHIR_NAMESPACE_PREFIX: &str = "fhir";

/// FHIR XML namespace URI
pub const FHIR_NAMESPACE_URI: &str = "http://hl7.org/fhir";

// =============================================================================
// Specification CSV Layout
// =============================================================================

/// Header names of the AVD specification CSV
pub mod columns {
    pub const ATTRIBUTE: &str = "Attribut";
    pub const ID: &str = "ID";
    pub const DESCRIPTION: &str = "Beschreibung des Attributs";
    pub const LENGTH: &str = "Länge";
    pub const REPRESENTATION: &str = "Darstellung";
    pub const PROFILE: &str = "Profile";
    pub const ADAPTATION: &str = "Anpassung notwendig Zusätzl.";
    pub const SELECTOR: &str = "Partieller XPath";
}

/// Sentinel word in the length column meaning "may be empty"
pub const OPTIONAL_LENGTH_MARKER: &str = "leer";

/// Pattern for business-rule annotations embedded in selector text
pub const BUSINESS_RULE_PATTERN: &str = r"\{\{([^}]+)\}\}";

/// Opening marker of a business-rule annotation
pub const BUSINESS_RULE_OPEN: &str = "{{";

/// German conditional words that flag a specification as complex
pub const CONDITIONAL_KEYWORDS: &[&str] = &["falls", "wenn", "ansonsten"];

/// Attributes that legitimately carry no selector text
pub const SELECTOR_FREE_ATTRIBUTES: &[&str] = &["spr"];

// =============================================================================
// Attribute Names With Dedicated Business Logic
// =============================================================================

/// AVD attribute names handled by dedicated resolution logic
pub mod attributes {
    /// Lifelong physician number of the prescriber
    pub const LA_NR: &str = "la_nr";
    /// Lifelong physician number of the responsible physician
    pub const LA_NR_V: &str = "la_nr_v";
    /// Practice facility number (BSNR) or institution IK
    pub const BS_NR: &str = "bs_nr";
    /// Patient birth date
    pub const PAT_GEB: &str = "pat_geb";
}

// =============================================================================
// KBV / gematik Naming Systems
// =============================================================================

/// Naming system and code system URIs referenced by the business rules
pub mod systems {
    pub const QUALIFICATION_TYPE: &str =
        "https://fhir.kbv.de/CodeSystem/KBV_CS_FOR_Qualification_Type";
    pub const LANR: &str = "https://fhir.kbv.de/NamingSystem/KBV_NS_Base_ANR";
    pub const BSNR: &str = "https://fhir.kbv.de/NamingSystem/KBV_NS_Base_BSNR";
    pub const IKNR: &str = "http://fhir.de/sid/arge-ik/iknr";
    pub const IKNR_LEGACY: &str = "http://fhir.de/NamingSystem/arge-ik/iknr";
    pub const PRESCRIPTION_ID: &str =
        "https://gematik.de/fhir/erp/NamingSystem/GEM_ERP_NS_PrescriptionId";
}

/// Qualification type codes of KBV_CS_FOR_Qualification_Type
pub mod qualification_codes {
    /// Physician
    pub const PHYSICIAN: &str = "00";
    /// Physician in training (assistant)
    pub const ASSISTANT: &str = "03";
    /// Responsible physician
    pub const RESPONSIBLE: &str = "04";
}

// =============================================================================
// Default Values
// =============================================================================

/// Default LANR when no practitioner identifier is present
pub const DEFAULT_LANR: &str = "000000000";

/// Default BSNR when neither facility number nor IK is present
pub const DEFAULT_BSNR: &str = "0";

/// Default birth date
pub const DEFAULT_BIRTH_DATE: &str = "000000";
