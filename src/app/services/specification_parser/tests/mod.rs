//! Test utilities for specification parsing
//!
//! Provides a realistic AVD specification CSV used across the parser,
//! table, validator and facade tests.

use crate::app::services::specification_parser::SpecificationRow;
use std::io::Write;
use tempfile::NamedTempFile;

// Test modules
mod parser_tests;

pub const BUNDLE_PROFILE: &str = "https://fhir.kbv.de/StructureDefinition/KBV_PR_ERP_Bundle|1.1.0";
pub const PRESCRIPTION_ID_PROFILE: &str =
    "https://gematik.de/fhir/erp/StructureDefinition/GEM_ERP_PR_PrescriptionId|1.2";
pub const PRACTITIONER_PROFILE: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Practitioner|1.1.0";
pub const ORGANIZATION_PROFILE: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Organization|1.1.0";
pub const PATIENT_PROFILE: &str = "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Patient|1.1.0";

/// AVD specification CSV with the attributes that carry business logic
///
/// The header of the ID column carries a trailing space, as in the
/// published table.
pub fn sample_specification_csv() -> String {
    format!(
        r#"Attribut,ID ,Beschreibung des Attributs,Länge,Darstellung,Profile,Anpassung notwendig Zusätzl.,Partieller XPath
rezept_id,1,Rezept-ID,..20,alphanumerisch,"{bundle}
{prescription}",,"//fhir:Bundle/fhir:identifier[fhir:system/@value='https://gematik.de/fhir/erp/NamingSystem/GEM_ERP_NS_PrescriptionId']/fhir:value/@value"
la_nr,2,Lebenslange Arztnummer,9,numerisch,{practitioner},x,"{{{{falls Arzt in Weiterbildung: ANR des Assistenten, sonst ANR des verantwortlichen Arztes}}}}
//fhir:Practitioner/fhir:identifier/fhir:value/@value"
la_nr_v,3,LANR der verantwortlichen Person,leer oder 9,numerisch,{practitioner},x,"{{{{nur wenn ein Arzt in Weiterbildung verordnet}}}}
//fhir:Practitioner/fhir:identifier/fhir:value/@value"
bs_nr,4,Betriebsstättennummer,..9,numerisch,{organization},,"{{{{BSNR, ansonsten IK der Einrichtung}}}}
//fhir:Organization/fhir:identifier/fhir:value/@value"
pat_geb,5,Geburtsdatum des Patienten,10,alphanumerisch,{patient},,"//fhir:Patient/fhir:birthDate/@value"
spr,6,Sprache,leer oder ..2,alphanumerisch,{bundle},,
,,,,,,,Fortsetzung der vorherigen Zeile
"#,
        bundle = BUNDLE_PROFILE,
        prescription = PRESCRIPTION_ID_PROFILE,
        practitioner = PRACTITIONER_PROFILE,
        organization = ORGANIZATION_PROFILE,
        patient = PATIENT_PROFILE,
    )
}

/// Build a row from (column, value) pairs
pub fn row(pairs: &[(&str, &str)]) -> SpecificationRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Write CSV content to a temporary file
pub fn write_csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}
