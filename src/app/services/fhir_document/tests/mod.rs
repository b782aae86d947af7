//! Test utilities for FHIR document access
//!
//! Builders for small eRezept bundles, reused by the extraction engine and
//! facade tests.

use crate::constants::{qualification_codes, systems};
use std::io::Write;
use tempfile::NamedTempFile;


/// Wrap resources into a FHIR bundle with a prescription id
pub fn bundle(prescription_id: &str, resources: &[String]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push_str(r#"<Bundle xmlns="http://hl7.org/fhir">"#);
    xml.push_str(r#"<id value="0428d416-149e-48a4-977c-394887b3d85c"/>"#);
    xml.push_str(&format!(
        r#"<identifier><system value="{}"/><value value="{}"/></identifier>"#,
        systems::PRESCRIPTION_ID,
        prescription_id
    ));
    xml.push_str(r#"<type value="document"/>"#);
    for resource in resources {
        xml.push_str("<entry><resource>");
        xml.push_str(resource);
        xml.push_str("</resource></entry>");
    }
    xml.push_str("</Bundle>");
    xml
}

/// Practitioner with a LANR and one qualification type code
pub fn practitioner(lanr: &str, qualification_code: &str) -> String {
    format!(
        r#"<Practitioner>
  <identifier><system value="{anr}"/><value value="{lanr}"/></identifier>
  <name><family value="Topp-Glücklich"/><given value="Hans"/></name>
  <qualification>
    <code><coding><system value="{qt}"/><code value="{code}"/></coding></code>
  </qualification>
</Practitioner>"#,
        anr = systems::LANR,
        lanr = lanr,
        qt = systems::QUALIFICATION_TYPE,
        code = qualification_code,
    )
}

/// Physician practitioner
pub fn physician(lanr: &str) -> String {
    practitioner(lanr, qualification_codes::PHYSICIAN)
}

/// Physician in training
pub fn assistant(lanr: &str) -> String {
    practitioner(lanr, qualification_codes::ASSISTANT)
}

/// Organization identified by a facility number
pub fn organization_with_bsnr(bsnr: &str) -> String {
    format!(
        r#"<Organization><identifier><system value="{}"/><value value="{}"/></identifier><name value="Hausarztpraxis"/></Organization>"#,
        systems::BSNR,
        bsnr
    )
}

/// Organization identified by an institution IK
pub fn organization_with_ik(system: &str, ik: &str) -> String {
    format!(
        r#"<Organization><identifier><system value="{}"/><value value="{}"/></identifier><name value="Klinikum"/></Organization>"#,
        system, ik
    )
}

/// Patient with a birth date
pub fn patient(birth_date: &str) -> String {
    format!(
        r#"<Patient><name><family value="Ludger Königsstein"/></name><birthDate value="{}"/></Patient>"#,
        birth_date
    )
}

/// Patient without any birth date element
pub fn patient_without_birth_date() -> String {
    r#"<Patient><name><family value="Ludger Königsstein"/></name></Patient>"#.to_string()
}

/// Complete bundle used by several test suites
pub fn sample_bundle() -> String {
    bundle(
        "160.100.000.000.024.67",
        &[
            patient("1987-01-05"),
            physician("838382202"),
            organization_with_bsnr("031234567"),
        ],
    )
}

/// Write XML to a temporary file
pub fn write_xml_file(xml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", xml).unwrap();
    file.flush().unwrap();
    file
}
