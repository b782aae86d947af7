//! Tests for the specification parser

use super::*;
use crate::Error;
use crate::app::models::{IssueKind, LengthKind, Representation};
use crate::app::services::specification_parser::SpecificationParser;
use crate::config::{ExtractorConfig, SpecificationColumns};
use std::io::Write;
use tempfile::NamedTempFile;

fn parser() -> SpecificationParser {
    SpecificationParser::new(ExtractorConfig::default())
}

#[test]
fn test_parse_sample_csv() {
    let parsed = parser().parse_csv_str(&sample_specification_csv()).unwrap();
    let attributes: Vec<&str> = parsed
        .specifications
        .iter()
        .map(|s| s.attribute.as_str())
        .collect();

    assert_eq!(
        attributes,
        vec!["rezept_id", "la_nr", "la_nr_v", "bs_nr", "pat_geb", "spr"]
    );
    assert!(parsed.issues.is_empty());
}

#[test]
fn test_id_column_with_trailing_space_in_header() {
    let parsed = parser().parse_csv_str(&sample_specification_csv()).unwrap();
    let ids: Vec<i32> = parsed.specifications.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_business_rules_and_selectors_split() {
    let parsed = parser().parse_csv_str(&sample_specification_csv()).unwrap();
    let la_nr = &parsed.specifications[1];

    assert_eq!(
        la_nr.business_rules,
        vec!["falls Arzt in Weiterbildung: ANR des Assistenten, sonst ANR des verantwortlichen Arztes"]
    );
    assert_eq!(
        la_nr.selectors,
        vec!["//fhir:Practitioner/fhir:identifier/fhir:value/@value"]
    );
    assert!(la_nr.raw_selector_text.starts_with("{{falls"));
    assert!(la_nr.requires_adaptation);
    assert_eq!(la_nr.representation, Representation::Numeric);
}

#[test]
fn test_length_rules_parsed_at_load_time() {
    let parsed = parser().parse_csv_str(&sample_specification_csv()).unwrap();
    let specs = &parsed.specifications;

    assert_eq!(specs[0].length_rule.kind, LengthKind::Bounded);
    assert_eq!(specs[0].length_rule.value, 20);
    assert!(!specs[0].is_optional());

    assert_eq!(specs[1].length_rule.kind, LengthKind::Exact);
    assert_eq!(specs[1].length_rule.value, 9);

    assert_eq!(specs[2].raw_length, "leer oder 9");
    assert!(specs[2].is_optional());
    assert_eq!(specs[2].length_rule.kind, LengthKind::Exact);

    assert!(specs[5].is_optional());
    assert_eq!(specs[5].length_rule.kind, LengthKind::Bounded);
    assert_eq!(specs[5].length_rule.value, 2);
}

#[test]
fn test_multi_line_profile_kept() {
    let parsed = parser().parse_csv_str(&sample_specification_csv()).unwrap();
    assert_eq!(
        parsed.specifications[0].profiles(),
        vec![BUNDLE_PROFILE, PRESCRIPTION_ID_PROFILE]
    );
}

#[test]
fn test_missing_columns_read_as_empty() {
    let parsed = parser().parse_rows(vec![row(&[("Attribut", "x")])]);
    let spec = &parsed.specifications[0];

    assert_eq!(spec.id, 0);
    assert!(spec.profile.is_empty());
    assert!(spec.selectors.is_empty());
    assert!(spec.raw_selector_text.is_empty());
    assert!(!spec.requires_adaptation);
    assert_eq!(spec.representation, Representation::Unspecified);
    assert_eq!(spec.length_rule.kind, LengthKind::Unconstrained);
}

#[test]
fn test_rows_without_attribute_dropped() {
    let parsed = parser().parse_rows(vec![
        row(&[("Attribut", "   "), ("ID", "1")]),
        row(&[("ID", "2")]),
        row(&[("Attribut", " rezept_id "), ("ID", " 3 ")]),
    ]);

    assert_eq!(parsed.specifications.len(), 1);
    assert_eq!(parsed.specifications[0].attribute, "rezept_id");
    assert_eq!(parsed.specifications[0].id, 3);
}

#[test]
fn test_invalid_id_becomes_zero() {
    let parsed = parser().parse_rows(vec![row(&[("Attribut", "x"), ("ID", "zwölf")])]);
    assert_eq!(parsed.specifications[0].id, 0);
}

#[test]
fn test_short_records_tolerated() {
    let csv = "Attribut,ID,Länge,Partieller XPath\nrezept_id,1\nkh_ik,2,9,//fhir:Organization/fhir:identifier/fhir:value/@value\n";
    let parsed = parser().parse_csv_str(csv).unwrap();

    assert_eq!(parsed.specifications.len(), 2);
    assert!(parsed.specifications[0].selectors.is_empty());
    assert_eq!(parsed.specifications[1].selectors.len(), 1);
}

#[test]
fn test_invalid_utf8_row_reported_and_skipped() {
    let mut bytes = b"Attribut,ID\nok_1,1\n".to_vec();
    bytes.extend_from_slice(b"bad_\xff,2\n");
    bytes.extend_from_slice(b"ok_2,3\n");

    let parsed = parser()
        .parse_csv_reader(bytes.as_slice(), "bytes")
        .unwrap();

    assert_eq!(parsed.specifications.len(), 2);
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].kind, IssueKind::RowParseFailure);
    assert!(parsed.issues[0].message.contains("line 3"));
}

#[test]
fn test_byte_order_mark_stripped() {
    let csv = "\u{feff}Attribut,ID\nrezept_id,1\n";
    let parsed = parser().parse_csv_str(csv).unwrap();
    assert_eq!(parsed.specifications[0].attribute, "rezept_id");
}

#[test]
fn test_empty_source_is_fatal() {
    let result = parser().parse_csv_str("");
    assert!(matches!(result, Err(Error::SpecificationSource { .. })));
}

#[test]
fn test_parse_file() {
    let file = write_csv_file(&sample_specification_csv());
    let parsed = parser().parse_file(file.path()).unwrap();
    assert_eq!(parsed.specifications.len(), 6);

    let (table, issues) = parsed.into_table();
    assert_eq!(table.len(), 6);
    assert!(issues.is_empty());
}

#[test]
fn test_parse_file_skips_invalid_utf8_row() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"Attribut,ID\nok_1,1\nbad_\xff,2\nok_2,3\n").unwrap();
    file.flush().unwrap();

    let parsed = parser().parse_file(file.path()).unwrap();

    let attributes: Vec<&str> = parsed
        .specifications
        .iter()
        .map(|s| s.attribute.as_str())
        .collect();
    assert_eq!(attributes, vec!["ok_1", "ok_2"]);
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].kind, IssueKind::RowParseFailure);
    assert!(parsed.issues[0].message.contains("line 3"));
}

#[test]
fn test_parse_file_with_byte_order_mark_and_latin1_description() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\xef\xbb\xbfAttribut,ID ,Beschreibung des Attributs\n").unwrap();
    file.write_all(b"bs_nr,4,Betriebsst\xe4tte\n").unwrap();
    file.write_all(b"pat_geb,5,Geburtsdatum\n").unwrap();
    file.flush().unwrap();

    let parsed = parser().parse_file(file.path()).unwrap();

    assert_eq!(parsed.specifications.len(), 1);
    assert_eq!(parsed.specifications[0].attribute, "pat_geb");
    assert_eq!(parsed.specifications[0].id, 5);
    assert_eq!(parsed.issues.len(), 1);
}

#[test]
fn test_raw_selector_text_kept_as_authored() {
    let csv = "Attribut,ID ,Partieller XPath\n  pzn ,7,\"  //fhir:Medication/fhir:code/@value\n\"\n";
    let parsed = parser().parse_csv_str(csv).unwrap();
    let spec = &parsed.specifications[0];

    assert_eq!(spec.attribute, "pzn");
    assert_eq!(spec.id, 7);
    assert_eq!(spec.raw_selector_text, "  //fhir:Medication/fhir:code/@value\n");
    assert_eq!(spec.selectors, vec!["//fhir:Medication/fhir:code/@value"]);
}

#[test]
fn test_missing_file_is_fatal() {
    let result = parser().parse_file(std::path::Path::new("/nonexistent/avd.csv"));
    assert!(matches!(result, Err(Error::SpecificationNotFound { .. })));
}

#[test]
fn test_custom_columns_and_prefix() {
    let config = ExtractorConfig::default()
        .with_namespace("f", "http://hl7.org/fhir")
        .with_columns(SpecificationColumns {
            attribute: "name".to_string(),
            selector: "xpath".to_string(),
            ..SpecificationColumns::default()
        });
    let csv = "name,xpath\nrezept_id,\"f:Bundle/f:id\nHinweistext\"\n";
    let parsed = SpecificationParser::new(config).parse_csv_str(csv).unwrap();

    assert_eq!(parsed.specifications[0].selectors, vec!["f:Bundle/f:id"]);
}
