//! Specification row parsing
//!
//! Rows are column-name → raw-text maps. Lookup is tolerant: a missing column
//! reads as an empty string and never fails the row.

use super::selectors::{SelectorText, split_selector_text};
use crate::app::models::{FieldSpecification, IssueKind, LengthRule, Representation, ValidationIssue};
use crate::app::services::specification_table::SpecificationTable;
use crate::config::ExtractorConfig;
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// One raw specification row keyed by (trimmed) header name
pub type SpecificationRow = HashMap<String, String>;

/// Specifications and soft issues produced by one parse
#[derive(Debug, Clone, Default)]
pub struct ParsedSpecifications {
    pub specifications: Vec<FieldSpecification>,
    pub issues: Vec<ValidationIssue>,
}

impl ParsedSpecifications {
    /// Build the immutable lookup table, keeping the issues alongside
    pub fn into_table(self) -> (SpecificationTable, Vec<ValidationIssue>) {
        (SpecificationTable::new(self.specifications), self.issues)
    }
}

/// Parser for the AVD specification table
#[derive(Debug, Clone, Default)]
pub struct SpecificationParser {
    config: ExtractorConfig,
}

impl SpecificationParser {
    /// Create a parser with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Parse a specification CSV file
    ///
    /// A missing file is [`Error::SpecificationNotFound`], an unreadable file
    /// is [`Error::SpecificationSource`]. Individual bad rows are skipped and
    /// reported as [`IssueKind::RowParseFailure`].
    pub fn parse_file(&self, path: &Path) -> Result<ParsedSpecifications> {
        info!("Parsing AVD specification file: {}", path.display());

        if !path.exists() {
            return Err(Error::specification_not_found(path.display().to_string()));
        }

        let cannot_read = |e: std::io::Error| {
            Error::specification_source(format!("Cannot read {}: {}", path.display(), e))
        };

        let mut reader = BufReader::new(File::open(path).map_err(cannot_read)?);
        skip_byte_order_mark(&mut reader).map_err(cannot_read)?;

        let parsed = self.parse_csv_reader(reader, &path.display().to_string())?;
        info!(
            "Successfully parsed {} specifications from {}",
            parsed.specifications.len(),
            path.display()
        );
        Ok(parsed)
    }

    /// Parse specification CSV text
    pub fn parse_csv_str(&self, content: &str) -> Result<ParsedSpecifications> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        self.parse_csv_reader(content.as_bytes(), "<inline>")
    }

    /// Parse specification CSV from any reader
    ///
    /// Only headers are trimmed; cell text is kept as authored and trimmed
    /// per column in [`Self::parse_row`]. Rows that are not valid UTF-8 are
    /// skipped and reported.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of CSV bytes with a header row
    /// * `origin` - Name used in errors and logs
    pub fn parse_csv_reader<R: Read>(&self, reader: R, origin: &str) -> Result<ParsedSpecifications> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::csv_parsing(origin, "Failed to read header row", Some(e)))?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::specification_source(format!(
                "{} has no header row",
                origin
            )));
        }

        let mut rows = Vec::new();
        let mut row_issues = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            // Header is line 1
            let line = index + 2;
            match record {
                Ok(record) => rows.push(row_from_record(&headers, &record)),
                Err(e) if e.is_io_error() => {
                    return Err(Error::csv_parsing(
                        origin,
                        format!("Read failure at line {}", line),
                        Some(e),
                    ));
                }
                Err(e) => {
                    warn!("Failed to parse CSV row at line {} in {}: {}", line, origin, e);
                    row_issues.push(ValidationIssue::new(
                        "",
                        IssueKind::RowParseFailure,
                        format!("Failed to parse specification row at line {}: {}", line, e),
                    ));
                }
            }
        }

        let mut parsed = self.parse_rows(rows);
        row_issues.append(&mut parsed.issues);
        parsed.issues = row_issues;
        Ok(parsed)
    }

    /// Turn raw rows into specifications
    ///
    /// Rows without an attribute name are continuation or noise rows and are
    /// dropped silently.
    pub fn parse_rows<I>(&self, rows: I) -> ParsedSpecifications
    where
        I: IntoIterator<Item = SpecificationRow>,
    {
        let mut parsed = ParsedSpecifications::default();

        for row in rows {
            if let Some(specification) = self.parse_row(&row) {
                debug!(
                    "Parsed specification for attribute: {} (ID: {})",
                    specification.attribute, specification.id
                );
                parsed.specifications.push(specification);
            }
        }

        parsed
    }

    /// Parse a single row, `None` when the attribute name is empty
    pub fn parse_row(&self, row: &SpecificationRow) -> Option<FieldSpecification> {
        let columns = &self.config.columns;

        let attribute = column(row, &columns.attribute).trim();
        if attribute.is_empty() {
            return None;
        }

        let id = column(row, &columns.id).trim().parse::<i32>().unwrap_or(0);
        let raw_length = column(row, &columns.length).to_string();
        let raw_selector_text = column(row, &columns.selector).to_string();
        let SelectorText {
            business_rules,
            selectors,
        } = split_selector_text(&raw_selector_text, &self.config.namespace.path_marker());

        Some(FieldSpecification {
            attribute: attribute.to_string(),
            id,
            description: column(row, &columns.description).trim().to_string(),
            length_rule: LengthRule::parse(&raw_length, &self.config.optional_marker),
            raw_length,
            representation: Representation::parse(column(row, &columns.representation)),
            profile: column(row, &columns.profile).trim().to_string(),
            requires_adaptation: !column(row, &columns.adaptation).trim().is_empty(),
            raw_selector_text,
            business_rules,
            selectors,
        })
    }
}

fn skip_byte_order_mark<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(())
}

fn column<'r>(row: &'r SpecificationRow, name: &str) -> &'r str {
    row.get(name.trim()).map(String::as_str).unwrap_or("")
}

fn row_from_record(headers: &StringRecord, record: &StringRecord) -> SpecificationRow {
    headers
        .iter()
        .zip(record.iter())
        .map(|(header, value)| (header.trim().to_string(), value.to_string()))
        .collect()
}
