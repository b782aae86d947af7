//! Data models for AVD extraction
//!
//! This module contains the core data structures for representing AVD field
//! specifications, extracted attribute values, validation issues and the
//! results returned to callers.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Field Specification
// =============================================================================

/// Declared representation of a field, controlling coercion and type checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// "numerisch": digits only, coerced to an integer when possible
    Numeric,
    /// "alphanumerisch": free text
    Alphanumeric,
    /// Anything else, including an empty column
    #[default]
    Unspecified,
}

impl Representation {
    /// Parse the representation column (case-insensitive)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "numerisch" => Representation::Numeric,
            "alphanumerisch" => Representation::Alphanumeric,
            _ => Representation::Unspecified,
        }
    }
}

/// Kind of length constraint declared in the length column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LengthKind {
    /// Value must have exactly `value` characters
    Exact,
    /// Value must have at most `value` characters
    Bounded,
    /// No usable constraint
    #[default]
    Unconstrained,
}

/// Structured form of the length column micro-grammar
///
/// Recognised forms: `"9"`, `"..45"`, `"1..45"`, `"leer oder 9"`,
/// `"leer oder ..12"`. The optional flag is independent of the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LengthRule {
    pub kind: LengthKind,
    pub value: usize,
    pub optional: bool,
}

impl LengthRule {
    /// Parse a raw length column value
    ///
    /// # Arguments
    ///
    /// * `raw` - Length text as authored in the specification
    /// * `optional_marker` - Sentinel word meaning "may be empty" (e.g. "leer")
    pub fn parse(raw: &str, optional_marker: &str) -> Self {
        let optional = !optional_marker.is_empty() && raw.contains(optional_marker);

        let constraint = raw
            .split_whitespace()
            .find(|token| token.contains("..") || token.chars().all(|c| c.is_ascii_digit()));

        let (kind, value) = match constraint {
            Some(token) if token.contains("..") => {
                let upper = token.rsplit("..").next().unwrap_or_default();
                match upper.parse::<usize>() {
                    Ok(max) => (LengthKind::Bounded, max),
                    Err(_) => (LengthKind::Unconstrained, 0),
                }
            }
            Some(token) => match token.parse::<usize>() {
                Ok(exact) => (LengthKind::Exact, exact),
                Err(_) => (LengthKind::Unconstrained, 0),
            },
            None => (LengthKind::Unconstrained, 0),
        };

        Self {
            kind,
            value,
            optional,
        }
    }

    /// Check a value's character count against the constraint
    pub fn accepts(&self, value: &str) -> bool {
        let length = value.chars().count();
        match self.kind {
            LengthKind::Exact => length == self.value,
            LengthKind::Bounded => length <= self.value,
            LengthKind::Unconstrained => true,
        }
    }
}

/// One declared extraction rule from the specification table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldSpecification {
    /// Output attribute name, unique key of the table
    pub attribute: String,

    /// Numeric identifier from the table (0 when unparseable)
    pub id: i32,

    /// Free-text description, informational only
    pub description: String,

    /// Length column exactly as authored
    pub raw_length: String,

    /// Parsed length constraint
    pub length_rule: LengthRule,

    /// Declared representation
    pub representation: Representation,

    /// FHIR profile URL(s), newline separated
    pub profile: String,

    /// True when the adaptation marker column is non-empty
    pub requires_adaptation: bool,

    /// Selector column exactly as authored
    pub raw_selector_text: String,

    /// Business-rule annotations found in the selector column, in order
    pub business_rules: Vec<String>,

    /// Cleaned selector expressions, in order
    pub selectors: Vec<String>,
}

impl FieldSpecification {
    /// Create a specification with an attribute name and ID
    pub fn new(attribute: impl Into<String>, id: i32) -> Self {
        Self {
            attribute: attribute.into(),
            id,
            ..Default::default()
        }
    }

    /// Set the length rule from raw length text, using the default "leer" marker
    pub fn with_length(mut self, raw_length: &str) -> Self {
        self.raw_length = raw_length.to_string();
        self.length_rule = LengthRule::parse(raw_length, crate::constants::OPTIONAL_LENGTH_MARKER);
        self
    }

    /// Set the representation
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Set the profile text
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the parsed selectors (raw text is left as-is)
    pub fn with_selectors<S: Into<String>>(mut self, selectors: Vec<S>) -> Self {
        self.selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the business-rule annotations
    pub fn with_business_rules<S: Into<String>>(mut self, rules: Vec<S>) -> Self {
        self.business_rules = rules.into_iter().map(Into::into).collect();
        self
    }

    /// Set the raw selector text
    pub fn with_raw_selector_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_selector_text = raw.into();
        self
    }

    /// Whether an empty value is allowed
    pub fn is_optional(&self) -> bool {
        self.length_rule.optional
    }

    /// Whether the field needs special business logic
    pub fn has_business_rules(&self) -> bool {
        !self.business_rules.is_empty()
    }

    /// Individual profile URLs (trimmed, non-empty)
    pub fn profiles(&self) -> Vec<&str> {
        self.profile
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

// =============================================================================
// Extracted Values
// =============================================================================

/// A resolved attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ExtractedValue {
    Integer(i64),
    Text(String),
    #[default]
    Absent,
}

impl ExtractedValue {
    /// True for `Absent` and empty text
    pub fn is_empty(&self) -> bool {
        match self {
            ExtractedValue::Absent => true,
            ExtractedValue::Text(text) => text.is_empty(),
            ExtractedValue::Integer(_) => false,
        }
    }

    /// True only for `Absent`
    pub fn is_absent(&self) -> bool {
        matches!(self, ExtractedValue::Absent)
    }

    /// String form used for validation and display
    pub fn as_text(&self) -> Option<String> {
        match self {
            ExtractedValue::Text(text) => Some(text.clone()),
            ExtractedValue::Integer(number) => Some(number.to_string()),
            ExtractedValue::Absent => None,
        }
    }

    /// Integer form, parsing text when necessary
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ExtractedValue::Integer(number) => Some(*number),
            ExtractedValue::Text(text) => text.trim().parse().ok(),
            ExtractedValue::Absent => None,
        }
    }
}

impl fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractedValue::Text(text) => write!(f, "{}", text),
            ExtractedValue::Integer(number) => write!(f, "{}", number),
            ExtractedValue::Absent => write!(f, "<absent>"),
        }
    }
}

/// Values, errors and warnings collected for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Attribute name to value; a key is present once its specification was evaluated
    pub values: IndexMap<String, ExtractedValue>,

    /// Field-level failures (selector evaluation errors)
    pub errors: Vec<String>,

    /// Soft issues (empty required fields, missing selectors)
    pub warnings: Vec<String>,

    /// When the extraction ran
    pub extraction_timestamp: DateTime<Utc>,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            extraction_timestamp: Utc::now(),
        }
    }

    /// Set the value for an attribute
    pub fn set_value(&mut self, attribute: impl Into<String>, value: ExtractedValue) {
        self.values.insert(attribute.into(), value);
    }

    /// Get the value for an attribute, `None` when never evaluated
    pub fn value(&self, attribute: &str) -> Option<&ExtractedValue> {
        self.values.get(attribute)
    }

    /// Get the string form of a non-empty value
    pub fn text(&self, attribute: &str) -> Option<String> {
        self.value(attribute)
            .filter(|v| !v.is_empty())
            .and_then(ExtractedValue::as_text)
    }

    /// Get the integer form of a value
    pub fn integer(&self, attribute: &str) -> Option<i64> {
        self.value(attribute).and_then(ExtractedValue::as_integer)
    }

    /// Whether an attribute has no usable value (unevaluated counts as empty)
    pub fn is_empty_value(&self, attribute: &str) -> bool {
        self.value(attribute).is_none_or(ExtractedValue::is_empty)
    }

    /// Number of attributes with a non-empty value
    pub fn populated_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_empty()).count()
    }

    /// Whether any field-level error was recorded
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// =============================================================================
// Validation Issues
// =============================================================================

/// Category of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingRequired,
    LengthViolation,
    TypeViolation,
    SpecMissingAttribute,
    SpecInvalidId,
    SpecDuplicateId,
    SpecDuplicateAttribute,
    SpecMissingSelector,
    SpecMissingProfile,
    RowParseFailure,
    SpecSourceUnavailable,
}

/// A single validation finding, referencing the affected attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub attribute: String,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(attribute: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Outcome of validating extracted values against their specifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValueValidation {
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValueValidation {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
        }
    }

    /// Messages of all issues
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.message.clone()).collect()
    }

    /// Issues referencing one attribute
    pub fn issues_for(&self, attribute: &str) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.attribute == attribute)
            .collect()
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Quality report for a specification table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SpecificationReport {
    pub total_specifications: usize,
    pub complex_specifications: usize,
    pub profile_groups: Vec<String>,
    pub validation_issues: Vec<ValidationIssue>,
    pub success: bool,
}

impl SpecificationReport {
    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Complex: {}, Profiles: {}, Issues: {}",
            self.total_specifications,
            self.complex_specifications,
            self.profile_groups.len(),
            self.validation_issues.len()
        )
    }
}

/// Complete result of one extraction run through the facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Values, errors and warnings of the run
    #[serde(flatten)]
    pub extraction: ExtractionResult,

    /// Specifications the run was driven by
    pub specifications: Vec<FieldSpecification>,

    /// Issues found in the specification table (advisory)
    pub specification_issues: Vec<ValidationIssue>,

    /// Issues found in the extracted values (advisory)
    pub value_validation: ValueValidation,

    /// True iff extraction produced no field-level errors
    pub success: bool,
}

impl ExtractionOutcome {
    /// Outcome for a run that could not start
    pub fn failed(message: impl Into<String>) -> Self {
        let mut extraction = ExtractionResult::new();
        extraction.errors.push(message.into());
        Self {
            extraction,
            specifications: Vec::new(),
            specification_issues: Vec::new(),
            value_validation: ValueValidation::default(),
            success: false,
        }
    }

    /// Extracted values
    pub fn values(&self) -> &IndexMap<String, ExtractedValue> {
        &self.extraction.values
    }

    /// Field-level errors
    pub fn errors(&self) -> &[String] {
        &self.extraction.errors
    }

    /// Soft warnings
    pub fn warnings(&self) -> &[String] {
        &self.extraction.warnings
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Extraction: {}, Values: {}, Errors: {}, Warnings: {}, Specs: {}",
            if self.success { "Success" } else { "Failed" },
            self.extraction.values.len(),
            self.extraction.errors.len(),
            self.extraction.warnings.len(),
            self.specifications.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_rule_exact() {
        let rule = LengthRule::parse("9", "leer");
        assert_eq!(rule.kind, LengthKind::Exact);
        assert_eq!(rule.value, 9);
        assert!(!rule.optional);
        assert!(rule.accepts("123456789"));
        assert!(!rule.accepts("12345678"));
    }

    #[test]
    fn test_length_rule_bounded() {
        let rule = LengthRule::parse("..45", "leer");
        assert_eq!(rule.kind, LengthKind::Bounded);
        assert_eq!(rule.value, 45);
        assert!(rule.accepts("Mustermann"));
        assert!(!rule.accepts(&"x".repeat(46)));

        let ranged = LengthRule::parse("1..12", "leer");
        assert_eq!(ranged.kind, LengthKind::Bounded);
        assert_eq!(ranged.value, 12);
    }

    #[test]
    fn test_length_rule_optional() {
        let rule = LengthRule::parse("leer oder 9", "leer");
        assert!(rule.optional);
        assert_eq!(rule.kind, LengthKind::Exact);
        assert_eq!(rule.value, 9);

        let bounded = LengthRule::parse("leer oder ..12", "leer");
        assert!(bounded.optional);
        assert_eq!(bounded.kind, LengthKind::Bounded);
    }

    #[test]
    fn test_length_rule_unconstrained() {
        assert_eq!(LengthRule::parse("", "leer").kind, LengthKind::Unconstrained);
        assert_eq!(LengthRule::parse("1..n", "leer").kind, LengthKind::Unconstrained);
        assert_eq!(LengthRule::parse("variabel", "leer").kind, LengthKind::Unconstrained);
        assert!(LengthRule::parse("variabel", "leer").accepts("anything"));
    }

    #[test]
    fn test_length_counts_characters() {
        let rule = LengthRule::parse("6", "leer");
        assert!(rule.accepts("Müller"));
    }

    #[test]
    fn test_representation_parse() {
        assert_eq!(Representation::parse("numerisch"), Representation::Numeric);
        assert_eq!(Representation::parse(" Alphanumerisch "), Representation::Alphanumeric);
        assert_eq!(Representation::parse(""), Representation::Unspecified);
    }

    #[test]
    fn test_extracted_value_serialization() {
        let mut result = ExtractionResult::new();
        result.set_value("a", ExtractedValue::Text("x".to_string()));
        result.set_value("b", ExtractedValue::Integer(42));
        result.set_value("c", ExtractedValue::Absent);

        let json = serde_json::to_value(&result.values).unwrap();
        assert_eq!(json["a"], "x");
        assert_eq!(json["b"], 42);
        assert!(json["c"].is_null());
    }

    #[test]
    fn test_extraction_result_accessors() {
        let mut result = ExtractionResult::new();
        result.set_value("name", ExtractedValue::Text("Mustermann".to_string()));
        result.set_value("count", ExtractedValue::Integer(7));
        result.set_value("empty", ExtractedValue::Absent);

        assert_eq!(result.text("name"), Some("Mustermann".to_string()));
        assert_eq!(result.integer("count"), Some(7));
        assert_eq!(result.text("count"), Some("7".to_string()));
        assert_eq!(result.value("empty"), Some(&ExtractedValue::Absent));
        assert!(result.is_empty_value("empty"));
        assert!(result.is_empty_value("never"));
        assert!(result.value("never").is_none());
        assert_eq!(result.populated_count(), 2);
    }

    #[test]
    fn test_specification_profiles() {
        let spec = FieldSpecification::new("x", 1)
            .with_profile("https://a.example/Profile\n  https://b.example/Profile \r\n");
        assert_eq!(
            spec.profiles(),
            vec!["https://a.example/Profile", "https://b.example/Profile"]
        );
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = ExtractionOutcome::failed("Extraction failed: missing file");
        assert!(!outcome.success);
        assert_eq!(outcome.errors().len(), 1);
        assert!(outcome.summary().starts_with("Extraction: Failed"));
    }
}
