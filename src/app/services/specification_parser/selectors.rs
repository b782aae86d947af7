//! Splitting of the selector column into business rules and selectors
//!
//! The selector column mixes prose annotations in `{{ ... }}` with one or more
//! XPath lines, e.g.
//!
//! ```text
//! {{falls Arzt in Weiterbildung: ANR des Assistenten}}
//! //fhir:Practitioner/fhir:identifier/fhir:value/@value
//! ```

use crate::constants::BUSINESS_RULE_PATTERN;
use regex::Regex;
use std::sync::LazyLock;

static BUSINESS_RULE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BUSINESS_RULE_PATTERN).expect("business rule pattern is valid"));

/// Business rules and selectors parsed from one selector column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorText {
    pub business_rules: Vec<String>,
    pub selectors: Vec<String>,
}

/// Parse the raw selector column
///
/// # Arguments
///
/// * `raw` - Selector column exactly as authored
/// * `path_marker` - Namespaced path marker, e.g. `fhir:`
pub fn split_selector_text(raw: &str, path_marker: &str) -> SelectorText {
    if raw.trim().is_empty() {
        return SelectorText::default();
    }

    SelectorText {
        business_rules: business_rules(raw),
        selectors: selector_lines(raw, path_marker),
    }
}

/// Inner text of every `{{ ... }}` annotation, trimmed, in order
pub fn business_rules(raw: &str) -> Vec<String> {
    BUSINESS_RULE_REGEX
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|rule| !rule.is_empty())
        .collect()
}

/// Raw text with every `{{ ... }}` annotation removed
pub fn strip_business_rules(raw: &str) -> String {
    BUSINESS_RULE_REGEX.replace_all(raw, "").into_owned()
}

/// Selector-shaped lines of the raw text after removing annotations
pub fn selector_lines(raw: &str, path_marker: &str) -> Vec<String> {
    strip_business_rules(raw)
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && is_selector_shaped(line, path_marker))
        .map(str::to_string)
        .collect()
}

/// Heuristic for lines that look like a selector rather than prose
pub fn is_selector_shaped(line: &str, path_marker: &str) -> bool {
    line.contains(path_marker)
        || line.contains("@value")
        || line.contains('[')
        || line.starts_with("//")
}
