//! Test utilities and mock infrastructure for the extraction engine

use crate::app::services::fhir_document::{DocumentAccessor, SelectorError};
use crate::app::services::field_extractor::FieldExtractionEngine;
use crate::config::ExtractorConfig;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

mod post_process_tests;

/// Document accessor with canned selector responses
///
/// Unknown selectors yield no results; selectors registered as failing
/// return a [`SelectorError`]. Every call is recorded.
#[derive(Debug, Default)]
pub struct MockDocument {
    responses: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the values a selector yields
    pub fn with(mut self, selector: &str, values: &[&str]) -> Self {
        self.responses.insert(
            selector.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Register a selector that fails to evaluate
    pub fn failing(mut self, selector: &str) -> Self {
        self.failing.insert(selector.to_string());
        self
    }

    /// Selectors evaluated so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DocumentAccessor for MockDocument {
    fn select(&self, selector: &str) -> Result<Vec<String>, SelectorError> {
        self.calls.borrow_mut().push(selector.to_string());
        if self.failing.contains(selector) {
            return Err(SelectorError::Evaluation {
                message: "mock failure".to_string(),
            });
        }
        Ok(self.responses.get(selector).cloned().unwrap_or_default())
    }
}

/// Engine with default configuration
pub fn engine() -> FieldExtractionEngine {
    FieldExtractionEngine::new(ExtractorConfig::default())
}
