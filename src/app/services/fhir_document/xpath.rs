//! Selector evaluation through `sxd-xpath`
//!
//! Selectors are checked against the namespace binding, anchored when they
//! start with a bare name step, compiled, and evaluated from the document
//! root. Node results are flattened to FHIR scalar values.

use crate::config::NamespaceBinding;
use regex::Regex;
use std::sync::LazyLock;
use sxd_document::dom::Document;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};
use thiserror::Error;

/// Selector compilation and evaluation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("unknown namespace prefix '{prefix}'")]
    UnknownPrefix { prefix: String },

    #[error("invalid selector: {message}")]
    Invalid { message: String },

    #[error("selector evaluation failed: {message}")]
    Evaluation { message: String },
}

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'[^']*'|"[^"]*""#).expect("string literal pattern is valid")
});

static PREFIXED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][\w.\-]*):[A-Za-z_*]").expect("prefixed name pattern is valid")
});

static LEADING_NAME_STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@|[A-Za-z_][\w.\-]*(:[A-Za-z_][\w.\-]*)?\s*(/|\[|$))")
        .expect("leading step pattern is valid")
});

/// Check prefixes and anchor a selector for evaluation
///
/// A selector that starts with a name step (`fhir:Patient/...`) or an
/// attribute step is evaluated as if prefixed with `//`.
pub fn prepare(selector: &str, binding: &NamespaceBinding) -> Result<String, SelectorError> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(SelectorError::Empty);
    }

    let without_literals = STRING_LITERAL.replace_all(selector, "''");
    if let Some(prefix) = PREFIXED_NAME
        .captures_iter(&without_literals)
        .map(|captures| captures[1].to_string())
        .find(|prefix| *prefix != binding.prefix)
    {
        return Err(SelectorError::UnknownPrefix { prefix });
    }

    if LEADING_NAME_STEP.is_match(selector) {
        Ok(format!("//{}", selector))
    } else {
        Ok(selector.to_string())
    }
}

/// Evaluate a selector and return the scalar of every result in document order
pub fn evaluate(
    document: &Document<'_>,
    selector: &str,
    binding: &NamespaceBinding,
) -> Result<Vec<String>, SelectorError> {
    let expression = prepare(selector, binding)?;

    let xpath = Factory::new()
        .build(&expression)
        .map_err(|e| SelectorError::Invalid {
            message: e.to_string(),
        })?
        .ok_or(SelectorError::Empty)?;

    let mut context = Context::new();
    context.set_namespace(&binding.prefix, &binding.uri);

    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| SelectorError::Evaluation {
            message: e.to_string(),
        })?;

    Ok(match value {
        Value::Nodeset(nodes) => nodes.document_order().iter().map(scalar).collect(),
        other => vec![other.string()],
    })
}

/// Scalar value of a node following the FHIR primitive convention
///
/// Elements yield their trimmed text, or the `value` attribute when they
/// have no text. Attributes yield their value unchanged.
pub fn scalar(node: &Node<'_>) -> String {
    match node {
        Node::Attribute(attribute) => attribute.value().to_string(),
        Node::Element(element) => {
            let text = node.string_value();
            let text = text.trim();
            if text.is_empty() {
                element.attribute_value("value").unwrap_or_default().to_string()
            } else {
                text.to_string()
            }
        }
        _ => node.string_value().trim().to_string(),
    }
}
