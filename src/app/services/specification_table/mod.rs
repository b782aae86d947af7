//! In-memory AVD specification table
//!
//! Holds the parsed [`FieldSpecification`] rows in table order with an
//! attribute index for direct lookups. The table is built once per parse and
//! never mutated afterwards, so one table can drive any number of extraction
//! runs, including concurrent ones.

use crate::app::models::FieldSpecification;
use std::collections::HashMap;

pub mod query;

#[cfg(test)]
pub mod tests;

/// Ordered, immutable collection of field specifications
#[derive(Debug, Clone, Default)]
pub struct SpecificationTable {
    /// Specifications in source order (duplicates are kept for validation)
    pub(crate) specifications: Vec<FieldSpecification>,

    /// Attribute → position of its first occurrence
    pub(crate) index: HashMap<String, usize>,
}

impl SpecificationTable {
    /// Build a table from parsed specifications
    pub fn new(specifications: Vec<FieldSpecification>) -> Self {
        let mut index = HashMap::with_capacity(specifications.len());
        for (position, specification) in specifications.iter().enumerate() {
            index
                .entry(specification.attribute.clone())
                .or_insert(position);
        }

        Self {
            specifications,
            index,
        }
    }

    /// Number of specifications
    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    /// Whether the table has no specifications
    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    /// All specifications in table order
    pub fn specifications(&self) -> &[FieldSpecification] {
        &self.specifications
    }

    /// Iterate specifications in table order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpecification> {
        self.specifications.iter()
    }

    /// Look up a specification by attribute (first occurrence)
    pub fn get(&self, attribute: &str) -> Option<&FieldSpecification> {
        self.index
            .get(attribute)
            .map(|&position| &self.specifications[position])
    }

    /// Whether an attribute is declared
    pub fn contains(&self, attribute: &str) -> bool {
        self.index.contains_key(attribute)
    }
}

impl From<Vec<FieldSpecification>> for SpecificationTable {
    fn from(specifications: Vec<FieldSpecification>) -> Self {
        Self::new(specifications)
    }
}

impl<'a> IntoIterator for &'a SpecificationTable {
    type Item = &'a FieldSpecification;
    type IntoIter = std::slice::Iter<'a, FieldSpecification>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
