//! Category Index - Label to Bit Position Mapping
//!
//! Each categorical attribute (year, term, period, format) ships with an
//! ordered vocabulary of labels. A `CategoryIndex` assigns every label the
//! zero-based position it holds in that vocabulary, and that position is the
//! bit the label occupies in record columns and selection masks.
//!
//! Indexes are built once when a catalog is loaded and are read-only
//! afterwards, so lookups need no locking.
//!
//! # Example
//!
//! ```rust
//! use course_filter::index::CategoryIndex;
//! use course_filter::types::Attribute;
//!
//! let index = CategoryIndex::build(Attribute::Year, ["1", "2", "3"], 32).unwrap();
//! assert_eq!(index.find("2"), Some(1));
//! assert_eq!(index.find("9"), None);
//! assert_eq!(index.label(2), Some("3"));
//! ```

use std::collections::HashMap;

use crate::error::CatalogError;
use crate::types::Attribute;

/// Label to position mapping for one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    /// Attribute this index belongs to
    attribute: Attribute,

    /// Forward map: label -> position
    label_to_position: HashMap<String, u32>,

    /// Reverse map: position -> label (vocabulary order)
    labels: Vec<String>,
}

impl CategoryIndex {
    /// Build an index from an ordered vocabulary
    ///
    /// Positions follow vocabulary order. Fails if a label appears twice or if
    /// the vocabulary has more labels than `capacity` positions.
    pub fn build<I, S>(
        attribute: Attribute,
        vocabulary: I,
        capacity: u32,
    ) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let iter = vocabulary.into_iter();
        let mut label_to_position = HashMap::with_capacity(iter.size_hint().0);
        let mut labels = Vec::with_capacity(iter.size_hint().0);

        for label in iter {
            let label = label.as_ref();
            let position = labels.len() as u32;

            if let Some(&first) = label_to_position.get(label) {
                return Err(CatalogError::DuplicateLabel {
                    attribute,
                    label: label.to_string(),
                    first,
                    second: position,
                });
            }

            label_to_position.insert(label.to_string(), position);
            labels.push(label.to_string());
        }

        if labels.len() > capacity as usize {
            return Err(CatalogError::VocabularyOverflow {
                attribute,
                len: labels.len(),
                capacity,
            });
        }

        Ok(Self {
            attribute,
            label_to_position,
            labels,
        })
    }

    /// Attribute this index belongs to
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Position of a label, or `None` if the label is not in the vocabulary
    #[inline]
    pub fn find(&self, label: &str) -> Option<u32> {
        self.label_to_position.get(label).copied()
    }

    /// Label at a position
    pub fn label(&self, position: u32) -> Option<&str> {
        self.labels.get(position as usize).map(String::as_str)
    }

    /// All labels in position order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_vocabulary_order() {
        let index = CategoryIndex::build(Attribute::Term, ["SpringA", "SpringB", "FallA"], 32)
            .unwrap();

        assert_eq!(index.find("SpringA"), Some(0));
        assert_eq!(index.find("SpringB"), Some(1));
        assert_eq!(index.find("FallA"), Some(2));
        assert_eq!(index.len(), 3);
        assert_eq!(index.attribute(), Attribute::Term);
    }

    #[test]
    fn test_deterministic() {
        let vocab = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let first = CategoryIndex::build(Attribute::Format, &vocab, 32).unwrap();
        let second = CategoryIndex::build(Attribute::Format, &vocab, 32).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_label() {
        let index = CategoryIndex::build(Attribute::Year, ["1"], 32).unwrap();
        assert_eq!(index.find("2"), None);
        assert_eq!(index.find(""), None);
        assert_eq!(index.label(1), None);
    }

    #[test]
    fn test_duplicate_label_fails_fast() {
        let err = CategoryIndex::build(Attribute::Period, ["Mon1", "Mon2", "Mon1"], 62)
            .unwrap_err();

        assert_eq!(
            err,
            CatalogError::DuplicateLabel {
                attribute: Attribute::Period,
                label: "Mon1".to_string(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn test_capacity_exceeded() {
        let vocab: Vec<String> = (0..33).map(|i| format!("L{}", i)).collect();
        let err = CategoryIndex::build(Attribute::Year, &vocab, 32).unwrap_err();

        assert_eq!(
            err,
            CatalogError::VocabularyOverflow {
                attribute: Attribute::Year,
                len: 33,
                capacity: 32,
            }
        );

        // Exactly at capacity is fine
        assert!(CategoryIndex::build(Attribute::Year, &vocab[..32], 32).is_ok());
    }

    #[test]
    fn test_empty_vocabulary() {
        let index = CategoryIndex::build(Attribute::Format, Vec::<String>::new(), 32).unwrap();
        assert!(index.is_empty());
        assert!(index.labels().is_empty());
    }
}
