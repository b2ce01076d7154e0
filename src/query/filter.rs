//! Filter Engine - Row predicate evaluation
//!
//! A search compiles its `FilterCriteria` once against the catalog indexes,
//! producing normalized text filters and one selection mask per attribute.
//! Each record is then tested against the conjunction:
//!
//! 1. identifier starts with the prefix (case-insensitive)
//! 2. year, term and format bits overlap their masks
//! 3. period bits overlap the period mask in either the low or high word
//! 4. title contains the substring (case-insensitive)
//!
//! A zero mask, or an absent or empty text filter, places no constraint. The
//! title test runs last because it is the only one that allocates.

use tracing::debug;

use crate::catalog::CatalogIndexes;
use crate::query::criteria::FilterCriteria;
use crate::query::mask::{build_mask, build_period_bits};
use crate::types::{CourseRecord, MaskWord, PeriodBits};

/// Criteria resolved against a catalog's indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    /// Uppercased identifier prefix (None when unset or empty)
    id_prefix: Option<String>,

    /// Lowercased title substring (None when unset or empty)
    title_substring: Option<String>,

    year_mask: MaskWord,
    term_mask: MaskWord,
    format_mask: MaskWord,
    period_mask: PeriodBits,
}

impl CompiledFilter {
    /// Build text filters and selection masks for a search
    pub fn compile(criteria: &FilterCriteria, indexes: &CatalogIndexes) -> Self {
        let compiled = Self {
            id_prefix: normalize(criteria.id_prefix.as_deref(), str::to_uppercase),
            title_substring: normalize(criteria.title_substring.as_deref(), str::to_lowercase),
            year_mask: build_mask(&criteria.years, &indexes.year),
            term_mask: build_mask(&criteria.terms, &indexes.term),
            format_mask: build_mask(&criteria.formats, &indexes.format),
            period_mask: build_period_bits(&criteria.periods, &indexes.period),
        };

        let (period_low, period_high) = compiled.period_masks();
        debug!(
            id_prefix = compiled.id_prefix.as_deref().unwrap_or(""),
            title = compiled.title_substring.as_deref().unwrap_or(""),
            year_mask = compiled.year_mask,
            term_mask = compiled.term_mask,
            format_mask = compiled.format_mask,
            period_low,
            period_high,
            "compiled filter"
        );

        compiled
    }

    /// Year selection mask
    pub fn year_mask(&self) -> MaskWord {
        self.year_mask
    }

    /// Term selection mask
    pub fn term_mask(&self) -> MaskWord {
        self.term_mask
    }

    /// Format selection mask
    pub fn format_mask(&self) -> MaskWord {
        self.format_mask
    }

    /// Period selection masks as `(low, high)`
    pub fn period_masks(&self) -> (MaskWord, MaskWord) {
        let [low, high] = *self.period_mask.words();
        (low, high)
    }

    /// True if this filter accepts every record
    pub fn matches_all(&self) -> bool {
        self.id_prefix.is_none()
            && self.title_substring.is_none()
            && self.year_mask == 0
            && self.term_mask == 0
            && self.format_mask == 0
            && self.period_mask.is_empty()
    }

    /// Evaluate the row predicate
    #[inline]
    pub fn matches(&self, record: &CourseRecord) -> bool {
        if let Some(prefix) = &self.id_prefix {
            if !starts_with_uppercased(&record.identifier, prefix) {
                return false;
            }
        }

        if !mask_allows(self.year_mask, record.year_bits)
            || !mask_allows(self.term_mask, record.term_bits)
            || !mask_allows(self.format_mask, record.format_bits)
        {
            return false;
        }

        // Low and high words are alternatives: overlap in either one matches
        if !self.period_mask.is_empty() && !self.period_mask.intersects(&record.period_bits()) {
            return false;
        }

        if let Some(substring) = &self.title_substring {
            if !record.title.to_lowercase().contains(substring.as_str()) {
                return false;
            }
        }

        true
    }

    /// Matching records, in input order
    pub fn filter<'a>(&self, records: &'a [CourseRecord]) -> Vec<&'a CourseRecord> {
        if self.matches_all() {
            return records.iter().collect();
        }

        let result: Vec<&CourseRecord> = records.iter().filter(|r| self.matches(r)).collect();
        debug!(total = records.len(), matched = result.len(), "filter complete");
        result
    }

    /// Positions of matching records, ascending
    pub fn positions(&self, records: &[CourseRecord]) -> Vec<usize> {
        if self.matches_all() {
            return (0..records.len()).collect();
        }

        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Filter records against criteria
///
/// Never fails: an empty input yields an empty result and unknown labels
/// are ignored.
pub fn filter<'a>(
    records: &'a [CourseRecord],
    criteria: &FilterCriteria,
    indexes: &CatalogIndexes,
) -> Vec<&'a CourseRecord> {
    CompiledFilter::compile(criteria, indexes).filter(records)
}

/// Zero mask means "no constraint"
#[inline]
fn mask_allows(mask: MaskWord, bits: MaskWord) -> bool {
    mask == 0 || bits & mask != 0
}

fn normalize(text: Option<&str>, fold: fn(&str) -> String) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(fold)
}

/// Prefix test against an already uppercased prefix, without allocating
fn starts_with_uppercased(haystack: &str, upper_prefix: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_uppercase);
    upper_prefix.chars().all(|p| hay.next() == Some(p))
}

// ============================================================================
// Tests
// ============================================================================
