//! Selection Mask Builder
//!
//! Turns the labels a user selected for one attribute into the bitmask that
//! means "any of these". An empty selection yields the all-zero mask, which
//! the filter treats as "no constraint".
//!
//! Labels missing from the attribute's index (typically stale UI state) are
//! skipped. They contribute nothing, so a selection made only of unknown
//! labels behaves like no selection at all.
//!
//! # Example
//!
//! ```rust
//! use course_filter::index::CategoryIndex;
//! use course_filter::query::mask::{build_mask, build_period_masks};
//! use course_filter::types::Attribute;
//!
//! let years = CategoryIndex::build(Attribute::Year, ["1", "2", "3"], 32).unwrap();
//! assert_eq!(build_mask(&["1", "3", "unknown"], &years), 0b101);
//!
//! let periods: Vec<String> = (0..40).map(|i| format!("P{}", i)).collect();
//! let periods = CategoryIndex::build(Attribute::Period, &periods, 62).unwrap();
//! assert_eq!(build_period_masks(&["P29", "P30"], &periods), (1 << 29, 1));
//! ```

use tracing::trace;

use crate::index::{CategoryIndex, WideBitset, WideLayout};
use crate::types::{MaskWord, PeriodBits, PERIOD_LAYOUT, SINGLE_LAYOUT};

/// Build a selection mask over an arbitrary word layout
///
/// Each known label sets the bit for its position; the result is identical
/// regardless of selection order or repeated labels.
pub fn build_wide_mask<const N: usize, I, S>(
    selected: I,
    index: &CategoryIndex,
    layout: &WideLayout<N>,
) -> WideBitset<N>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mask = WideBitset::empty();

    for label in selected {
        let label = label.as_ref();
        match index.find(label) {
            Some(position) => {
                if !mask.insert(layout, position) {
                    trace!(
                        attribute = %index.attribute(),
                        label,
                        position,
                        "selected label lies outside the mask layout, ignoring"
                    );
                }
            },
            None => {
                trace!(attribute = %index.attribute(), label, "unknown label, ignoring");
            },
        }
    }

    mask
}

/// Build a single-word mask for a standard attribute
///
/// Returns 0 when `selected` is empty or contains only unknown labels.
pub fn build_mask<I, S>(selected: I, index: &CategoryIndex) -> MaskWord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let [mask] = build_wide_mask(selected, index, &SINGLE_LAYOUT).into_words();
    mask
}

/// Build the period mask as a two-word bitset
pub fn build_period_bits<I, S>(selected: I, index: &CategoryIndex) -> PeriodBits
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    build_wide_mask(selected, index, &PERIOD_LAYOUT)
}

/// Build the period masks as `(low, high)`
///
/// A label at global position `p` sets bit `p` of `low` when
/// `p < PERIOD_BOUNDARY`, otherwise bit `p - PERIOD_BOUNDARY` of `high`.
pub fn build_period_masks<I, S>(selected: I, index: &CategoryIndex) -> (MaskWord, MaskWord)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let [low, high] = build_period_bits(selected, index).into_words();
    (low, high)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    fn year_index() -> CategoryIndex {
        CategoryIndex::build(Attribute::Year, ["Y1", "Y2", "Y3", "Y4"], 32).unwrap()
    }

    fn period_index(len: usize) -> CategoryIndex {
        let labels: Vec<String> = (0..len).map(|i| format!("P{}", i)).collect();
        CategoryIndex::build(Attribute::Period, &labels, 62).unwrap()
    }

    #[test]
    fn test_empty_selection_is_zero() {
        let index = year_index();
        assert_eq!(build_mask(Vec::<String>::new(), &index), 0);
        assert_eq!(build_period_masks(Vec::<String>::new(), &period_index(40)), (0, 0));
    }

    #[test]
    fn test_single_label() {
        let index = year_index();
        assert_eq!(build_mask(["Y1"], &index), 0b0001);
        assert_eq!(build_mask(["Y4"], &index), 0b1000);
    }

    #[test]
    fn test_multiple_labels_or_together() {
        let index = year_index();
        assert_eq!(build_mask(["Y2", "Y4"], &index), 0b1010);
    }

    #[test]
    fn test_order_and_duplicates_irrelevant() {
        let index = year_index();
        let a = build_mask(["Y1", "Y3"], &index);
        let b = build_mask(["Y3", "Y1", "Y3", "Y1"], &index);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let index = year_index();
        assert_eq!(build_mask(["Y9", "nope"], &index), 0);
        assert_eq!(build_mask(["Y9", "Y2"], &index), 0b0010);
    }

    #[test]
    fn test_period_split_at_boundary() {
        let index = period_index(62);

        assert_eq!(build_period_masks(["P29"], &index), (1 << 29, 0));
        assert_eq!(build_period_masks(["P30"], &index), (0, 1));
        assert_eq!(build_period_masks(["P61"], &index), (0, 1 << 31));
        assert_eq!(build_period_masks(["P0", "P31"], &index), (1, 0b10));
    }

    #[test]
    fn test_period_unknown_ignored() {
        let index = period_index(35);
        assert_eq!(build_period_masks(["P35", "Mon9"], &index), (0, 0));
    }

    #[test]
    fn test_period_bits_matches_masks() {
        let index = period_index(62);
        let bits = build_period_bits(["P3", "P45"], &index);
        assert_eq!(bits.words(), &[1 << 3, 1 << 15]);
    }
}
