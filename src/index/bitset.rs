//! Fixed-Width Multi-Word Bitsets
//!
//! Some attributes have more labels than fit in one `MaskWord`. Rather than
//! widening the word type, a label's global position is spread over a fixed
//! array of words, where each word carries only its low `width` bits.
//!
//! The period attribute uses the two-word layout `[PERIOD_BOUNDARY, WORD_BITS]`:
//! global position `p` is bit `p` of word 0 when `p < PERIOD_BOUNDARY`, else bit
//! `p - PERIOD_BOUNDARY` of word 1. Single-word attributes use `[WORD_BITS]`.
//!
//! # Example
//!
//! ```rust
//! use course_filter::index::{WideBitset, WideLayout};
//!
//! let layout = WideLayout::split(30);
//! assert_eq!(layout.locate(29), Some((0, 29)));
//! assert_eq!(layout.locate(30), Some((1, 0)));
//!
//! let mut bits = WideBitset::<2>::empty();
//! assert!(bits.insert(&layout, 30));
//! assert_eq!(bits.words(), &[0, 1]);
//! ```

use crate::types::{MaskWord, WORD_BITS};

// ============================================================================
// Layout
// ============================================================================

/// Describes how global positions map onto `N` words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WideLayout<const N: usize> {
    /// Number of usable low bits in each word
    widths: [u32; N],
}

impl<const N: usize> WideLayout<N> {
    /// Create a layout from per-word widths
    ///
    /// Returns `None` if any width exceeds `WORD_BITS`.
    pub fn new(widths: [u32; N]) -> Option<Self> {
        if widths.iter().any(|&w| w > WORD_BITS) {
            return None;
        }
        Some(Self { widths })
    }

    /// Per-word widths
    pub fn widths(&self) -> &[u32; N] {
        &self.widths
    }

    /// Total number of addressable positions
    pub fn capacity(&self) -> u32 {
        self.widths.iter().sum()
    }

    /// Map a global position to `(word, bit)`
    ///
    /// Returns `None` when the position lies beyond the layout's capacity.
    #[inline]
    pub fn locate(&self, position: u32) -> Option<(usize, u32)> {
        let mut start = 0u32;
        for (word, &width) in self.widths.iter().enumerate() {
            if position < start + width {
                return Some((word, position - start));
            }
            start += width;
        }
        None
    }
}

impl WideLayout<1> {
    /// One full word
    pub const fn single() -> Self {
        Self {
            widths: [WORD_BITS],
        }
    }
}

impl WideLayout<2> {
    /// Low word holds `[0, boundary)`, high word holds the next `WORD_BITS`
    ///
    /// A boundary larger than `WORD_BITS` is clamped to `WORD_BITS`.
    pub const fn split(boundary: u32) -> Self {
        let low = if boundary > WORD_BITS {
            WORD_BITS
        } else {
            boundary
        };
        Self {
            widths: [low, WORD_BITS],
        }
    }

    /// The low word's width
    pub fn boundary(&self) -> u32 {
        self.widths[0]
    }
}

// ============================================================================
// Bitset
// ============================================================================

/// A bitset spanning `N` words
///
/// The bitset itself does not know its layout; callers pass the layout that
/// produced the positions when inserting or probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WideBitset<const N: usize> {
    words: [MaskWord; N],
}

impl<const N: usize> WideBitset<N> {
    /// Bitset with no bits set
    pub const fn empty() -> Self {
        Self { words: [0; N] }
    }

    /// Wrap raw words
    pub const fn from_words(words: [MaskWord; N]) -> Self {
        Self { words }
    }

    /// Raw words
    pub fn words(&self) -> &[MaskWord; N] {
        &self.words
    }

    /// Consume into raw words
    pub fn into_words(self) -> [MaskWord; N] {
        self.words
    }

    /// Set the bit for a global position
    ///
    /// Returns false if the position is outside `layout`.
    pub fn insert(&mut self, layout: &WideLayout<N>, position: u32) -> bool {
        match layout.locate(position) {
            Some((word, bit)) => {
                self.words[word] |= 1 << bit;
                true
            },
            None => false,
        }
    }

    /// Check the bit for a global position
    pub fn contains(&self, layout: &WideLayout<N>, position: u32) -> bool {
        layout
            .locate(position)
            .map(|(word, bit)| self.words[word] & (1 << bit) != 0)
            .unwrap_or(false)
    }

    /// True if any word shares a set bit with the same word of `other`
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// True if no bit is set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of set bits
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Global positions of all set bits, in ascending order
    pub fn positions(&self, layout: &WideLayout<N>) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.count() as usize);
        let mut start = 0u32;
        for (word, &width) in self.words.iter().zip(layout.widths().iter()) {
            for bit in 0..width {
                if word & (1 << bit) != 0 {
                    out.push(start + bit);
                }
            }
            start += width;
        }
        out
    }
}

impl<const N: usize> Default for WideBitset<N> {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_layout_boundary() {
        let layout = WideLayout::split(30);

        assert_eq!(layout.boundary(), 30);
        assert_eq!(layout.capacity(), 62);
        assert_eq!(layout.locate(0), Some((0, 0)));
        assert_eq!(layout.locate(29), Some((0, 29)));
        assert_eq!(layout.locate(30), Some((1, 0)));
        assert_eq!(layout.locate(61), Some((1, 31)));
        assert_eq!(layout.locate(62), None);
    }

    #[test]
    fn test_split_layout_clamps() {
        let layout = WideLayout::split(100);
        assert_eq!(layout.boundary(), WORD_BITS);
        assert_eq!(layout.capacity(), 2 * WORD_BITS);
    }

    #[test]
    fn test_single_layout() {
        let layout = WideLayout::single();
        assert_eq!(layout.capacity(), 32);
        assert_eq!(layout.locate(31), Some((0, 31)));
        assert_eq!(layout.locate(32), None);
    }

    #[test]
    fn test_layout_rejects_wide_words() {
        assert!(WideLayout::new([33]).is_none());
        assert!(WideLayout::new([8, 8, 8]).is_some());
    }

    #[test]
    fn test_three_word_layout() {
        let layout = WideLayout::new([4, 4, 4]).unwrap();
        let mut bits = WideBitset::<3>::empty();

        assert!(bits.insert(&layout, 5));
        assert!(bits.insert(&layout, 11));
        assert!(!bits.insert(&layout, 12));

        assert_eq!(bits.words(), &[0, 0b10, 0b1000]);
        assert_eq!(bits.positions(&layout), vec![5, 11]);
    }

    #[test]
    fn test_insert_and_contains() {
        let layout = WideLayout::split(30);
        let mut bits = WideBitset::<2>::empty();

        assert!(bits.insert(&layout, 29));
        assert_eq!(bits.words(), &[1 << 29, 0]);

        assert!(bits.insert(&layout, 30));
        assert_eq!(bits.words(), &[1 << 29, 1]);

        assert!(bits.contains(&layout, 29));
        assert!(bits.contains(&layout, 30));
        assert!(!bits.contains(&layout, 31));
        assert!(!bits.contains(&layout, 500));
        assert_eq!(bits.count(), 2);
    }

    #[test]
    fn test_intersects_either_word() {
        let low_only = WideBitset::from_words([0b1, 0]);
        let high_only = WideBitset::from_words([0, 0b1]);
        let both = WideBitset::from_words([0b1, 0b1]);

        assert!(!low_only.intersects(&high_only));
        assert!(both.intersects(&low_only));
        assert!(both.intersects(&high_only));
        assert!(!WideBitset::<2>::empty().intersects(&both));
    }

    #[test]
    fn test_empty() {
        assert!(WideBitset::<2>::default().is_empty());
        assert!(!WideBitset::from_words([0, 4]).is_empty());
    }
}
