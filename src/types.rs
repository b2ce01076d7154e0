//! Core data types shared by the index, catalog and query layers
//!
//! # Key Types
//!
//! - **`MaskWord`**: the unsigned word every bit column is stored in
//! - **`Attribute`**: the four independently indexed categorical attributes
//! - **`CourseRecord`**: one course listing with its encoded bit columns
//! - **`DisplayLabels`**: human-readable attribute text kept for display
//!
//! # Example
//!
//! ```rust
//! use course_filter::types::{CourseRecord, PERIOD_BOUNDARY};
//!
//! let record = CourseRecord::new("CS101", "Intro")
//!     .with_year_bits(0b01)
//!     .with_period_bits(0b1, 0);
//!
//! assert_eq!(record.period_bits_low, 1);
//! assert_eq!(PERIOD_BOUNDARY, 30);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::{WideBitset, WideLayout};

/// Word type for all bit columns and selection masks
pub type MaskWord = u32;

/// Number of bit positions in one `MaskWord`
pub const WORD_BITS: u32 = MaskWord::BITS;

/// Boundary between the low and high words of the period bitset
///
/// Period positions `[0, PERIOD_BOUNDARY)` live in the low word; positions
/// `[PERIOD_BOUNDARY, PERIOD_BOUNDARY + WORD_BITS)` live in the high word,
/// shifted down by `PERIOD_BOUNDARY`.
pub const PERIOD_BOUNDARY: u32 = 30;

/// Number of words in the period bitset
pub const PERIOD_WORDS: usize = 2;

/// Word layout shared by period index construction and period masks
pub const PERIOD_LAYOUT: WideLayout<PERIOD_WORDS> = WideLayout::split(PERIOD_BOUNDARY);

/// Word layout for single-word attributes
pub const SINGLE_LAYOUT: WideLayout<1> = WideLayout::single();

/// Period bitset (low word, high word)
pub type PeriodBits = WideBitset<PERIOD_WORDS>;

/// Categorical attributes indexed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// Standard year of study
    Year,
    /// Academic term
    Term,
    /// Weekday and period slot
    Period,
    /// Class format (in person, online, ...)
    Format,
}

impl Attribute {
    /// All attributes in catalog column order
    pub const ALL: [Attribute; 4] = [
        Attribute::Year,
        Attribute::Term,
        Attribute::Period,
        Attribute::Format,
    ];

    /// Lowercase name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Year => "year",
            Attribute::Term => "term",
            Attribute::Period => "period",
            Attribute::Format => "format",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display text for each attribute, as shipped with the catalog
///
/// These strings are never filtered on; they exist so a caller can render a
/// result row without decoding bit columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLabels {
    /// Year text, e.g. "1 - 2"
    pub year: String,
    /// Term text, e.g. "Spring A"
    pub term: String,
    /// Period text, e.g. "Mon1,2"
    pub period: String,
    /// Format text, e.g. "In person"
    pub format: String,
}

/// A single course listing
///
/// Bit positions are only meaningful relative to the category indexes of the
/// catalog the record belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course identifier, prefix matched case-insensitively
    pub identifier: String,

    /// Course title, substring matched case-insensitively
    pub title: String,

    /// Credit value (display only)
    pub credits: f32,

    /// Display strings for the categorical attributes
    #[serde(default)]
    pub display: DisplayLabels,

    /// Year membership bits
    pub year_bits: MaskWord,

    /// Term membership bits
    pub term_bits: MaskWord,

    /// Period membership bits for positions below `PERIOD_BOUNDARY`
    pub period_bits_low: MaskWord,

    /// Period membership bits for positions at or above `PERIOD_BOUNDARY`
    pub period_bits_high: MaskWord,

    /// Class format membership bits
    pub format_bits: MaskWord,
}

impl CourseRecord {
    /// Create a record with no attribute bits set
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            credits: 0.0,
            display: DisplayLabels::default(),
            year_bits: 0,
            term_bits: 0,
            period_bits_low: 0,
            period_bits_high: 0,
            format_bits: 0,
        }
    }

    /// Set the credit value
    pub fn with_credits(mut self, credits: f32) -> Self {
        self.credits = credits;
        self
    }

    /// Set the display labels
    pub fn with_display(mut self, display: DisplayLabels) -> Self {
        self.display = display;
        self
    }

    /// Set the year bits
    pub fn with_year_bits(mut self, bits: MaskWord) -> Self {
        self.year_bits = bits;
        self
    }

    /// Set the term bits
    pub fn with_term_bits(mut self, bits: MaskWord) -> Self {
        self.term_bits = bits;
        self
    }

    /// Set the period bits (low word, high word)
    pub fn with_period_bits(mut self, low: MaskWord, high: MaskWord) -> Self {
        self.period_bits_low = low;
        self.period_bits_high = high;
        self
    }

    /// Set the format bits
    pub fn with_format_bits(mut self, bits: MaskWord) -> Self {
        self.format_bits = bits;
        self
    }

    /// Period membership as a two-word bitset
    #[inline]
    pub fn period_bits(&self) -> PeriodBits {
        WideBitset::from_words([self.period_bits_low, self.period_bits_high])
    }

    /// Bit column for a single-word attribute
    ///
    /// Returns `None` for `Attribute::Period`, which spans two words.
    pub fn bits(&self, attribute: Attribute) -> Option<MaskWord> {
        match attribute {
            Attribute::Year => Some(self.year_bits),
            Attribute::Term => Some(self.term_bits),
            Attribute::Format => Some(self.format_bits),
            Attribute::Period => None,
        }
    }
}
