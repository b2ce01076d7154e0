//! Course Catalog
//!
//! A `Catalog` is the immutable collection of course records together with
//! the four category indexes derived from the catalog's label vocabularies.
//! Both are built once at load time and only read afterwards.
//!
//! Records can arrive with pre-computed bit columns (see [`loader`]) or be
//! encoded from labels with [`CatalogBuilder`], which uses the very indexes
//! and word layouts that selection masks are later built from.
//!
//! # Example
//!
//! ```rust
//! use course_filter::catalog::{CatalogBuilder, LabeledCourse, Vocabularies};
//! use course_filter::query::FilterCriteria;
//!
//! let vocabularies = Vocabularies {
//!     years: vec!["1".into(), "2".into()],
//!     terms: vec!["Spring".into(), "Fall".into()],
//!     periods: vec!["Mon1".into(), "Mon2".into()],
//!     formats: vec!["In person".into(), "Online".into()],
//! };
//!
//! let mut builder = CatalogBuilder::new(&vocabularies).unwrap();
//! builder
//!     .push(LabeledCourse::new("CS101", "Intro").years(["1"]).periods(["Mon1"]))
//!     .unwrap();
//! builder
//!     .push(LabeledCourse::new("CS201", "Systems").years(["2"]).formats(["Online"]))
//!     .unwrap();
//! let catalog = builder.build();
//!
//! let result = catalog.search(&FilterCriteria::new().years(["2"]));
//! assert_eq!(result[0].identifier, "CS201");
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;
use crate::index::{CategoryIndex, WideBitset, WideLayout};
use crate::query::{filter_parallel, CompiledFilter, FilterCriteria};
use crate::types::{
    Attribute, CourseRecord, DisplayLabels, MaskWord, PERIOD_LAYOUT, SINGLE_LAYOUT,
};

pub use loader::{load_from_path, load_from_reader, parse_str};

// ============================================================================
// Vocabularies
// ============================================================================

/// Ordered label vocabularies, one per attribute
///
/// Label order defines bit positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabularies {
    /// Year labels
    pub years: Vec<String>,
    /// Term labels
    pub terms: Vec<String>,
    /// Period labels
    pub periods: Vec<String>,
    /// Format labels
    pub formats: Vec<String>,
}

impl Vocabularies {
    /// Labels for an attribute
    pub fn labels(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Year => &self.years,
            Attribute::Term => &self.terms,
            Attribute::Period => &self.periods,
            Attribute::Format => &self.formats,
        }
    }
}

// ============================================================================
// Catalog Indexes
// ============================================================================

/// The four category indexes of a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIndexes {
    /// Year index
    pub year: CategoryIndex,
    /// Term index
    pub term: CategoryIndex,
    /// Period index (positions span the two-word period layout)
    pub period: CategoryIndex,
    /// Format index
    pub format: CategoryIndex,
}

impl CatalogIndexes {
    /// Build all four indexes
    ///
    /// Fails on duplicate labels or on vocabularies larger than their
    /// attribute's bit capacity.
    pub fn build(vocabularies: &Vocabularies) -> Result<Self, CatalogError> {
        let single = SINGLE_LAYOUT.capacity();

        Ok(Self {
            year: CategoryIndex::build(Attribute::Year, &vocabularies.years, single)?,
            term: CategoryIndex::build(Attribute::Term, &vocabularies.terms, single)?,
            period: CategoryIndex::build(
                Attribute::Period,
                &vocabularies.periods,
                PERIOD_LAYOUT.capacity(),
            )?,
            format: CategoryIndex::build(Attribute::Format, &vocabularies.formats, single)?,
        })
    }

    /// Index for an attribute
    pub fn get(&self, attribute: Attribute) -> &CategoryIndex {
        match attribute {
            Attribute::Year => &self.year,
            Attribute::Term => &self.term,
            Attribute::Period => &self.period,
            Attribute::Format => &self.format,
        }
    }

    /// Rebuild the vocabularies these indexes came from
    pub fn vocabularies(&self) -> Vocabularies {
        Vocabularies {
            years: self.year.labels().to_vec(),
            terms: self.term.labels().to_vec(),
            periods: self.period.labels().to_vec(),
            formats: self.format.labels().to_vec(),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable records plus their category indexes
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CourseRecord>,
    indexes: CatalogIndexes,
}

impl Catalog {
    /// Build a catalog from records with pre-computed bit columns
    pub fn new(
        records: Vec<CourseRecord>,
        vocabularies: &Vocabularies,
    ) -> Result<Self, CatalogError> {
        let indexes = CatalogIndexes::build(vocabularies)?;
        Ok(Self::from_parts(records, indexes))
    }

    /// Assemble a catalog from already-built indexes
    pub fn from_parts(records: Vec<CourseRecord>, indexes: CatalogIndexes) -> Self {
        info!(
            records = records.len(),
            years = indexes.year.len(),
            terms = indexes.term.len(),
            periods = indexes.period.len(),
            formats = indexes.format.len(),
            "catalog built"
        );
        Self { records, indexes }
    }

    /// All records in catalog order
    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    /// Category indexes
    pub fn indexes(&self) -> &CatalogIndexes {
        &self.indexes
    }

    /// Label vocabularies
    pub fn vocabularies(&self) -> Vocabularies {
        self.indexes.vocabularies()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the catalog has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compile criteria against this catalog's indexes
    pub fn compile(&self, criteria: &FilterCriteria) -> CompiledFilter {
        CompiledFilter::compile(criteria, &self.indexes)
    }

    /// Records matching the criteria, in catalog order
    pub fn search(&self, criteria: &FilterCriteria) -> Vec<&CourseRecord> {
        self.compile(criteria).filter(&self.records)
    }

    /// Same result as [`Catalog::search`], parallel above `threshold` records
    pub fn search_parallel(
        &self,
        criteria: &FilterCriteria,
        threshold: usize,
    ) -> Vec<&CourseRecord> {
        filter_parallel(&self.records, &self.compile(criteria), threshold)
    }

    /// Labels whose bits are set on a record, in vocabulary order
    pub fn labels_of(&self, record: &CourseRecord, attribute: Attribute) -> Vec<&str> {
        let index = self.indexes.get(attribute);
        let positions = match record.bits(attribute) {
            Some(bits) => WideBitset::from_words([bits]).positions(&SINGLE_LAYOUT),
            None => record.period_bits().positions(&PERIOD_LAYOUT),
        };

        positions
            .into_iter()
            .filter_map(|p| index.label(p))
            .collect()
    }
}

// ============================================================================
// Catalog Builder
// ============================================================================

/// A course described by labels rather than bit columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabeledCourse {
    /// Course identifier
    pub identifier: String,
    /// Course title
    pub title: String,
    /// Credit value
    pub credits: f32,
    /// Display labels
    pub display: DisplayLabels,
    /// Year labels
    pub years: Vec<String>,
    /// Term labels
    pub terms: Vec<String>,
    /// Period labels
    pub periods: Vec<String>,
    /// Format labels
    pub formats: Vec<String>,
}

impl LabeledCourse {
    /// Create a course with no labels
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the credit value
    pub fn credits(mut self, credits: f32) -> Self {
        self.credits = credits;
        self
    }

    /// Set the display labels
    pub fn display(mut self, display: DisplayLabels) -> Self {
        self.display = display;
        self
    }

    /// Set year labels
    pub fn years<I: IntoIterator<Item = S>, S: Into<String>>(mut self, labels: I) -> Self {
        self.years = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set term labels
    pub fn terms<I: IntoIterator<Item = S>, S: Into<String>>(mut self, labels: I) -> Self {
        self.terms = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set period labels
    pub fn periods<I: IntoIterator<Item = S>, S: Into<String>>(mut self, labels: I) -> Self {
        self.periods = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set format labels
    pub fn formats<I: IntoIterator<Item = S>, S: Into<String>>(mut self, labels: I) -> Self {
        self.formats = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Encodes labelled courses into records for one set of vocabularies
#[derive(Debug)]
pub struct CatalogBuilder {
    indexes: CatalogIndexes,
    records: Vec<CourseRecord>,
}

impl CatalogBuilder {
    /// Build the indexes for a new catalog
    pub fn new(vocabularies: &Vocabularies) -> Result<Self, CatalogError> {
        Ok(Self {
            indexes: CatalogIndexes::build(vocabularies)?,
            records: Vec::new(),
        })
    }

    /// Encode and append a course
    ///
    /// Unlike search selections, labels here must exist in the vocabulary.
    pub fn push(&mut self, course: LabeledCourse) -> Result<&mut Self, CatalogError> {
        let [year_bits] = self.encode(Attribute::Year, &course.years, &SINGLE_LAYOUT)?;
        let [term_bits] = self.encode(Attribute::Term, &course.terms, &SINGLE_LAYOUT)?;
        let [format_bits] = self.encode(Attribute::Format, &course.formats, &SINGLE_LAYOUT)?;
        let [low, high] = self.encode(Attribute::Period, &course.periods, &PERIOD_LAYOUT)?;

        self.records.push(
            CourseRecord::new(course.identifier, course.title)
                .with_credits(course.credits)
                .with_display(course.display)
                .with_year_bits(year_bits)
                .with_term_bits(term_bits)
                .with_period_bits(low, high)
                .with_format_bits(format_bits),
        );
        Ok(self)
    }

    /// Append a record whose bit columns are already encoded
    pub fn push_record(&mut self, record: CourseRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Number of records so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record has been added
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the catalog
    pub fn build(self) -> Catalog {
        Catalog::from_parts(self.records, self.indexes)
    }

    fn encode<const N: usize>(
        &self,
        attribute: Attribute,
        labels: &[String],
        layout: &WideLayout<N>,
    ) -> Result<[MaskWord; N], CatalogError> {
        let index = self.indexes.get(attribute);
        let mut bits = WideBitset::<N>::empty();

        for label in labels {
            let position = index
                .find(label)
                .ok_or_else(|| CatalogError::UnknownLabel {
                    attribute,
                    label: label.clone(),
                })?;
            // Index capacity equals layout capacity, so every position fits
            bits.insert(layout, position);
        }

        Ok(bits.into_words())
    }
}

// ============================================================================
// Tests
// ============================================================================
