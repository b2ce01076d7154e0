//! Search over a loaded catalog
//!
//! ```text
//! FilterCriteria ──► mask builder ──► CompiledFilter ──► row predicate ──► records
//!                      ▲
//!                CatalogIndexes
//! ```
//!
//! Compilation happens once per search; the predicate then only performs
//! word-sized AND tests plus the two text checks.
//!
//! # Example
//!
//! ```rust
//! use course_filter::catalog::{CatalogIndexes, Vocabularies};
//! use course_filter::query::{filter, FilterCriteria};
//! use course_filter::types::CourseRecord;
//!
//! let indexes = CatalogIndexes::build(&Vocabularies {
//!     years: vec!["Y1".into(), "Y2".into()],
//!     ..Vocabularies::default()
//! })
//! .unwrap();
//!
//! let records = vec![
//!     CourseRecord::new("CS101", "Intro").with_year_bits(0b01),
//!     CourseRecord::new("CS102", "Advanced").with_year_bits(0b10),
//! ];
//!
//! let result = filter(&records, &FilterCriteria::new().years(["Y2"]), &indexes);
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].identifier, "CS102");
//! ```

pub mod criteria;
pub mod filter;
pub mod mask;
pub mod parallel;

// Re-export main types
pub use criteria::FilterCriteria;
pub use filter::{filter, CompiledFilter};
pub use mask::{build_mask, build_period_masks, build_wide_mask};
pub use parallel::{filter_parallel, positions_parallel, DEFAULT_PARALLEL_THRESHOLD};
