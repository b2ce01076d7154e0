//! Course Filter - Multi-criteria course catalog search
//!
//! This library filters an in-memory course catalog by:
//! - Case-insensitive identifier prefix and title substring
//! - Year, term and class format selections, each a single-word bitmask
//! - Weekday/period selections, a two-word bitmask split at a fixed boundary
//!
//! Criteria combine with AND; labels selected within one attribute combine
//! with OR. Category indexes are built once per loaded catalog and filtering
//! is a pure read, so a catalog can be searched from many threads at once.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod index;
pub mod query;
pub mod types;

/// Configuration management with TOML support
pub mod config;

/// Shared search handle holding the active catalog
pub mod search;

// Re-export main types
pub use catalog::{Catalog, CatalogBuilder, CatalogIndexes, LabeledCourse, Vocabularies};
pub use error::{CatalogError, Error, Result};
pub use query::{filter, CompiledFilter, FilterCriteria};
pub use search::{CourseSearch, SearchResult};
pub use types::{Attribute, CourseRecord, MaskWord, PERIOD_BOUNDARY};
