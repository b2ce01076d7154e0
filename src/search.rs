//! Shared Course Search Handle
//!
//! `CourseSearch` owns the currently loaded catalog behind an `Arc` so that
//! any number of searches can run against a snapshot while a reload swaps in
//! a fresh catalog. Searches never block each other; the lock is held only
//! long enough to clone the `Arc`.
//!
//! # Example
//!
//! ```rust
//! use course_filter::catalog::{CatalogBuilder, LabeledCourse, Vocabularies};
//! use course_filter::query::FilterCriteria;
//! use course_filter::search::CourseSearch;
//!
//! let search = CourseSearch::new();
//! assert!(search.search(&FilterCriteria::new()).is_empty());
//!
//! let vocabularies = Vocabularies { years: vec!["1".into()], ..Vocabularies::default() };
//! let mut builder = CatalogBuilder::new(&vocabularies).unwrap();
//! builder.push(LabeledCourse::new("CS101", "Intro").years(["1"])).unwrap();
//! search.install(builder.build());
//!
//! let result = search.search(&FilterCriteria::new().id_prefix("cs"));
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.iter().next().unwrap().title, "Intro");
//! ```

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::catalog::{self, Catalog, Vocabularies};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::query::{positions_parallel, FilterCriteria, DEFAULT_PARALLEL_THRESHOLD};
use crate::types::CourseRecord;

/// Thread-safe holder of the active catalog
#[derive(Debug)]
pub struct CourseSearch {
    /// Currently installed catalog (None until the first load)
    catalog: RwLock<Option<Arc<Catalog>>>,

    /// Minimum record count for parallel filtering
    parallel_threshold: usize,
}

impl CourseSearch {
    /// Create a handle with no catalog loaded
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(None),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Create a handle using search settings from configuration
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new().with_parallel_threshold(config.parallel_threshold)
    }

    /// Override the parallel filtering threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Replace the active catalog, returning the installed snapshot
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        *self.catalog.write() = Some(Arc::clone(&catalog));
        catalog
    }

    /// Load a catalog file and install it
    ///
    /// On failure the previously installed catalog stays active.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<Arc<Catalog>> {
        let path = path.as_ref();
        match catalog::load_from_path(path) {
            Ok(catalog) => Ok(self.install(catalog)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load catalog");
                Err(e)
            },
        }
    }

    /// Drop the active catalog
    pub fn clear(&self) {
        *self.catalog.write() = None;
    }

    /// True once a catalog has been installed
    pub fn is_loaded(&self) -> bool {
        self.catalog.read().is_some()
    }

    /// Snapshot of the active catalog
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog.read().clone()
    }

    /// Vocabularies of the active catalog (empty when nothing is loaded)
    pub fn vocabularies(&self) -> Vocabularies {
        self.catalog()
            .map(|c| c.vocabularies())
            .unwrap_or_default()
    }

    /// Run a search against the active catalog
    ///
    /// Returns an empty result when no catalog is loaded.
    pub fn search(&self, criteria: &FilterCriteria) -> SearchResult {
        let Some(catalog) = self.catalog() else {
            debug!("search before catalog load, returning no results");
            return SearchResult::empty();
        };

        let compiled = catalog.compile(criteria);
        let rows = positions_parallel(catalog.records(), &compiled, self.parallel_threshold);

        SearchResult {
            catalog: Some(catalog),
            rows,
        }
    }
}

impl Default for CourseSearch {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Search Result
// ============================================================================

/// Matching rows of one catalog snapshot
///
/// Holds the snapshot it was computed from, so it stays valid across
/// reloads and never copies record contents.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    catalog: Option<Arc<Catalog>>,
    rows: Vec<usize>,
}

impl SearchResult {
    /// A result with no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of matching records
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if nothing matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Catalog positions of the matching records, ascending
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Catalog snapshot the result refers to
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        self.catalog.as_ref()
    }

    /// Keep at most `max` rows (0 keeps everything)
    pub fn truncate(&mut self, max: usize) {
        if max > 0 {
            self.rows.truncate(max);
        }
    }

    /// Matching records in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CourseRecord> + '_ {
        let records: &[CourseRecord] = self
            .catalog
            .as_deref()
            .map(Catalog::records)
            .unwrap_or(&[]);
        self.rows.iter().filter_map(move |&i| records.get(i))
    }
}
