//! Parallel filtering for large catalogs
//!
//! The row predicate reads only immutable data, so records can be tested on
//! rayon's thread pool without coordination. Below the threshold the
//! sequential path is used; both paths return records in input order.
//!
//! # Example
//!
//! ```rust
//! use course_filter::catalog::{CatalogIndexes, Vocabularies};
//! use course_filter::query::{filter_parallel, CompiledFilter, FilterCriteria};
//! use course_filter::types::CourseRecord;
//!
//! let indexes = CatalogIndexes::build(&Vocabularies::default()).unwrap();
//! let compiled = CompiledFilter::compile(&FilterCriteria::new().id_prefix("cs"), &indexes);
//!
//! let records: Vec<CourseRecord> = (0..10_000)
//!     .map(|i| CourseRecord::new(if i % 2 == 0 { "CS1" } else { "MA1" }, "t"))
//!     .collect();
//!
//! let result = filter_parallel(&records, &compiled, 1024);
//! assert_eq!(result.len(), 5_000);
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::query::filter::CompiledFilter;
use crate::types::CourseRecord;

/// Default minimum record count before filtering goes parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Filter records, in parallel when there are at least `threshold` of them
///
/// A threshold of 0 always runs in parallel.
pub fn filter_parallel<'a>(
    records: &'a [CourseRecord],
    compiled: &CompiledFilter,
    threshold: usize,
) -> Vec<&'a CourseRecord> {
    if records.len() < threshold || compiled.matches_all() {
        return compiled.filter(records);
    }

    let result: Vec<&CourseRecord> = records
        .par_iter()
        .filter(|r| compiled.matches(r))
        .collect();

    debug!(
        total = records.len(),
        matched = result.len(),
        "parallel filter complete"
    );
    result
}

/// Positions of matching records, in parallel above `threshold`
pub fn positions_parallel(
    records: &[CourseRecord],
    compiled: &CompiledFilter,
    threshold: usize,
) -> Vec<usize> {
    if records.len() < threshold || compiled.matches_all() {
        return compiled.positions(records);
    }

    records
        .par_iter()
        .enumerate()
        .filter(|(_, r)| compiled.matches(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogIndexes, Vocabularies};
    use crate::query::FilterCriteria;

    fn indexes() -> CatalogIndexes {
        CatalogIndexes::build(&Vocabularies {
            years: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            ..Vocabularies::default()
        })
        .unwrap()
    }

    fn records(n: usize) -> Vec<CourseRecord> {
        (0..n)
            .map(|i| {
                CourseRecord::new(format!("C{:05}", i), format!("Course {}", i))
                    .with_year_bits(1 << (i % 4))
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let records = records(20_000);
        let compiled = CompiledFilter::compile(&FilterCriteria::new().years(["2", "4"]), &indexes());

        let sequential = compiled.filter(&records);
        let parallel = filter_parallel(&records, &compiled, 0);

        assert_eq!(parallel.len(), 10_000);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_parallel_positions_in_order() {
        let records = records(10_000);
        let compiled = CompiledFilter::compile(&FilterCriteria::new().years(["3"]), &indexes());

        let positions = positions_parallel(&records, &compiled, 0);
        assert_eq!(positions, compiled.positions(&records));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_below_threshold_runs_sequential() {
        let records = records(10);
        let compiled = CompiledFilter::compile(&FilterCriteria::new().title("course 1"), &indexes());

        let result = filter_parallel(&records, &compiled, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].identifier, "C00001");
    }
}
