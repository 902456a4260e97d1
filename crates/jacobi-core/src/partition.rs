//! Contiguous row partitioning across workers.

use std::ops::Range;

use crate::solver::SolverError;

/// Split `order` rows into `n_threads` contiguous `[from, to)` ranges.
///
/// Every worker gets `order / n_threads` rows and the last one also takes the
/// `order % n_threads` remainder. When `n_threads > order` the leading ranges
/// are empty and the last range covers every row.
pub fn plan(order: usize, n_threads: usize) -> Result<Vec<Range<usize>>, SolverError> {
    if n_threads == 0 {
        return Err(SolverError::InvalidThreadCount(n_threads));
    }

    let step = order / n_threads;
    let mut ranges: Vec<Range<usize>> = Vec::new();
    ranges
        .try_reserve_exact(n_threads)
        .map_err(|source| SolverError::Allocation {
            what: "row partition",
            source,
        })?;
    ranges.extend((0..n_threads).map(|i| i * step..(i + 1) * step));
    if let Some(last) = ranges.last_mut() {
        last.end += order % n_threads;
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], order: usize) {
        let mut next = 0;
        for r in ranges {
            assert_eq!(r.start, next, "gap or overlap at {:?}", r);
            assert!(r.end >= r.start);
            next = r.end;
        }
        assert_eq!(next, order);
    }

    #[test]
    fn test_even_split() {
        for &(order, n) in &[(12, 1), (12, 3), (12, 4), (12, 12), (100, 5)] {
            let ranges = plan(order, n).unwrap();
            assert_eq!(ranges.len(), n);
            assert_covers(&ranges, order);
            assert!(ranges.iter().all(|r| r.len() == order / n));
        }
    }

    #[test]
    fn test_remainder_goes_to_last() {
        let ranges = plan(10, 3).unwrap();
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);

        let ranges = plan(101, 4).unwrap();
        assert_covers(&ranges, 101);
        assert!(ranges[..3].iter().all(|r| r.len() == 25));
        assert_eq!(ranges[3].len(), 26);
    }

    #[test]
    fn test_more_threads_than_rows() {
        let ranges = plan(3, 5).unwrap();
        assert_eq!(ranges.len(), 5);
        assert!(ranges[..4].iter().all(|r| r.is_empty()));
        assert_eq!(ranges[4], 0..3);
        assert_covers(&ranges, 3);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(plan(4, 0), Err(SolverError::InvalidThreadCount(0))));
    }

    #[test]
    fn test_unallocatable_thread_count_is_an_error() {
        assert!(matches!(
            plan(4, usize::MAX),
            Err(SolverError::Allocation { what: "row partition", .. })
        ));
    }
}
