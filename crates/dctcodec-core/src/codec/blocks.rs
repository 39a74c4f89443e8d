//! Per-block fan-out.
//!
//! Blocks are independent, so each one is computed by a pure function of its
//! index. With the `parallel` feature the indices are spread over the rayon
//! pool; either way results come back in index order, which is the
//! row-major order the container format requires.

/// Compute `f(index)` for every index in `0..count`, preserving order.
#[cfg(feature = "parallel")]
pub(crate) fn map_blocks<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;

    (0..count).into_par_iter().map(f).collect()
}

/// Compute `f(index)` for every index in `0..count`, preserving order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_blocks<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_in_index_order() {
        let out = map_blocks(1000, |i| i * 2);
        assert_eq!(out.len(), 1000);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i * 2));
    }

    #[test]
    fn test_empty_range() {
        let out: Vec<usize> = map_blocks(0, |i| i);
        assert!(out.is_empty());
    }
}
