//! Run-length coding of value sequences.
//!
//! A run list collapses each maximal stretch of equal adjacent values into a
//! single `(value, count)` pair. Decoding expands the pairs back, so
//! `decode(&encode(s)) == s` for every finite sequence, including the empty one.

use serde::{Deserialize, Serialize};

/// One `(value, count)` pair of a run list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run<T> {
    pub value: T,
    pub count: u32,
}

impl<T> Run<T> {
    pub fn new(value: T, count: u32) -> Self {
        Self { value, count }
    }
}

/// Collapse maximal runs of identical adjacent values.
pub fn encode<T: Copy + PartialEq>(seq: &[T]) -> Vec<Run<T>> {
    let mut runs: Vec<Run<T>> = Vec::new();
    for &value in seq {
        match runs.last_mut() {
            Some(run) if run.value == value => run.count += 1,
            _ => runs.push(Run::new(value, 1)),
        }
    }
    runs
}

/// Expand a run list back into the sequence it encodes.
pub fn decode<T: Copy>(runs: &[Run<T>]) -> Vec<T> {
    let mut out = Vec::with_capacity(run_length_sum(runs) as usize);
    for run in runs {
        out.extend(std::iter::repeat(run.value).take(run.count as usize));
    }
    out
}

/// Total number of values a run list expands to.
pub fn run_length_sum<T>(runs: &[Run<T>]) -> u64 {
    runs.iter().map(|run| u64::from(run.count)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        let runs = encode::<i16>(&[]);
        assert!(runs.is_empty());
        assert!(decode(&runs).is_empty());
    }

    #[test]
    fn test_encode_single() {
        let runs = encode(&[7i16]);
        assert_eq!(runs, vec![Run::new(7, 1)]);
        assert_eq!(decode(&runs), vec![7]);
    }

    #[test]
    fn test_encode_repeated() {
        let runs = encode(&[5i16, 5, 5, 5]);
        assert_eq!(runs, vec![Run::new(5, 4)]);
        assert_eq!(decode(&runs), vec![5, 5, 5, 5]);
    }

    #[test]
    fn test_encode_no_repeats() {
        let seq = [1i16, 2, 3, -1];
        let runs = encode(&seq);
        assert_eq!(runs.len(), seq.len());
        assert!(runs.iter().all(|run| run.count == 1));
        assert_eq!(decode(&runs), seq.to_vec());
    }

    #[test]
    fn test_encode_mixed() {
        let runs = encode(&[-26i16, -3, 0, 0, -3, -3, 0, 0, 0]);
        assert_eq!(
            runs,
            vec![
                Run::new(-26, 1),
                Run::new(-3, 1),
                Run::new(0, 2),
                Run::new(-3, 2),
                Run::new(0, 3),
            ]
        );
    }

    #[test]
    fn test_run_length_sum() {
        let runs = encode(&[0i16; 64]);
        assert_eq!(runs.len(), 1);
        assert_eq!(run_length_sum(&runs), 64);
    }

    #[test]
    fn test_decode_zero_count_run() {
        let runs = vec![Run::new(9i16, 0), Run::new(1, 2)];
        assert_eq!(decode(&runs), vec![1, 1]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: decode(encode(s)) == s for any sequence.
        #[test]
        fn prop_roundtrip(seq in prop::collection::vec(-4i16..=4, 0..200)) {
            prop_assert_eq!(decode(&encode(&seq)), seq);
        }

        /// Property: adjacent runs never share a value and no run is empty.
        #[test]
        fn prop_runs_are_maximal(seq in prop::collection::vec(-2i16..=2, 0..200)) {
            let runs = encode(&seq);
            prop_assert!(runs.iter().all(|run| run.count > 0));
            for pair in runs.windows(2) {
                prop_assert_ne!(pair[0].value, pair[1].value);
            }
            prop_assert_eq!(run_length_sum(&runs), seq.len() as u64);
        }
    }
}
