//! Seeded train/test partitioning of a labelled dataset.
//!
//! The dataset is shuffled with `linfa`'s `Dataset::shuffle` under a fixed
//! seed. The first `ceil(n * test_fraction)` shuffled rows become the
//! held-out set and the rest the training set, so the same seed and data
//! always give the same partition.

use linfa::Dataset;
use ndarray::{Ix1, s};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Encoded rows with one class index per row
pub type LabelledDataset = Dataset<f64, usize, Ix1>;

/// Rows held out for `test_fraction` of `n`
pub fn holdout_size(n: usize, test_fraction: f64) -> usize {
    (n as f64 * test_fraction.clamp(0.0, 1.0)).ceil() as usize
}

/// Shuffle and split into `(train, test)`, or `None` if either side would be empty
pub fn shuffle_split(
    dataset: &LabelledDataset,
    test_fraction: f64,
    seed: u64,
) -> Option<(LabelledDataset, LabelledDataset)> {
    let n = dataset.records().nrows();
    let n_test = holdout_size(n, test_fraction);
    if n_test == 0 || n_test >= n {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let shuffled = dataset.shuffle(&mut rng);
    let (records, targets) = (shuffled.records(), shuffled.targets());

    let test = Dataset::new(
        records.slice(s![..n_test, ..]).to_owned(),
        targets.slice(s![..n_test]).to_owned(),
    );
    let train = Dataset::new(
        records.slice(s![n_test.., ..]).to_owned(),
        targets.slice(s![n_test..]).to_owned(),
    );
    Some((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    /// Row `i` has features `[i, 2i]` and label `i`
    fn indexed_dataset(n: usize) -> LabelledDataset {
        let records = Array2::from_shape_fn((n, 2), |(i, j)| (i * (j + 1)) as f64);
        let targets = Array1::from_iter(0..n);
        Dataset::new(records, targets)
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = shuffle_split(&indexed_dataset(10), 0.2, 42).unwrap();
        assert_eq!(test.records().nrows(), 2);
        assert_eq!(train.records().nrows(), 8);

        // 0.2 * 7 = 1.4 rounds up
        let (train, test) = shuffle_split(&indexed_dataset(7), 0.2, 42).unwrap();
        assert_eq!(test.records().nrows(), 2);
        assert_eq!(train.records().nrows(), 5);
    }

    #[test]
    fn test_split_is_a_partition_and_rows_stay_paired() {
        let (train, test) = shuffle_split(&indexed_dataset(25), 0.2, 7).unwrap();

        let mut all: Vec<usize> = train.targets().iter().chain(test.targets()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());

        // Features travel with their label through the shuffle
        for (row, &label) in train.records().rows().into_iter().zip(train.targets()) {
            assert_eq!(row[0], label as f64);
            assert_eq!(row[1], (2 * label) as f64);
        }
    }

    #[test]
    fn test_same_seed_same_split() {
        let dataset = indexed_dataset(30);
        let (_, a) = shuffle_split(&dataset, 0.2, 42).unwrap();
        let (_, b) = shuffle_split(&dataset, 0.2, 42).unwrap();
        assert_eq!(a.targets(), b.targets());
    }

    #[test]
    fn test_too_small_to_split() {
        assert!(shuffle_split(&indexed_dataset(0), 0.2, 42).is_none());
        assert!(shuffle_split(&indexed_dataset(1), 0.2, 42).is_none());
        assert!(shuffle_split(&indexed_dataset(5), 0.0, 42).is_none());

        let (train, test) = shuffle_split(&indexed_dataset(2), 0.2, 42).unwrap();
        assert_eq!(train.records().nrows(), 1);
        assert_eq!(test.records().nrows(), 1);
    }
}
