//! Shuffling and train/val/test partitioning.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// Name of a dataset partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitName {
    Train,
    Val,
    Test,
    /// Single unsplit bucket written to the flat `images/` + `labels/` pair.
    All,
}

impl SplitName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Val => "val",
            SplitName::Test => "test",
            SplitName::All => "all",
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Split ratios. They are expected, but not required, to sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            val: 0.1,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Self {
        Self { train, val, test }
    }

    pub fn sum(&self) -> f64 {
        self.train + self.val + self.test
    }

    /// Reject ratios that cannot be turned into counts.
    pub fn check(&self) -> Result<(), String> {
        for (name, value) in [
            ("train", self.train),
            ("val", self.val),
            ("test", self.test),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{} ratio must be a finite, non-negative number (got {})",
                    name, value
                ));
            }
        }
        Ok(())
    }
}

/// Number of records assigned to each split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitSizes {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

impl SplitSizes {
    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

/// Compute split sizes for `total` records.
///
/// Train and val counts are truncated; test takes whatever remains, so the
/// test ratio itself only matters through the other two. Counts are clamped
/// so they never exceed `total`.
pub fn compute_split_sizes(total: usize, ratios: &SplitRatios) -> SplitSizes {
    let train = ((total as f64 * ratios.train) as usize).min(total);
    let val = ((total as f64 * ratios.val) as usize).min(total - train);

    SplitSizes {
        train,
        val,
        test: total - train - val,
    }
}

/// Uniformly shuffle items in place, reproducibly when a seed is given.
pub fn shuffle_records<T>(items: &mut [T], seed: Option<u64>) {
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        items.shuffle(&mut rng);
    }
}

/// Partition already shuffled items into named splits, preserving order.
///
/// With `split_data == false` everything lands in a single [`SplitName::All`]
/// bucket. Otherwise the result always holds train, val and test (some may
/// be empty), in that order.
pub fn partition<T>(
    items: Vec<T>,
    split_data: bool,
    ratios: &SplitRatios,
) -> Vec<(SplitName, Vec<T>)> {
    if !split_data {
        return vec![(SplitName::All, items)];
    }

    let sizes = compute_split_sizes(items.len(), ratios);
    let mut rest = items;
    let mut val_and_test = rest.split_off(sizes.train);
    let test = val_and_test.split_off(sizes.val);

    vec![
        (SplitName::Train, rest),
        (SplitName::Val, val_and_test),
        (SplitName::Test, test),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ratios_truncate_and_give_remainder_to_test() {
        let sizes = compute_split_sizes(15, &SplitRatios::default());
        assert_eq!(
            sizes,
            SplitSizes {
                train: 12,
                val: 1,
                test: 2
            }
        );
    }

    #[test]
    fn zero_records_yield_empty_splits() {
        let sizes = compute_split_sizes(0, &SplitRatios::default());
        assert_eq!(sizes, SplitSizes::default());
    }

    #[test]
    fn oversized_ratios_are_clamped() {
        let sizes = compute_split_sizes(10, &SplitRatios::new(0.9, 0.5, 0.0));
        assert_eq!(sizes.train, 9);
        assert_eq!(sizes.val, 1);
        assert_eq!(sizes.test, 0);
        assert_eq!(sizes.total(), 10);
    }

    #[test]
    fn check_rejects_negative_and_nan() {
        assert!(SplitRatios::new(-0.1, 0.5, 0.6).check().is_err());
        assert!(SplitRatios::new(f64::NAN, 0.5, 0.5).check().is_err());
        assert!(SplitRatios::default().check().is_ok());
    }

    #[test]
    fn partition_preserves_order_within_splits() {
        let items: Vec<u32> = (0..10).collect();
        let splits = partition(items, true, &SplitRatios::new(0.5, 0.3, 0.2));

        assert_eq!(splits[0], (SplitName::Train, vec![0, 1, 2, 3, 4]));
        assert_eq!(splits[1], (SplitName::Val, vec![5, 6, 7]));
        assert_eq!(splits[2], (SplitName::Test, vec![8, 9]));
    }

    #[test]
    fn partition_without_split_uses_single_bucket() {
        let splits = partition(vec![1, 2, 3], false, &SplitRatios::default());
        assert_eq!(splits, vec![(SplitName::All, vec![1, 2, 3])]);
    }

    #[test]
    fn seeded_shuffle_is_deterministic() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();
        shuffle_records(&mut a, Some(42));
        shuffle_records(&mut b, Some(42));
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }
}
