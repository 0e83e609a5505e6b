//! Deterministic input sequences for tests and benchmarks
//!
//! ```rust
//! use addressable_heaps::datasets::DataSet;
//!
//! assert_eq!(DataSet::Increasing.generate(4), vec![0, 1, 2, 3]);
//! assert_eq!(DataSet::Decreasing.generate(4), vec![4, 3, 2, 1]);
//! assert_eq!(DataSet::Random.generate(100), DataSet::Random.generate(100));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Seed used by [`DataSet::generate`]
pub const DEFAULT_SEED: u64 = 987_711;

/// Shape of a generated input sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSet {
    /// `count` values drawn uniformly from `0..10 * count`
    Random,
    /// `0, 1, ..., count - 1`
    Increasing,
    /// `count, count - 1, ..., 1`
    Decreasing,
}

impl DataSet {
    /// Every dataset kind
    pub const ALL: [DataSet; 3] = [DataSet::Random, DataSet::Increasing, DataSet::Decreasing];

    pub fn name(&self) -> &'static str {
        match self {
            DataSet::Random => "random",
            DataSet::Increasing => "increasing",
            DataSet::Decreasing => "decreasing",
        }
    }

    /// Generates `count` values using [`DEFAULT_SEED`]
    pub fn generate(&self, count: usize) -> Vec<i64> {
        self.generate_with_seed(count, DEFAULT_SEED)
    }

    /// Generates `count` values; only [`DataSet::Random`] uses the seed
    pub fn generate_with_seed(&self, count: usize, seed: u64) -> Vec<i64> {
        let count = count as i64;
        match self {
            DataSet::Random => {
                let mut rng = StdRng::seed_from_u64(seed);
                let max = count.saturating_mul(10).max(1);
                (0..count).map(|_| rng.gen_range(0..max)).collect()
            }
            DataSet::Increasing => (0..count).collect(),
            DataSet::Decreasing => (1..=count).rev().collect(),
        }
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
