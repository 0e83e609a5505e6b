//! Benchmark driver
//!
//! Fills one heap variant with a generated dataset, then times a sequence of
//! handle-directed operations against it:
//!
//! ```rust
//! use addressable_heaps::benchmark::{BenchmarkConfig, Operation, Order, Plan, Variant};
//! use addressable_heaps::datasets::DataSet;
//!
//! let report = BenchmarkConfig::default()
//!     .variant(Variant::Pairing)
//!     .dataset(DataSet::Decreasing)
//!     .count(1_000)
//!     .plan(Plan::Only(Operation::Decrease))
//!     .order(Order::Seeded)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(report.variant, "Pairing Heap");
//! assert_eq!(report.operations, 1_000);
//! ```

use crate::binary::BinaryHeap;
use crate::binomial::BinomialHeap;
use crate::datasets::{self, DataSet};
use crate::leftist::LeftistHeap;
use crate::pairing::PairingHeap;
use crate::skew::SkewHeap;
use crate::traits::{AddressableHeap, Heap, HeapError};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::{Duration, Instant};

/// Seed used to pick operations and target handles
pub const DEFAULT_SELECTION_SEED: u64 = 1_234_567;

/// Heap implementation to benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Binary,
    Binomial,
    Leftist,
    Skew,
    Pairing,
}

impl Variant {
    /// Every heap variant
    pub const ALL: [Variant; 5] = [
        Variant::Binary,
        Variant::Binomial,
        Variant::Leftist,
        Variant::Skew,
        Variant::Pairing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Binary => "Binary Heap",
            Variant::Binomial => "Binomial Heap",
            Variant::Leftist => "Leftist Heap",
            Variant::Skew => "Skew Heap",
            Variant::Pairing => "Pairing Heap",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Remove the minimum
    RemoveMin,
    /// Remove the targeted element through its handle
    Remove,
    /// Halve the targeted element's value
    Decrease,
    /// Double the targeted element's value
    Increase,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::RemoveMin,
        Operation::Remove,
        Operation::Decrease,
        Operation::Increase,
    ];
}

/// What the timed section consists of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Time the inserts themselves
    Insert,
    /// `count` operations of a single kind
    Only(Operation),
    /// `count` operations drawn uniformly from [`Operation::ALL`]
    Mixed,
}

/// How the target handle of each operation is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// The i-th operation targets live handle `i % live`
    RoundRobin,
    /// Each operation targets a live handle drawn from the selection seed
    Seeded,
}

/// Benchmark parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub variant: Variant,
    pub dataset: DataSet,
    /// Number of inserted elements, and of timed operations
    pub count: usize,
    pub plan: Plan,
    pub order: Order,
    pub dataset_seed: u64,
    pub selection_seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Binary,
            dataset: DataSet::Random,
            count: 10_000,
            plan: Plan::Only(Operation::Remove),
            order: Order::RoundRobin,
            dataset_seed: datasets::DEFAULT_SEED,
            selection_seed: DEFAULT_SELECTION_SEED,
        }
    }
}

impl BenchmarkConfig {
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn dataset(mut self, dataset: DataSet) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn dataset_seed(mut self, seed: u64) -> Self {
        self.dataset_seed = seed;
        self
    }

    pub fn selection_seed(mut self, seed: u64) -> Self {
        self.selection_seed = seed;
        self
    }

    /// Builds the configured heap and runs the benchmark on it
    pub fn run(&self) -> Result<Report, HeapError> {
        match self.variant {
            Variant::Binary => self.run_on(&mut BinaryHeap::new()),
            Variant::Binomial => self.run_on(&mut BinomialHeap::new()),
            Variant::Leftist => self.run_on(&mut LeftistHeap::new()),
            Variant::Skew => self.run_on(&mut SkewHeap::new()),
            Variant::Pairing => self.run_on(&mut PairingHeap::new()),
        }
    }

    /// Runs the benchmark on a caller-supplied (normally empty) heap
    pub fn run_on<H: AddressableHeap<i64>>(&self, heap: &mut H) -> Result<Report, HeapError> {
        let values = self.dataset.generate_with_seed(self.count, self.dataset_seed);
        debug!(
            "benchmark {}: {} {} values, {:?} in {:?} order",
            heap.name(),
            values.len(),
            self.dataset,
            self.plan,
            self.order
        );

        let report = if self.plan == Plan::Insert {
            let start = Instant::now();
            for value in values {
                heap.insert(value);
            }
            Report {
                variant: heap.name(),
                operations: self.count,
                elapsed: start.elapsed(),
            }
        } else {
            let mut handles: Vec<H::Handle> =
                values.into_iter().map(|value| heap.insert(value)).collect();
            let mut rng = StdRng::seed_from_u64(self.selection_seed);
            let operations = self.operations(&mut rng);

            let start = Instant::now();
            let performed = self.apply(heap, &mut handles, &operations, &mut rng)?;
            Report {
                variant: heap.name(),
                operations: performed,
                elapsed: start.elapsed(),
            }
        };

        info!("{}", report);
        Ok(report)
    }

    fn operations(&self, rng: &mut StdRng) -> Vec<Operation> {
        match self.plan {
            Plan::Insert => Vec::new(),
            Plan::Only(operation) => vec![operation; self.count],
            Plan::Mixed => (0..self.count)
                .map(|_| Operation::ALL[rng.gen_range(0..Operation::ALL.len())])
                .collect(),
        }
    }

    /// Applies `operations` in order, returning how many ran
    ///
    /// Handles of elements taken by `RemoveMin` stay in `handles` until an
    /// operation trips over them; they are dropped then and the operation is
    /// retargeted. The run stops early once the heap is empty.
    fn apply<H: AddressableHeap<i64>>(
        &self,
        heap: &mut H,
        handles: &mut Vec<H::Handle>,
        operations: &[Operation],
        rng: &mut StdRng,
    ) -> Result<usize, HeapError> {
        let mut performed = 0;

        for (step, &operation) in operations.iter().enumerate() {
            if heap.is_empty() {
                break;
            }
            if operation == Operation::RemoveMin {
                heap.remove_min()?;
                performed += 1;
                continue;
            }

            loop {
                if handles.is_empty() {
                    return Ok(performed);
                }
                let index = match self.order {
                    Order::RoundRobin => step % handles.len(),
                    Order::Seeded => rng.gen_range(0..handles.len()),
                };
                let handle = handles[index];

                let outcome = match operation {
                    Operation::Remove => heap.remove(handle).map(|_| {
                        handles.swap_remove(index);
                    }),
                    Operation::Decrease => heap
                        .value(handle)
                        .copied()
                        .and_then(|value| heap.update(handle, value / 2)),
                    Operation::Increase => heap
                        .value(handle)
                        .copied()
                        .and_then(|value| heap.update(handle, value.saturating_mul(2))),
                    Operation::RemoveMin => Ok(()),
                };

                match outcome {
                    Ok(()) => break,
                    Err(HeapError::InvalidHandle) => {
                        handles.swap_remove(index);
                    }
                    Err(err) => return Err(err),
                }
            }
            performed += 1;
        }

        Ok(performed)
    }
}

/// Outcome of one benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub variant: &'static str,
    /// Operations actually performed in the timed section
    pub operations: usize,
    pub elapsed: Duration,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} operations in {:?}",
            self.variant, self.operations, self.elapsed
        )
    }
}
