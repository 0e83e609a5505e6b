//! Benchmark driver tests
//!
//! Runs every variant through every plan on small inputs and checks the
//! reported operation counts and the state the heap is left in.

use addressable_heaps::benchmark::{BenchmarkConfig, Operation, Order, Plan, Variant};
use addressable_heaps::binomial::BinomialHeap;
use addressable_heaps::datasets::DataSet;
use addressable_heaps::pairing::PairingHeap;
use addressable_heaps::Heap;

#[test]
fn test_default_config() {
    let config = BenchmarkConfig::default();
    assert_eq!(config.variant, Variant::Binary);
    assert_eq!(config.dataset, DataSet::Random);
    assert_eq!(config.count, 10_000);
    assert_eq!(config.plan, Plan::Only(Operation::Remove));
    assert_eq!(config.order, Order::RoundRobin);
}

#[test]
fn test_every_variant_and_operation() {
    for variant in Variant::ALL {
        for dataset in DataSet::ALL {
            for operation in Operation::ALL {
                for order in [Order::RoundRobin, Order::Seeded] {
                    let report = BenchmarkConfig::default()
                        .variant(variant)
                        .dataset(dataset)
                        .count(256)
                        .plan(Plan::Only(operation))
                        .order(order)
                        .run()
                        .unwrap();

                    assert_eq!(report.variant, variant.name());
                    assert_eq!(
                        report.operations, 256,
                        "{} {} {:?} {:?}",
                        variant, dataset, operation, order
                    );
                }
            }
        }
    }
}

#[test]
fn test_updates_leave_valid_heap() {
    let mut heap = BinomialHeap::new();
    BenchmarkConfig::default()
        .count(500)
        .plan(Plan::Only(Operation::Decrease))
        .order(Order::Seeded)
        .run_on(&mut heap)
        .unwrap();
    assert_eq!(heap.len(), 500);
    assert_eq!(heap.validate(), Ok(()));

    BenchmarkConfig::default()
        .count(500)
        .plan(Plan::Only(Operation::Increase))
        .run_on(&mut heap)
        .unwrap();
    assert_eq!(heap.len(), 1_000);
    assert_eq!(heap.validate(), Ok(()));
}

#[test]
fn test_remove_min_plan_drains() {
    let mut heap = PairingHeap::new();
    let report = BenchmarkConfig::default()
        .dataset(DataSet::Increasing)
        .count(400)
        .plan(Plan::Only(Operation::RemoveMin))
        .run_on(&mut heap)
        .unwrap();
    assert_eq!(report.operations, 400);
    assert!(heap.is_empty());
}

#[test]
fn test_mixed_plan_retargets_stale_handles() {
    for variant in Variant::ALL {
        for order in [Order::RoundRobin, Order::Seeded] {
            let report = BenchmarkConfig::default()
                .variant(variant)
                .count(2_000)
                .plan(Plan::Mixed)
                .order(order)
                .selection_seed(7)
                .run()
                .unwrap();
            assert!(report.operations > 0);
            assert!(report.operations <= 2_000);
        }
    }
}

#[test]
fn test_empty_run() {
    let report = BenchmarkConfig::default().count(0).run().unwrap();
    assert_eq!(report.operations, 0);
    assert!(report.to_string().contains("Binary Heap"));
}
