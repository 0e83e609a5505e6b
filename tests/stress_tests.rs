//! Extreme stress tests that really push the heaps to their limits
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load. Degenerate shapes
//! (long chains from sorted input) must not exhaust the stack.

use addressable_heaps::binary::BinaryHeap;
use addressable_heaps::binomial::BinomialHeap;
use addressable_heaps::leftist::LeftistHeap;
use addressable_heaps::pairing::PairingHeap;
use addressable_heaps::skew::SkewHeap;
use addressable_heaps::{AddressableHeap, HeapError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Test massive numbers of inserts and removals
fn test_massive_operations<H: AddressableHeap<i32>>() {
    let mut heap = H::new();

    for i in 0..10_000 {
        heap.push(i);
    }
    assert_eq!(heap.len(), 10_000);
    assert_eq!(heap.validate(), Ok(()));

    for i in 0..10_000 {
        assert_eq!(heap.remove_min(), Ok(i));
    }
    assert!(heap.is_empty());
}

/// Sorted input in both directions produces chains and wide nodes
fn test_sorted_input<H: AddressableHeap<i32>>() {
    let mut heap = H::new();
    for i in (0..50_000).rev() {
        heap.push(i);
    }
    assert_eq!(heap.validate(), Ok(()));
    for i in 0..50_000 {
        assert_eq!(heap.remove_min(), Ok(i));
    }

    for i in 0..50_000 {
        heap.push(i);
    }
    assert_eq!(heap.validate(), Ok(()));
    assert_eq!(heap.find_min(), Ok(&0));
    heap.clear();
    assert!(heap.is_empty());
}

/// Test many decreases, each one making a new minimum
fn test_many_decreases<H: AddressableHeap<i32>>() {
    let mut heap = H::new();
    let handles: Vec<_> = (0..2_000).map(|i| heap.insert(10_000 + i)).collect();

    for (i, &handle) in handles.iter().enumerate().rev() {
        heap.update(handle, i as i32).unwrap();
        assert_eq!(heap.find_min(), Ok(&(i as i32)));
    }
    assert_eq!(heap.validate(), Ok(()));

    for i in 0..2_000 {
        assert_eq!(heap.remove_min(), Ok(i));
    }
}

/// Removing every element through its handle, back to front
fn test_remove_all_by_handle<H: AddressableHeap<i32>>() {
    let mut heap = H::new();
    let handles: Vec<_> = (0..5_000).map(|i| heap.insert((i * 7_919) % 5_000)).collect();

    for (i, &handle) in handles.iter().enumerate().rev() {
        assert_eq!(heap.remove(handle), Ok((i as i32 * 7_919) % 5_000));
        if i % 500 == 0 {
            assert_eq!(heap.validate(), Ok(()));
        }
    }
    assert!(heap.is_empty());
    assert_eq!(heap.remove_min(), Err(HeapError::EmptyHeap));
}

/// Seeded random mix of every operation, checked against a sorted model
fn test_random_mix<H: AddressableHeap<i64>>() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut heap = H::new();
    let mut live: Vec<(H::Handle, i64)> = Vec::new();

    for step in 0..20_000 {
        match rng.gen_range(0..10) {
            0..=3 => {
                let value = rng.gen_range(-1_000..1_000);
                live.push((heap.insert(value), value));
            }
            4 | 5 if !live.is_empty() => {
                let i = rng.gen_range(0..live.len());
                let value = rng.gen_range(-1_000..1_000);
                heap.update(live[i].0, value).unwrap();
                live[i].1 = value;
            }
            6 | 7 if !live.is_empty() => {
                let i = rng.gen_range(0..live.len());
                let (handle, value) = live.swap_remove(i);
                assert_eq!(heap.remove(handle), Ok(value));
            }
            _ => {
                let expected = live.iter().map(|&(_, v)| v).min();
                match heap.remove_min() {
                    Ok(value) => {
                        assert_eq!(Some(value), expected);
                        let i = live
                            .iter()
                            .position(|&(h, _)| !heap.contains(h))
                            .unwrap();
                        live.swap_remove(i);
                    }
                    Err(err) => {
                        assert_eq!(err, HeapError::EmptyHeap);
                        assert!(live.is_empty());
                    }
                }
            }
        }

        assert_eq!(heap.len(), live.len());
        if step % 1_000 == 0 {
            assert_eq!(heap.validate(), Ok(()));
        }
    }

    let mut expected: Vec<i64> = live.iter().map(|&(_, v)| v).collect();
    expected.sort_unstable();
    let mut out = Vec::new();
    while let Ok(value) = heap.remove_min() {
        out.push(value);
    }
    assert_eq!(out, expected);
}

/// Test with extreme values
fn test_extreme_values<H: AddressableHeap<i64>>() {
    let mut heap = H::new();
    let max = heap.insert(i64::MAX);
    heap.push(0);
    heap.push(i64::MIN);

    heap.update(max, i64::MIN).unwrap();
    assert_eq!(heap.remove_min(), Ok(i64::MIN));
    assert_eq!(heap.remove_min(), Ok(i64::MIN));
    assert_eq!(heap.remove_min(), Ok(0));
}

macro_rules! stress_tests {
    ($module:ident, $heap:ident) => {
        mod $module {
            use super::*;

            #[test]
            fn massive() {
                test_massive_operations::<$heap<i32>>();
            }

            #[test]
            fn sorted_input() {
                test_sorted_input::<$heap<i32>>();
            }

            #[test]
            fn many_decreases() {
                test_many_decreases::<$heap<i32>>();
            }

            #[test]
            fn remove_all_by_handle() {
                test_remove_all_by_handle::<$heap<i32>>();
            }

            #[test]
            fn random_mix() {
                test_random_mix::<$heap<i64>>();
            }

            #[test]
            fn extreme_values() {
                test_extreme_values::<$heap<i64>>();
            }
        }
    };
}

stress_tests!(binary, BinaryHeap);
stress_tests!(binomial, BinomialHeap);
stress_tests!(leftist, LeftistHeap);
stress_tests!(skew, SkewHeap);
stress_tests!(pairing, PairingHeap);
