//! Addressable Priority Queues for Rust
//!
//! This crate provides min-heaps whose elements can be addressed after
//! insertion: [`AddressableHeap::insert`] returns a handle, and the handle can
//! later read the element's value, change it (in either direction) or remove
//! the element from the middle of the heap.
//!
//! # Variants
//!
//! - **Binary Heap**: array-backed complete binary tree; O(log n) everything
//! - **Binomial Heap**: forest of binomial trees; O(log n) insert, remove-min and update
//! - **Leftist Heap**: null-path-length balanced tree; O(log n) merge-based operations
//! - **Skew Heap**: self-adjusting leftist heap; O(log n) amortized
//! - **Pairing Heap**: multiway tree; O(1) insert, O(log n) amortized remove-min
//!
//! Every variant checks its own invariants through [`Heap::validate`], and
//! handles of removed elements are rejected with [`HeapError::InvalidHandle`].
//!
//! # Example
//!
//! ```rust
//! use addressable_heaps::binary::BinaryHeap;
//! use addressable_heaps::{AddressableHeap, Heap};
//!
//! let mut heap = BinaryHeap::new();
//! let handles: Vec<_> = [5, 3, 8, 1, 9, 2].into_iter().map(|v| heap.insert(v)).collect();
//!
//! heap.update(handles[2], 0).unwrap();
//! assert_eq!(heap.find_min(), Ok(&0));
//! assert_eq!(heap.remove(handles[3]), Ok(1));
//! assert!(heap.is_valid());
//! ```

pub mod benchmark;
pub mod binary;
pub mod binomial;
pub mod datasets;
pub mod leftist;
pub mod pairing;
pub mod skew;
mod storage;
pub mod traits;
pub mod validate;

// Re-export the main traits for convenience
pub use traits::{AddressableHeap, ElementMut, Handle, Heap, HeapError};
pub use validate::Violation;
