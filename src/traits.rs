//! Common traits for addressable heap data structures
//!
//! This module provides a two-tier trait hierarchy for min-heaps:
//!
//! - [`Heap`]: the plain priority-queue capability (insert without a handle,
//!   find-min, remove-min, emptiness, size, self-check)
//! - [`AddressableHeap`]: extends [`Heap`] with handles, so an element can be
//!   read, re-keyed or removed later without searching for it
//!
//! A handle cannot borrow the heap it came from, so the handle operations live
//! on the heap and take the handle as an argument. [`ElementMut`] bundles the
//! two back together for call sites that prefer `heap.element(h).update(v)`.

use crate::validate::Violation;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The heap holds no elements
    EmptyHeap,
    /// The handle is no longer valid (element was removed)
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap
///
/// Handles are small `Copy` tokens. Every heap type has its own handle type,
/// so a handle from one variant cannot be passed to another. A handle is
/// single-use: once its element is removed (by [`AddressableHeap::remove`] or
/// [`Heap::remove_min`]) every operation on it reports
/// [`HeapError::InvalidHandle`].
///
/// Passing a handle to a different instance of the same heap type is a caller
/// error and is not detected.
pub trait Handle: Copy + Eq + Hash + fmt::Debug {}

/// Base trait for min-heap data structures
///
/// # Example
///
/// ```rust
/// use addressable_heaps::{Heap, HeapError};
/// use addressable_heaps::leftist::LeftistHeap;
///
/// let mut heap = LeftistHeap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.find_min(), Ok(&1));
/// assert_eq!(heap.remove_min(), Ok(1));
/// assert_eq!(heap.len(), 2);
/// heap.clear();
/// assert_eq!(heap.remove_min(), Err(HeapError::EmptyHeap));
/// ```
pub trait Heap<T: Ord> {
    /// Creates a new empty heap
    fn new() -> Self
    where
        Self: Sized;

    /// Human-readable name of the variant, e.g. `"Binary Heap"`
    fn name(&self) -> &'static str;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a value, discarding its handle
    fn push(&mut self, value: T);

    /// Returns the minimum value without removing it
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if there are no elements; the heap is untouched.
    fn find_min(&self) -> Result<&T, HeapError>;

    /// Removes and returns the minimum value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if there are no elements; the heap is untouched.
    fn remove_min(&mut self) -> Result<T, HeapError>;

    /// Drops every element; all outstanding handles become invalid
    fn clear(&mut self);

    /// Checks heap order and the variant's structural invariant
    ///
    /// Walks the whole structure, so this is O(n). Intended for tests.
    fn validate(&self) -> Result<(), Violation>;

    /// Returns true if [`validate`](Heap::validate) finds no violation
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Extended heap trait with handle-based operations
///
/// # Example
///
/// ```rust
/// use addressable_heaps::{AddressableHeap, Heap};
/// use addressable_heaps::pairing::PairingHeap;
///
/// let mut heap = PairingHeap::new();
/// let a = heap.insert(10);
/// let b = heap.insert(20);
///
/// heap.update(b, 5).unwrap();
/// assert_eq!(heap.find_min(), Ok(&5));
///
/// assert_eq!(heap.remove(a), Ok(10));
/// assert_eq!(heap.len(), 1);
/// assert!(heap.value(a).is_err());
/// ```
pub trait AddressableHeap<T: Ord>: Heap<T> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts a value, returning a handle to it
    fn insert(&mut self, value: T) -> Self::Handle;

    /// Returns the current value of the element behind `handle`
    fn value(&self, handle: Self::Handle) -> Result<&T, HeapError>;

    /// Replaces the value of the element behind `handle`
    ///
    /// A smaller value moves the element towards the root, a larger one moves
    /// it away from the root, and an equal value changes nothing structurally.
    fn update(&mut self, handle: Self::Handle, value: T) -> Result<(), HeapError>;

    /// Removes the element behind `handle` and returns its value
    fn remove(&mut self, handle: Self::Handle) -> Result<T, HeapError>;

    /// Returns true if the element behind `handle` is still in the heap
    fn contains(&self, handle: Self::Handle) -> bool {
        self.value(handle).is_ok()
    }

    /// Borrows the element behind `handle` for handle-style access
    fn element(&mut self, handle: Self::Handle) -> ElementMut<'_, T, Self>
    where
        Self: Sized,
    {
        ElementMut {
            heap: self,
            handle,
            _marker: PhantomData,
        }
    }
}

/// A handle paired with a mutable borrow of its heap
///
/// ```rust
/// use addressable_heaps::{AddressableHeap, Heap};
/// use addressable_heaps::binomial::BinomialHeap;
///
/// let mut heap = BinomialHeap::new();
/// let h = heap.insert(8);
/// heap.push(3);
///
/// let mut element = heap.element(h);
/// element.update(0).unwrap();
/// assert_eq!(element.value(), Ok(&0));
/// assert_eq!(heap.find_min(), Ok(&0));
/// ```
pub struct ElementMut<'a, T: Ord, H: AddressableHeap<T>> {
    heap: &'a mut H,
    handle: H::Handle,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Ord, H: AddressableHeap<T>> ElementMut<'_, T, H> {
    /// The underlying handle
    pub fn handle(&self) -> H::Handle {
        self.handle
    }

    /// Current value of the element
    pub fn value(&self) -> Result<&T, HeapError> {
        self.heap.value(self.handle)
    }

    /// Replaces the element's value and restores heap order
    pub fn update(&mut self, value: T) -> Result<(), HeapError> {
        self.heap.update(self.handle, value)
    }

    /// Removes the element, consuming the borrow
    pub fn remove(self) -> Result<T, HeapError> {
        self.heap.remove(self.handle)
    }
}

impl<T: Ord, H: AddressableHeap<T>> fmt::Debug for ElementMut<'_, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMut")
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(HeapError::EmptyHeap.to_string(), "heap is empty");
        assert!(HeapError::InvalidHandle.to_string().contains("no longer valid"));
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&HeapError::EmptyHeap);
    }
}
