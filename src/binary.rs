//! Addressable Binary Heap implementation
//!
//! A complete binary tree stored in a contiguous vector. Children of slot `i`
//! live at `2i + 1` and `2i + 2`, its parent at `(i - 1) / 2`.
//!
//! Handles are resolved through a position table (element key to array index)
//! that every swap keeps current, so `update` and `remove` start sifting from
//! the right slot without scanning the array.
//!
//! # Time Complexity
//!
//! | Operation    | Complexity |
//! |--------------|------------|
//! | `insert`     | O(log n)   |
//! | `find_min`   | O(1)       |
//! | `remove_min` | O(log n)   |
//! | `update`     | O(log n)   |
//! | `remove`     | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use addressable_heaps::{AddressableHeap, Heap};
//! use addressable_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! let h = heap.insert(8);
//! heap.push(3);
//! heap.push(5);
//!
//! heap.update(h, 1).unwrap();
//! assert_eq!(heap.remove_min(), Ok(1));
//! assert_eq!(heap.remove_min(), Ok(3));
//! assert_eq!(heap.remove_min(), Ok(5));
//! ```

use crate::storage::{ElementKey, Payload};
use crate::traits::{AddressableHeap, Handle, Heap, HeapError};
use crate::validate::{ensure, Violation};
use log::debug;
use slotmap::SlotMap;
use std::cmp::Ordering;
use std::fmt;

/// Handle to an element in a [`BinaryHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BinaryHandle(ElementKey);

impl Handle for BinaryHandle {}

/// Array-backed binary min-heap with handles
pub struct BinaryHeap<T: Ord> {
    /// Heap-ordered slots; slot 0 is the minimum
    data: Vec<Payload<T>>,
    /// Current slot of every live element
    positions: SlotMap<ElementKey, usize>,
}

impl<T: Ord> BinaryHeap<T> {
    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            positions: SlotMap::with_capacity_and_key(capacity),
        }
    }

    #[inline]
    fn parent(index: usize) -> usize {
        (index - 1) / 2
    }

    #[inline]
    fn left(index: usize) -> usize {
        2 * index + 1
    }

    /// Swaps two slots and re-points both elements
    fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
        self.positions[self.data[i].element] = i;
        self.positions[self.data[j].element] = j;
    }

    /// Moves the element at `index` up while it is smaller than its parent
    ///
    /// With `to_root` set the order check is skipped and the element is
    /// carried all the way to slot 0. Returns the final slot.
    fn sift_up(&mut self, mut index: usize, to_root: bool) -> usize {
        while index > 0 {
            let parent = Self::parent(index);
            if !to_root && self.data[index].value >= self.data[parent].value {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    /// Moves the element at `index` down while a child is smaller
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = Self::left(index);
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smallest = left;
            if right < len && self.data[right].value < self.data[left].value {
                smallest = right;
            }

            if self.data[smallest].value < self.data[index].value {
                self.swap(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }

    fn position(&self, handle: BinaryHandle) -> Result<usize, HeapError> {
        self.positions.get(handle.0).copied().ok_or_else(|| {
            debug!("rejected stale handle {:?}", handle);
            HeapError::InvalidHandle
        })
    }
}

impl<T: Ord> Heap<T> for BinaryHeap<T> {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            positions: SlotMap::with_key(),
        }
    }

    fn name(&self) -> &'static str {
        "Binary Heap"
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, value: T) {
        self.insert(value);
    }

    fn find_min(&self) -> Result<&T, HeapError> {
        self.data
            .first()
            .map(|slot| &slot.value)
            .ok_or(HeapError::EmptyHeap)
    }

    fn remove_min(&mut self) -> Result<T, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyHeap);
        }

        let last = self.data.len() - 1;
        self.swap(0, last);
        let min = self.data.pop().ok_or(HeapError::EmptyHeap)?;
        self.positions.remove(min.element);

        if !self.data.is_empty() {
            self.sift_down(0);
        }

        Ok(min.value)
    }

    fn clear(&mut self) {
        self.data.clear();
        self.positions.clear();
    }

    fn validate(&self) -> Result<(), Violation> {
        ensure(
            self.positions.len() == self.data.len(),
            Violation::SizeMismatch {
                tracked: self.positions.len(),
                reachable: self.data.len(),
            },
        )?;

        // Walk from the root so the check mirrors the tree, not the array
        let len = self.data.len();
        let mut stack = Vec::new();
        if len > 0 {
            stack.push(0);
        }
        while let Some(index) = stack.pop() {
            ensure(
                self.positions.get(self.data[index].element) == Some(&index),
                Violation::LookupMismatch,
            )?;
            let left = Self::left(index);
            for child in [left, left + 1] {
                if child < len {
                    ensure(
                        self.data[child].value >= self.data[index].value,
                        Violation::HeapOrder,
                    )?;
                    stack.push(child);
                }
            }
        }
        Ok(())
    }
}

impl<T: Ord> AddressableHeap<T> for BinaryHeap<T> {
    type Handle = BinaryHandle;

    fn insert(&mut self, value: T) -> BinaryHandle {
        let index = self.data.len();
        let element = self.positions.insert(index);
        self.data.push(Payload { value, element });
        self.sift_up(index, false);
        BinaryHandle(element)
    }

    fn value(&self, handle: BinaryHandle) -> Result<&T, HeapError> {
        let index = self.position(handle)?;
        Ok(&self.data[index].value)
    }

    fn update(&mut self, handle: BinaryHandle, value: T) -> Result<(), HeapError> {
        let index = self.position(handle)?;
        let ordering = value.cmp(&self.data[index].value);
        self.data[index].value = value;

        match ordering {
            Ordering::Less => {
                self.sift_up(index, false);
            }
            Ordering::Greater => self.sift_down(index),
            Ordering::Equal => {}
        }
        Ok(())
    }

    fn remove(&mut self, handle: BinaryHandle) -> Result<T, HeapError> {
        let index = self.position(handle)?;
        self.sift_up(index, true);
        self.remove_min()
    }
}

impl<T: Ord> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> fmt::Debug for BinaryHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = BinaryHeap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(3);
        heap.push(1);
        heap.push(2);

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.find_min(), Ok(&1));

        assert_eq!(heap.remove_min(), Ok(1));
        assert_eq!(heap.remove_min(), Ok(2));
        assert_eq!(heap.remove_min(), Ok(3));
        assert_eq!(heap.remove_min(), Err(HeapError::EmptyHeap));
    }

    #[test]
    fn test_positions_follow_swaps() {
        let mut heap = BinaryHeap::new();
        let handles: Vec<_> = (0..50).rev().map(|v| heap.insert(v)).collect();

        for (offset, handle) in handles.iter().enumerate() {
            assert_eq!(heap.value(*handle), Ok(&(49 - offset as i32)));
        }
        assert!(heap.validate().is_ok());
    }

    #[test]
    fn test_update_both_directions() {
        let mut heap = BinaryHeap::new();
        let handles: Vec<_> = [10, 20, 30, 40, 50].iter().map(|&v| heap.insert(v)).collect();

        heap.update(handles[4], 5).unwrap();
        assert_eq!(heap.find_min(), Ok(&5));

        heap.update(handles[4], 45).unwrap();
        assert_eq!(heap.find_min(), Ok(&10));

        heap.update(handles[0], 100).unwrap();
        assert_eq!(heap.find_min(), Ok(&20));
        assert!(heap.validate().is_ok());

        let drained: Vec<_> = std::iter::from_fn(|| heap.remove_min().ok()).collect();
        assert_eq!(drained, vec![20, 30, 40, 45, 100]);
    }

    #[test]
    fn test_remove_forces_to_root() {
        let mut heap = BinaryHeap::new();
        let handles: Vec<_> = (1..=7).map(|v| heap.insert(v)).collect();

        // Deepest slot
        assert_eq!(heap.remove(handles[6]), Ok(7));
        assert_eq!(heap.len(), 6);
        assert!(heap.validate().is_ok());

        assert_eq!(heap.remove(handles[0]), Ok(1));
        assert_eq!(heap.find_min(), Ok(&2));
        assert_eq!(heap.remove(handles[0]), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_with_capacity() {
        let mut heap = BinaryHeap::with_capacity(4);
        for v in [4, 2, 6, 1, 9] {
            heap.push(v);
        }
        assert_eq!(heap.len(), 5);
        assert_eq!(heap.find_min(), Ok(&1));
    }
}
