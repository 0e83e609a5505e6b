//! Skew Heap implementation
//!
//! The self-adjusting cousin of the leftist heap: merge walks the right spines
//! exactly like a leftist merge, but on the way back up it *always* swaps the
//! children of every node it passed, with no balance metric stored anywhere.
//! Individual operations can be O(n), the amortized cost is O(log n).
//!
//! Because the merged subtree always lands in the left slot, a node built by
//! merge never has a right child without a left one; [`Heap::validate`] checks
//! that shape rule along with heap order.
//!
//! Update and remove use the same payload-swapping scheme as
//! [`LeftistHeap`](crate::leftist::LeftistHeap).

use crate::storage::{ElementKey, NodeArena, NodeKey, Payload, Slot};
use crate::traits::{AddressableHeap, Handle, Heap, HeapError};
use crate::validate::{ensure, Violation};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Handle to an element in a [`SkewHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SkewHandle(ElementKey);

impl Handle for SkewHandle {}

struct Node<T> {
    payload: Payload<T>,
    parent: Option<NodeKey>,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
}

impl<T> Slot for Node<T> {
    type Value = T;

    fn payload(&self) -> &Payload<T> {
        &self.payload
    }

    fn payload_mut(&mut self) -> &mut Payload<T> {
        &mut self.payload
    }

    fn into_payload(self) -> Payload<T> {
        self.payload
    }
}

/// Skew Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::skew::SkewHeap;
/// use addressable_heaps::{AddressableHeap, Heap};
///
/// let mut heap = SkewHeap::new();
/// let a = heap.insert(2);
/// heap.push(4);
/// heap.update(a, 9).unwrap();
/// assert_eq!(heap.remove_min(), Ok(4));
/// assert_eq!(heap.remove_min(), Ok(9));
/// ```
pub struct SkewHeap<T: Ord> {
    arena: NodeArena<Node<T>>,
    root: Option<NodeKey>,
}

impl<T: Ord> SkewHeap<T> {
    /// Merges two detached trees and returns the new root (parent unset)
    fn merge(&mut self, a: Option<NodeKey>, b: Option<NodeKey>) -> Option<NodeKey> {
        let (mut a, mut b) = match (a, b) {
            (None, other) | (other, None) => return other,
            (Some(a), Some(b)) => (a, b),
        };

        let mut spine: SmallVec<[NodeKey; 32]> = SmallVec::new();
        let rest = loop {
            if self.arena.less(b, a) {
                std::mem::swap(&mut a, &mut b);
            }
            spine.push(a);
            match self.arena[a].right {
                Some(right) => a = right,
                None => break b,
            }
        };

        // node.left, node.right = merge(node.right, other), node.left
        let mut merged = rest;
        for &node in spine.iter().rev() {
            self.arena[merged].parent = Some(node);
            let old_left = self.arena[node].left;
            self.arena[node].left = Some(merged);
            self.arena[node].right = old_left;
            merged = node;
        }

        self.arena[merged].parent = None;
        Some(merged)
    }

    fn move_up(&mut self, mut node: NodeKey, to_root: bool) -> NodeKey {
        while let Some(parent) = self.arena[node].parent {
            if !to_root && !self.arena.less(node, parent) {
                break;
            }
            self.arena.swap_payloads(node, parent);
            node = parent;
        }
        node
    }

    fn move_down(&mut self, mut node: NodeKey) {
        loop {
            let smallest = match (self.arena[node].left, self.arena[node].right) {
                (None, None) => break,
                (Some(only), None) | (None, Some(only)) => only,
                (Some(left), Some(right)) => {
                    if self.arena.less(right, left) {
                        right
                    } else {
                        left
                    }
                }
            };

            if !self.arena.less(smallest, node) {
                break;
            }
            self.arena.swap_payloads(node, smallest);
            node = smallest;
        }
    }
}

impl<T: Ord> Heap<T> for SkewHeap<T> {
    fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
        }
    }

    fn name(&self) -> &'static str {
        "Skew Heap"
    }

    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn push(&mut self, value: T) {
        self.insert(value);
    }

    fn find_min(&self) -> Result<&T, HeapError> {
        let root = self.root.ok_or(HeapError::EmptyHeap)?;
        Ok(self.arena.value(root))
    }

    fn remove_min(&mut self) -> Result<T, HeapError> {
        let root = self.root.ok_or(HeapError::EmptyHeap)?;

        let (left, right) = (self.arena[root].left, self.arena[root].right);
        for child in [left, right].into_iter().flatten() {
            self.arena[child].parent = None;
        }
        self.root = self.merge(left, right);

        self.arena.release(root)
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    fn validate(&self) -> Result<(), Violation> {
        let mut reachable = 0;
        let mut stack: Vec<NodeKey> = self.root.into_iter().collect();
        if let Some(root) = self.root {
            ensure(self.arena[root].parent.is_none(), Violation::BrokenLink)?;
        }

        while let Some(node) = stack.pop() {
            reachable += 1;
            let (left, right) = (self.arena[node].left, self.arena[node].right);
            ensure(
                !(left.is_none() && right.is_some()),
                Violation::RightWithoutLeft,
            )?;

            for child in [left, right].into_iter().flatten() {
                ensure(self.arena.contains_node(child), Violation::BrokenLink)?;
                ensure(
                    self.arena[child].parent == Some(node),
                    Violation::BrokenLink,
                )?;
                ensure(!self.arena.less(child, node), Violation::HeapOrder)?;
                stack.push(child);
            }
        }

        ensure(
            reachable == self.arena.len(),
            Violation::SizeMismatch {
                tracked: self.arena.len(),
                reachable,
            },
        )?;
        ensure(self.arena.lookup_consistent(), Violation::LookupMismatch)
    }
}

impl<T: Ord> AddressableHeap<T> for SkewHeap<T> {
    type Handle = SkewHandle;

    fn insert(&mut self, value: T) -> SkewHandle {
        let (node, element) = self.arena.alloc(value, |payload| Node {
            payload,
            parent: None,
            left: None,
            right: None,
        });
        self.root = self.merge(Some(node), self.root);
        SkewHandle(element)
    }

    fn value(&self, handle: SkewHandle) -> Result<&T, HeapError> {
        let node = self.arena.locate(handle.0)?;
        Ok(self.arena.value(node))
    }

    fn update(&mut self, handle: SkewHandle, value: T) -> Result<(), HeapError> {
        let node = self.arena.locate(handle.0)?;
        let ordering = value.cmp(self.arena.value(node));
        self.arena.set_value(node, value);

        match ordering {
            Ordering::Less => {
                self.move_up(node, false);
            }
            Ordering::Greater => self.move_down(node),
            Ordering::Equal => {}
        }
        Ok(())
    }

    fn remove(&mut self, handle: SkewHandle) -> Result<T, HeapError> {
        let node = self.arena.locate(handle.0)?;
        self.move_up(node, true);
        self.remove_min()
    }
}

impl<T: Ord> Default for SkewHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> fmt::Debug for SkewHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkewHeap")
            .field("len", &self.arena.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = SkewHeap::new();
        heap.push(5);
        heap.push(3);
        heap.push(7);

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.find_min(), Ok(&3));
        assert_eq!(heap.remove_min(), Ok(3));
        assert_eq!(heap.remove_min(), Ok(5));
        assert_eq!(heap.remove_min(), Ok(7));
        assert_eq!(heap.remove_min(), Err(HeapError::EmptyHeap));
    }

    #[test]
    fn test_merge_always_fills_left() {
        let mut heap = SkewHeap::new();
        for v in [9, 4, 7, 1, 8, 2, 6, 3, 5] {
            heap.push(v);
            assert_eq!(heap.validate(), Ok(()));
        }
        let root = heap.root.unwrap();
        assert!(heap.arena[root].left.is_some());
    }

    #[test]
    fn test_update_and_remove() {
        let mut heap = SkewHeap::new();
        let handles: Vec<_> = (0..25).map(|v| heap.insert(v)).collect();

        heap.update(handles[3], 100).unwrap();
        heap.update(handles[20], -5).unwrap();
        assert_eq!(heap.validate(), Ok(()));
        assert_eq!(heap.find_min(), Ok(&-5));

        assert_eq!(heap.remove(handles[3]), Ok(100));
        assert_eq!(heap.remove(handles[20]), Ok(-5));
        assert_eq!(heap.len(), 23);
        assert_eq!(heap.validate(), Ok(()));
        assert_eq!(heap.value(handles[3]), Err(HeapError::InvalidHandle));
    }
}
