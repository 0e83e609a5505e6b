//! Leftist Heap implementation
//!
//! A leftist heap is a heap-ordered binary tree in which every node satisfies
//! `npl(left) >= npl(right)`, where the null-path length `npl` is the distance
//! to the nearest missing child (`npl(None) = -1`). The right spine is
//! therefore at most O(log n) long, and merge only ever walks right spines.
//!
//! # Algorithm Overview
//!
//! **Merge** is the primitive every operation reduces to:
//! 1. Walk down the right spines of both trees, always continuing below the
//!    smaller root, and remember the nodes taken on the way
//! 2. Hang the leftover tree below the last remembered node
//! 3. Climb back up: re-attach each merged subtree as the right child, move it
//!    to the left if the left slot is empty, swap children when
//!    `npl(left) < npl(right)`, and recompute `npl`
//!
//! **Update** never relinks nodes: the element's payload is swapped with its
//! parent (decrease) or its smaller child (increase) until order holds. The
//! handle table follows each swap, see [`crate::storage`].
//!
//! # Time Complexity
//!
//! | Operation    | Complexity |
//! |--------------|------------|
//! | `insert`     | O(log n)   |
//! | `find_min`   | O(1)       |
//! | `remove_min` | O(log n)   |
//! | `update`     | O(height)  |
//! | `remove`     | O(height)  |
//!
//! Leftist trees can be deep on the left, so payload-swapping update and remove
//! are bounded by the tree height rather than by log n.

use crate::storage::{ElementKey, NodeArena, NodeKey, Payload, Slot};
use crate::traits::{AddressableHeap, Handle, Heap, HeapError};
use crate::validate::{ensure, Violation};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Handle to an element in a [`LeftistHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LeftistHandle(ElementKey);

impl Handle for LeftistHandle {}

struct Node<T> {
    payload: Payload<T>,
    parent: Option<NodeKey>,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
    /// Null-path length; a node with a missing child has npl 0
    npl: i32,
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

/// Leftist Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::leftist::LeftistHeap;
/// use addressable_heaps::{AddressableHeap, Heap};
///
/// let mut heap = LeftistHeap::new();
/// let handle = heap.insert(5);
/// heap.push(3);
/// heap.update(handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok(&1));
/// assert!(heap.is_valid());
/// ```
pub struct LeftistHeap<T: Ord> {
    arena: NodeArena<Node<T>>,
    root: Option<NodeKey>,
}

impl<T: Ord> LeftistHeap<T> {
    #[inline]
    fn npl(&self, node: Option<NodeKey>) -> i32 {
        node.map_or(-1, |key| self.arena[key].npl)
    }

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

        let mut merged = rest;
        for &node in spine.iter().rev() {
            self.arena[merged].parent = Some(node);
            let left = self.arena[node].left;
            if left.is_none() {
                self.arena[node].left = Some(merged);
                self.arena[node].right = None;
            } else if self.npl(left) < self.npl(Some(merged)) {
                self.arena[node].left = Some(merged);
                self.arena[node].right = left;
            } else {
                self.arena[node].right = Some(merged);
            }
            let right = self.arena[node].right;
            self.arena[node].npl = self.npl(right) + 1;
            merged = node;
        }

        self.arena[merged].parent = None;
        Some(merged)
    }

    /// Swaps the payload at `node` upwards while it is smaller than its parent
    ///
    /// With `to_root` set the order check is skipped. Returns the node that
    /// ends up holding the payload.
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

    /// Swaps the payload at `node` downwards while a child is smaller
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

    fn locate(&self, handle: LeftistHandle) -> Result<NodeKey, HeapError> {
        self.arena.locate(handle.0)
    }
}

impl<T: Ord> Heap<T> for LeftistHeap<T> {
    fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
        }
    }

    fn name(&self) -> &'static str {
        "Leftist Heap"
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

            for child in [left, right].into_iter().flatten() {
                ensure(self.arena.contains_node(child), Violation::BrokenLink)?;
                ensure(
                    self.arena[child].parent == Some(node),
                    Violation::BrokenLink,
                )?;
                ensure(!self.arena.less(child, node), Violation::HeapOrder)?;
                stack.push(child);
            }

            ensure(
                self.npl(left) >= self.npl(right)
                    && self.arena[node].npl == self.npl(right) + 1,
                Violation::NullPathLength,
            )?;
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

impl<T: Ord> AddressableHeap<T> for LeftistHeap<T> {
    type Handle = LeftistHandle;

    fn insert(&mut self, value: T) -> LeftistHandle {
        let (node, element) = self.arena.alloc(value, |payload| Node {
            payload,
            parent: None,
            left: None,
            right: None,
            npl: 0,
        });
        self.root = self.merge(self.root, Some(node));
        LeftistHandle(element)
    }

    fn value(&self, handle: LeftistHandle) -> Result<&T, HeapError> {
        let node = self.locate(handle)?;
        Ok(self.arena.value(node))
    }

    fn update(&mut self, handle: LeftistHandle, value: T) -> Result<(), HeapError> {
        let node = self.locate(handle)?;
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

    fn remove(&mut self, handle: LeftistHandle) -> Result<T, HeapError> {
        let node = self.locate(handle)?;
        self.move_up(node, true);
        self.remove_min()
    }
}

impl<T: Ord> Default for LeftistHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> fmt::Debug for LeftistHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeftistHeap")
            .field("len", &self.arena.len())
            .finish()
    }
}
