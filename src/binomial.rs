//! Binomial Heap implementation
//!
//! A binomial heap is a forest of binomial trees with:
//! - O(log n) insert and remove_min
//! - O(log n) update and remove through handles
//!
//! # Algorithm Overview
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees: the root with the larger value
//!   becomes the last child of the other
//! - Bₖ has exactly 2ᵏ nodes, and its root has k children of ranks
//!   0, 1, ..., k-1 (read from the last child back, strictly decreasing)
//!
//! The forest is a sibling-linked list of roots in ascending rank order with
//! at most one tree per rank, just like the set bits of n.
//!
//! **Key Operations**:
//! - **Insert**: meld a B₀ into the forest. Meeting a tree of equal rank links
//!   the two and carries the result onwards, like binary addition.
//! - **Remove-min**: scan the O(log n) roots, unlink the winner, meld each of
//!   its children (each a binomial tree) back in.
//! - **Update**: swap payloads towards the root (decrease) or towards the
//!   smallest child (increase). The tree shape never changes.
//! - **Remove**: force the payload up to its tree's root, then unlink that root
//!   as remove-min does.

use crate::storage::{ElementKey, NodeArena, NodeKey, Payload, Slot};
use crate::traits::{AddressableHeap, Handle, Heap, HeapError};
use crate::validate::{ensure, Violation};
use log::trace;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::fmt;

/// Rank of a binomial tree; a rank-k tree holds 2ᵏ nodes, so u8 is plenty
type Rank = u8;

/// Handle to an element in a [`BinomialHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BinomialHandle(ElementKey);

impl Handle for BinomialHandle {}

/// Internal node structure for binomial heap
///
/// - `parent`: None for forest roots
/// - `child`: first child; children are kept in ascending rank order
/// - `sibling`: next child of the same parent, or next root in the forest
/// - `rank`: number of children
struct Node<T> {
    payload: Payload<T>,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
    rank: Rank,
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

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::binomial::BinomialHeap;
/// use addressable_heaps::{AddressableHeap, Heap};
///
/// let mut heap = BinomialHeap::new();
/// let handle = heap.insert(5);
/// heap.push(3);
/// heap.update(handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok(&1));
/// assert_eq!(heap.len(), 2);
/// ```
pub struct BinomialHeap<T: Ord> {
    arena: NodeArena<Node<T>>,
    /// First root of the forest (lowest rank)
    forest: Option<NodeKey>,
    /// Number of elements, maintained incrementally
    len: usize,
}

impl<T: Ord> BinomialHeap<T> {
    /// Points `prev`'s sibling link (or the forest head) at `next`
    fn relink(&mut self, prev: Option<NodeKey>, next: Option<NodeKey>) {
        match prev {
            Some(prev) => self.arena[prev].sibling = next,
            None => self.forest = next,
        }
    }

    fn last_child(&self, node: NodeKey) -> Option<NodeKey> {
        let mut current = self.arena[node].child?;
        while let Some(next) = self.arena[current].sibling {
            current = next;
        }
        Some(current)
    }

    /// Links two detached trees of equal rank into one tree of rank + 1
    ///
    /// On equal values `a` stays on top.
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (parent, child) = if self.arena.less(b, a) { (b, a) } else { (a, b) };

        match self.last_child(parent) {
            Some(last) => self.arena[last].sibling = Some(child),
            None => self.arena[parent].child = Some(child),
        }
        self.arena[child].parent = Some(parent);
        self.arena[parent].rank += 1;
        parent
    }

    /// Inserts a detached tree into the rank-ordered forest
    ///
    /// Equal ranks are linked and the result carried on. The scan resumes
    /// where the carry happened since every earlier root has a smaller rank.
    fn meld(&mut self, mut tree: NodeKey) {
        let mut prev: Option<NodeKey> = None;
        let mut current = self.forest;

        loop {
            let rank = self.arena[tree].rank;
            while let Some(root) = current {
                if self.arena[root].rank >= rank {
                    break;
                }
                prev = Some(root);
                current = self.arena[root].sibling;
            }

            match current {
                Some(root) if self.arena[root].rank == rank => {
                    let next = self.arena[root].sibling.take();
                    self.relink(prev, next);
                    current = next;
                    trace!("binomial carry at rank {}", rank);
                    tree = self.link(root, tree);
                }
                _ => {
                    self.arena[tree].sibling = current;
                    self.relink(prev, Some(tree));
                    return;
                }
            }
        }
    }

    /// Finds the minimum root and the root before it
    fn min_root(&self) -> Option<(Option<NodeKey>, NodeKey)> {
        let first = self.forest?;
        let mut best = (None, first);
        let mut prev = first;
        let mut current = self.arena[first].sibling;

        while let Some(root) = current {
            if self.arena.less(root, best.1) {
                best = (Some(prev), root);
            }
            prev = root;
            current = self.arena[root].sibling;
        }
        Some(best)
    }

    fn forest_predecessor(&self, target: NodeKey) -> Option<NodeKey> {
        let mut prev = None;
        let mut current = self.forest;
        while let Some(root) = current {
            if root == target {
                break;
            }
            prev = Some(root);
            current = self.arena[root].sibling;
        }
        prev
    }

    /// Unlinks a forest root, melds its children back and frees it
    fn detach_root(&mut self, prev: Option<NodeKey>, root: NodeKey) -> Result<T, HeapError> {
        let next = self.arena[root].sibling.take();
        self.relink(prev, next);

        let mut child = self.arena[root].child.take();
        while let Some(current) = child {
            child = self.arena[current].sibling.take();
            self.arena[current].parent = None;
            self.meld(current);
        }

        self.len -= 1;
        self.arena.release(root)
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
        while let Some(first) = self.arena[node].child {
            let mut smallest = first;
            let mut current = self.arena[first].sibling;
            while let Some(child) = current {
                if self.arena.less(child, smallest) {
                    smallest = child;
                }
                current = self.arena[child].sibling;
            }

            if !self.arena.less(smallest, node) {
                break;
            }
            self.arena.swap_payloads(node, smallest);
            node = smallest;
        }
    }

    /// Checks one binomial tree, returning its node count
    fn validate_tree(&self, root: NodeKey) -> Result<usize, Violation> {
        let mut count = 0;
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            count += 1;
            let rank = self.arena[node].rank;
            let mut expected: Rank = 0;
            let mut current = self.arena[node].child;

            while let Some(child) = current {
                ensure(self.arena.contains_node(child), Violation::BrokenLink)?;
                ensure(
                    self.arena[child].parent == Some(node),
                    Violation::BrokenLink,
                )?;
                ensure(!self.arena.less(child, node), Violation::HeapOrder)?;
                ensure(
                    expected < rank && self.arena[child].rank == expected,
                    Violation::MalformedTree(rank),
                )?;
                expected += 1;
                stack.push(child);
                current = self.arena[child].sibling;
            }
            ensure(expected == rank, Violation::MalformedTree(rank))?;
        }
        Ok(count)
    }
}

impl<T: Ord> Heap<T> for BinomialHeap<T> {
    fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            forest: None,
            len: 0,
        }
    }

    fn name(&self) -> &'static str {
        "Binomial Heap"
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, value: T) {
        self.insert(value);
    }

    fn find_min(&self) -> Result<&T, HeapError> {
        let (_, min) = self.min_root().ok_or(HeapError::EmptyHeap)?;
        Ok(self.arena.value(min))
    }

    fn remove_min(&mut self) -> Result<T, HeapError> {
        let (prev, min) = self.min_root().ok_or(HeapError::EmptyHeap)?;
        self.detach_root(prev, min)
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.forest = None;
        self.len = 0;
    }

    fn validate(&self) -> Result<(), Violation> {
        let mut seen: FxHashSet<Rank> = FxHashSet::default();
        let mut reachable = 0;
        let mut previous_rank: Option<Rank> = None;
        let mut current = self.forest;

        while let Some(root) = current {
            ensure(self.arena.contains_node(root), Violation::BrokenLink)?;
            ensure(self.arena[root].parent.is_none(), Violation::BrokenLink)?;

            let rank = self.arena[root].rank;
            ensure(seen.insert(rank), Violation::DuplicateRank(rank))?;
            ensure(
                previous_rank.map_or(true, |prev| prev < rank),
                Violation::ForestOrder,
            )?;
            previous_rank = Some(rank);

            reachable += self.validate_tree(root)?;
            current = self.arena[root].sibling;
        }

        ensure(
            reachable == self.len && self.len == self.arena.len(),
            Violation::SizeMismatch {
                tracked: self.len,
                reachable,
            },
        )?;
        ensure(self.arena.lookup_consistent(), Violation::LookupMismatch)
    }
}

impl<T: Ord> AddressableHeap<T> for BinomialHeap<T> {
    type Handle = BinomialHandle;

    fn insert(&mut self, value: T) -> BinomialHandle {
        let (node, element) = self.arena.alloc(value, |payload| Node {
            payload,
            parent: None,
            child: None,
            sibling: None,
            rank: 0,
        });
        self.meld(node);
        self.len += 1;
        BinomialHandle(element)
    }

    fn value(&self, handle: BinomialHandle) -> Result<&T, HeapError> {
        let node = self.arena.locate(handle.0)?;
        Ok(self.arena.value(node))
    }

    fn update(&mut self, handle: BinomialHandle, value: T) -> Result<(), HeapError> {
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

    fn remove(&mut self, handle: BinomialHandle) -> Result<T, HeapError> {
        let node = self.arena.locate(handle.0)?;
        let root = self.move_up(node, true);
        let prev = self.forest_predecessor(root);
        trace!("binomial remove through root of rank {}", self.arena[root].rank);
        self.detach_root(prev, root)
    }
}

impl<T: Ord> Default for BinomialHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> fmt::Debug for BinomialHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinomialHeap")
            .field("len", &self.len)
            .finish()
    }
}
