//! Pairing Heap implementation
//!
//! A pairing heap is a heap-ordered multiway tree with:
//! - O(1) insert and merge
//! - O(log n) amortized remove_min
//! - cheap decrease-key: cut the node out and merge it with the root
//!
//! Nodes never swap contents, so the node key itself is the handle and no
//! lookup table is needed.
//!
//! Each node keeps a first-child link, doubly linked sibling links and a parent
//! link. The `prev` sibling link makes cutting a node out of its parent's child
//! list O(1) instead of a scan along the siblings.
//!
//! **Two-pass pairing** (remove_min, and remove/increase of inner nodes):
//! 1. Detach the children and merge them pairwise, left to right
//! 2. Merge the resulting heaps right to left into one tree

use crate::storage::NodeKey;
use crate::traits::{AddressableHeap, Handle, Heap, HeapError};
use crate::validate::{ensure, Violation};
use log::debug;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Handle to an element in a [`PairingHeap`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PairingHandle(NodeKey);

impl Handle for PairingHandle {}

struct Node<T> {
    value: T,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    /// Previous sibling (None for a first child)
    prev: Option<NodeKey>,
    /// Next sibling
    next: Option<NodeKey>,
}

/// Pairing Heap
///
/// # Example
///
/// ```rust
/// use addressable_heaps::pairing::PairingHeap;
/// use addressable_heaps::{AddressableHeap, Heap};
///
/// let mut heap = PairingHeap::new();
/// let handle = heap.insert(5);
/// heap.push(3);
/// heap.update(handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok(&1));
/// ```
pub struct PairingHeap<T: Ord> {
    nodes: SlotMap<NodeKey, Node<T>>,
    root: Option<NodeKey>,
}

impl<T: Ord> PairingHeap<T> {
    fn live(&self, handle: PairingHandle) -> Result<NodeKey, HeapError> {
        if self.nodes.contains_key(handle.0) {
            Ok(handle.0)
        } else {
            debug!("rejected stale handle {:?}", handle);
            Err(HeapError::InvalidHandle)
        }
    }

    #[inline]
    fn less(&self, a: NodeKey, b: NodeKey) -> bool {
        self.nodes[a].value < self.nodes[b].value
    }

    /// Merges two detached trees; the larger root becomes the first child
    fn merge(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (parent, child) = if self.less(b, a) { (b, a) } else { (a, b) };

        let first = self.nodes[parent].child;
        if let Some(first) = first {
            self.nodes[first].prev = Some(child);
        }
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.prev = None;
        node.next = first;
        self.nodes[parent].child = Some(child);
        parent
    }

    fn merge_into_root(&mut self, tree: NodeKey) {
        self.root = Some(match self.root {
            Some(root) => self.merge(root, tree),
            None => tree,
        });
    }

    /// Cuts a non-root node (with its subtree) out of its parent's child list
    fn cut(&mut self, node: NodeKey) {
        let (parent, prev, next) = {
            let n = &self.nodes[node];
            (n.parent, n.prev, n.next)
        };

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].child = next;
                }
            }
        }
        if let Some(next) = next {
            self.nodes[next].prev = prev;
        }

        let n = &mut self.nodes[node];
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    /// Detaches all children of `node` and pairs them into a single tree
    fn combine_children(&mut self, node: NodeKey) -> Option<NodeKey> {
        let mut current = self.nodes[node].child.take();

        let mut pairs: SmallVec<[NodeKey; 16]> = SmallVec::new();
        while let Some(first) = current {
            let second = self.detach_sibling(first);
            current = match second {
                Some(second) => {
                    let rest = self.detach_sibling(second);
                    pairs.push(self.merge(first, second));
                    rest
                }
                None => {
                    pairs.push(first);
                    None
                }
            };
        }

        let mut result = pairs.pop()?;
        while let Some(tree) = pairs.pop() {
            result = self.merge(tree, result);
        }
        Some(result)
    }

    /// Clears a child's links and returns the sibling that followed it
    fn detach_sibling(&mut self, node: NodeKey) -> Option<NodeKey> {
        let n = &mut self.nodes[node];
        let next = n.next.take();
        n.parent = None;
        n.prev = None;
        next
    }

    fn decrease(&mut self, node: NodeKey) {
        if self.root == Some(node) {
            return;
        }
        if let Some(parent) = self.nodes[node].parent {
            if self.less(node, parent) {
                self.cut(node);
                self.merge_into_root(node);
            }
        }
    }

    fn increase(&mut self, node: NodeKey) {
        if self.root == Some(node) {
            self.root = None;
        } else {
            self.cut(node);
        }

        let subtree = match self.combine_children(node) {
            Some(orphans) => self.merge(orphans, node),
            None => node,
        };
        self.merge_into_root(subtree);
    }
}

impl<T: Ord> Heap<T> for PairingHeap<T> {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    fn name(&self) -> &'static str {
        "Pairing Heap"
    }

    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, value: T) {
        self.insert(value);
    }

    fn find_min(&self) -> Result<&T, HeapError> {
        let root = self.root.ok_or(HeapError::EmptyHeap)?;
        Ok(&self.nodes[root].value)
    }

    fn remove_min(&mut self) -> Result<T, HeapError> {
        let root = self.root.ok_or(HeapError::EmptyHeap)?;
        self.root = self.combine_children(root);
        self.nodes
            .remove(root)
            .map(|node| node.value)
            .ok_or(HeapError::InvalidHandle)
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    fn validate(&self) -> Result<(), Violation> {
        let mut reachable = 0;
        let mut stack: Vec<NodeKey> = self.root.into_iter().collect();
        if let Some(root) = self.root {
            let root = &self.nodes[root];
            ensure(
                root.parent.is_none() && root.prev.is_none() && root.next.is_none(),
                Violation::BrokenLink,
            )?;
        }

        while let Some(node) = stack.pop() {
            reachable += 1;
            let mut prev = None;
            let mut current = self.nodes[node].child;

            while let Some(child) = current {
                let c = self.nodes.get(child).ok_or(Violation::BrokenLink)?;
                ensure(
                    c.parent == Some(node) && c.prev == prev,
                    Violation::BrokenLink,
                )?;
                ensure(c.value >= self.nodes[node].value, Violation::HeapOrder)?;
                stack.push(child);
                prev = Some(child);
                current = c.next;
            }
        }

        ensure(
            reachable == self.nodes.len(),
            Violation::SizeMismatch {
                tracked: self.nodes.len(),
                reachable,
            },
        )
    }
}

impl<T: Ord> AddressableHeap<T> for PairingHeap<T> {
    type Handle = PairingHandle;

    fn insert(&mut self, value: T) -> PairingHandle {
        let node = self.nodes.insert(Node {
            value,
            parent: None,
            child: None,
            prev: None,
            next: None,
        });
        self.merge_into_root(node);
        PairingHandle(node)
    }

    fn value(&self, handle: PairingHandle) -> Result<&T, HeapError> {
        let node = self.live(handle)?;
        Ok(&self.nodes[node].value)
    }

    fn update(&mut self, handle: PairingHandle, value: T) -> Result<(), HeapError> {
        let node = self.live(handle)?;
        let ordering = value.cmp(&self.nodes[node].value);
        self.nodes[node].value = value;

        match ordering {
            Ordering::Less => self.decrease(node),
            Ordering::Greater => self.increase(node),
            Ordering::Equal => {}
        }
        Ok(())
    }

    fn remove(&mut self, handle: PairingHandle) -> Result<T, HeapError> {
        let node = self.live(handle)?;
        if self.root == Some(node) {
            return self.remove_min();
        }

        self.cut(node);
        if let Some(subtree) = self.combine_children(node) {
            self.merge_into_root(subtree);
        }
        self.nodes
            .remove(node)
            .map(|node| node.value)
            .ok_or(HeapError::InvalidHandle)
    }
}

impl<T: Ord> Default for PairingHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> fmt::Debug for PairingHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("len", &self.nodes.len())
            .finish()
    }
}
