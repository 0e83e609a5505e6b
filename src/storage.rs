//! Arena storage for heap nodes and the handle lookup table
//!
//! Tree-shaped heaps keep their nodes in a [`SlotMap`] and link them through
//! `Option<NodeKey>` fields, so parent/child/sibling back-references never form
//! ownership cycles.
//!
//! The leftist, skew and binomial heaps restore order by swapping *payloads*
//! (value plus element identity) between nodes instead of relinking them. The
//! element a handle refers to therefore wanders from node to node, and
//! [`NodeArena`] keeps a second slotmap, the locator, mapping each
//! [`ElementKey`] to the node currently holding it. Every payload swap rewrites
//! both locator entries, which keeps handle lookup O(1) instead of a tree scan.
//!
//! Slotmap keys are generational: once an element is released its key no
//! longer resolves, so stale handles are reported rather than aliasing a newer
//! element that reused the slot.

use crate::traits::HeapError;
use log::debug;
use slotmap::{new_key_type, Key, SlotMap};
use std::mem;
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Slot of a node in a heap's arena
    pub struct NodeKey;

    /// Identity of one inserted element, stable across payload swaps
    pub struct ElementKey;
}

/// The part of a node that travels when two nodes swap contents
#[derive(Debug, Clone)]
pub(crate) struct Payload<T> {
    pub(crate) value: T,
    pub(crate) element: ElementKey,
}

/// A node type that carries a [`Payload`]
pub(crate) trait Slot {
    type Value;

    fn payload(&self) -> &Payload<Self::Value>;

    fn payload_mut(&mut self) -> &mut Payload<Self::Value>;

    fn into_payload(self) -> Payload<Self::Value>;
}

/// Node slotmap plus the element-to-node locator
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<N> {
    nodes: SlotMap<NodeKey, N>,
    locator: SlotMap<ElementKey, NodeKey>,
}

impl<N: Slot> NodeArena<N> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            locator: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Stores a new node built around `value`, registering its element
    pub(crate) fn alloc(
        &mut self,
        value: N::Value,
        build: impl FnOnce(Payload<N::Value>) -> N,
    ) -> (NodeKey, ElementKey) {
        let element = self.locator.insert(NodeKey::null());
        let node = self.nodes.insert(build(Payload { value, element }));
        self.locator[element] = node;
        (node, element)
    }

    /// Node currently holding `element`
    #[inline]
    pub(crate) fn locate(&self, element: ElementKey) -> Result<NodeKey, HeapError> {
        self.locator.get(element).copied().ok_or_else(|| {
            debug!("rejected stale handle {:?}", element);
            HeapError::InvalidHandle
        })
    }

    #[inline]
    pub(crate) fn value(&self, node: NodeKey) -> &N::Value {
        &self.nodes[node].payload().value
    }

    #[inline]
    pub(crate) fn set_value(&mut self, node: NodeKey, value: N::Value) {
        self.nodes[node].payload_mut().value = value;
    }

    /// True if the value at `a` orders strictly before the value at `b`
    #[inline]
    pub(crate) fn less(&self, a: NodeKey, b: NodeKey) -> bool
    where
        N::Value: Ord,
    {
        self.value(a) < self.value(b)
    }

    /// Exchanges the payloads of two nodes and re-points both elements
    pub(crate) fn swap_payloads(&mut self, a: NodeKey, b: NodeKey) {
        if let Some([x, y]) = self.nodes.get_disjoint_mut([a, b]) {
            mem::swap(x.payload_mut(), y.payload_mut());
            let (at_a, at_b) = (x.payload().element, y.payload().element);
            self.locator[at_a] = a;
            self.locator[at_b] = b;
        }
    }

    /// Frees a node that the caller has already unlinked, returning its value
    pub(crate) fn release(&mut self, node: NodeKey) -> Result<N::Value, HeapError> {
        let payload = self
            .nodes
            .remove(node)
            .ok_or(HeapError::InvalidHandle)?
            .into_payload();
        self.locator.remove(payload.element);
        Ok(payload.value)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.locator.clear();
    }

    pub(crate) fn contains_node(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(node)
    }

    /// Checks that the locator and the nodes agree one-to-one
    pub(crate) fn lookup_consistent(&self) -> bool {
        self.locator.len() == self.nodes.len()
            && self
                .nodes
                .iter()
                .all(|(key, node)| self.locator.get(node.payload().element) == Some(&key))
    }
}

impl<N> Index<NodeKey> for NodeArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for NodeArena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Leaf {
        payload: Payload<i32>,
    }

    impl Slot for Leaf {
        type Value = i32;

        fn payload(&self) -> &Payload<i32> {
            &self.payload
        }

        fn payload_mut(&mut self) -> &mut Payload<i32> {
            &mut self.payload
        }

        fn into_payload(self) -> Payload<i32> {
            self.payload
        }
    }

    fn leaf(payload: Payload<i32>) -> Leaf {
        Leaf { payload }
    }

    #[test]
    fn test_alloc_and_locate() {
        let mut arena = NodeArena::new();
        let (node, element) = arena.alloc(42, leaf);

        assert_eq!(arena.locate(element), Ok(node));
        assert_eq!(*arena.value(node), 42);
        assert_eq!(arena.len(), 1);
        assert!(arena.lookup_consistent());
    }

    #[test]
    fn test_swap_payloads_moves_elements() {
        let mut arena = NodeArena::new();
        let (a, ea) = arena.alloc(1, leaf);
        let (b, eb) = arena.alloc(2, leaf);

        arena.swap_payloads(a, b);

        assert_eq!(*arena.value(a), 2);
        assert_eq!(*arena.value(b), 1);
        assert_eq!(arena.locate(ea), Ok(b));
        assert_eq!(arena.locate(eb), Ok(a));
        assert!(arena.lookup_consistent());
    }

    #[test]
    fn test_release_invalidates_element() {
        let mut arena = NodeArena::new();
        let (node, element) = arena.alloc(7, leaf);

        assert_eq!(arena.release(node), Ok(7));
        assert_eq!(arena.locate(element), Err(HeapError::InvalidHandle));
        assert_eq!(arena.release(node), Err(HeapError::InvalidHandle));

        // A reused slot must not resurrect the old element key
        let (_, fresh) = arena.alloc(8, leaf);
        assert_ne!(fresh, element);
        assert_eq!(arena.locate(element), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_clear() {
        let mut arena = NodeArena::new();
        let (_, element) = arena.alloc(1, leaf);
        arena.alloc(2, leaf);

        arena.clear();

        assert_eq!(arena.len(), 0);
        assert_eq!(arena.locate(element), Err(HeapError::InvalidHandle));
    }
}
