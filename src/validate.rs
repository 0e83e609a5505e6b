//! Invariant reports for [`Heap::validate`](crate::Heap::validate)
//!
//! Each heap walks its own structure (with an explicit stack, never recursion)
//! and reports the first invariant it finds broken.

use std::fmt;

/// An invariant that a heap failed to uphold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A child holds a smaller value than its parent
    HeapOrder,
    /// Leftist heap: a stored null-path length is stale, or npl(left) < npl(right)
    NullPathLength,
    /// Skew heap: a node has a right child but no left child
    RightWithoutLeft,
    /// Binomial heap: two forest roots share this rank
    DuplicateRank(u8),
    /// Binomial heap: a tree of this rank does not have the binomial shape
    MalformedTree(u8),
    /// Binomial heap: forest roots are not in ascending rank order
    ForestOrder,
    /// A parent (or sibling back-) link disagrees with the child links
    BrokenLink,
    /// The handle lookup table disagrees with where elements actually live
    LookupMismatch,
    /// The tracked size differs from the number of reachable elements
    SizeMismatch {
        /// Size the heap reports
        tracked: usize,
        /// Elements reachable from the root(s)
        reachable: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::HeapOrder => write!(f, "child is smaller than its parent"),
            Violation::NullPathLength => write!(f, "null-path length rule broken"),
            Violation::RightWithoutLeft => write!(f, "right child without a left child"),
            Violation::DuplicateRank(rank) => {
                write!(f, "more than one tree of rank {} in the forest", rank)
            }
            Violation::MalformedTree(rank) => {
                write!(f, "tree of rank {} is not a binomial tree", rank)
            }
            Violation::ForestOrder => write!(f, "forest roots out of rank order"),
            Violation::BrokenLink => write!(f, "parent link does not match child link"),
            Violation::LookupMismatch => write!(f, "handle table out of sync"),
            Violation::SizeMismatch { tracked, reachable } => write!(
                f,
                "heap reports {} elements but {} are reachable",
                tracked, reachable
            ),
        }
    }
}

impl std::error::Error for Violation {}

/// Returns `Err(violation)` unless `holds`
#[inline]
pub(crate) fn ensure(holds: bool, violation: Violation) -> Result<(), Violation> {
    if holds {
        Ok(())
    } else {
        Err(violation)
    }
}
