use std::fmt;

use serde::{Deserialize, Serialize};

/// Internal identifier associated with a node (tower node) of the road network.
///
/// Nodes created at query time (snapped points) use ids after the last node stored in the base
/// graph.
pub type NodeId = u32;

/// Internal identifier associated with an undirected edge (graph-wide unique).
pub type EdgeId = u32;

/// An edge id combined with a traversal direction.
///
/// The lowest bit is set when the edge is traversed against its storage direction. Loops are
/// never marked as reversed, since both directions of a loop are indistinguishable.
///
/// # Examples
/// ```
/// # use waygraph_common::types::EdgeKey;
/// let key = EdgeKey::new(7, true);
/// assert_eq!(key.edge(), 7);
/// assert!(key.is_reverse());
/// assert_eq!(key.reversed(), EdgeKey::new(7, false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(u32);

impl EdgeKey {
    #[inline]
    pub fn new(edge: EdgeId, reverse: bool) -> Self {
        Self((edge << 1) | u32::from(reverse))
    }

    /// Creates the key for traversing `edge`, ignoring `reverse` for loops.
    #[inline]
    pub fn for_edge(edge: EdgeId, is_loop: bool, reverse: bool) -> Self {
        Self::new(edge, reverse && !is_loop)
    }

    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn edge(&self) -> EdgeId {
        self.0 >> 1
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.0 & 1 == 1
    }

    /// Returns the key of the same edge traversed in the opposite direction.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_direction() {
        let forward = EdgeKey::new(3, false);
        let backward = EdgeKey::new(3, true);
        assert_eq!(forward.raw(), 6);
        assert_eq!(backward.raw(), 7);
        assert_eq!(forward.edge(), backward.edge());
        assert_eq!(forward.reversed(), backward);
        assert_eq!(backward.reversed(), forward);
    }

    #[test]
    fn test_edge_key_loop_is_never_reversed() {
        let key = EdgeKey::for_edge(5, true, true);
        assert!(!key.is_reverse());
        assert_eq!(key, EdgeKey::from_raw(10));
    }
}
