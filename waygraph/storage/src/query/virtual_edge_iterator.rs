use std::fmt;

use itertools::Itertools;
use tracing::{debug, trace};
use waygraph_common::encoded_value::{
    BooleanEncodedValue, DecimalEncodedValue, EnumEncodedValue, EnumValue, IntEncodedValue,
};
use waygraph_common::error::not_implemented;
use waygraph_common::flags::IntsRef;
use waygraph_common::geometry::{FetchMode, PointList};
use waygraph_common::types::{EdgeId, EdgeKey, NodeId};

use crate::edge_state::EdgeIteratorState;
use crate::error::{StorageError, StorageResult};
use crate::filter::EdgeFilter;

/// A reusable cursor over the edges adjacent to one node of the query graph.
///
/// The cursor walks a borrowed sequence of edge states, skipping the ones rejected by its filter.
/// After a successful [`advance`](Self::advance) it behaves like the accepted edge itself: every
/// [`EdgeIteratorState`] method is forwarded to the current edge, so path-search algorithms
/// consume it exactly like an iterator over base-graph edges.
///
/// The cursor is meant to be created once and [`reset`](Self::reset) for every node, which keeps
/// the traversal loop free of allocations. Resetting moves the cursor onto a new borrow, so a node
/// whose edges were walked before can be walked again:
///
/// ```
/// # use waygraph_common::types::EdgeKey;
/// # use waygraph_storage::{AllEdgesFilter, VirtualEdgeIterator, VirtualEdgeState};
/// let mut per_node: Vec<Vec<VirtualEdgeState>> = (0..2)
///     .map(|n| vec![VirtualEdgeState::new(EdgeKey::new(n, false), EdgeKey::new(n, false), n, 9)])
///     .collect();
/// let mut filter = AllEdgesFilter;
/// for node in [0, 1, 0] {
///     let mut iter = VirtualEdgeIterator::new(filter, &mut per_node[node]);
///     while iter.advance() {}
///     filter = iter.into_filter();
/// }
/// ```
///
/// # Panics
/// Reading or writing the edge while none is current (before the first successful `advance`, or
/// after `advance` returned `false`) is a caller bug and panics with
/// [`StorageError::NoCurrentEdge`]. Use [`try_current`](Self::try_current) for a fallible check.
pub struct VirtualEdgeIterator<'a, E, F> {
    filter: F,
    edges: &'a mut [E],
    // Index of the next edge to test; never decreases between resets.
    next: usize,
    current: Option<usize>,
}

impl<'a, E, F> VirtualEdgeIterator<'a, E, F>
where
    F: EdgeFilter<E>,
{
    pub fn new(filter: F, edges: &'a mut [E]) -> Self {
        trace!(edges = edges.len(), "new virtual edge iterator");
        Self {
            filter,
            edges,
            next: 0,
            current: None,
        }
    }

    /// Moves the cursor onto a new edge sequence, rewound to before its first edge.
    ///
    /// The previous sequence is released, so the caller may inspect it or hand it to the cursor
    /// again later. Only the filter is carried over.
    pub fn reset<'b>(self, edges: &'b mut [E]) -> VirtualEdgeIterator<'b, E, F> {
        trace!(edges = edges.len(), "reset virtual edge iterator");
        VirtualEdgeIterator {
            filter: self.filter,
            edges,
            next: 0,
            current: None,
        }
    }

    /// Releases the current sequence and returns the filter, e.g. to keep it across loop
    /// iterations that borrow a different sequence each time.
    pub fn into_filter(self) -> F {
        self.filter
    }

    /// Moves to the next edge accepted by the filter.
    ///
    /// Returns `false` once the sequence is exhausted; the cursor then holds no edge and further
    /// calls keep returning `false` until the next [`reset`](Self::reset).
    pub fn advance(&mut self) -> bool {
        while self.next < self.edges.len() {
            let index = self.next;
            self.next += 1;
            if self.filter.accept(&self.edges[index]) {
                self.current = Some(index);
                return true;
            }
        }
        if self.current.take().is_some() {
            trace!(edges = self.edges.len(), "virtual edge iterator exhausted");
        }
        false
    }

    /// Returns all edges of the sequence, accepted by the filter or not.
    pub fn edges(&self) -> &[E] {
        &*self.edges
    }

    pub fn current(&self) -> Option<&E> {
        let index = self.current?;
        Some(&self.edges[index])
    }

    pub fn current_mut(&mut self) -> Option<&mut E> {
        let index = self.current?;
        Some(&mut self.edges[index])
    }

    pub fn try_current(&self) -> StorageResult<&E> {
        self.current().ok_or(StorageError::NoCurrentEdge)
    }

    pub fn try_current_mut(&mut self) -> StorageResult<&mut E> {
        self.current_mut().ok_or(StorageError::NoCurrentEdge)
    }

    #[track_caller]
    fn edge_state(&self) -> &E {
        match self.current {
            Some(index) => &self.edges[index],
            None => panic!("{}", StorageError::NoCurrentEdge),
        }
    }

    #[track_caller]
    fn edge_state_mut(&mut self) -> &mut E {
        match self.current {
            Some(index) => &mut self.edges[index],
            None => panic!("{}", StorageError::NoCurrentEdge),
        }
    }
}

impl<E, F> EdgeIteratorState for VirtualEdgeIterator<'_, E, F>
where
    E: EdgeIteratorState + Clone,
    F: EdgeFilter<E>,
{
    type Detached = E;

    fn detach(&self, reverse: bool) -> StorageResult<Self::Detached> {
        if reverse {
            debug!(current = ?self.current, "rejected reverse detach of virtual edge iterator");
            return not_implemented("reverse detach of a virtual edge iterator", None);
        }
        Ok(self.edge_state().clone())
    }

    fn edge(&self) -> EdgeId {
        self.edge_state().edge()
    }

    fn edge_key(&self) -> EdgeKey {
        self.edge_state().edge_key()
    }

    fn base_node(&self) -> NodeId {
        self.edge_state().base_node()
    }

    fn adj_node(&self) -> NodeId {
        self.edge_state().adj_node()
    }

    fn fetch_way_geometry(&self, mode: FetchMode) -> PointList {
        self.edge_state().fetch_way_geometry(mode)
    }

    fn set_way_geometry(&mut self, pillars: PointList) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_way_geometry(pillars)?;
        Ok(self)
    }

    fn distance(&self) -> f64 {
        self.edge_state().distance()
    }

    fn set_distance(&mut self, distance: f64) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_distance(distance)?;
        Ok(self)
    }

    fn flags(&self) -> IntsRef {
        self.edge_state().flags()
    }

    fn set_flags(&mut self, flags: IntsRef) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_flags(flags)?;
        Ok(self)
    }

    fn get_bool(&self, property: &BooleanEncodedValue) -> bool {
        self.edge_state().get_bool(property)
    }

    fn set_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_bool(property, value)?;
        Ok(self)
    }

    fn get_reverse_bool(&self, property: &BooleanEncodedValue) -> bool {
        self.edge_state().get_reverse_bool(property)
    }

    fn set_reverse_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_reverse_bool(property, value)?;
        Ok(self)
    }

    fn get_int(&self, property: &IntEncodedValue) -> i32 {
        self.edge_state().get_int(property)
    }

    fn set_int(&mut self, property: &IntEncodedValue, value: i32) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_int(property, value)?;
        Ok(self)
    }

    fn get_reverse_int(&self, property: &IntEncodedValue) -> i32 {
        self.edge_state().get_reverse_int(property)
    }

    fn set_reverse_int(
        &mut self,
        property: &IntEncodedValue,
        value: i32,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_reverse_int(property, value)?;
        Ok(self)
    }

    fn get_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        self.edge_state().get_decimal(property)
    }

    fn set_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_decimal(property, value)?;
        Ok(self)
    }

    fn get_reverse_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        self.edge_state().get_reverse_decimal(property)
    }

    fn set_reverse_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_reverse_decimal(property, value)?;
        Ok(self)
    }

    fn get_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        self.edge_state().get_enum(property)
    }

    fn set_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_enum(property, value)?;
        Ok(self)
    }

    fn get_reverse_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        self.edge_state().get_reverse_enum(property)
    }

    fn set_reverse_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        self.edge_state_mut().set_reverse_enum(property, value)?;
        Ok(self)
    }

    fn name(&self) -> String {
        self.edge_state().name()
    }

    fn set_name(&mut self, name: &str) -> &mut Self {
        self.edge_state_mut().set_name(name);
        self
    }

    fn copy_properties_from<S>(&mut self, other: &S) -> StorageResult<&mut Self>
    where
        S: EdgeIteratorState + ?Sized,
    {
        self.edge_state_mut().copy_properties_from(other)?;
        Ok(self)
    }

    fn orig_edge_first(&self) -> EdgeId {
        self.edge_state().orig_edge_first()
    }

    fn orig_edge_last(&self) -> EdgeId {
        self.edge_state().orig_edge_last()
    }
}

impl<E, F> fmt::Display for VirtualEdgeIterator<'_, E, F>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = self.edges.iter().join(", ");
        match self.current {
            Some(index) => write!(f, "virtual edge: {}, all: [{all}]", self.edges[index]),
            None => write!(f, "virtual edge: (invalid), all: [{all}]"),
        }
    }
}

impl<E, F> fmt::Debug for VirtualEdgeIterator<'_, E, F>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualEdgeIterator")
            .field("edges", &self.edges)
            .field("next", &self.next)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use waygraph_common::encoded_value::EncodedValueInitializer;

    use super::*;
    use crate::filter::AllEdgesFilter;
    use crate::query::VirtualEdgeState;

    fn virtual_edges(count: u32) -> Vec<VirtualEdgeState> {
        (0..count)
            .map(|i| VirtualEdgeState::new(EdgeKey::new(100 + i, false), EdgeKey::new(i, false), 50, i))
            .collect()
    }

    #[test]
    fn test_advance_skips_rejected_edges() {
        let mut edges = virtual_edges(4);
        let mut iter =
            VirtualEdgeIterator::new(|e: &VirtualEdgeState| e.adj_node() % 2 == 1, &mut edges);
        assert!(iter.current().is_none());
        assert!(iter.advance());
        assert_eq!(iter.adj_node(), 1);
        assert!(iter.advance());
        assert_eq!(iter.adj_node(), 3);
        assert!(!iter.advance());
        assert!(iter.current().is_none());
    }

    #[test]
    fn test_reset_rewinds_to_new_sequence() {
        let mut first = virtual_edges(2);
        let mut second = virtual_edges(3);
        let mut iter = VirtualEdgeIterator::new(AllEdgesFilter, &mut first);
        while iter.advance() {}

        let mut iter = iter.reset(&mut second);
        assert!(iter.current().is_none());
        assert!(iter.advance());
        assert_eq!(iter.edge(), 100);
        assert_eq!(iter.edges().len(), 3);
    }

    #[test]
    fn test_writes_reach_backing_sequence() {
        let mut init = EncodedValueInitializer::new();
        let lanes = IntEncodedValue::new(&mut init, "lanes", 3, true).unwrap();
        let mut edges: Vec<_> = virtual_edges(2)
            .into_iter()
            .map(|e| e.with_flags(IntsRef::new(init.required_ints())))
            .collect();

        let mut iter = VirtualEdgeIterator::new(AllEdgesFilter, &mut edges);
        iter.advance();
        iter.advance();
        iter.set_int(&lanes, 2)
            .unwrap()
            .set_reverse_int(&lanes, 1)
            .unwrap()
            .set_name("Harbour Road");
        drop(iter);

        assert_eq!(edges[1].get_int(&lanes), 2);
        assert_eq!(edges[1].get_reverse_int(&lanes), 1);
        assert_eq!(edges[1].name(), "Harbour Road");
        assert_eq!(edges[0].get_int(&lanes), 0);
    }

    #[test]
    fn test_try_current_reports_missing_edge() {
        let mut edges = virtual_edges(1);
        let mut iter = VirtualEdgeIterator::new(AllEdgesFilter, &mut edges);
        assert!(matches!(iter.try_current(), Err(StorageError::NoCurrentEdge)));
        iter.advance();
        assert_eq!(iter.try_current().unwrap().edge(), 100);
        iter.advance();
        assert!(matches!(
            iter.try_current_mut(),
            Err(StorageError::NoCurrentEdge)
        ));
    }

    #[test]
    #[should_panic(expected = "no current edge")]
    fn test_read_before_advance_panics() {
        let mut edges = virtual_edges(1);
        let iter = VirtualEdgeIterator::new(AllEdgesFilter, &mut edges);
        iter.distance();
    }

    #[test]
    fn test_display() {
        let mut edges = virtual_edges(2);
        let mut iter = VirtualEdgeIterator::new(AllEdgesFilter, &mut edges);
        assert_snapshot!(iter.to_string(), @"virtual edge: (invalid), all: [100 50->0, 101 50->1]");
        iter.advance();
        assert_snapshot!(iter.to_string(), @"virtual edge: 100 50->0, all: [100 50->0, 101 50->1]");
    }
}
