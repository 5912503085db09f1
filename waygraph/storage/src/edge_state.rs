use waygraph_common::encoded_value::{
    BooleanEncodedValue, DecimalEncodedValue, EnumEncodedValue, EnumValue, IntEncodedValue,
};
use waygraph_common::flags::IntsRef;
use waygraph_common::geometry::{FetchMode, PointList};
use waygraph_common::types::{EdgeId, EdgeKey, NodeId};

use crate::error::StorageResult;

/// A handle to one directed traversal of one graph edge.
///
/// This is the only edge interface path-search algorithms see. Persisted edges, virtual edges and
/// the [`VirtualEdgeIterator`](crate::query::VirtualEdgeIterator) cursor all implement it, so an
/// algorithm cannot tell whether the edge it reads lives in the base graph or was synthesized for
/// the current query.
///
/// Property accessors are direction-aware: the plain accessors read and write the value for the
/// traversal direction of this handle (base node to adjacent node), the `reverse` accessors read
/// and write the value for the opposite direction.
pub trait EdgeIteratorState {
    /// The handle returned by [`detach`](Self::detach).
    type Detached;

    /// Returns a handle that stays valid independently of the producer of `self` (e.g. an
    /// iterator that moves on). With `reverse`, the handle traverses the edge the other way.
    fn detach(&self, reverse: bool) -> StorageResult<Self::Detached>;

    fn edge(&self) -> EdgeId;

    fn edge_key(&self) -> EdgeKey;

    fn base_node(&self) -> NodeId;

    fn adj_node(&self) -> NodeId;

    /// Returns the geometry in traversal direction.
    fn fetch_way_geometry(&self, mode: FetchMode) -> PointList;

    /// Replaces the pillar points, given in traversal direction.
    fn set_way_geometry(&mut self, pillars: PointList) -> StorageResult<&mut Self>;

    /// Returns the distance in meters.
    fn distance(&self) -> f64;

    fn set_distance(&mut self, distance: f64) -> StorageResult<&mut Self>;

    /// Returns the raw flags. They are stored in storage direction, independent of the traversal
    /// direction of this handle.
    fn flags(&self) -> IntsRef;

    fn set_flags(&mut self, flags: IntsRef) -> StorageResult<&mut Self>;

    fn get_bool(&self, property: &BooleanEncodedValue) -> bool;

    fn set_bool(&mut self, property: &BooleanEncodedValue, value: bool)
    -> StorageResult<&mut Self>;

    fn get_reverse_bool(&self, property: &BooleanEncodedValue) -> bool;

    fn set_reverse_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self>;

    fn get_int(&self, property: &IntEncodedValue) -> i32;

    fn set_int(&mut self, property: &IntEncodedValue, value: i32) -> StorageResult<&mut Self>;

    fn get_reverse_int(&self, property: &IntEncodedValue) -> i32;

    fn set_reverse_int(&mut self, property: &IntEncodedValue, value: i32)
    -> StorageResult<&mut Self>;

    fn get_decimal(&self, property: &DecimalEncodedValue) -> f64;

    fn set_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self>;

    fn get_reverse_decimal(&self, property: &DecimalEncodedValue) -> f64;

    fn set_reverse_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self>;

    fn get_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T;

    fn set_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self>;

    fn get_reverse_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T;

    fn set_reverse_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self>;

    fn name(&self) -> String;

    fn set_name(&mut self, name: &str) -> &mut Self;

    /// Copies flags, name, distance and pillar geometry of `other` onto this edge.
    fn copy_properties_from<S>(&mut self, other: &S) -> StorageResult<&mut Self>
    where
        S: EdgeIteratorState + ?Sized;

    /// Returns the first base-graph edge this edge was derived from.
    fn orig_edge_first(&self) -> EdgeId;

    /// Returns the last base-graph edge this edge was derived from.
    fn orig_edge_last(&self) -> EdgeId;
}
