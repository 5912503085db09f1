use std::fmt;

use waygraph_common::encoded_value::{
    BooleanEncodedValue, DecimalEncodedValue, EnumEncodedValue, EnumValue, IntEncodedValue,
};
use waygraph_common::flags::IntsRef;
use waygraph_common::geometry::{FetchMode, PointList};
use waygraph_common::types::{EdgeId, EdgeKey, NodeId};

use crate::edge_state::EdgeIteratorState;
use crate::error::{StorageError, StorageResult};

/// One direction of an edge synthesized at query time, e.g. the part of a base edge between a
/// tower node and a snapped point.
///
/// The traversal direction is the direction of `edge_key`; a reversed key makes the forward
/// property accessors read the backward slots, exactly as for a persisted edge. The geometry
/// always holds both tower points.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualEdgeState {
    edge_key: EdgeKey,
    original_edge_key: EdgeKey,
    base_node: NodeId,
    adj_node: NodeId,
    distance: f64,
    flags: IntsRef,
    name: String,
    geometry: PointList,
}

impl VirtualEdgeState {
    pub fn new(
        edge_key: EdgeKey,
        original_edge_key: EdgeKey,
        base_node: NodeId,
        adj_node: NodeId,
    ) -> Self {
        Self {
            edge_key,
            original_edge_key,
            base_node,
            adj_node,
            distance: 0.0,
            flags: IntsRef::default(),
            name: String::new(),
            geometry: PointList::new(),
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_flags(mut self, flags: IntsRef) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the full geometry, tower points included, in traversal direction.
    pub fn with_geometry(mut self, geometry: PointList) -> Self {
        self.geometry = geometry;
        self
    }

    /// The key of the base-graph edge this virtual edge was split from.
    pub fn original_edge_key(&self) -> EdgeKey {
        self.original_edge_key
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.edge_key.is_reverse()
    }

    /// Builds the twin of this edge for the opposite traversal direction.
    pub fn reverse_edge(&self) -> Self {
        Self {
            edge_key: self.edge_key.reversed(),
            original_edge_key: self.original_edge_key.reversed(),
            base_node: self.adj_node,
            adj_node: self.base_node,
            distance: self.distance,
            flags: self.flags.clone(),
            name: self.name.clone(),
            geometry: self.geometry.reversed(),
        }
    }
}

impl EdgeIteratorState for VirtualEdgeState {
    type Detached = VirtualEdgeState;

    fn detach(&self, reverse: bool) -> StorageResult<Self::Detached> {
        if reverse {
            Ok(self.reverse_edge())
        } else {
            Ok(self.clone())
        }
    }

    fn edge(&self) -> EdgeId {
        self.edge_key.edge()
    }

    fn edge_key(&self) -> EdgeKey {
        self.edge_key
    }

    fn base_node(&self) -> NodeId {
        self.base_node
    }

    fn adj_node(&self) -> NodeId {
        self.adj_node
    }

    fn fetch_way_geometry(&self, mode: FetchMode) -> PointList {
        match self.geometry.as_slice() {
            [base, pillars @ .., adj] => mode.assemble(*base, pillars, *adj),
            _ => self.geometry.clone(),
        }
    }

    fn set_way_geometry(&mut self, pillars: PointList) -> StorageResult<&mut Self> {
        let (Some(&base), Some(&adj)) = (self.geometry.first(), self.geometry.last()) else {
            return Err(StorageError::InvalidGeometry {
                edge: self.edge(),
                reason: "virtual edge was created without tower points".to_string(),
            });
        };
        let mut geometry = PointList::with_capacity(pillars.len() + 2);
        geometry.push(base);
        geometry.extend_from(&pillars);
        geometry.push(adj);
        self.geometry = geometry;
        Ok(self)
    }

    fn distance(&self) -> f64 {
        self.distance
    }

    fn set_distance(&mut self, distance: f64) -> StorageResult<&mut Self> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(StorageError::InvalidDistance(distance));
        }
        self.distance = distance;
        Ok(self)
    }

    fn flags(&self) -> IntsRef {
        self.flags.clone()
    }

    fn set_flags(&mut self, flags: IntsRef) -> StorageResult<&mut Self> {
        self.flags = flags;
        Ok(self)
    }

    fn get_bool(&self, property: &BooleanEncodedValue) -> bool {
        property.get_bool(self.is_reverse(), &self.flags)
    }

    fn set_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        property.set_bool(self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_reverse_bool(&self, property: &BooleanEncodedValue) -> bool {
        property.get_bool(!self.is_reverse(), &self.flags)
    }

    fn set_reverse_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        property.set_bool(!self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_int(&self, property: &IntEncodedValue) -> i32 {
        property.get_int(self.is_reverse(), &self.flags)
    }

    fn set_int(&mut self, property: &IntEncodedValue, value: i32) -> StorageResult<&mut Self> {
        property.set_int(self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_reverse_int(&self, property: &IntEncodedValue) -> i32 {
        property.get_int(!self.is_reverse(), &self.flags)
    }

    fn set_reverse_int(
        &mut self,
        property: &IntEncodedValue,
        value: i32,
    ) -> StorageResult<&mut Self> {
        property.set_int(!self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        property.get_decimal(self.is_reverse(), &self.flags)
    }

    fn set_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        property.set_decimal(self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_reverse_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        property.get_decimal(!self.is_reverse(), &self.flags)
    }

    fn set_reverse_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        property.set_decimal(!self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        property.get_enum(self.is_reverse(), &self.flags)
    }

    fn set_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        property.set_enum(self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn get_reverse_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        property.get_enum(!self.is_reverse(), &self.flags)
    }

    fn set_reverse_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        property.set_enum(!self.is_reverse(), &mut self.flags, value)?;
        Ok(self)
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    fn copy_properties_from<S>(&mut self, other: &S) -> StorageResult<&mut Self>
    where
        S: EdgeIteratorState + ?Sized,
    {
        self.set_flags(other.flags())?
            .set_distance(other.distance())?
            .set_way_geometry(other.fetch_way_geometry(FetchMode::PillarOnly))?
            .set_name(&other.name());
        Ok(self)
    }

    fn orig_edge_first(&self) -> EdgeId {
        self.original_edge_key.edge()
    }

    fn orig_edge_last(&self) -> EdgeId {
        self.original_edge_key.edge()
    }
}

impl fmt::Display for VirtualEdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}->{}", self.edge(), self.base_node, self.adj_node)
    }
}
