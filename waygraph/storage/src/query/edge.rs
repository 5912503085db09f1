use std::fmt;

use waygraph_common::encoded_value::{
    BooleanEncodedValue, DecimalEncodedValue, EnumEncodedValue, EnumValue, IntEncodedValue,
};
use waygraph_common::flags::IntsRef;
use waygraph_common::geometry::{FetchMode, PointList};
use waygraph_common::types::{EdgeId, EdgeKey, NodeId};

use super::virtual_edge::VirtualEdgeState;
use crate::edge_state::EdgeIteratorState;
use crate::error::StorageResult;
use crate::memory::BaseEdgeState;

/// An edge adjacent to a node of the query graph: either persisted in the base graph or
/// synthesized for the current query.
#[derive(Debug, Clone)]
pub enum EdgeState<'g> {
    Base(BaseEdgeState<'g>),
    Virtual(VirtualEdgeState),
}

impl EdgeState<'_> {
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }
}

impl<'g> From<BaseEdgeState<'g>> for EdgeState<'g> {
    fn from(state: BaseEdgeState<'g>) -> Self {
        Self::Base(state)
    }
}

impl From<VirtualEdgeState> for EdgeState<'_> {
    fn from(state: VirtualEdgeState) -> Self {
        Self::Virtual(state)
    }
}

macro_rules! dispatch {
    ($self:expr, $edge:ident => $body:expr) => {
        match $self {
            EdgeState::Base($edge) => $body,
            EdgeState::Virtual($edge) => $body,
        }
    };
}

impl<'g> EdgeIteratorState for EdgeState<'g> {
    type Detached = EdgeState<'g>;

    fn detach(&self, reverse: bool) -> StorageResult<Self::Detached> {
        Ok(match self {
            Self::Base(edge) => Self::Base(edge.detach(reverse)?),
            Self::Virtual(edge) => Self::Virtual(edge.detach(reverse)?),
        })
    }

    fn edge(&self) -> EdgeId {
        dispatch!(self, e => e.edge())
    }

    fn edge_key(&self) -> EdgeKey {
        dispatch!(self, e => e.edge_key())
    }

    fn base_node(&self) -> NodeId {
        dispatch!(self, e => e.base_node())
    }

    fn adj_node(&self) -> NodeId {
        dispatch!(self, e => e.adj_node())
    }

    fn fetch_way_geometry(&self, mode: FetchMode) -> PointList {
        dispatch!(self, e => e.fetch_way_geometry(mode))
    }

    fn set_way_geometry(&mut self, pillars: PointList) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_way_geometry(pillars)?; });
        Ok(self)
    }

    fn distance(&self) -> f64 {
        dispatch!(self, e => e.distance())
    }

    fn set_distance(&mut self, distance: f64) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_distance(distance)?; });
        Ok(self)
    }

    fn flags(&self) -> IntsRef {
        dispatch!(self, e => e.flags())
    }

    fn set_flags(&mut self, flags: IntsRef) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_flags(flags)?; });
        Ok(self)
    }

    fn get_bool(&self, property: &BooleanEncodedValue) -> bool {
        dispatch!(self, e => e.get_bool(property))
    }

    fn set_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_bool(property, value)?; });
        Ok(self)
    }

    fn get_reverse_bool(&self, property: &BooleanEncodedValue) -> bool {
        dispatch!(self, e => e.get_reverse_bool(property))
    }

    fn set_reverse_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_reverse_bool(property, value)?; });
        Ok(self)
    }

    fn get_int(&self, property: &IntEncodedValue) -> i32 {
        dispatch!(self, e => e.get_int(property))
    }

    fn set_int(&mut self, property: &IntEncodedValue, value: i32) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_int(property, value)?; });
        Ok(self)
    }

    fn get_reverse_int(&self, property: &IntEncodedValue) -> i32 {
        dispatch!(self, e => e.get_reverse_int(property))
    }

    fn set_reverse_int(
        &mut self,
        property: &IntEncodedValue,
        value: i32,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_reverse_int(property, value)?; });
        Ok(self)
    }

    fn get_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        dispatch!(self, e => e.get_decimal(property))
    }

    fn set_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_decimal(property, value)?; });
        Ok(self)
    }

    fn get_reverse_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        dispatch!(self, e => e.get_reverse_decimal(property))
    }

    fn set_reverse_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_reverse_decimal(property, value)?; });
        Ok(self)
    }

    fn get_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        dispatch!(self, e => e.get_enum(property))
    }

    fn set_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_enum(property, value)?; });
        Ok(self)
    }

    fn get_reverse_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        dispatch!(self, e => e.get_reverse_enum(property))
    }

    fn set_reverse_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        dispatch!(&mut *self, e => { e.set_reverse_enum(property, value)?; });
        Ok(self)
    }

    fn name(&self) -> String {
        dispatch!(self, e => e.name())
    }

    fn set_name(&mut self, name: &str) -> &mut Self {
        dispatch!(&mut *self, e => { e.set_name(name); });
        self
    }

    fn copy_properties_from<S>(&mut self, other: &S) -> StorageResult<&mut Self>
    where
        S: EdgeIteratorState + ?Sized,
    {
        dispatch!(&mut *self, e => { e.copy_properties_from(other)?; });
        Ok(self)
    }

    fn orig_edge_first(&self) -> EdgeId {
        dispatch!(self, e => e.orig_edge_first())
    }

    fn orig_edge_last(&self) -> EdgeId {
        dispatch!(self, e => e.orig_edge_last())
    }
}

impl fmt::Display for EdgeState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, e => fmt::Display::fmt(e, f))
    }
}
