use waygraph_common::encoded_value::BooleanEncodedValue;

use crate::edge_state::EdgeIteratorState;

/// Decides whether an edge may be traversed in the current context.
///
/// Implementations must not change state during evaluation. Any `Fn(&E) -> bool` closure is an
/// edge filter.
pub trait EdgeFilter<E: ?Sized> {
    fn accept(&self, edge: &E) -> bool;
}

impl<E, F> EdgeFilter<E> for F
where
    E: ?Sized,
    F: Fn(&E) -> bool,
{
    #[inline]
    fn accept(&self, edge: &E) -> bool {
        self(edge)
    }
}

/// Accepts every edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllEdgesFilter;

impl<E: ?Sized> EdgeFilter<E> for AllEdgesFilter {
    #[inline]
    fn accept(&self, _edge: &E) -> bool {
        true
    }
}

/// Accepts edges by a boolean access property.
///
/// An outgoing search accepts edges that may be traversed from base to adjacent node, an incoming
/// search accepts edges that may be traversed from adjacent to base node.
#[derive(Debug, Clone)]
pub struct AccessFilter {
    access: BooleanEncodedValue,
    forward: bool,
    backward: bool,
}

impl AccessFilter {
    pub fn out_edges(access: BooleanEncodedValue) -> Self {
        Self {
            access,
            forward: true,
            backward: false,
        }
    }

    pub fn in_edges(access: BooleanEncodedValue) -> Self {
        Self {
            access,
            forward: false,
            backward: true,
        }
    }

    pub fn all_edges(access: BooleanEncodedValue) -> Self {
        Self {
            access,
            forward: true,
            backward: true,
        }
    }
}

impl<E: EdgeIteratorState> EdgeFilter<E> for AccessFilter {
    fn accept(&self, edge: &E) -> bool {
        (self.forward && edge.get_bool(&self.access))
            || (self.backward && edge.get_reverse_bool(&self.access))
    }
}
