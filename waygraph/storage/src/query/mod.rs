mod edge;
mod virtual_edge;
mod virtual_edge_iterator;

pub use edge::EdgeState;
pub use virtual_edge::VirtualEdgeState;
pub use virtual_edge_iterator::VirtualEdgeIterator;
