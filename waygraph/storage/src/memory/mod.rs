pub mod base_graph;

pub use base_graph::{BaseEdgeState, BaseGraph, BaseGraphConfig};
