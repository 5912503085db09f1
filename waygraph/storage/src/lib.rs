pub mod edge_state;
pub mod error;
pub mod filter;
pub mod memory;
pub mod query;

pub use edge_state::EdgeIteratorState;
pub use error::{StorageError, StorageResult};
pub use filter::{AccessFilter, AllEdgesFilter, EdgeFilter};
pub use memory::{BaseEdgeState, BaseGraph, BaseGraphConfig};
pub use query::{EdgeState, VirtualEdgeIterator, VirtualEdgeState};
