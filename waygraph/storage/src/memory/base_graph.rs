use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use waygraph_common::encoded_value::{
    BooleanEncodedValue, DecimalEncodedValue, EnumEncodedValue, EnumValue, IntEncodedValue,
};
use waygraph_common::flags::IntsRef;
use waygraph_common::geometry::{FetchMode, Point, PointList};
use waygraph_common::types::{EdgeId, EdgeKey, NodeId};

use crate::edge_state::EdgeIteratorState;
use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseGraphConfig {
    /// Number of `u32` words of raw flags stored per edge.
    pub flag_ints: usize,
    pub expected_nodes: usize,
    pub expected_edges: usize,
}

impl BaseGraphConfig {
    pub fn with_flag_ints(flag_ints: usize) -> Self {
        Self {
            flag_ints,
            ..Self::default()
        }
    }
}

impl Default for BaseGraphConfig {
    fn default() -> Self {
        Self {
            flag_ints: 1,
            expected_nodes: 64,
            expected_edges: 64,
        }
    }
}

#[derive(Debug, Clone)]
struct EdgeEntry {
    node_a: NodeId,
    node_b: NodeId,
    distance: f64,
    flags: IntsRef,
    name: String,
    // In storage direction, from node_a to node_b.
    pillars: PointList,
}

#[derive(Debug, Default)]
struct Storage {
    points: Vec<Point>,
    node_edges: Vec<Vec<EdgeId>>,
    edges: Vec<EdgeEntry>,
}

impl Storage {
    fn entry(&self, edge: EdgeId) -> StorageResult<&EdgeEntry> {
        self.edges
            .get(edge as usize)
            .ok_or(StorageError::EdgeNotFound(edge))
    }

    fn check_node(&self, node: NodeId) -> StorageResult<()> {
        if (node as usize) < self.points.len() {
            Ok(())
        } else {
            Err(StorageError::NodeNotFound(node))
        }
    }
}

/// In-memory base graph holding the persisted road network.
///
/// Each edge is stored once, from node A to node B. A [`BaseEdgeState`] whose base node is node
/// B traverses the edge in reverse: its forward property accessors read the backward slots of
/// the encoded values and its geometry is returned reversed.
#[derive(Debug)]
pub struct BaseGraph {
    config: BaseGraphConfig,
    storage: RwLock<Storage>,
}

impl BaseGraph {
    pub fn new(config: BaseGraphConfig) -> Self {
        let storage = Storage {
            points: Vec::with_capacity(config.expected_nodes),
            node_edges: Vec::with_capacity(config.expected_nodes),
            edges: Vec::with_capacity(config.expected_edges),
        };
        Self {
            config,
            storage: RwLock::new(storage),
        }
    }

    pub fn config(&self) -> &BaseGraphConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.storage.read().points.len()
    }

    pub fn edge_count(&self) -> usize {
        self.storage.read().edges.len()
    }

    pub fn add_node(&self, point: Point) -> NodeId {
        let mut storage = self.storage.write();
        let node = storage.points.len() as NodeId;
        storage.points.push(point);
        storage.node_edges.push(Vec::new());
        node
    }

    pub fn node_point(&self, node: NodeId) -> StorageResult<Point> {
        let storage = self.storage.read();
        storage.check_node(node)?;
        Ok(storage.points[node as usize])
    }

    /// Adds an edge from `node_a` to `node_b` with zero distance, zeroed flags and no name.
    pub fn add_edge(&self, node_a: NodeId, node_b: NodeId) -> StorageResult<BaseEdgeState<'_>> {
        let mut storage = self.storage.write();
        storage.check_node(node_a)?;
        storage.check_node(node_b)?;
        let edge = storage.edges.len() as EdgeId;
        storage.edges.push(EdgeEntry {
            node_a,
            node_b,
            distance: 0.0,
            flags: IntsRef::new(self.config.flag_ints),
            name: String::new(),
            pillars: PointList::new(),
        });
        storage.node_edges[node_a as usize].push(edge);
        if node_a != node_b {
            storage.node_edges[node_b as usize].push(edge);
        }
        debug!(edge, node_a, node_b, "added base edge");
        Ok(BaseEdgeState {
            graph: self,
            edge,
            base_node: node_a,
            adj_node: node_b,
            reverse: false,
        })
    }

    /// Returns the state of `edge` traversed towards `adj_node`.
    pub fn edge_state(&self, edge: EdgeId, adj_node: NodeId) -> StorageResult<BaseEdgeState<'_>> {
        let storage = self.storage.read();
        let entry = storage.entry(edge)?;
        let (base_node, reverse) = if adj_node == entry.node_b {
            (entry.node_a, false)
        } else if adj_node == entry.node_a {
            (entry.node_b, true)
        } else {
            return Err(StorageError::NodeNotAdjacent {
                edge,
                node: adj_node,
            });
        };
        Ok(BaseEdgeState {
            graph: self,
            edge,
            base_node,
            adj_node,
            reverse,
        })
    }

    pub fn edge_state_for_key(&self, key: EdgeKey) -> StorageResult<BaseEdgeState<'_>> {
        let storage = self.storage.read();
        let edge = key.edge();
        let entry = storage.entry(edge)?;
        let (base_node, adj_node) = if key.is_reverse() {
            (entry.node_b, entry.node_a)
        } else {
            (entry.node_a, entry.node_b)
        };
        Ok(BaseEdgeState {
            graph: self,
            edge,
            base_node,
            adj_node,
            reverse: key.is_reverse(),
        })
    }

    /// Returns the states of all edges touching `node`, each with `node` as base node, in
    /// insertion order.
    pub fn edges_of(&self, node: NodeId) -> StorageResult<Vec<BaseEdgeState<'_>>> {
        let storage = self.storage.read();
        storage.check_node(node)?;
        let states = storage.node_edges[node as usize]
            .iter()
            .map(|&edge| {
                let entry = &storage.edges[edge as usize];
                let (adj_node, reverse) = if entry.node_a == node {
                    (entry.node_b, false)
                } else {
                    (entry.node_a, true)
                };
                BaseEdgeState {
                    graph: self,
                    edge,
                    base_node: node,
                    adj_node,
                    reverse,
                }
            })
            .collect();
        Ok(states)
    }
}

/// A persisted edge of a [`BaseGraph`], traversed in one direction.
///
/// The state is a lightweight handle; all reads and writes go to the graph storage, so every
/// handle of the same edge observes the same values.
#[derive(Debug, Clone, Copy)]
pub struct BaseEdgeState<'g> {
    graph: &'g BaseGraph,
    edge: EdgeId,
    base_node: NodeId,
    adj_node: NodeId,
    reverse: bool,
}

impl BaseEdgeState<'_> {
    /// Whether this state traverses the edge against its storage direction.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    fn read<R>(&self, f: impl FnOnce(&Storage, &EdgeEntry) -> R) -> R {
        let guard = self.graph.storage.read();
        let storage: &Storage = &guard;
        f(storage, &storage.edges[self.edge as usize])
    }

    fn write<R>(&self, f: impl FnOnce(&mut EdgeEntry) -> R) -> R {
        let mut storage = self.graph.storage.write();
        f(&mut storage.edges[self.edge as usize])
    }
}

impl<'g> EdgeIteratorState for BaseEdgeState<'g> {
    type Detached = BaseEdgeState<'g>;

    fn detach(&self, reverse: bool) -> StorageResult<Self::Detached> {
        if !reverse || self.base_node == self.adj_node {
            return Ok(*self);
        }
        Ok(BaseEdgeState {
            graph: self.graph,
            edge: self.edge,
            base_node: self.adj_node,
            adj_node: self.base_node,
            reverse: !self.reverse,
        })
    }

    fn edge(&self) -> EdgeId {
        self.edge
    }

    fn edge_key(&self) -> EdgeKey {
        EdgeKey::for_edge(self.edge, self.base_node == self.adj_node, self.reverse)
    }

    fn base_node(&self) -> NodeId {
        self.base_node
    }

    fn adj_node(&self) -> NodeId {
        self.adj_node
    }

    fn fetch_way_geometry(&self, mode: FetchMode) -> PointList {
        self.read(|storage, entry| {
            let base = storage.points[self.base_node as usize];
            let adj = storage.points[self.adj_node as usize];
            if self.reverse {
                mode.assemble(base, entry.pillars.reversed().as_slice(), adj)
            } else {
                mode.assemble(base, entry.pillars.as_slice(), adj)
            }
        })
    }

    fn set_way_geometry(&mut self, pillars: PointList) -> StorageResult<&mut Self> {
        if pillars
            .iter()
            .any(|p| !(p.lat.is_finite() && p.lon.is_finite()))
        {
            return Err(StorageError::InvalidGeometry {
                edge: self.edge,
                reason: format!("non-finite coordinate in {pillars}"),
            });
        }
        let pillars = if self.reverse {
            pillars.reversed()
        } else {
            pillars
        };
        self.write(|entry| entry.pillars = pillars);
        Ok(self)
    }

    fn distance(&self) -> f64 {
        self.read(|_, entry| entry.distance)
    }

    fn set_distance(&mut self, distance: f64) -> StorageResult<&mut Self> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(StorageError::InvalidDistance(distance));
        }
        self.write(|entry| entry.distance = distance);
        Ok(self)
    }

    fn flags(&self) -> IntsRef {
        self.read(|_, entry| entry.flags.clone())
    }

    fn set_flags(&mut self, flags: IntsRef) -> StorageResult<&mut Self> {
        let expected = self.graph.config.flag_ints;
        if flags.len() != expected {
            return Err(StorageError::FlagsLength {
                edge: self.edge,
                expected,
                actual: flags.len(),
            });
        }
        self.write(|entry| entry.flags = flags);
        Ok(self)
    }

    fn get_bool(&self, property: &BooleanEncodedValue) -> bool {
        self.read(|_, entry| property.get_bool(self.reverse, &entry.flags))
    }

    fn set_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_bool(self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_reverse_bool(&self, property: &BooleanEncodedValue) -> bool {
        self.read(|_, entry| property.get_bool(!self.reverse, &entry.flags))
    }

    fn set_reverse_bool(
        &mut self,
        property: &BooleanEncodedValue,
        value: bool,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_bool(!self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_int(&self, property: &IntEncodedValue) -> i32 {
        self.read(|_, entry| property.get_int(self.reverse, &entry.flags))
    }

    fn set_int(&mut self, property: &IntEncodedValue, value: i32) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_int(self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_reverse_int(&self, property: &IntEncodedValue) -> i32 {
        self.read(|_, entry| property.get_int(!self.reverse, &entry.flags))
    }

    fn set_reverse_int(
        &mut self,
        property: &IntEncodedValue,
        value: i32,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_int(!self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        self.read(|_, entry| property.get_decimal(self.reverse, &entry.flags))
    }

    fn set_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_decimal(self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_reverse_decimal(&self, property: &DecimalEncodedValue) -> f64 {
        self.read(|_, entry| property.get_decimal(!self.reverse, &entry.flags))
    }

    fn set_reverse_decimal(
        &mut self,
        property: &DecimalEncodedValue,
        value: f64,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_decimal(!self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        self.read(|_, entry| property.get_enum(self.reverse, &entry.flags))
    }

    fn set_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_enum(self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn get_reverse_enum<T: EnumValue>(&self, property: &EnumEncodedValue<T>) -> T {
        self.read(|_, entry| property.get_enum(!self.reverse, &entry.flags))
    }

    fn set_reverse_enum<T: EnumValue>(
        &mut self,
        property: &EnumEncodedValue<T>,
        value: T,
    ) -> StorageResult<&mut Self> {
        self.write(|entry| property.set_enum(!self.reverse, &mut entry.flags, value))?;
        Ok(self)
    }

    fn name(&self) -> String {
        self.read(|_, entry| entry.name.clone())
    }

    fn set_name(&mut self, name: &str) -> &mut Self {
        self.write(|entry| entry.name = name.to_string());
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
        self.edge
    }

    fn orig_edge_last(&self) -> EdgeId {
        self.edge
    }
}

impl fmt::Display for BaseEdgeState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.edge, self.base_node, self.adj_node)
    }
}
