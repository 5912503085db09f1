#![allow(dead_code)]

use strum::VariantArray;
use waygraph_common::encoded_value::{
    BooleanEncodedValue, DecimalEncodedValue, EncodedValueInitializer, EnumEncodedValue,
    IntEncodedValue,
};
use waygraph_common::geometry::{Point, PointList};
use waygraph_common::types::{EdgeId, EdgeKey, NodeId};
use waygraph_storage::{
    BaseGraph, BaseGraphConfig, EdgeIteratorState, StorageResult, VirtualEdgeState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray)]
pub enum RoadClass {
    Other,
    Residential,
    Primary,
    Motorway,
}

pub struct Encoding {
    pub access: BooleanEncodedValue,
    pub speed: DecimalEncodedValue,
    pub lanes: IntEncodedValue,
    pub road_class: EnumEncodedValue<RoadClass>,
    pub flag_ints: usize,
}

pub fn create_encoding() -> Encoding {
    let mut init = EncodedValueInitializer::new();
    let access = BooleanEncodedValue::new(&mut init, "car_access", true);
    let speed = DecimalEncodedValue::new(&mut init, "car_speed", 5, 5.0, true).unwrap();
    let lanes = IntEncodedValue::new(&mut init, "lanes", 3, true).unwrap();
    let road_class = EnumEncodedValue::new(&mut init, "road_class", false).unwrap();
    Encoding {
        access,
        speed,
        lanes,
        road_class,
        flag_ints: init.required_ints(),
    }
}

pub const MAIN_STREET: EdgeId = 0;
pub const SIDE_STREET: EdgeId = 1;
/// The node a query point is snapped to, in the middle of `MAIN_STREET`.
pub const SNAPPED_NODE: NodeId = 3;

/// Builds `0 --MAIN_STREET--> 1 --SIDE_STREET--> 2`.
///
/// Main street is a one-way primary road (50 km/h forward), side street is a two-way
/// residential road (30 km/h forward, 20 km/h backward).
pub fn create_test_graph(encoding: &Encoding) -> StorageResult<BaseGraph> {
    let graph = BaseGraph::new(BaseGraphConfig::with_flag_ints(encoding.flag_ints));
    let n0 = graph.add_node(Point::new(52.0, 13.0));
    let n1 = graph.add_node(Point::new(52.0, 13.01));
    let n2 = graph.add_node(Point::new(52.01, 13.01));

    let mut main = graph.add_edge(n0, n1)?;
    main.set_bool(&encoding.access, true)?
        .set_reverse_bool(&encoding.access, false)?
        .set_name("Main Street");
    main.set_decimal(&encoding.speed, 50.0)?
        .set_int(&encoding.lanes, 2)?
        .set_enum(&encoding.road_class, RoadClass::Primary)?
        .set_distance(684.0)?
        .set_way_geometry(PointList::from(vec![Point::new(52.0, 13.005)]))?;

    let mut side = graph.add_edge(n1, n2)?;
    side.set_bool(&encoding.access, true)?
        .set_reverse_bool(&encoding.access, true)?
        .set_name("Side Street");
    side.set_decimal(&encoding.speed, 30.0)?
        .set_reverse_decimal(&encoding.speed, 20.0)?
        .set_int(&encoding.lanes, 1)?
        .set_reverse_int(&encoding.lanes, 1)?
        .set_enum(&encoding.road_class, RoadClass::Residential)?
        .set_distance(1112.0)?;

    Ok(graph)
}

/// Splits `MAIN_STREET` at its pillar point, returning the virtual edges `0 -> 3` and `3 -> 1`
/// in storage direction.
pub fn split_main_street(graph: &BaseGraph) -> StorageResult<(VirtualEdgeState, VirtualEdgeState)> {
    let main = graph.edge_state(MAIN_STREET, 1)?;
    let geometry = main.fetch_way_geometry(waygraph_common::geometry::FetchMode::All);
    let first_virtual = graph.edge_count() as EdgeId;
    let original = main.edge_key();

    let to_snap = VirtualEdgeState::new(EdgeKey::new(first_virtual, false), original, 0, SNAPPED_NODE)
        .with_distance(main.distance() / 2.0)
        .with_flags(main.flags())
        .with_name(main.name())
        .with_geometry(PointList::from(vec![geometry[0], geometry[1]]));
    let from_snap =
        VirtualEdgeState::new(EdgeKey::new(first_virtual + 1, false), original, SNAPPED_NODE, 1)
            .with_distance(main.distance() / 2.0)
            .with_flags(main.flags())
            .with_name(main.name())
            .with_geometry(PointList::from(vec![geometry[1], geometry[2]]));
    Ok((to_snap, from_snap))
}
