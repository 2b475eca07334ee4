use dungeon_core::config::{ConnectionConfig, ExtraEdges};
use dungeon_core::mapgen::build_connections;
use dungeon_core::nav::{Footprint, Structure, StructureKind};
use dungeon_core::rng::MapRng;
use dungeon_core::search::manhattan_distance;
use dungeon_core::{
    BuildingGrid, CellType, Direction, DungeonNavigator, GenerationConfig, LayoutStrategy,
    MapGenerator, Movement, NodeId, PathNode, PathSearch, PatrolRoute, Pos, Room, RoomKind,
    SearchRules, SearchState,
};

#[test]
fn test_small_bsp_map_routes_between_first_and_last_room() {
    let config = GenerationConfig {
        seed: 42,
        grid_width: 20,
        grid_height: 20,
        room_size: 6,
        layout_strategy: LayoutStrategy::Bsp,
        ..GenerationConfig::default()
    };
    let map = MapGenerator::new(config.clone()).expect("valid config").generate(config.seed);
    assert!(map.rooms.len() >= 2, "20x20 grid should split at least once:\n{}", map.grid);

    let start = map.rooms[0].center;
    let goal = map.rooms[map.rooms.len() - 1].center;
    let mut navigator = DungeonNavigator::new(&map.grid, Movement::Cardinal);
    let path = navigator.find_path(start, goal).expect("rooms are connected");
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for pair in path.windows(2) {
        assert!(pair[0].is_cardinal_neighbor(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        assert!(map.cell_at(pair[1]).is_walkable());
    }
}

#[test]
fn test_square_of_rooms_spans_with_three_corridors() {
    let rooms = [
        Room::new(2, 2, 4, 4),
        Room::new(2, 50, 4, 4),
        Room::new(50, 2, 4, 4),
        Room::new(50, 50, 4, 4),
    ];
    let config =
        ConnectionConfig { extra_edges: ExtraEdges::LongerThan(1e3), max_indirect_depth: 2 };
    let graph = build_connections(&rooms, &config, &mut MapRng::from_seed(0));
    assert_eq!(graph.len(), 3);
    let pairs: Vec<(usize, usize)> = graph.pairs().collect();
    assert!(!pairs.contains(&(0, 3)) && !pairs.contains(&(1, 2)), "diagonal chosen: {pairs:?}");
}

#[test]
fn test_generated_map_exposes_start_exit_and_gate_directions() {
    let map = MapGenerator::new(GenerationConfig::default()).expect("valid config").generate(9);
    let start = map.start().expect("start room");
    let exit = map.exit().expect("exit room");
    assert_eq!(start.kind, RoomKind::Start);
    assert_eq!(exit.kind, RoomKind::Exit);
    assert!(map.rooms.iter().any(|room| !room.gate_directions.is_empty()));
    assert_eq!(map.corridor_count, map.connections.len());
    assert!(map.grid.count(CellType::MainGate) > 0);

    let world = start.world_center;
    assert_eq!(map.transform.world_to_grid(world), start.center);

    let mut navigator = DungeonNavigator::new(&map.grid, Movement::Octile);
    assert!(navigator.find_path(start.center, exit.center).is_some());
    let patrol = PatrolRoute::plan(&map, &mut navigator);
    assert_eq!(patrol.rooms.len(), map.rooms.len());
}

struct Waypoint {
    pos: Pos,
    links: Vec<usize>,
    state: SearchState,
}

impl PathNode for Waypoint {
    fn search_state(&self) -> &SearchState {
        &self.state
    }

    fn search_state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }
}

struct Links;

impl SearchRules<Waypoint> for Links {
    fn neighbors(&self, nodes: &[Waypoint], node: NodeId, out: &mut Vec<NodeId>) {
        out.extend(nodes[node.0].links.iter().map(|&link| NodeId(link)));
    }

    fn move_cost(&self, nodes: &[Waypoint], from: NodeId, to: NodeId) -> f32 {
        manhattan_distance(nodes[from.0].pos, nodes[to.0].pos)
    }

    fn heuristic(&self, nodes: &[Waypoint], from: NodeId, goal: NodeId) -> f32 {
        manhattan_distance(nodes[from.0].pos, nodes[goal.0].pos)
    }
}

fn waypoints() -> PathSearch<Waypoint> {
    let raw = [
        ((0, 0), vec![1, 2]),
        ((0, 4), vec![0, 3]),
        ((4, 0), vec![0, 3]),
        ((4, 4), vec![1, 2, 4]),
        ((8, 4), vec![3]),
        ((9, 9), vec![]),
    ];
    PathSearch::new(
        raw.into_iter()
            .map(|((x, y), links)| Waypoint {
                pos: Pos { y, x },
                links,
                state: SearchState::default(),
            })
            .collect(),
    )
}

#[test]
fn test_generic_search_over_caller_defined_nodes() {
    let mut search = waypoints();
    let path = search.find_path(NodeId(0), NodeId(4), &Links).expect("linked");
    assert_eq!(path.first(), Some(&NodeId(0)));
    assert_eq!(path.last(), Some(&NodeId(4)));
    assert_eq!(path.len(), 4);
    assert_eq!(search.node(NodeId(4)).map(|node| node.g_cost()), Some(12.0));

    assert_eq!(search.find_path(NodeId(0), NodeId(5), &Links), None, "isolated waypoint");

    let second = search.find_path(NodeId(4), NodeId(1), &Links);
    let baseline = waypoints().find_path(NodeId(4), NodeId(1), &Links);
    assert_eq!(second, baseline);
}

#[test]
fn test_building_roads_connect_facing_entrances() {
    let mut site = BuildingGrid::new(12, 6);
    let hq = site
        .place(Structure {
            kind: StructureKind::Headquarters,
            footprint: Footprint::new(0, 0, 3, 3),
            facing: Direction::Down,
        })
        .expect("free footprint");
    for pos in [Pos { y: 3, x: 1 }, Pos { y: 4, x: 1 }] {
        site.place_road(pos).expect("free cell");
    }
    for x in 2..=8 {
        site.place_road(Pos { y: 4, x }).expect("free cell");
    }
    let ride = site
        .place(Structure {
            kind: StructureKind::Attraction,
            footprint: Footprint::new(9, 3, 3, 3),
            facing: Direction::Left,
        })
        .expect("free footprint");
    assert!(site.is_connected_by_road(hq, ride));
    assert!(site.is_connected_by_road(ride, hq));
}
