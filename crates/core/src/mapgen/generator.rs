//! High-level map generation orchestration: layout, connections, carving, walls, gates.

use crate::config::{ConfigError, GatePolicy, GenerationConfig};
use crate::grid::CellGrid;
use crate::rng::{MapRng, Stage};
use crate::types::{CellType, Room};

use super::carve::CorridorCarver;
use super::connect::{ConnectionGraph, build_connections};
use super::layout::{CorridorPlan, layout_for};
use super::model::{GeneratedMap, RoomInfo};
use super::post;
use super::rooms::{assign_kinds, gate_directions, start_and_exit};

pub struct MapGenerator {
    config: GenerationConfig,
}

impl MapGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate(&self, seed: u64) -> GeneratedMap {
        let config = &self.config;
        let mut grid = CellGrid::new(config.grid_width, config.grid_height);
        let mut layout_rng = MapRng::for_stage(seed, Stage::Layout);
        let mut layout = layout_for(config.layout_strategy);
        let rooms = layout.place_rooms(&mut grid, config, &mut layout_rng);
        post::build_room_walls(&mut grid);

        let (connections, to_carve) = match layout.corridor_plan() {
            CorridorPlan::Triangulate => {
                let mut rng = MapRng::for_stage(seed, Stage::Connections);
                let graph = build_connections(&rooms, &config.connections, &mut rng);
                let pairs = graph.pairs().collect();
                (graph, pairs)
            }
            CorridorPlan::Explicit(pairs) => (graph_from(&rooms, &pairs), pairs),
            CorridorPlan::Carved(pairs) => (graph_from(&rooms, &pairs), Vec::new()),
        };

        let mut carve_rng = MapRng::for_stage(seed, Stage::Carving);
        let mut carver =
            CorridorCarver::new(&grid, config.path_strategy, config.gate_policy, config.costs);
        for (a, b) in to_carve {
            carver.carve(&mut grid, rooms[a].center(), rooms[b].center(), &mut carve_rng);
        }

        post::expand_paths(&mut grid);
        post::build_walls(&mut grid);
        post::build_gates(&mut grid, config.gate_policy);
        post::build_walls(&mut grid);

        let gate_cell = match config.gate_policy {
            GatePolicy::Stamped => CellType::MainGate,
            GatePolicy::Scan => CellType::Gate,
        };
        let start_exit = start_and_exit(&rooms, layout.start_room());
        let kinds =
            assign_kinds(rooms.len(), start_exit, layout.special_room_count(), &mut layout_rng);
        let transform = config.transform();
        let room_infos = rooms
            .iter()
            .zip(kinds)
            .map(|(&rect, kind)| RoomInfo {
                rect,
                center: rect.center(),
                world_center: transform.cell_center(rect.center()),
                gate_directions: gate_directions(&grid, rect, gate_cell),
                kind,
            })
            .collect();

        log::info!(
            "generated {} map for seed {seed}: {} rooms, {} corridors",
            layout.name(),
            rooms.len(),
            connections.len()
        );

        GeneratedMap {
            seed,
            layout: config.layout_strategy,
            path_strategy: config.path_strategy,
            grid,
            rooms: room_infos,
            corridor_count: connections.len(),
            connections,
            start_room: start_exit.map(|(start, _)| start),
            exit_room: start_exit.map(|(_, exit)| exit),
            transform,
        }
    }
}

fn graph_from(rooms: &[Room], pairs: &[(usize, usize)]) -> ConnectionGraph {
    let mut graph = ConnectionGraph::new(rooms.len());
    for &(a, b) in pairs {
        graph.connect(a, b);
    }
    graph
}
