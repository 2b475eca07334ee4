//! Public data models for generated maps and their rooms.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{LayoutStrategy, PathStrategy};
use crate::coords::{GridTransform, WorldPos};
use crate::grid::CellGrid;
use crate::types::{CellType, Direction, Pos, Room, RoomKind};

use super::connect::ConnectionGraph;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomInfo {
    pub rect: Room,
    pub center: Pos,
    pub world_center: WorldPos,
    /// Sides of the room that carry an entrance, used to orient room contents.
    pub gate_directions: Vec<Direction>,
    pub kind: RoomKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedMap {
    pub seed: u64,
    pub layout: LayoutStrategy,
    pub path_strategy: PathStrategy,
    pub grid: CellGrid,
    pub rooms: Vec<RoomInfo>,
    pub connections: ConnectionGraph,
    pub corridor_count: usize,
    pub start_room: Option<usize>,
    pub exit_room: Option<usize>,
    pub transform: GridTransform,
}

impl GeneratedMap {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        bytes.extend(self.grid.cells().iter().map(|&cell| cell_code(cell)));

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.rect.x, room.rect.y, room.rect.width, room.rect.height] {
                bytes.extend((value as u32).to_le_bytes());
            }
            bytes.push(match room.kind {
                RoomKind::Start => 0,
                RoomKind::Exit => 1,
                RoomKind::Normal => 2,
                RoomKind::Special => 3,
            });
            bytes.push(room.gate_directions.len() as u8);
            for direction in &room.gate_directions {
                bytes.push(match direction {
                    Direction::Up => 0,
                    Direction::Down => 1,
                    Direction::Left => 2,
                    Direction::Right => 3,
                });
            }
        }

        bytes.extend((self.connections.len() as u32).to_le_bytes());
        for (a, b) in self.connections.pairs() {
            bytes.extend((a as u32).to_le_bytes());
            bytes.extend((b as u32).to_le_bytes());
        }
        for room in [self.start_room, self.exit_room] {
            bytes.extend(room.map_or(u32::MAX, |index| index as u32).to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn cell_at(&self, pos: Pos) -> CellType {
        self.grid.get(pos)
    }

    pub fn start(&self) -> Option<&RoomInfo> {
        self.start_room.and_then(|index| self.rooms.get(index))
    }

    pub fn exit(&self) -> Option<&RoomInfo> {
        self.exit_room.and_then(|index| self.rooms.get(index))
    }
}

fn cell_code(cell: CellType) -> u8 {
    match cell {
        CellType::Empty => 0,
        CellType::Floor => 1,
        CellType::FloorCenter => 2,
        CellType::Path => 3,
        CellType::ExpandedPath => 4,
        CellType::Wall => 5,
        CellType::PathWall => 6,
        CellType::Gate => 7,
        CellType::MainGate => 8,
        CellType::SubGate => 9,
    }
}
