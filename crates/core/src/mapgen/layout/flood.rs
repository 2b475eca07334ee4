//! Flood-growth layout: rooms spread breadth-first over an abstract lattice, each new
//! room linked to the room it grew from by a short straight corridor stub.

use std::collections::{BTreeMap, VecDeque};

use crate::config::{GatePolicy, GenerationConfig};
use crate::grid::CellGrid;
use crate::rng::MapRng;
use crate::types::{CellType, Direction, Pos, Room};

use super::{CorridorPlan, RoomLayoutStrategy, place_room};

type LatticePos = (i32, i32);

#[derive(Clone, Debug, Default)]
pub struct FloodLayout {
    pairs: Vec<(usize, usize)>,
    start: Option<usize>,
    special_rooms: usize,
}

impl RoomLayoutStrategy for FloodLayout {
    fn name(&self) -> &'static str {
        "flood"
    }

    fn place_rooms(
        &mut self,
        grid: &mut CellGrid,
        config: &GenerationConfig,
        rng: &mut MapRng,
    ) -> Vec<Room> {
        self.pairs.clear();
        self.start = None;
        self.special_rooms = config.flood.special_rooms;

        let Some(frame) = LatticeFrame::new(grid, config) else {
            log::warn!(
                "flood layout: room size {} does not fit a {}x{} grid",
                config.room_size,
                grid.width(),
                grid.height()
            );
            return Vec::new();
        };
        let max_rooms = max_rooms(config);
        let flood = config.flood;

        let mut lattice = grow(&frame, max_rooms, config, rng);
        let mut retries = 0;
        while lattice.cells.len() < flood.min_rooms && retries < flood.retries {
            log::warn!(
                "flood layout grew only {} rooms (minimum {}), regrowing",
                lattice.cells.len(),
                flood.min_rooms
            );
            retries += 1;
            lattice = grow(&frame, max_rooms, config, rng);
        }
        if lattice.cells.len() < flood.min_rooms {
            log::warn!(
                "flood layout proceeding with {} rooms after {retries} retries",
                lattice.cells.len()
            );
        }

        let mut placed = Vec::with_capacity(lattice.cells.len());
        let mut indices = Vec::with_capacity(lattice.cells.len());
        for &cell in &lattice.cells {
            if let Some(room) = frame.room_at(cell) {
                placed.push(room);
                indices.push(place_room(grid, room));
            }
        }
        for &(parent, child, toward_parent) in &lattice.links {
            carve_stub(grid, placed[child], toward_parent, config);
            self.pairs.push((indices[parent], indices[child]));
        }
        self.start = indices.first().copied();
        placed
    }

    fn corridor_plan(&self) -> CorridorPlan {
        CorridorPlan::Carved(self.pairs.clone())
    }

    fn start_room(&self) -> Option<usize> {
        self.start
    }

    fn special_room_count(&self) -> usize {
        self.special_rooms
    }
}

/// Maps lattice coordinates to room rectangles; the origin sits near the grid center.
struct LatticeFrame {
    anchor: (i64, i64),
    step: i64,
    room_size: usize,
    width: usize,
    height: usize,
}

impl LatticeFrame {
    fn new(grid: &CellGrid, config: &GenerationConfig) -> Option<Self> {
        let room_size = config.room_size;
        let anchor_x = (grid.width() / 2).min(grid.width().checked_sub(room_size + 2)?);
        let anchor_y = (grid.height() / 2).min(grid.height().checked_sub(room_size + 2)?);
        if anchor_x < 1 || anchor_y < 1 {
            return None;
        }
        Some(Self {
            anchor: (anchor_x as i64, anchor_y as i64),
            step: (room_size + config.margin) as i64,
            room_size,
            width: grid.width(),
            height: grid.height(),
        })
    }

    fn room_at(&self, cell: LatticePos) -> Option<Room> {
        let x = self.anchor.0 + i64::from(cell.0) * self.step;
        let y = self.anchor.1 + i64::from(cell.1) * self.step;
        let size = self.room_size as i64;
        let fits = x >= 1
            && y >= 1
            && x + size < self.width as i64 - 1
            && y + size < self.height as i64 - 1;
        fits.then(|| Room::new(x as usize, y as usize, self.room_size, self.room_size))
    }
}

#[derive(Default)]
struct Lattice {
    cells: Vec<LatticePos>,
    index: BTreeMap<LatticePos, usize>,
    /// (parent, child, direction from child toward parent)
    links: Vec<(usize, usize, Direction)>,
}

impl Lattice {
    fn insert(&mut self, cell: LatticePos) -> usize {
        self.cells.push(cell);
        self.index.insert(cell, self.cells.len() - 1);
        self.cells.len() - 1
    }
}

fn max_rooms(config: &GenerationConfig) -> usize {
    config.flood.max_rooms.unwrap_or_else(|| {
        let (rooms_x, rooms_y) = config.lattice_capacity(config.margin);
        ((rooms_x * rooms_y) as f64 * 0.3).round().max(8.0) as usize
    })
}

fn grow(
    frame: &LatticeFrame,
    max_rooms: usize,
    config: &GenerationConfig,
    rng: &mut MapRng,
) -> Lattice {
    let mut lattice = Lattice::default();
    if frame.room_at((0, 0)).is_none() || max_rooms == 0 {
        return lattice;
    }
    let origin = lattice.insert((0, 0));
    let mut frontier = VecDeque::from([origin]);

    while lattice.cells.len() < max_rooms {
        let Some(current) = frontier.pop_front() else {
            break;
        };
        let mut directions = Direction::ALL;
        rng.shuffle(&mut directions);
        for direction in directions {
            let (dx, dy) = direction.delta();
            let (cx, cy) = lattice.cells[current];
            let next = (cx + dx, cy + dy);
            if lattice.index.contains_key(&next) || frame.room_at(next).is_none() {
                continue;
            }
            let progress = lattice.cells.len() as f64 / max_rooms as f64;
            let spawn_chance = config.flood.initial_chance
                + (config.flood.final_chance - config.flood.initial_chance) * progress;
            if !rng.chance(spawn_chance) {
                continue;
            }
            let child = lattice.insert(next);
            lattice.links.push((current, child, direction.opposite()));
            frontier.push_back(child);
            if lattice.cells.len() >= max_rooms {
                break;
            }
        }
    }
    lattice
}

/// Straight corridor from the middle of `room`'s edge facing `direction`, across the
/// lattice gap, onto the facing edge of the neighbouring room.
fn carve_stub(grid: &mut CellGrid, room: Room, direction: Direction, config: &GenerationConfig) {
    let start = match direction {
        Direction::Up => Pos { y: room.y as i32, x: (room.x + room.width / 2) as i32 },
        Direction::Down => Pos { y: room.bottom() as i32, x: (room.x + room.width / 2) as i32 },
        Direction::Left => Pos { y: (room.y + room.height / 2) as i32, x: room.x as i32 },
        Direction::Right => Pos { y: (room.y + room.height / 2) as i32, x: room.right() as i32 },
    };
    let mut pos = start;
    for _ in 0..config.margin {
        pos = pos.offset(direction);
        if grid.get(pos) == CellType::Empty {
            grid.set(pos, CellType::Path);
        }
    }
    let end = pos.offset(direction);
    if config.gate_policy == GatePolicy::Stamped {
        grid.set(start, CellType::MainGate);
        grid.set(end, CellType::MainGate);
    }
}
