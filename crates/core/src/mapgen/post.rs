//! Derived terrain: walls, corridor widening, and gates at room/corridor junctions.
//!
//! Every pass collects its changes first and applies them afterwards, so a pass never
//! reacts to cells it converted itself.

use crate::config::GatePolicy;
use crate::grid::CellGrid;
use crate::types::{CellType, Pos};

/// Empty neighbours of room floors and gates become `Wall`. Runs before carving so
/// the carver knows where it crosses into a room.
pub(super) fn build_room_walls(grid: &mut CellGrid) {
    let walls = collect(grid, |grid, pos| {
        grid.get(pos) == CellType::Empty
            && grid.neighbor_cells(pos).any(|cell| cell.is_floor() || cell.is_gate())
    });
    apply(grid, &walls, CellType::Wall);
}

/// Widens corridors by one ring: Empty neighbours of `Path` become `ExpandedPath`.
pub(super) fn expand_paths(grid: &mut CellGrid) {
    let expanded = collect(grid, |grid, pos| {
        grid.get(pos) == CellType::Empty
            && grid.neighbor_cells(pos).any(|cell| cell == CellType::Path)
    });
    apply(grid, &expanded, CellType::ExpandedPath);
}

/// Encloses every walkable cell. Empty cells touching a room or gate become `Wall`,
/// those touching only corridors become `PathWall`.
pub(super) fn build_walls(grid: &mut CellGrid) {
    let mut walls = Vec::new();
    let mut path_walls = Vec::new();
    for pos in grid.positions() {
        if grid.get(pos) != CellType::Empty {
            continue;
        }
        let mut touches_room = false;
        let mut touches_corridor = false;
        for cell in grid.neighbor_cells(pos) {
            touches_room |= cell.is_floor() || cell.is_gate();
            touches_corridor |= cell.is_corridor();
        }
        if touches_room {
            walls.push(pos);
        } else if touches_corridor {
            path_walls.push(pos);
        }
    }
    apply(grid, &walls, CellType::Wall);
    apply(grid, &path_walls, CellType::PathWall);
}

pub(super) fn build_gates(grid: &mut CellGrid, policy: GatePolicy) {
    match policy {
        GatePolicy::Stamped => {
            let posts = collect(grid, |grid, pos| {
                grid.get(pos) == CellType::Wall
                    && touches(grid, pos, CellType::is_floor)
                    && touches(grid, pos, CellType::is_corridor)
                    && touches(grid, pos, |cell| cell == CellType::MainGate)
            });
            apply(grid, &posts, CellType::SubGate);
        }
        GatePolicy::Scan => {
            let gates = collect(grid, |grid, pos| {
                let cell = grid.get(pos);
                let junction = cell == CellType::Wall || cell.is_corridor();
                junction
                    && touches(grid, pos, CellType::is_floor)
                    && (cell.is_corridor() || touches(grid, pos, CellType::is_corridor))
            });
            apply(grid, &gates, CellType::Gate);
        }
    }
}

fn touches(grid: &CellGrid, pos: Pos, predicate: impl Fn(CellType) -> bool) -> bool {
    grid.neighbor_cells(pos).any(predicate)
}

fn collect(grid: &CellGrid, select: impl Fn(&CellGrid, Pos) -> bool) -> Vec<Pos> {
    grid.positions().filter(|&pos| select(grid, pos)).collect()
}

fn apply(grid: &mut CellGrid, positions: &[Pos], cell: CellType) {
    for &pos in positions {
        grid.set(pos, cell);
    }
}
