//! Per-room metadata derived from the finished grid: entrance directions and roles.

use std::collections::BTreeSet;

use crate::grid::CellGrid;
use crate::rng::MapRng;
use crate::types::{CellType, Direction, Pos, Room, RoomKind};

/// Sides of `room` that carry an entrance cell of type `gate`.
///
/// A gate counts when it sits directly outside an edge within that edge's span, or on
/// the edge itself (corners excluded, they belong to two sides).
pub(super) fn gate_directions(grid: &CellGrid, room: Room, gate: CellType) -> Vec<Direction> {
    let mut sides = BTreeSet::new();
    let outer = room.expanded(1);
    for pos in outer.cells() {
        if grid.get(pos) != gate {
            continue;
        }
        if let Some(side) = side_of(room, pos) {
            sides.insert(side);
        }
    }
    sides.into_iter().collect()
}

fn side_of(room: Room, pos: Pos) -> Option<Direction> {
    let (left, top) = (room.x as i32, room.y as i32);
    let (right, bottom) = (room.right() as i32, room.bottom() as i32);
    let within_x = (left..=right).contains(&pos.x);
    let within_y = (top..=bottom).contains(&pos.y);
    let inner_x = (left + 1..right).contains(&pos.x);
    let inner_y = (top + 1..bottom).contains(&pos.y);

    if (pos.y == top - 1 && within_x) || (pos.y == top && inner_x) {
        Some(Direction::Up)
    } else if (pos.y == bottom + 1 && within_x) || (pos.y == bottom && inner_x) {
        Some(Direction::Down)
    } else if (pos.x == left - 1 && within_y) || (pos.x == left && inner_y) {
        Some(Direction::Left)
    } else if (pos.x == right + 1 && within_y) || (pos.x == right && inner_y) {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Start and exit room indices. A fixed start keeps its index and pairs with the room
/// furthest from it; otherwise the furthest-apart pair wins, lower index first.
pub(super) fn start_and_exit(
    rooms: &[Room],
    fixed_start: Option<usize>,
) -> Option<(usize, usize)> {
    if rooms.is_empty() {
        return None;
    }
    if let Some(start) = fixed_start.filter(|&start| start < rooms.len()) {
        let exit = furthest_from(rooms, start);
        return Some((start, exit));
    }
    let mut best = (0, 0);
    let mut best_distance = 0;
    for a in 0..rooms.len() {
        for b in a + 1..rooms.len() {
            let distance = distance_sq(rooms[a].center(), rooms[b].center());
            if distance > best_distance {
                best = (a, b);
                best_distance = distance;
            }
        }
    }
    Some(best)
}

fn furthest_from(rooms: &[Room], origin: usize) -> usize {
    let center = rooms[origin].center();
    let mut exit = origin;
    let mut best_distance = 0;
    for (index, room) in rooms.iter().enumerate() {
        let distance = distance_sq(center, room.center());
        if distance > best_distance {
            exit = index;
            best_distance = distance;
        }
    }
    exit
}

fn distance_sq(a: Pos, b: Pos) -> i64 {
    let dx = i64::from(a.x - b.x);
    let dy = i64::from(a.y - b.y);
    dx * dx + dy * dy
}

/// Kinds for every room: start, exit, then `special_count` random others.
pub(super) fn assign_kinds(
    room_count: usize,
    start_exit: Option<(usize, usize)>,
    special_count: usize,
    rng: &mut MapRng,
) -> Vec<RoomKind> {
    let mut kinds = vec![RoomKind::Normal; room_count];
    let Some((start, exit)) = start_exit else {
        return kinds;
    };
    kinds[exit] = RoomKind::Exit;
    kinds[start] = RoomKind::Start;

    let mut candidates: Vec<usize> =
        (0..room_count).filter(|&room| room != start && room != exit).collect();
    rng.shuffle(&mut candidates);
    for room in candidates.into_iter().take(special_count) {
        kinds[room] = RoomKind::Special;
    }
    kinds
}
