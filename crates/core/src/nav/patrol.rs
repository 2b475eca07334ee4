//! Patrol routes that sweep every room of a generated map.

use std::collections::BTreeSet;

use crate::mapgen::GeneratedMap;
use crate::types::Pos;

use super::dungeon::DungeonNavigator;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatrolRoute {
    /// Rooms in visiting order.
    pub rooms: Vec<usize>,
    /// Stitched cell path through every reachable room center.
    pub cells: Vec<Pos>,
    /// Legs that could not be walked, as `(from_room, to_room)`.
    pub skipped: Vec<(usize, usize)>,
}

impl PatrolRoute {
    /// Visits rooms in depth-first order of the connection graph, starting at the map's
    /// start room. Unreachable legs are skipped and the walk resumes from the last room
    /// actually reached.
    pub fn plan(map: &GeneratedMap, navigator: &mut DungeonNavigator) -> Self {
        let mut route = PatrolRoute::default();
        let Some(start) = map.start_room.or((!map.rooms.is_empty()).then_some(0)) else {
            return route;
        };
        route.rooms = depth_first_order(map, start);

        let mut current = start;
        route.cells.push(map.rooms[start].center);
        for &next in &route.rooms[1..] {
            let (from, to) = (map.rooms[current].center, map.rooms[next].center);
            match navigator.find_path(from, to) {
                Some(leg) => {
                    route.cells.extend(leg.into_iter().skip(1));
                    current = next;
                }
                None => {
                    log::warn!("patrol leg from room {current} to room {next} is unreachable");
                    route.skipped.push((current, next));
                }
            }
        }
        route
    }
}

fn depth_first_order(map: &GeneratedMap, start: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(map.rooms.len());
    let mut visited = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(room) = stack.pop() {
        if !visited.insert(room) {
            continue;
        }
        order.push(room);
        let unvisited: Vec<usize> =
            map.connections.neighbors(room).filter(|next| !visited.contains(next)).collect();
        // Reverse so the lowest-numbered neighbour is explored first.
        stack.extend(unvisited.into_iter().rev());
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, LayoutStrategy};
    use crate::mapgen::MapGenerator;
    use crate::nav::Movement;
    use crate::types::CellType;

    fn map(layout: LayoutStrategy, seed: u64) -> GeneratedMap {
        let config = GenerationConfig { layout_strategy: layout, ..GenerationConfig::default() };
        MapGenerator::new(config).expect("valid config").generate(seed)
    }

    #[test]
    fn patrol_visits_every_connected_room_once() {
        for layout in LayoutStrategy::ALL {
            let map = map(layout, 31);
            let mut navigator = DungeonNavigator::new(&map.grid, Movement::Cardinal);
            let route = PatrolRoute::plan(&map, &mut navigator);
            assert_eq!(route.rooms.first(), map.start_room.as_ref(), "{layout:?}");
            assert_eq!(route.rooms.len(), map.rooms.len(), "{layout:?}: every room is linked");
            let unique: BTreeSet<usize> = route.rooms.iter().copied().collect();
            assert_eq!(unique.len(), route.rooms.len());
            assert!(route.skipped.is_empty(), "{layout:?}: {:?}", route.skipped);
            for room in &map.rooms {
                assert!(route.cells.contains(&room.center), "{layout:?}: missed {room:?}");
            }
            for pair in route.cells.windows(2) {
                assert!(pair[0].is_cardinal_neighbor(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn blocked_legs_are_skipped_not_fatal() {
        let map = map(LayoutStrategy::Scatter, 8);
        assert!(map.rooms.len() >= 2);
        let mut walled = map.grid.clone();
        let target_index = map.rooms.len() - 1;
        let target = map.rooms[target_index].rect;
        for pos in target.cells() {
            walled.set(pos, CellType::Wall);
        }
        let mut navigator = DungeonNavigator::new(&walled, Movement::Cardinal);
        let route = PatrolRoute::plan(&map, &mut navigator);
        assert_eq!(route.rooms.len(), map.rooms.len());
        assert!(route.skipped.iter().any(|&(_, to)| to == target_index), "{:?}", route.skipped);
        assert!(!route.cells.contains(&target.center()));
    }
}
