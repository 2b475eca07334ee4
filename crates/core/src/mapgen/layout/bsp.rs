//! Binary space partitioning layouts.

use std::cmp::Ordering;

use crate::config::GenerationConfig;
use crate::grid::CellGrid;
use crate::rng::MapRng;
use crate::types::Room;

use super::{CorridorPlan, RoomLayoutStrategy, place_room};

/// One room of random size per leaf partition.
#[derive(Clone, Copy, Debug, Default)]
pub struct BspLayout;

/// Each leaf partition, minus the margin, becomes a room. Corridors follow the tree.
#[derive(Clone, Debug, Default)]
pub struct BspFullLayout {
    pairs: Vec<(usize, usize)>,
}

impl RoomLayoutStrategy for BspLayout {
    fn name(&self) -> &'static str {
        "bsp"
    }

    fn place_rooms(
        &mut self,
        grid: &mut CellGrid,
        config: &GenerationConfig,
        rng: &mut MapRng,
    ) -> Vec<Room> {
        let Some(root) = interior_area(grid) else {
            return Vec::new();
        };
        let min_room = config.bsp_min_room_size();
        let max_room = config.bsp_max_room_size();
        let margin = config.margin;
        let mut tree = Partition::build(root, 0, config.bsp.max_depth, min_room + margin, rng);

        let mut placed = Vec::new();
        tree.assign_rooms(&mut |area: Room| -> Option<usize> {
            let room = sized_room(area, min_room, max_room, margin, rng)?;
            placed.push(room);
            Some(place_room(grid, room))
        });
        placed
    }
}

impl RoomLayoutStrategy for BspFullLayout {
    fn name(&self) -> &'static str {
        "bsp_full"
    }

    fn place_rooms(
        &mut self,
        grid: &mut CellGrid,
        config: &GenerationConfig,
        rng: &mut MapRng,
    ) -> Vec<Room> {
        self.pairs.clear();
        let Some(root) = interior_area(grid) else {
            return Vec::new();
        };
        let margin = config.margin;
        let min_split = config.bsp.full_min_split.max(margin + 3);
        let mut tree = Partition::build(root, 0, config.bsp.max_depth, min_split, rng);

        let mut placed = Vec::new();
        tree.assign_rooms(&mut |area: Room| -> Option<usize> {
            if area.width <= margin || area.height <= margin {
                return None;
            }
            let room = Room::new(area.x, area.y, area.width - margin, area.height - margin);
            placed.push(room);
            Some(place_room(grid, room))
        });
        tree.connection_pairs(grid.rooms(), &mut self.pairs);
        placed
    }

    fn corridor_plan(&self) -> CorridorPlan {
        CorridorPlan::Explicit(self.pairs.clone())
    }
}

enum Partition {
    Leaf { area: Room, room: Option<usize> },
    Split { first: Box<Partition>, second: Box<Partition> },
}

impl Partition {
    fn build(area: Room, depth: u32, max_depth: u32, min_split: usize, rng: &mut MapRng) -> Self {
        let leaf = Partition::Leaf { area, room: None };
        if depth >= max_depth {
            return leaf;
        }
        let split_rows = match area.width.cmp(&area.height) {
            Ordering::Greater => false,
            Ordering::Less => true,
            Ordering::Equal => rng.coin(),
        };
        let extent = if split_rows { area.height } else { area.width };
        if extent < min_split * 2 {
            return leaf;
        }

        let cut = rng.range_inclusive(min_split, extent - min_split);
        let (first, second) = if split_rows {
            (
                Room::new(area.x, area.y, area.width, cut),
                Room::new(area.x, area.y + cut, area.width, area.height - cut),
            )
        } else {
            (
                Room::new(area.x, area.y, cut, area.height),
                Room::new(area.x + cut, area.y, area.width - cut, area.height),
            )
        };
        Partition::Split {
            first: Box::new(Partition::build(first, depth + 1, max_depth, min_split, rng)),
            second: Box::new(Partition::build(second, depth + 1, max_depth, min_split, rng)),
        }
    }

    /// Visits leaves left to right; `assign` returns the room index placed in the leaf.
    fn assign_rooms<F: FnMut(Room) -> Option<usize>>(&mut self, assign: &mut F) {
        match self {
            Partition::Leaf { area, room } => *room = assign(*area),
            Partition::Split { first, second } => {
                first.assign_rooms(assign);
                second.assign_rooms(assign);
            }
        }
    }

    fn collect_rooms(&self, out: &mut Vec<usize>) {
        match self {
            Partition::Leaf { room, .. } => out.extend(*room),
            Partition::Split { first, second } => {
                first.collect_rooms(out);
                second.collect_rooms(out);
            }
        }
    }

    /// For every split, the closest pair of rooms across its two halves, children first.
    fn connection_pairs(&self, rooms: &[Room], pairs: &mut Vec<(usize, usize)>) {
        let Partition::Split { first, second } = self else {
            return;
        };
        first.connection_pairs(rooms, pairs);
        second.connection_pairs(rooms, pairs);

        let mut left = Vec::new();
        let mut right = Vec::new();
        first.collect_rooms(&mut left);
        second.collect_rooms(&mut right);
        let closest = left
            .iter()
            .flat_map(|&a| right.iter().map(move |&b| (a, b)))
            .min_by_key(|&(a, b)| (rooms[a].center().manhattan(rooms[b].center()), a, b));
        pairs.extend(closest);
    }
}

fn interior_area(grid: &CellGrid) -> Option<Room> {
    (grid.width() >= 3 && grid.height() >= 3)
        .then(|| Room::new(1, 1, grid.width() - 2, grid.height() - 2))
}

/// Random room inside `area`, leaving `margin` free cells on its right and bottom side.
fn sized_room(
    area: Room,
    min_room: usize,
    max_room: usize,
    margin: usize,
    rng: &mut MapRng,
) -> Option<Room> {
    let usable_width = area.width.checked_sub(margin)?;
    let usable_height = area.height.checked_sub(margin)?;
    if usable_width < min_room || usable_height < min_room {
        return None;
    }
    let width = rng.range_inclusive(min_room, max_room.min(usable_width));
    let height = rng.range_inclusive(min_room, max_room.min(usable_height));
    let x = area.x + rng.range_inclusive(0, usable_width - width);
    let y = area.y + rng.range_inclusive(0, usable_height - height);
    Some(Room::new(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: usize, height: usize, room_size: usize) -> GenerationConfig {
        GenerationConfig {
            grid_width: width,
            grid_height: height,
            room_size,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn rooms_respect_configured_size_bounds() {
        let config = config(64, 64, 8);
        let mut grid = CellGrid::new(64, 64);
        let rooms = BspLayout.place_rooms(&mut grid, &config, &mut MapRng::from_seed(77));
        assert!(rooms.len() >= 4, "a 64x64 grid should hold several rooms, got {}", rooms.len());
        for room in rooms {
            for side in [room.width, room.height] {
                assert!(
                    (config.bsp_min_room_size()..=config.bsp_max_room_size()).contains(&side),
                    "room side {side} outside configured bounds: {room:?}"
                );
            }
        }
    }

    #[test]
    fn fixed_size_rooms_fill_an_exact_two_by_two_split() {
        let mut config = config(20, 20, 6);
        config.bsp.min_room_size = Some(6);
        config.bsp.max_room_size = Some(6);
        let mut grid = CellGrid::new(20, 20);
        let rooms = BspLayout.place_rooms(&mut grid, &config, &mut MapRng::from_seed(42));
        assert_eq!(rooms.len(), 4);
        assert!(rooms.iter().all(|room| room.width == 6 && room.height == 6));
    }

    #[test]
    fn full_partition_links_every_room_through_the_tree() {
        let config = config(48, 40, 10);
        let mut grid = CellGrid::new(48, 40);
        let mut layout = BspFullLayout::default();
        let rooms = layout.place_rooms(&mut grid, &config, &mut MapRng::from_seed(3));
        let CorridorPlan::Explicit(pairs) = layout.corridor_plan() else {
            panic!("full partition layout must carve along its tree");
        };
        assert!(rooms.len() >= 2);
        assert_eq!(pairs.len(), rooms.len() - 1, "a tree over n rooms has n - 1 links");

        let mut reached = vec![false; rooms.len()];
        reached[0] = true;
        let mut changed = true;
        while changed {
            changed = false;
            for &(a, b) in &pairs {
                if reached[a] != reached[b] {
                    reached[a] = true;
                    reached[b] = true;
                    changed = true;
                }
            }
        }
        assert!(reached.iter().all(|&flag| flag), "tree links leave a room isolated: {pairs:?}");
    }
}
