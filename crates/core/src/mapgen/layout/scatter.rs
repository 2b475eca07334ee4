//! Randomized scatter of fixed-size rooms, meant to be joined by triangulation.

use crate::config::GenerationConfig;
use crate::grid::CellGrid;
use crate::rng::MapRng;
use crate::types::Room;

use super::{RoomLayoutStrategy, place_room};

#[derive(Clone, Copy, Debug, Default)]
pub struct ScatterLayout;

impl RoomLayoutStrategy for ScatterLayout {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn place_rooms(
        &mut self,
        grid: &mut CellGrid,
        config: &GenerationConfig,
        rng: &mut MapRng,
    ) -> Vec<Room> {
        let size = config.room_size;
        let margin = config.margin;
        let target = target_room_count(config);
        let attempts = target * config.scatter.attempts_per_room;

        let mut placed: Vec<Room> = Vec::with_capacity(target);
        let (Some(max_x), Some(max_y)) = (
            grid.width().checked_sub(margin + size),
            grid.height().checked_sub(margin + size),
        ) else {
            log::warn!("scatter layout: no room of size {size} fits inside the grid margin");
            return placed;
        };
        if max_x < margin || max_y < margin {
            log::warn!("scatter layout: no room of size {size} fits inside the grid margin");
            return placed;
        }

        for _ in 0..attempts {
            if placed.len() >= target {
                break;
            }
            let candidate = Room::new(
                rng.range_inclusive(margin, max_x),
                rng.range_inclusive(margin, max_y),
                size,
                size,
            );
            if placed.iter().all(|existing| existing.is_separated_from(&candidate, margin)) {
                place_room(grid, candidate);
                placed.push(candidate);
            }
        }

        if placed.len() < target {
            log::warn!(
                "scatter layout placed {} of {target} rooms in {attempts} attempts on a {}x{} grid",
                placed.len(),
                grid.width(),
                grid.height()
            );
        }
        placed
    }
}

fn target_room_count(config: &GenerationConfig) -> usize {
    config.scatter.room_count.unwrap_or_else(|| {
        let (rooms_x, rooms_y) = config.lattice_capacity(config.margin);
        ((rooms_x * rooms_y) as f64 * 0.5).round().max(8.0) as usize
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_once_target_count_is_reached() {
        let mut config = GenerationConfig::default();
        config.scatter.room_count = Some(3);
        config.room_size = 4;
        let mut grid = CellGrid::new(64, 64);
        let rooms = ScatterLayout.place_rooms(&mut grid, &config, &mut MapRng::from_seed(8));
        assert_eq!(rooms.len(), 3);
    }

    #[test]
    fn shortfall_is_not_an_error() {
        let mut config = GenerationConfig::default();
        config.grid_width = 24;
        config.grid_height = 24;
        config.scatter.room_count = Some(50);
        let mut grid = CellGrid::new(24, 24);
        let rooms = ScatterLayout.place_rooms(&mut grid, &config, &mut MapRng::from_seed(2));
        assert!(!rooms.is_empty());
        assert!(rooms.len() < 50);
        for room in &rooms {
            assert!(room.x >= config.margin && room.right() < 24 - config.margin);
            assert!(room.y >= config.margin && room.bottom() < 24 - config.margin);
        }
    }

    #[test]
    fn default_target_follows_lattice_capacity() {
        let config = GenerationConfig::default();
        // 64 / (10 + 3) = 4 per axis; half of 16 is 8.
        assert_eq!(target_room_count(&config), 8);
        let wide = GenerationConfig { grid_width: 200, grid_height: 200, ..config };
        assert_eq!(target_room_count(&wide), 113);
    }
}
