//! Room placement strategies behind a shared capability trait.

mod bsp;
mod flood;
mod scatter;

use crate::config::{GenerationConfig, LayoutStrategy};
use crate::grid::CellGrid;
use crate::rng::MapRng;
use crate::types::Room;

pub use bsp::{BspFullLayout, BspLayout};
pub use flood::FloodLayout;
pub use scatter::ScatterLayout;

/// How rooms produced by a layout get their corridors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CorridorPlan {
    /// Delaunay triangulation, spanning tree, selective extra edges.
    #[default]
    Triangulate,
    /// Carve exactly these room pairs.
    Explicit(Vec<(usize, usize)>),
    /// Corridors already stamped during placement; record these pairs only.
    Carved(Vec<(usize, usize)>),
}

pub trait RoomLayoutStrategy {
    fn name(&self) -> &'static str;

    /// Stamps `Floor`/`FloorCenter` cells into `grid`, registers each room on it and
    /// returns the rooms placed by this call. Running out of space is not an error.
    fn place_rooms(
        &mut self,
        grid: &mut CellGrid,
        config: &GenerationConfig,
        rng: &mut MapRng,
    ) -> Vec<Room>;

    fn corridor_plan(&self) -> CorridorPlan {
        CorridorPlan::Triangulate
    }

    /// Room that must become the start room, if the layout has a natural origin.
    fn start_room(&self) -> Option<usize> {
        None
    }

    fn special_room_count(&self) -> usize {
        0
    }
}

pub fn layout_for(strategy: LayoutStrategy) -> Box<dyn RoomLayoutStrategy> {
    match strategy {
        LayoutStrategy::Bsp => Box::new(BspLayout),
        LayoutStrategy::BspFull => Box::new(BspFullLayout::default()),
        LayoutStrategy::Flood => Box::new(FloodLayout::default()),
        LayoutStrategy::Scatter => Box::new(ScatterLayout),
    }
}

fn place_room(grid: &mut CellGrid, room: Room) -> usize {
    grid.stamp_room(room);
    grid.push_room(room)
}
