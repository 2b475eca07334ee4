//! Navigation over finished grids, built on the generic search engine.
//! Each submodule is one node-graph instantiation with its own movement rules.

mod building;
mod dungeon;
mod patrol;

pub use building::{
    BuildingGrid, Footprint, PlacementError, Structure, StructureId, StructureKind, Terrain,
};
pub use dungeon::{DungeonNavigator, Movement, terrain_multiplier};
pub use patrol::PatrolRoute;
