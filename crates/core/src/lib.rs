pub mod config;
pub mod coords;
pub mod grid;
pub mod mapgen;
pub mod nav;
pub mod rng;
pub mod search;
pub mod types;

pub use config::{ConfigError, GenerationConfig, LayoutStrategy, PathStrategy};
pub use coords::{GridTransform, WorldPos};
pub use grid::CellGrid;
pub use mapgen::{GeneratedMap, MapGenerator, RoomInfo, generate_map};
pub use nav::{BuildingGrid, DungeonNavigator, Movement, PatrolRoute};
pub use search::{NodeId, PathNode, PathSearch, SearchRules, SearchState};
pub use types::*;
