//! Procedural map generation domain split into coherent submodules.

pub mod layout;
pub mod model;

mod carve;
mod connect;
mod delaunay;
mod generator;
mod post;
mod rooms;
mod spanning;

pub use carve::CorridorCarver;
pub use connect::{ConnectionGraph, build_connections};
pub use delaunay::triangulate;
pub use generator::MapGenerator;
pub use layout::{CorridorPlan, RoomLayoutStrategy, layout_for};
pub use model::{GeneratedMap, RoomInfo};
pub use spanning::{WeightedEdge, minimum_spanning_tree};

use crate::config::{ConfigError, GenerationConfig};

/// One-shot generation with an explicit seed; `config.seed` is ignored.
pub fn generate_map(config: GenerationConfig, seed: u64) -> Result<GeneratedMap, ConfigError> {
    Ok(MapGenerator::new(config)?.generate(seed))
}
