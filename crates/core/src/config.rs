//! Generation configuration, loadable from TOML.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::de;

use crate::coords::{GridTransform, WorldPos};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    #[default]
    Bsp,
    BspFull,
    Flood,
    Scatter,
}

impl LayoutStrategy {
    pub const ALL: [LayoutStrategy; 4] = [
        LayoutStrategy::Bsp,
        LayoutStrategy::BspFull,
        LayoutStrategy::Flood,
        LayoutStrategy::Scatter,
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStrategy {
    #[default]
    AStar,
    Straight,
}

/// Where gate cells come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Carver stamps `MainGate` at wall crossings, flanking walls become `SubGate`.
    #[default]
    Stamped,
    /// Carver punches plain `Path`, a post-process scan marks junctions as `Gate`.
    Scan,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraEdges {
    /// Re-admit non-tree edges longer than this distance.
    LongerThan(f64),
    /// Re-admit each non-tree edge independently with this probability.
    Chance(f64),
}

impl Default for ExtraEdges {
    fn default() -> Self {
        ExtraEdges::LongerThan(30.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspConfig {
    pub max_depth: u32,
    pub min_room_size: Option<usize>,
    pub max_room_size: Option<usize>,
    pub full_min_split: usize,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self { max_depth: 5, min_room_size: None, max_room_size: None, full_min_split: 6 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodConfig {
    pub max_rooms: Option<usize>,
    pub special_rooms: usize,
    pub min_rooms: usize,
    pub retries: u32,
    pub initial_chance: f64,
    pub final_chance: f64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            max_rooms: None,
            special_rooms: 3,
            min_rooms: 5,
            retries: 1,
            initial_chance: 0.9,
            final_chance: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub room_count: Option<usize>,
    pub attempts_per_room: usize,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self { room_count: None, attempts_per_room: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub extra_edges: ExtraEdges,
    pub max_indirect_depth: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { extra_edges: ExtraEdges::default(), max_indirect_depth: 2 }
    }
}

/// Terrain costs used by the A*-routed corridor carver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveCosts {
    pub path: f32,
    pub floor: f32,
    pub empty: f32,
    pub wall: f32,
    pub other: f32,
    pub direction_change: f32,
}

impl Default for CarveCosts {
    fn default() -> Self {
        Self { path: 0.1, floor: 1.0, empty: 5.0, wall: 10.0, other: 4.0, direction_change: 1000.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub seed: u64,
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: [f32; 3],
    pub origin: [f32; 3],
    pub room_size: usize,
    pub margin: usize,
    pub path_strategy: PathStrategy,
    pub layout_strategy: LayoutStrategy,
    pub gate_policy: GatePolicy,
    pub bsp: BspConfig,
    pub flood: FloodConfig,
    pub scatter: ScatterConfig,
    pub connections: ConnectionConfig,
    pub costs: CarveCosts,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            grid_width: 64,
            grid_height: 64,
            cell_size: [2.0, 2.0, 2.0],
            origin: [0.0, 0.0, 0.0],
            room_size: 10,
            margin: 3,
            path_strategy: PathStrategy::default(),
            layout_strategy: LayoutStrategy::default(),
            gate_policy: GatePolicy::default(),
            bsp: BspConfig::default(),
            flood: FloodConfig::default(),
            scatter: ScatterConfig::default(),
            connections: ConnectionConfig::default(),
            costs: CarveCosts::default(),
        }
    }
}

impl GenerationConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 8 || self.grid_height < 8 {
            return Err(invalid(format!(
                "grid must be at least 8x8, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.margin < 1 {
            return Err(invalid("margin must be at least 1".to_string()));
        }
        if self.room_size < 3 {
            return Err(invalid(format!("room_size must be at least 3, got {}", self.room_size)));
        }
        if self.bsp_min_room_size() > self.bsp_max_room_size() {
            return Err(invalid(format!(
                "bsp.min_room_size {} exceeds bsp.max_room_size {}",
                self.bsp_min_room_size(),
                self.bsp_max_room_size()
            )));
        }
        if self.bsp.max_depth > 16 {
            return Err(invalid(format!(
                "bsp.max_depth must be at most 16, got {}",
                self.bsp.max_depth
            )));
        }
        if self.cell_size.iter().any(|&size| !(size > 0.0)) {
            return Err(invalid(format!(
                "cell_size components must be positive, got {:?}",
                self.cell_size
            )));
        }
        let costs = self.costs;
        let cost_values =
            [costs.path, costs.floor, costs.empty, costs.wall, costs.other, costs.direction_change];
        if cost_values.iter().any(|&cost| !(cost >= 0.0) || !cost.is_finite()) {
            return Err(invalid(format!("carve costs must be finite and non-negative: {costs:?}")));
        }
        for (name, value) in [
            ("flood.initial_chance", self.flood.initial_chance),
            ("flood.final_chance", self.flood.final_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        match self.connections.extra_edges {
            ExtraEdges::Chance(probability) if !(0.0..=1.0).contains(&probability) => {
                return Err(invalid(format!(
                    "connections.extra_edges chance must be within [0, 1], got {probability}"
                )));
            }
            ExtraEdges::LongerThan(distance) if !(distance >= 0.0) => {
                return Err(invalid(format!(
                    "connections.extra_edges distance must be non-negative, got {distance}"
                )));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn bsp_min_room_size(&self) -> usize {
        self.bsp.min_room_size.unwrap_or_else(|| self.room_size.saturating_sub(4).max(3))
    }

    pub fn bsp_max_room_size(&self) -> usize {
        self.bsp.max_room_size.unwrap_or(self.room_size + 4)
    }

    /// How many rooms of `room_size` plus `spacing` fit along each axis.
    pub fn lattice_capacity(&self, spacing: usize) -> (usize, usize) {
        let effective_size = self.room_size + spacing;
        (self.grid_width / effective_size, self.grid_height / effective_size)
    }

    pub fn transform(&self) -> GridTransform {
        GridTransform::new(
            WorldPos::new(self.origin[0], self.origin[1], self.origin[2]),
            WorldPos::new(self.cell_size[0], self.cell_size[1], self.cell_size[2]),
        )
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = GenerationConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let raw = r#"
            grid_width = 40
            layout_strategy = "flood"
            path_strategy = "straight"

            [connections]
            extra_edges = { chance = 0.25 }

            [costs]
            direction_change = 250.0
        "#;
        let config = GenerationConfig::from_toml_str(raw).expect("config should parse");
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 64);
        assert_eq!(config.layout_strategy, LayoutStrategy::Flood);
        assert_eq!(config.path_strategy, PathStrategy::Straight);
        assert_eq!(config.connections.extra_edges, ExtraEdges::Chance(0.25));
        assert_eq!(config.costs.direction_change, 250.0);
        assert_eq!(config.costs.wall, 10.0);
    }

    #[test]
    fn rejects_grids_too_small_to_hold_a_room() {
        let err = GenerationConfig::from_toml_str("grid_width = 4")
            .expect_err("tiny grid should be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)), "unexpected error: {err}");
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        let raw = "[connections]\nextra_edges = { chance = 1.5 }\n";
        let err = GenerationConfig::from_toml_str(raw).expect_err("chance above one");
        assert!(err.to_string().contains("chance"), "error should name the field: {err}");
    }

    #[test]
    fn reports_parse_errors_separately_from_validation() {
        let err = GenerationConfig::from_toml_str("grid_width = \"wide\"")
            .expect_err("wrong type should fail to parse");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_config_from_disk() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "seed = 42\nroom_size = 6").expect("write config");
        let config = GenerationConfig::load(file.path()).expect("load");
        assert_eq!(config.seed, 42);
        assert_eq!(config.room_size, 6);
        assert_eq!(config.bsp_min_room_size(), 3);
        assert_eq!(config.bsp_max_room_size(), 10);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GenerationConfig::load(Path::new("/definitely/not/here.toml"))
            .expect_err("missing file");
        assert!(err.to_string().contains("not/here.toml"));
    }
}
