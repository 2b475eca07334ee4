//! World-space <-> grid-index conversion shared by every consumer of generated grids.
//!
//! Grid `x` maps to world `x` and grid `y` maps to world `z`; world `y` is height.
//! Every collaborator must convert through the same [`GridTransform`] or positions drift.

use serde::{Deserialize, Serialize};

use crate::types::Pos;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    pub origin: WorldPos,
    pub cell_size: WorldPos,
}

impl GridTransform {
    pub fn new(origin: WorldPos, cell_size: WorldPos) -> Self {
        Self { origin, cell_size }
    }

    pub fn world_to_grid(&self, world: WorldPos) -> Pos {
        Pos {
            y: ((world.z - self.origin.z) / self.cell_size.z).floor() as i32,
            x: ((world.x - self.origin.x) / self.cell_size.x).floor() as i32,
        }
    }

    /// Minimum corner of the cell.
    pub fn grid_to_world(&self, pos: Pos) -> WorldPos {
        WorldPos {
            x: pos.x as f32 * self.cell_size.x + self.origin.x,
            y: self.origin.y,
            z: pos.y as f32 * self.cell_size.z + self.origin.z,
        }
    }

    pub fn cell_center(&self, pos: Pos) -> WorldPos {
        let corner = self.grid_to_world(pos);
        WorldPos {
            x: corner.x + self.cell_size.x / 2.0,
            y: corner.y,
            z: corner.z + self.cell_size.z / 2.0,
        }
    }

    /// True when `world` falls inside a `width` x `height` grid laid out by this transform.
    pub fn contains(&self, width: usize, height: usize, world: WorldPos) -> bool {
        let pos = self.world_to_grid(world);
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
    }
}
