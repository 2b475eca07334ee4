//! Building-placement grid: static terrain plus a separate layer of placed structures,
//! with road routing between facility entrances.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::{NodeId, PathNode, PathSearch, SearchRules, SearchState, manhattan_distance};
use crate::types::{Direction, Pos, Room};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Buildable,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Road,
    Headquarters,
    Attraction,
    MajorFacility,
    Tree,
}

impl StructureKind {
    /// Facilities are route endpoints, entered through their entrance cell only.
    pub fn is_facility(self) -> bool {
        matches!(
            self,
            StructureKind::Headquarters | StructureKind::Attraction | StructureKind::MajorFacility
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructureId(pub usize);

/// Cells a structure covers on the building grid.
pub type Footprint = Room;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureKind,
    pub footprint: Footprint,
    /// Side of the footprint the entrance opens onto.
    pub facing: Direction,
}

impl Structure {
    /// Middle cell of the footprint edge on the `facing` side.
    pub fn entrance(&self) -> Pos {
        let room = self.footprint;
        let mid_x = (room.x + room.width / 2) as i32;
        let mid_y = (room.y + room.height / 2) as i32;
        match self.facing {
            Direction::Up => Pos { y: room.y as i32, x: mid_x },
            Direction::Down => Pos { y: room.bottom() as i32, x: mid_x },
            Direction::Left => Pos { y: mid_y, x: room.x as i32 },
            Direction::Right => Pos { y: mid_y, x: room.right() as i32 },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("footprint {0:?} leaves the grid")]
    OutOfBounds(Footprint),
    #[error("footprint {0:?} covers no cells")]
    EmptyFootprint(Footprint),
    #[error("cell {0:?} is not buildable")]
    Blocked(Pos),
    #[error("cell {pos:?} is already taken by structure {by:?}")]
    Occupied { pos: Pos, by: StructureId },
}

struct BuildingNode {
    pos: Pos,
    state: SearchState,
}

impl PathNode for BuildingNode {
    fn search_state(&self) -> &SearchState {
        &self.state
    }

    fn search_state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }
}

/// Static terrain and the structures standing on it, kept as separate layers.
struct Site {
    width: usize,
    height: usize,
    terrain: Vec<Terrain>,
    occupancy: Vec<Option<StructureId>>,
    structures: Vec<Structure>,
}

impl Site {
    fn index_of(&self, pos: Pos) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.y as usize * self.width + pos.x as usize)
    }

    fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(id.0)
    }

    fn structure_at(&self, pos: Pos) -> Option<StructureId> {
        self.index_of(pos).and_then(|index| self.occupancy[index])
    }

    /// Cell a route through `pos` actually uses: a facility's entrance, a road itself,
    /// or nothing for trees and bare ground.
    fn anchor(&self, pos: Pos) -> Option<Pos> {
        let structure = self.structure(self.structure_at(pos)?)?;
        match structure.kind {
            StructureKind::Road => Some(pos),
            kind if kind.is_facility() => Some(structure.entrance()),
            _ => None,
        }
    }
}

pub struct BuildingGrid {
    site: Site,
    search: PathSearch<BuildingNode>,
}

impl BuildingGrid {
    pub fn new(width: usize, height: usize) -> Self {
        let nodes = (0..width * height)
            .map(|index| BuildingNode {
                pos: Pos { y: (index / width) as i32, x: (index % width) as i32 },
                state: SearchState::default(),
            })
            .collect();
        let site = Site {
            width,
            height,
            terrain: vec![Terrain::Buildable; width * height],
            occupancy: vec![None; width * height],
            structures: Vec::new(),
        };
        Self { site, search: PathSearch::new(nodes) }
    }

    pub fn width(&self) -> usize {
        self.site.width
    }

    pub fn height(&self) -> usize {
        self.site.height
    }

    pub fn terrain(&self, pos: Pos) -> Option<Terrain> {
        self.site.index_of(pos).map(|index| self.site.terrain[index])
    }

    pub fn set_terrain(&mut self, pos: Pos, terrain: Terrain) {
        if let Some(index) = self.site.index_of(pos) {
            self.site.terrain[index] = terrain;
        }
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.site.structure(id)
    }

    pub fn structure_at(&self, pos: Pos) -> Option<StructureId> {
        self.site.structure_at(pos)
    }

    /// Places a structure if every footprint cell is in bounds, buildable and free.
    pub fn place(&mut self, structure: Structure) -> Result<StructureId, PlacementError> {
        let site = &mut self.site;
        let footprint = structure.footprint;
        if footprint.width == 0 || footprint.height == 0 {
            return Err(PlacementError::EmptyFootprint(footprint));
        }
        let mut indices = Vec::with_capacity(footprint.width * footprint.height);
        for pos in footprint.cells() {
            let index = site.index_of(pos).ok_or(PlacementError::OutOfBounds(footprint))?;
            if site.terrain[index] == Terrain::Blocked {
                return Err(PlacementError::Blocked(pos));
            }
            if let Some(by) = site.occupancy[index] {
                return Err(PlacementError::Occupied { pos, by });
            }
            indices.push(index);
        }
        let id = StructureId(site.structures.len());
        site.structures.push(structure);
        for index in indices {
            site.occupancy[index] = Some(id);
        }
        Ok(id)
    }

    pub fn place_road(&mut self, pos: Pos) -> Result<StructureId, PlacementError> {
        let footprint = Footprint::new(pos.x.max(0) as usize, pos.y.max(0) as usize, 1, 1);
        if pos.x < 0 || pos.y < 0 {
            return Err(PlacementError::OutOfBounds(footprint));
        }
        self.place(Structure { kind: StructureKind::Road, footprint, facing: Direction::Up })
    }

    /// Road route from `start` to `goal`. A facility endpoint resolves to its entrance
    /// cell; the goal facility is only entered against its facing direction.
    pub fn find_route(&mut self, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
        let site = &self.site;
        let start = site.anchor(start)?;
        let goal_structure = site.structure_at(goal);
        let goal = site.anchor(goal)?;
        let start_id = NodeId(site.index_of(start)?);
        let goal_id = NodeId(site.index_of(goal)?);
        let rules = RoadRules { site, goal: goal_structure };
        let path = self.search.find_path(start_id, goal_id, &rules)?;
        Some(path.into_iter().map(|id| self.search.nodes()[id.0].pos).collect())
    }

    pub fn is_connected_by_road(&mut self, from: StructureId, to: StructureId) -> bool {
        let (Some(from), Some(to)) = (self.structure(from), self.structure(to)) else {
            return false;
        };
        let (start, goal) = (from.entrance(), to.entrance());
        self.find_route(start, goal).is_some()
    }
}

struct RoadRules<'a> {
    site: &'a Site,
    goal: Option<StructureId>,
}

impl SearchRules<BuildingNode> for RoadRules<'_> {
    fn neighbors(&self, nodes: &[BuildingNode], node: NodeId, out: &mut Vec<NodeId>) {
        let pos = nodes[node.0].pos;
        let Some(origin) = self.site.anchor(pos) else {
            return;
        };
        for direction in Direction::ALL {
            let next = origin.offset(direction);
            let Some(id) = self.site.structure_at(next) else {
                continue;
            };
            let Some(structure) = self.site.structure(id) else {
                continue;
            };
            let enterable = match structure.kind {
                StructureKind::Road => true,
                kind if kind.is_facility() => {
                    self.goal == Some(id)
                        && structure.entrance() == next
                        && structure.facing == direction.opposite()
                }
                _ => false,
            };
            if enterable {
                out.extend(self.site.index_of(next).map(NodeId));
            }
        }
    }

    fn move_cost(&self, _nodes: &[BuildingNode], _from: NodeId, _to: NodeId) -> f32 {
        1.0
    }

    fn heuristic(&self, nodes: &[BuildingNode], from: NodeId, goal: NodeId) -> f32 {
        manhattan_distance(nodes[from.0].pos, nodes[goal.0].pos)
    }
}
