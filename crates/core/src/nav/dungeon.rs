//! Walking routes across a generated dungeon grid.

use serde::{Deserialize, Serialize};

use crate::coords::{GridTransform, WorldPos};
use crate::grid::CellGrid;
use crate::search::{
    DIAGONAL_STEP_COST, NodeId, PathNode, PathSearch, SearchRules, SearchState,
    diagonal_distance, manhattan_distance,
};
use crate::types::{CellType, Direction, Pos};

/// Lowest value [`terrain_multiplier`] returns; scales the heuristic so it stays admissible.
const CHEAPEST_MULTIPLIER: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    #[default]
    Cardinal,
    /// Cardinal plus diagonal steps. A diagonal may not cut past a blocked corner.
    Octile,
}

/// Per-step cost factor for walking onto `cell`, or `None` when it blocks movement.
pub fn terrain_multiplier(cell: CellType) -> Option<f32> {
    match cell {
        CellType::Floor | CellType::FloorCenter | CellType::Path => Some(0.5),
        CellType::ExpandedPath => Some(0.95),
        CellType::Gate | CellType::MainGate => Some(0.7),
        CellType::SubGate => Some(1.0),
        CellType::Empty | CellType::Wall | CellType::PathWall => None,
    }
}

struct NavNode {
    pos: Pos,
    cell: CellType,
    state: SearchState,
}

impl PathNode for NavNode {
    fn search_state(&self) -> &SearchState {
        &self.state
    }

    fn search_state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }
}

struct NavRules {
    width: usize,
    height: usize,
    movement: Movement,
}

impl NavRules {
    fn id(&self, pos: Pos) -> Option<NodeId> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| NodeId(pos.y as usize * self.width + pos.x as usize))
    }

    fn walkable(&self, nodes: &[NavNode], pos: Pos) -> bool {
        self.id(pos).is_some_and(|id| terrain_multiplier(nodes[id.0].cell).is_some())
    }
}

impl SearchRules<NavNode> for NavRules {
    fn neighbors(&self, nodes: &[NavNode], node: NodeId, out: &mut Vec<NodeId>) {
        let pos = nodes[node.0].pos;
        for direction in Direction::ALL {
            let next = pos.offset(direction);
            if self.walkable(nodes, next) {
                out.extend(self.id(next));
            }
        }
        if self.movement == Movement::Cardinal {
            return;
        }
        for (dx, dy) in [(1, -1), (1, 1), (-1, 1), (-1, -1)] {
            let next = Pos { y: pos.y + dy, x: pos.x + dx };
            let side_x = Pos { y: pos.y, x: pos.x + dx };
            let side_y = Pos { y: pos.y + dy, x: pos.x };
            if self.walkable(nodes, next)
                && self.walkable(nodes, side_x)
                && self.walkable(nodes, side_y)
            {
                out.extend(self.id(next));
            }
        }
    }

    fn move_cost(&self, nodes: &[NavNode], from: NodeId, to: NodeId) -> f32 {
        let (a, b) = (nodes[from.0].pos, nodes[to.0].pos);
        let step = if a.x != b.x && a.y != b.y { DIAGONAL_STEP_COST } else { 1.0 };
        step * terrain_multiplier(nodes[to.0].cell).unwrap_or(f32::INFINITY)
    }

    fn heuristic(&self, nodes: &[NavNode], from: NodeId, goal: NodeId) -> f32 {
        let (a, b) = (nodes[from.0].pos, nodes[goal.0].pos);
        let distance = match self.movement {
            Movement::Cardinal => manhattan_distance(a, b),
            Movement::Octile => diagonal_distance(a, b),
        };
        distance * CHEAPEST_MULTIPLIER
    }
}

/// Route planner over a snapshot of a generated grid. Reuses its node set across calls.
pub struct DungeonNavigator {
    search: PathSearch<NavNode>,
    rules: NavRules,
}

impl DungeonNavigator {
    pub fn new(grid: &CellGrid, movement: Movement) -> Self {
        let nodes = grid
            .positions()
            .map(|pos| NavNode { pos, cell: grid.get(pos), state: SearchState::default() })
            .collect();
        let rules = NavRules { width: grid.width(), height: grid.height(), movement };
        Self { search: PathSearch::new(nodes), rules }
    }

    pub fn movement(&self) -> Movement {
        self.rules.movement
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.rules.walkable(self.search.nodes(), pos)
    }

    /// Cells from `start` to `goal`, both inclusive. Endpoints that are off the grid or
    /// not walkable yield `None`; no nearby cell is substituted.
    pub fn find_path(&mut self, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
        for (label, pos) in [("start", start), ("goal", goal)] {
            if !self.is_walkable(pos) {
                log::debug!("navigation {label} {pos:?} is off the grid or not walkable");
                return None;
            }
        }
        let start_id = self.rules.id(start)?;
        let goal_id = self.rules.id(goal)?;
        let path = self.search.find_path(start_id, goal_id, &self.rules)?;
        Some(path.into_iter().map(|id| self.search.nodes()[id.0].pos).collect())
    }

    /// Same as [`Self::find_path`] for world-space endpoints.
    pub fn find_world_path(
        &mut self,
        transform: &GridTransform,
        start: WorldPos,
        goal: WorldPos,
    ) -> Option<Vec<Pos>> {
        self.find_path(transform.world_to_grid(start), transform.world_to_grid(goal))
    }

    /// Summed step cost of a path produced by this navigator.
    pub fn path_cost(&self, path: &[Pos]) -> Option<f32> {
        let nodes = self.search.nodes();
        path.windows(2).try_fold(0.0, |total, step| {
            let from = self.rules.id(step[0])?;
            let to = self.rules.id(step[1])?;
            Some(total + self.rules.move_cost(nodes, from, to))
        })
    }
}
