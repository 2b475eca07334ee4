//! Corridor carving between room centers, either A*-routed over weighted terrain or as
//! a plain L-shaped line.

use crate::config::{CarveCosts, GatePolicy, PathStrategy};
use crate::grid::CellGrid;
use crate::rng::MapRng;
use crate::search::{NodeId, PathNode, PathSearch, SearchRules, SearchState};
use crate::types::{CellType, Direction, Pos};

/// Corridors stay this far from the grid edge so widening and path walls still fit.
const CARVE_BORDER: usize = 2;

struct CarveNode {
    pos: Pos,
    state: SearchState,
}

impl PathNode for CarveNode {
    fn search_state(&self) -> &SearchState {
        &self.state
    }

    fn search_state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }
}

struct CarveRules<'a> {
    grid: &'a CellGrid,
    costs: CarveCosts,
    cheapest: f32,
}

impl<'a> CarveRules<'a> {
    fn new(grid: &'a CellGrid, costs: CarveCosts) -> Self {
        let cheapest = [costs.path, costs.floor, costs.empty, costs.wall, costs.other]
            .into_iter()
            .fold(f32::INFINITY, f32::min);
        Self { grid, costs, cheapest }
    }

    fn terrain_cost(&self, cell: CellType) -> f32 {
        match cell {
            CellType::Path => self.costs.path,
            CellType::Floor | CellType::FloorCenter => self.costs.floor,
            CellType::Empty => self.costs.empty,
            CellType::Wall => self.costs.wall,
            _ => self.costs.other,
        }
    }
}

impl SearchRules<CarveNode> for CarveRules<'_> {
    fn neighbors(&self, nodes: &[CarveNode], node: NodeId, out: &mut Vec<NodeId>) {
        let pos = nodes[node.0].pos;
        for direction in Direction::ALL {
            let next = pos.offset(direction);
            if !self.grid.in_interior(next, CARVE_BORDER) {
                continue;
            }
            if let Some(index) = self.grid.index_of(next) {
                out.push(NodeId(index));
            }
        }
    }

    fn move_cost(&self, nodes: &[CarveNode], from: NodeId, to: NodeId) -> f32 {
        let (from_pos, to_pos) = (nodes[from.0].pos, nodes[to.0].pos);
        let mut cost = self.terrain_cost(self.grid.get(to_pos));
        if let Some(parent) = nodes[from.0].parent() {
            let previous = Direction::between(nodes[parent.0].pos, from_pos);
            if previous != Direction::between(from_pos, to_pos) {
                cost += self.costs.direction_change;
            }
        }
        cost
    }

    fn heuristic(&self, nodes: &[CarveNode], from: NodeId, goal: NodeId) -> f32 {
        nodes[from.0].pos.manhattan(nodes[goal.0].pos) as f32 * self.cheapest
    }
}

/// Carves corridors into one grid. Owns a reusable node set sized to that grid.
pub struct CorridorCarver {
    search: PathSearch<CarveNode>,
    strategy: PathStrategy,
    gate_policy: GatePolicy,
    costs: CarveCosts,
}

impl CorridorCarver {
    pub fn new(
        grid: &CellGrid,
        strategy: PathStrategy,
        gate_policy: GatePolicy,
        costs: CarveCosts,
    ) -> Self {
        let nodes = grid
            .positions()
            .map(|pos| CarveNode { pos, state: SearchState::default() })
            .collect();
        Self { search: PathSearch::new(nodes), strategy, gate_policy, costs }
    }

    /// Carves a corridor from `start` to `end`. Returns false when no route was found;
    /// the grid is left untouched in that case.
    pub fn carve(&mut self, grid: &mut CellGrid, start: Pos, end: Pos, rng: &mut MapRng) -> bool {
        let route = match self.strategy {
            PathStrategy::AStar => self.route(grid, start, end),
            PathStrategy::Straight => Some(l_shaped(start, end, rng.coin())),
        };
        let Some(route) = route else {
            log::warn!("no corridor route from {start:?} to {end:?}");
            return false;
        };
        for pos in route {
            self.mark(grid, pos);
        }
        true
    }

    fn route(&mut self, grid: &CellGrid, start: Pos, end: Pos) -> Option<Vec<Pos>> {
        if self.search.len() != grid.cells().len() {
            return None;
        }
        let start_id = NodeId(grid.index_of(start)?);
        let goal_id = NodeId(grid.index_of(end)?);
        let rules = CarveRules::new(grid, self.costs);
        let path = self.search.find_path(start_id, goal_id, &rules)?;
        Some(path.into_iter().map(|id| grid.pos_of(id.0)).collect())
    }

    fn mark(&self, grid: &mut CellGrid, pos: Pos) {
        let replacement = match (grid.get(pos), self.gate_policy) {
            (CellType::Empty, _) => CellType::Path,
            (CellType::Wall, GatePolicy::Stamped) => CellType::MainGate,
            (CellType::Wall, GatePolicy::Scan) => CellType::Path,
            _ => return,
        };
        grid.set(pos, replacement);
    }
}

fn l_shaped(start: Pos, end: Pos, horizontal_first: bool) -> Vec<Pos> {
    let corner = if horizontal_first {
        Pos { y: start.y, x: end.x }
    } else {
        Pos { y: end.y, x: start.x }
    };
    let mut cells = vec![start];
    push_line(&mut cells, start, corner);
    push_line(&mut cells, corner, end);
    cells
}

/// Appends the cells after `from` up to and including `to` along one axis.
fn push_line(cells: &mut Vec<Pos>, from: Pos, to: Pos) {
    let mut pos = from;
    while pos != to {
        pos.x += (to.x - pos.x).signum();
        pos.y += (to.y - pos.y).signum();
        cells.push(pos);
    }
}
