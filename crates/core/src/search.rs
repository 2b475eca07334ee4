//! Generic best-first (A*) search over caller-owned node sets.
//!
//! The engine knows nothing about grids: adjacency, walkability and step costs come
//! from a [`SearchRules`] implementation. Every node's search state is reset at the
//! start of each [`PathSearch::find_path`] call.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::mem;

use crate::types::Pos;

/// Cost of one literal diagonal step relative to a straight step.
pub const DIAGONAL_STEP_COST: f32 = 1.414;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchState {
    pub g: f32,
    pub h: f32,
    pub parent: Option<NodeId>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self { g: f32::INFINITY, h: 0.0, parent: None }
    }
}

/// Capability every searchable node exposes.
pub trait PathNode {
    fn search_state(&self) -> &SearchState;
    fn search_state_mut(&mut self) -> &mut SearchState;

    fn g_cost(&self) -> f32 {
        self.search_state().g
    }

    fn h_cost(&self) -> f32 {
        self.search_state().h
    }

    fn f_cost(&self) -> f32 {
        self.g_cost() + self.h_cost()
    }

    fn parent(&self) -> Option<NodeId> {
        self.search_state().parent
    }
}

/// Caller-side policy for one node-graph instantiation.
///
/// `move_cost` has no fallback; weighted terrain must be priced explicitly.
pub trait SearchRules<N> {
    /// Pushes every node reachable in one step from `node` into `out`.
    fn neighbors(&self, nodes: &[N], node: NodeId, out: &mut Vec<NodeId>);

    fn move_cost(&self, nodes: &[N], from: NodeId, to: NodeId) -> f32;

    fn heuristic(&self, nodes: &[N], from: NodeId, goal: NodeId) -> f32;
}

pub struct PathSearch<N> {
    nodes: Vec<N>,
    closed: Vec<bool>,
    scratch: Vec<NodeId>,
}

impl<N: PathNode> PathSearch<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        let closed = vec![false; nodes.len()];
        Self { nodes, closed, scratch: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id.0)
    }

    pub fn into_nodes(self) -> Vec<N> {
        self.nodes
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            *node.search_state_mut() = SearchState::default();
        }
        self.closed.clear();
        self.closed.resize(self.nodes.len(), false);
    }

    /// Returns the node sequence from `start` to `goal`, both inclusive, or `None`
    /// when the open set runs dry. Never returns a partial path.
    pub fn find_path<R: SearchRules<N>>(
        &mut self,
        start: NodeId,
        goal: NodeId,
        rules: &R,
    ) -> Option<Vec<NodeId>> {
        self.reset();
        if start.0 >= self.nodes.len() || goal.0 >= self.nodes.len() {
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let mut open_set = BTreeSet::new();
        let mut sequence = 0_u64;
        let start_h = rules.heuristic(&self.nodes, start, goal);
        *self.nodes[start.0].search_state_mut() = SearchState { g: 0.0, h: start_h, parent: None };
        open_set.insert(OpenEntry::new(start_h, start_h, sequence, start));

        let mut neighbors = mem::take(&mut self.scratch);
        while let Some(entry) = open_set.pop_first() {
            let current = entry.node;
            if self.closed[current.0] {
                continue;
            }
            if current == goal {
                self.scratch = neighbors;
                return Some(self.reconstruct_path(start, goal));
            }
            self.closed[current.0] = true;

            let current_g = self.nodes[current.0].g_cost();
            neighbors.clear();
            rules.neighbors(&self.nodes, current, &mut neighbors);
            for &next in &neighbors {
                if next.0 >= self.nodes.len() || self.closed[next.0] {
                    continue;
                }
                let tentative_g = current_g + rules.move_cost(&self.nodes, current, next);
                if tentative_g < self.nodes[next.0].g_cost() {
                    let h = rules.heuristic(&self.nodes, next, goal);
                    *self.nodes[next.0].search_state_mut() =
                        SearchState { g: tentative_g, h, parent: Some(current) };
                    sequence += 1;
                    open_set.insert(OpenEntry::new(tentative_g + h, h, sequence, next));
                }
            }
        }
        self.scratch = neighbors;
        None
    }

    fn reconstruct_path(&self, start: NodeId, goal: NodeId) -> Vec<NodeId> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match self.nodes[current.0].parent() {
                Some(parent) => {
                    path.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: Cost,
    h: Cost,
    sequence: u64,
    node: NodeId,
}

impl OpenEntry {
    fn new(f: f32, h: f32, sequence: u64, node: NodeId) -> Self {
        Self { f: Cost(f), h: Cost(h), sequence, node }
    }
}

#[derive(Clone, Copy, Debug)]
struct Cost(f32);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// 4-directional heuristic.
pub fn manhattan_distance(a: Pos, b: Pos) -> f32 {
    a.manhattan(b) as f32
}

/// 8-directional heuristic: straight-line distance, with [`DIAGONAL_STEP_COST`]
/// for literal diagonal neighbours.
pub fn diagonal_distance(a: Pos, b: Pos) -> f32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    if dx == 1 && dy == 1 {
        return DIAGONAL_STEP_COST;
    }
    ((dx * dx + dy * dy) as f32).sqrt()
}
