//! Room connectivity graph: triangulate, reduce to a spanning tree, then re-admit a
//! few extra edges that do not close short loops.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use crate::config::{ConnectionConfig, ExtraEdges};
use crate::rng::MapRng;
use crate::types::Room;

use super::delaunay::triangulate;
use super::spanning::{WeightedEdge, minimum_spanning_tree};

/// Accepted room pairs `(a, b)` with `a < b`, plus the symmetric adjacency they imply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionGraph {
    pairs: BTreeSet<(usize, usize)>,
    #[serde(skip)]
    adjacency: BTreeMap<usize, BTreeSet<usize>>,
}

impl ConnectionGraph {
    pub fn new(room_count: usize) -> Self {
        let adjacency = (0..room_count).map(|room| (room, BTreeSet::new())).collect();
        Self { pairs: BTreeSet::new(), adjacency }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn neighbors(&self, room: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(&room).into_iter().flatten().copied()
    }

    pub fn is_directly_connected(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Breadth-first reachability from `a` to `b` in at most `max_depth` hops.
    pub fn can_reach_within(&self, a: usize, b: usize, max_depth: usize) -> bool {
        if max_depth == 0 || a == b {
            return false;
        }
        let mut visited = BTreeSet::from([a]);
        let mut queue = VecDeque::from([(a, 0_usize)]);
        while let Some((room, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for next in self.neighbors(room) {
                if next == b {
                    return true;
                }
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
        false
    }

    /// Records the pair. Returns false if it was already present or is a self-loop.
    pub fn connect(&mut self, a: usize, b: usize) -> bool {
        if a == b || !self.pairs.insert(ordered(a, b)) {
            return false;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        true
    }
}

/// Builds the corridor graph over room centroids.
///
/// Spanning-tree edges are accepted first, so every room ends up connected. Extra edges
/// are then rejected when the rooms are already linked directly or within
/// `max_indirect_depth` hops.
pub fn build_connections(
    rooms: &[Room],
    config: &ConnectionConfig,
    rng: &mut MapRng,
) -> ConnectionGraph {
    let mut graph = ConnectionGraph::new(rooms.len());
    match rooms.len() {
        0 | 1 => return graph,
        2 => {
            graph.connect(0, 1);
            return graph;
        }
        _ => {}
    }

    let points: Vec<(f64, f64)> = rooms.iter().map(|room| room.centroid()).collect();
    let edges: Vec<WeightedEdge> = triangulate(&points)
        .into_iter()
        .map(|(a, b)| WeightedEdge::between(a, b, &points))
        .collect();
    let mut tree = minimum_spanning_tree(rooms.len(), &edges);
    if tree.len() + 1 < rooms.len() {
        // Collinear or near-collinear centers leave the triangulation short of a tree.
        log::debug!(
            "triangulation spans {} of {} links, falling back to the complete graph",
            tree.len(),
            rooms.len() - 1
        );
        let complete: Vec<WeightedEdge> = (0..rooms.len())
            .flat_map(|a| (a + 1..rooms.len()).map(move |b| (a, b)))
            .map(|(a, b)| WeightedEdge::between(a, b, &points))
            .collect();
        tree = minimum_spanning_tree(rooms.len(), &complete);
    }

    let tree_pairs: BTreeSet<(usize, usize)> =
        tree.iter().map(|edge| ordered(edge.a, edge.b)).collect();
    let mut extras: Vec<WeightedEdge> = edges
        .iter()
        .filter(|edge| !tree_pairs.contains(&ordered(edge.a, edge.b)))
        .copied()
        .collect();
    extras.sort_by(|left, right| {
        left.distance
            .total_cmp(&right.distance)
            .then_with(|| (left.a, left.b).cmp(&(right.a, right.b)))
    });
    let extras = extras.into_iter().filter(|edge| match config.extra_edges {
        ExtraEdges::LongerThan(threshold) => edge.distance > threshold,
        ExtraEdges::Chance(probability) => rng.chance(probability),
    });

    for edge in tree.iter().copied().chain(extras) {
        if graph.is_directly_connected(edge.a, edge.b)
            || graph.can_reach_within(edge.a, edge.b, config.max_indirect_depth)
        {
            continue;
        }
        graph.connect(edge.a, edge.b);
    }
    log::debug!("accepted {} room connections for {} rooms", graph.len(), rooms.len());
    graph
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_at(x: usize, y: usize) -> Room {
        Room::new(x, y, 4, 4)
    }

    fn is_connected(graph: &ConnectionGraph, room_count: usize) -> bool {
        let mut seen = BTreeSet::from([0]);
        let mut queue = VecDeque::from([0]);
        while let Some(room) = queue.pop_front() {
            for next in graph.neighbors(room) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == room_count
    }

    #[test]
    fn fewer_than_two_rooms_produce_no_edges() {
        let mut rng = MapRng::from_seed(1);
        let config = ConnectionConfig::default();
        assert!(build_connections(&[], &config, &mut rng).is_empty());
        assert!(build_connections(&[room_at(2, 2)], &config, &mut rng).is_empty());
    }

    #[test]
    fn two_rooms_are_linked_directly() {
        let graph = build_connections(
            &[room_at(2, 2), room_at(30, 2)],
            &ConnectionConfig::default(),
            &mut MapRng::from_seed(1),
        );
        assert_eq!(graph.pairs().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn collinear_rooms_still_form_a_chain() {
        let rooms = [room_at(2, 2), room_at(12, 2), room_at(22, 2), room_at(32, 2)];
        let graph =
            build_connections(&rooms, &ConnectionConfig::default(), &mut MapRng::from_seed(1));
        assert_eq!(graph.pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn nearly_collinear_rooms_are_still_spanned() {
        let mut rooms: Vec<Room> = (0..8).map(|i| room_at(2 + 10 * i, 2)).collect();
        rooms.push(Room::new(82, 2, 4, 5));
        let graph =
            build_connections(&rooms, &ConnectionConfig::default(), &mut MapRng::from_seed(1));
        assert!(is_connected(&graph, rooms.len()), "rooms left without a corridor: {graph:?}");
        for room in 0..rooms.len() {
            assert!(graph.neighbors(room).next().is_some(), "room {room} has no edge");
        }
    }

    #[test]
    fn short_loops_are_rejected_but_the_tree_survives() {
        let rooms = [
            room_at(2, 2),
            room_at(2, 40),
            room_at(40, 2),
            room_at(40, 40),
            room_at(21, 21),
            room_at(60, 21),
        ];
        let config =
            ConnectionConfig { extra_edges: ExtraEdges::Chance(1.0), max_indirect_depth: 2 };
        let graph = build_connections(&rooms, &config, &mut MapRng::from_seed(9));
        assert!(is_connected(&graph, rooms.len()), "graph must span every room: {graph:?}");
        assert!(graph.len() >= rooms.len() - 1);
        for (a, b) in graph.pairs() {
            for c in graph.neighbors(a) {
                assert!(
                    c == b || !graph.is_directly_connected(c, b),
                    "rooms {a}, {b} and {c} form a triangle"
                );
            }
        }
    }

    #[test]
    fn indirect_reachability_respects_depth_bound() {
        let mut graph = ConnectionGraph::new(4);
        graph.connect(0, 1);
        graph.connect(1, 2);
        graph.connect(2, 3);
        assert!(graph.can_reach_within(0, 2, 2));
        assert!(!graph.can_reach_within(0, 3, 2));
        assert!(graph.can_reach_within(0, 3, 3));
        assert!(!graph.can_reach_within(0, 1, 0));
        assert!(!graph.connect(1, 0), "pairs are unordered");
    }

    #[test]
    fn long_extra_edges_are_readmitted_by_threshold() {
        let rooms = [room_at(2, 2), room_at(2, 50), room_at(50, 2), room_at(50, 50)];
        let never =
            ConnectionConfig { extra_edges: ExtraEdges::LongerThan(1e3), max_indirect_depth: 0 };
        let always =
            ConnectionConfig { extra_edges: ExtraEdges::LongerThan(0.0), max_indirect_depth: 0 };
        let tree_only = build_connections(&rooms, &never, &mut MapRng::from_seed(4));
        let with_extras = build_connections(&rooms, &always, &mut MapRng::from_seed(4));
        assert_eq!(tree_only.len(), 3);
        assert_eq!(with_extras.len(), 5, "every triangulation edge should survive");
    }
}
