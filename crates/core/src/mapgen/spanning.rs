//! Kruskal minimum spanning tree with a union-find forest.

use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedEdge {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
}

impl WeightedEdge {
    pub fn between(a: usize, b: usize, points: &[(f64, f64)]) -> Self {
        let (pa, pb) = (points[a], points[b]);
        Self { a, b, distance: (pa.0 - pb.0).hypot(pa.1 - pb.1) }
    }

    fn sort_key_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| (self.a, self.b).cmp(&(other.a, other.b)))
    }
}

/// Edges of a minimum spanning forest, in acceptance order (shortest first).
pub fn minimum_spanning_tree(node_count: usize, edges: &[WeightedEdge]) -> Vec<WeightedEdge> {
    let mut sorted = edges.to_vec();
    sorted.sort_by(WeightedEdge::sort_key_cmp);

    let mut forest = DisjointSet::new(node_count);
    let mut tree = Vec::with_capacity(node_count.saturating_sub(1));
    for edge in sorted {
        if edge.a >= node_count || edge.b >= node_count {
            continue;
        }
        if forest.union(edge.a, edge.b) {
            tree.push(edge);
            if tree.len() + 1 == node_count {
                break;
            }
        }
    }
    tree
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self { parent: (0..size).collect(), rank: vec![0; size] }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// False when both already share a root.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            Ordering::Less => self.parent[root_a] = root_b,
            Ordering::Greater => self.parent[root_b] = root_a,
            Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::delaunay::triangulate;

    #[test]
    fn square_of_room_centers_spans_with_three_edges() {
        let points = [(2.0, 2.0), (2.0, 10.0), (10.0, 2.0), (10.0, 10.0)];
        let edges: Vec<WeightedEdge> = triangulate(&points)
            .into_iter()
            .map(|(a, b)| WeightedEdge::between(a, b, &points))
            .collect();
        let tree = minimum_spanning_tree(points.len(), &edges);
        assert_eq!(tree.len(), 3);
        assert!(tree.iter().all(|edge| edge.distance == 8.0), "diagonal must not be chosen");
    }

    #[test]
    fn ignores_cycles_and_prefers_short_edges() {
        let points = [(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)];
        let edges = [
            WeightedEdge::between(0, 2, &points),
            WeightedEdge::between(1, 2, &points),
            WeightedEdge::between(0, 1, &points),
        ];
        let tree = minimum_spanning_tree(3, &edges);
        let pairs: Vec<(usize, usize)> = tree.iter().map(|edge| (edge.a, edge.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn disconnected_input_yields_a_forest() {
        let points = [(0.0, 0.0), (1.0, 0.0), (9.0, 9.0), (9.0, 10.0)];
        let edges = [WeightedEdge::between(0, 1, &points), WeightedEdge::between(2, 3, &points)];
        assert_eq!(minimum_spanning_tree(4, &edges).len(), 2);
    }
}
