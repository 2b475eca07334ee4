//! Bowyer-Watson Delaunay triangulation over room centers.

use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug)]
struct Triangle {
    vertices: [usize; 3],
    center: (f64, f64),
    radius_sq: f64,
}

impl Triangle {
    fn new(vertices: [usize; 3], points: &[(f64, f64)]) -> Self {
        let [a, b, c] = vertices.map(|index| points[index]);
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < f64::EPSILON {
            // Collinear: an unbounded circumcircle swallows every later point.
            return Self { vertices, center: (0.0, 0.0), radius_sq: f64::INFINITY };
        }
        let a_sq = a.0 * a.0 + a.1 * a.1;
        let b_sq = b.0 * b.0 + b.1 * b.1;
        let c_sq = c.0 * c.0 + c.1 * c.1;
        let center = (
            (a_sq * (b.1 - c.1) + b_sq * (c.1 - a.1) + c_sq * (a.1 - b.1)) / d,
            (a_sq * (c.0 - b.0) + b_sq * (a.0 - c.0) + c_sq * (b.0 - a.0)) / d,
        );
        let radius_sq = distance_sq(center, a);
        Self { vertices, center, radius_sq }
    }

    fn circumcircle_contains(&self, point: (f64, f64)) -> bool {
        distance_sq(self.center, point) < self.radius_sq
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }
}

/// Unique undirected edges `(a, b)` with `a < b` between indices into `points`.
/// Fewer than three points, or only collinear ones, produce no edges.
pub fn triangulate(points: &[(f64, f64)]) -> Vec<(usize, usize)> {
    let count = points.len();
    if count < 3 {
        return Vec::new();
    }

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    let mut all_points = points.to_vec();
    all_points.push((mid.0 - 20.0 * span, mid.1 - span));
    all_points.push((mid.0, mid.1 + 20.0 * span));
    all_points.push((mid.0 + 20.0 * span, mid.1 - span));

    let mut triangles = vec![Triangle::new([count, count + 1, count + 2], &all_points)];
    for index in 0..count {
        let point = all_points[index];
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) =
            triangles.into_iter().partition(|triangle| triangle.circumcircle_contains(point));

        let mut edge_uses: Vec<(usize, usize)> =
            bad.iter().flat_map(|triangle| triangle.edges()).collect();
        edge_uses.sort_unstable();
        let boundary = edge_uses
            .iter()
            .enumerate()
            .filter(|&(position, edge)| {
                let repeated_before = position > 0 && edge_uses[position - 1] == *edge;
                let repeated_after = edge_uses.get(position + 1) == Some(edge);
                !repeated_before && !repeated_after
            })
            .map(|(_, &edge)| edge);

        triangles = good;
        for (a, b) in boundary {
            triangles.push(Triangle::new([a, b, index], &all_points));
        }
    }

    let edges: BTreeSet<(usize, usize)> = triangles
        .iter()
        .filter(|triangle| triangle.vertices.iter().all(|&vertex| vertex < count))
        .filter(|triangle| triangle.radius_sq.is_finite())
        .flat_map(|triangle| triangle.edges())
        .collect();
    edges.into_iter().collect()
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

fn distance_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_keeps_all_three_edges() {
        let edges = triangulate(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn square_gets_four_sides_and_one_diagonal() {
        let edges = triangulate(&[(2.0, 2.0), (2.0, 10.0), (10.0, 2.0), (10.0, 10.0)]);
        assert_eq!(edges.len(), 5, "unexpected edges {edges:?}");
        for side in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            assert!(edges.contains(&side), "missing side {side:?} in {edges:?}");
        }
    }

    #[test]
    fn collinear_points_produce_no_triangles() {
        assert!(triangulate(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]).is_empty());
        assert!(triangulate(&[(0.0, 0.0), (5.0, 5.0)]).is_empty());
    }

    #[test]
    fn interior_point_connects_to_every_corner() {
        let points = [(0.0, 0.0), (20.0, 0.0), (10.0, 20.0), (10.0, 7.0)];
        let edges = triangulate(&points);
        for corner in 0..3 {
            assert!(edges.contains(&(corner, 3)), "center not linked to {corner}: {edges:?}");
        }
        assert_eq!(edges.len(), 6);
    }
}
