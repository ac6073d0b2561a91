use robust::{orient2d, Coord};

fn coord(p: [f64; 2]) -> Coord<f64> {
    Coord { x: p[0], y: p[1] }
}

/// Twice the signed area of triangle `(a, b, c)`, positive when the triangle
/// winds counter-clockwise. Backed by `robust::orient2d`'s exact-arithmetic
/// predicate so points exactly on an edge classify consistently regardless
/// of floating-point rounding — required for the spec's "points on an edge
/// are inside, ties broken by smallest element index" rule to hold.
pub fn signed_area2(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    orient2d(coord(a), coord(b), coord(c))
}

/// Tests whether `p` lies inside (or on the boundary of) the counter-
/// clockwise triangle `(p0, p1, p2)`.
pub fn point_in_triangle(p: [f64; 2], p0: [f64; 2], p1: [f64; 2], p2: [f64; 2]) -> bool {
    signed_area2(p0, p1, p) >= 0.0 && signed_area2(p1, p2, p) >= 0.0 && signed_area2(p2, p0, p) >= 0.0
}

/// Tests whether `p` lies inside the counter-clockwise quadrangle
/// `(n0, n1, n2, n3)` by decomposing along the `(n0, n2)` diagonal, per
/// spec.md §4.3.
pub fn point_in_quadrangle(
    p: [f64; 2],
    n0: [f64; 2],
    n1: [f64; 2],
    n2: [f64; 2],
    n3: [f64; 2],
) -> bool {
    point_in_triangle(p, n0, n1, n2) || point_in_triangle(p, n0, n2, n3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_is_inside_triangle() {
        let p0 = [0.0, 0.0];
        let p1 = [1.0, 0.0];
        let p2 = [0.0, 1.0];
        assert!(point_in_triangle([1.0 / 3.0, 1.0 / 3.0], p0, p1, p2));
    }

    #[test]
    fn point_outside_triangle_is_rejected() {
        let p0 = [0.0, 0.0];
        let p1 = [1.0, 0.0];
        let p2 = [0.0, 1.0];
        assert!(!point_in_triangle([1.0, 1.0], p0, p1, p2));
    }

    #[test]
    fn point_on_edge_is_inside() {
        let p0 = [0.0, 0.0];
        let p1 = [1.0, 0.0];
        let p2 = [0.0, 1.0];
        assert!(point_in_triangle([0.5, 0.5], p0, p1, p2));
    }

    #[test]
    fn unit_square_quad_contains_interior_point() {
        let (n0, n1, n2, n3) = ([0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]);
        assert!(point_in_quadrangle([0.25, 0.75], n0, n1, n2, n3));
        assert!(!point_in_quadrangle([1.5, 0.5], n0, n1, n2, n3));
    }
}
