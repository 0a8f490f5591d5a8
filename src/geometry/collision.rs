//! Polygon overlap detection
//!
//! Two polygons collide when a vertex of either lies inside the other, or
//! when any pair of their edges properly cross. Checks are O(n*m) and meant
//! for a handful of small polygons.
//!
//! Boundary behavior is inherited from the underlying tests and left as is:
//! - a point exactly on an edge may be reported inside or outside
//! - collinear overlapping edges are not reported as crossing
//! - polygons that only touch at a vertex do not collide
//!
//! Degenerate input (fewer than 3 vertices, zero area, self-intersecting)
//! never panics but the result carries no guarantee.

use crate::domain::{Edge, Point, Polygon};

/// Even-odd ray casting: cast a ray towards +x and count boundary crossings
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    let vertices = polygon.points();
    let n = vertices.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        // Straddle check guarantees vj.y != vi.y, so the division is finite
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// True when p -> q -> r turns counter-clockwise. Exact collinearity is `false`.
pub fn ccw(p: Point, q: Point, r: Point) -> bool {
    (r.y - p.y) * (q.x - p.x) > (q.y - p.y) * (r.x - p.x)
}

/// Proper crossing test for two segments
pub fn segments_intersect(first: Edge, second: Edge) -> bool {
    let Edge { start: a, end: b } = first;
    let Edge { start: c, end: d } = second;

    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Check whether two polygons overlap or one contains the other
pub fn collides(a: &Polygon, b: &Polygon) -> bool {
    // Containment first: fully nested polygons have no crossing edges
    if a.points().iter().any(|&p| point_in_polygon(p, b)) {
        return true;
    }
    if b.points().iter().any(|&p| point_in_polygon(p, a)) {
        return true;
    }

    a.edges()
        .any(|e1| b.edges().any(|e2| segments_intersect(e1, e2)))
}
