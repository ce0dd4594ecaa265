//! Planar geometry for obstacle checks.
//!
//! The only question the wayfinding engine asks of geometry is whether the
//! straight walk between two locations crosses a wall, so this module is a
//! closed-segment intersection test plus the point/segment types it needs.
//!
//! All comparisons are exact: no epsilon is applied to the cross-product
//! sign. Callers supply coordinates already in consistent units.

use serde::{Deserialize, Serialize};

/// A point on the airport floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation of `(a, b, c)` from the sign of `(b - a) × (c - b)`.
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
    if cross == 0.0 {
        Orientation::Collinear
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` lies inside the bounding box of `p`–`r`.
///
/// Only meaningful once `p`, `q`, `r` are known to be collinear.
#[inline]
pub fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x >= p.x.min(r.x) && q.x <= p.x.max(r.x) && q.y >= p.y.min(r.y) && q.y <= p.y.max(r.y)
}

/// Whether closed segment `p1`–`q1` intersects closed segment `p2`–`q2`.
///
/// Touching endpoints and collinear overlap both count as intersecting.
/// Degenerate (zero-length) segments behave as points.
pub fn segments_intersect(p1: Point, q1: Point, p2: Point, q2: Point) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear triples: intersect iff the third point sits within the other segment.
    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// A finite line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_orientation_signs() {
        assert_eq!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)), Orientation::Collinear);
        assert_eq!(
            orientation(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(1.0, -1.0)), Orientation::Clockwise);
    }

    #[test]
    fn test_crossing_at_interior_point() {
        assert!(segments_intersect(p(0.0, 0.0), p(4.0, 4.0), p(0.0, 4.0), p(4.0, 0.0)));
    }

    #[test]
    fn test_collinear_overlap() {
        assert!(segments_intersect(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 0.0), p(6.0, 0.0)));
        assert!(segments_intersect(p(0.0, 0.0), p(6.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)));
    }

    #[test]
    fn test_collinear_disjoint() {
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)));
    }

    #[test]
    fn test_parallel_non_overlapping() {
        assert!(!segments_intersect(p(0.0, 0.0), p(4.0, 0.0), p(0.0, 1.0), p(4.0, 1.0)));
    }

    #[test]
    fn test_touching_endpoints() {
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(2.0, 2.0), p(4.0, 0.0)));
    }

    #[test]
    fn test_t_junction_touch() {
        // Wall ends exactly on the walkway.
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 3.0)));
    }

    #[test]
    fn test_near_miss() {
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.5), p(5.0, 3.0)));
    }

    #[test]
    fn test_degenerate_wall_on_walkway() {
        let walkway = Segment::new(p(0.0, 0.0), p(10.0, 0.0));
        let post = Segment::new(p(5.0, 0.0), p(5.0, 0.0));
        assert!(post.is_degenerate());
        assert!(walkway.intersects(&post));
        assert!(post.intersects(&walkway));
    }

    #[test]
    fn test_degenerate_wall_off_walkway() {
        let walkway = Segment::new(p(0.0, 0.0), p(10.0, 0.0));
        let post = Segment::new(p(5.0, 1.0), p(5.0, 1.0));
        assert!(!walkway.intersects(&post));
        // Collinear with the walkway's line but beyond its end.
        let far_post = Segment::new(p(12.0, 0.0), p(12.0, 0.0));
        assert!(!walkway.intersects(&far_post));
    }

    #[test]
    fn test_both_segments_degenerate() {
        let a = Segment::new(p(1.0, 1.0), p(1.0, 1.0));
        let b = Segment::new(p(1.0, 1.0), p(1.0, 1.0));
        let c = Segment::new(p(2.0, 1.0), p(2.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let cases = [
            (p(0.0, 0.0), p(4.0, 4.0), p(0.0, 4.0), p(4.0, 0.0)),
            (p(0.0, 0.0), p(4.0, 0.0), p(0.0, 1.0), p(4.0, 1.0)),
            (p(0.0, 0.0), p(2.0, 2.0), p(2.0, 2.0), p(4.0, 0.0)),
            (p(-3.0, 1.0), p(3.0, 1.0), p(0.0, -5.0), p(0.0, 0.5)),
        ];
        for (a, b, c, d) in cases {
            assert_eq!(segments_intersect(a, b, c, d), segments_intersect(c, d, a, b));
            assert_eq!(segments_intersect(a, b, c, d), segments_intersect(b, a, d, c));
        }
    }
}
