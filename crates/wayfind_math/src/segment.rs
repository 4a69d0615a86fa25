//! Finite line segments
//!
//! Segments connect two graph vertices; obstacles are tested against
//! them to decide whether a straight move is obstructed.

use crate::vector::Vec3;

/// A line segment between `a` and `b`, with `a` used as origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Start point, also the origin for parametrisation
    pub a: Vec3,
    /// End point
    pub b: Vec3,
}

impl Segment {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }

    /// The start point
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.a
    }

    /// Unnormalized direction from `a` to `b`
    #[inline]
    pub fn delta(&self) -> Vec3 {
        self.b - self.a
    }

    /// Normalized direction from `a` to `b` (zero for a degenerate segment)
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.delta().normalize()
    }

    /// Distance between the two end points
    #[inline]
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    /// True when both end points coincide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.delta().length_squared() < crate::consts::EPSILON * crate::consts::EPSILON
    }

    /// Point at parameter `t` in `[0, 1]`
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.a + self.delta() * t
    }

    /// Point at distance `d` from the origin towards `b`
    #[inline]
    pub fn along(&self, d: f32) -> Vec3 {
        self.a + self.direction() * d
    }

    /// Closest point on the segment to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let delta = self.delta();
        let len_sq = delta.length_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let t = crate::clamp((point - self.a).dot(delta) / len_sq, 0.0, 1.0);
        self.at(t)
    }

    /// Squared distance from a point to the segment
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        self.closest_point(point).distance_squared(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_along() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(seg.length(), 4.0);
        assert_eq!(seg.along(1.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(seg.at(0.5), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_segment_closest_point_clamps() {
        let seg = Segment::new(Vec3::ZERO, Vec3::X);
        assert_eq!(seg.closest_point(Vec3::new(5.0, 1.0, 0.0)), Vec3::X);
        assert_eq!(seg.closest_point(Vec3::new(-5.0, 1.0, 0.0)), Vec3::ZERO);
        assert_relative_eq!(seg.distance_squared_to_point(Vec3::new(0.5, 2.0, 0.0)), 4.0);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(Segment::new(p, p).is_degenerate());
        assert_eq!(Segment::new(p, p).direction(), Vec3::ZERO);
    }
}
