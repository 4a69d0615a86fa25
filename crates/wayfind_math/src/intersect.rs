//! Segment intersection tests
//!
//! Obstacles are any shape that can report where a finite segment
//! crosses it. Provided shapes:
//! - AABB (slab method, clipped to the segment)
//! - Sphere
//! - Triangle (Möller-Trumbore)
//!
//! A zero-length segment intersects a shape exactly when its point lies
//! inside (or on) the shape. Graphs use this to ask whether a vertex
//! itself is covered by an obstacle.

use core::fmt;

use crate::bounds::{Sphere, Triangle, AABB};
use crate::consts::{CONTACT_EPSILON, EPSILON};
use crate::segment::Segment;
use crate::vector::Vec3;

/// Capability of a shape to be tested against line segments
pub trait LineIntersectable: fmt::Debug {
    /// Points where the segment meets the shape, ordered from `segment.a`.
    /// Empty when they do not meet.
    fn intersect(&self, segment: &Segment) -> Vec<Vec3>;

    /// Whether the segment touches the shape at all
    fn intersects(&self, segment: &Segment) -> bool {
        !self.intersect(segment).is_empty()
    }
}

/// Segment-AABB intersection using the slab method
///
/// Returns the parameter interval `[t_enter, t_exit]` (both in `[0, 1]`)
/// of the part of the segment inside the box, or None when they do not meet.
pub fn segment_aabb(segment: &Segment, aabb: &AABB) -> Option<(f32, f32)> {
    if segment.is_degenerate() {
        return aabb.contains_point(segment.a).then_some((0.0, 0.0));
    }

    let origin = segment.a;
    let delta = segment.delta();
    let mut tmin = 0.0f32;
    let mut tmax = 1.0f32;

    for axis in 0..3 {
        let o = origin.axis(axis);
        let d = delta.axis(axis);
        let lo = aabb.min.axis(axis);
        let hi = aabb.max.axis(axis);

        if d.abs() < EPSILON {
            // Parallel to this slab
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (lo - o) * inv;
        let mut t2 = (hi - o) * inv;
        if t1 > t2 {
            core::mem::swap(&mut t1, &mut t2);
        }
        tmin = tmin.max(t1);
        tmax = tmax.min(t2);
        if tmin > tmax {
            return None;
        }
    }

    Some((tmin, tmax))
}

/// Segment-Sphere intersection
///
/// Returns the parameter interval (clamped to `[0, 1]`) of the part of the
/// segment inside the sphere, or None when they do not meet.
pub fn segment_sphere(segment: &Segment, sphere: &Sphere) -> Option<(f32, f32)> {
    if segment.is_degenerate() {
        return sphere.contains_point(segment.a).then_some((0.0, 0.0));
    }

    let delta = segment.delta();
    let oc = segment.a - sphere.center;
    let a = delta.dot(delta);
    let b = 2.0 * oc.dot(delta);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t2 < 0.0 || t1 > 1.0 {
        None
    } else {
        Some((t1.max(0.0), t2.min(1.0)))
    }
}

/// Segment-Triangle intersection using the Möller-Trumbore algorithm
///
/// Returns the parameter in `[0, 1]` at which the segment crosses the
/// triangle, or None. Segments lying in the triangle's plane are treated
/// as not crossing it.
pub fn segment_triangle(segment: &Segment, triangle: &Triangle) -> Option<f32> {
    if segment.is_degenerate() {
        return point_on_triangle(segment.a, triangle).then_some(0.0);
    }

    const PARALLEL_EPSILON: f32 = 0.0000001;

    let dir = segment.delta();
    let edge1 = triangle.b - triangle.a;
    let edge2 = triangle.c - triangle.a;
    let h = dir.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = segment.a - triangle.a;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Whether a point lies on the triangle surface (within contact tolerance)
fn point_on_triangle(point: Vec3, triangle: &Triangle) -> bool {
    let normal = triangle.normal();
    let len = normal.length();
    if len < EPSILON {
        return false;
    }
    let plane_dist = (point - triangle.a).dot(normal) / len;
    if plane_dist.abs() > CONTACT_EPSILON {
        return false;
    }

    // Same-side test against every edge
    let edges = [
        (triangle.a, triangle.b),
        (triangle.b, triangle.c),
        (triangle.c, triangle.a),
    ];
    edges.iter().all(|&(p, q)| (q - p).cross(point - p).dot(normal) >= -CONTACT_EPSILON)
}

fn interval_points(segment: &Segment, (t_enter, t_exit): (f32, f32)) -> Vec<Vec3> {
    let enter = segment.at(t_enter);
    if (t_exit - t_enter).abs() < EPSILON {
        vec![enter]
    } else {
        vec![enter, segment.at(t_exit)]
    }
}

impl LineIntersectable for AABB {
    fn intersect(&self, segment: &Segment) -> Vec<Vec3> {
        segment_aabb(segment, self)
            .map(|interval| interval_points(segment, interval))
            .unwrap_or_default()
    }
}

impl LineIntersectable for Sphere {
    fn intersect(&self, segment: &Segment) -> Vec<Vec3> {
        segment_sphere(segment, self)
            .map(|interval| interval_points(segment, interval))
            .unwrap_or_default()
    }
}

impl LineIntersectable for Triangle {
    fn intersect(&self, segment: &Segment) -> Vec<Vec3> {
        segment_triangle(segment, self)
            .map(|t| vec![segment.at(t)])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> AABB {
        AABB::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_segment_aabb_crossing() {
        let seg = Segment::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(2.0, 0.5, 0.5));
        let (t0, t1) = segment_aabb(&seg, &unit_box()).unwrap();
        assert_relative_eq!(t0, 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(t1, 2.0 / 3.0, epsilon = 1e-6);

        let points = unit_box().intersect(&seg);
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(points[1].x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_segment_aabb_stops_short() {
        // Line would hit the box but the segment ends before it
        let seg = Segment::new(Vec3::new(-3.0, 0.5, 0.5), Vec3::new(-1.0, 0.5, 0.5));
        assert!(segment_aabb(&seg, &unit_box()).is_none());
        assert!(!unit_box().intersects(&seg));
    }

    #[test]
    fn test_segment_aabb_parallel_outside() {
        let seg = Segment::new(Vec3::new(-1.0, 2.0, 0.5), Vec3::new(2.0, 2.0, 0.5));
        assert!(segment_aabb(&seg, &unit_box()).is_none());
    }

    #[test]
    fn test_segment_inside_aabb() {
        let seg = Segment::new(Vec3::splat(0.25), Vec3::splat(0.75));
        assert_eq!(segment_aabb(&seg, &unit_box()), Some((0.0, 1.0)));
    }

    #[test]
    fn test_point_segment_aabb() {
        let inside = Vec3::splat(0.5);
        let outside = Vec3::splat(1.5);
        assert!(unit_box().intersects(&Segment::new(inside, inside)));
        assert!(!unit_box().intersects(&Segment::new(outside, outside)));
    }

    #[test]
    fn test_segment_sphere() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let seg = Segment::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let points = sphere.intersect(&seg);
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(points[1].x, 1.0, epsilon = 1e-5);

        let miss = Segment::new(Vec3::new(-2.0, 2.0, 0.0), Vec3::new(2.0, 2.0, 0.0));
        assert!(!sphere.intersects(&miss));

        let short = Segment::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0));
        assert!(!sphere.intersects(&short));
    }

    #[test]
    fn test_segment_triangle() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        let seg = Segment::new(Vec3::new(0.5, 0.5, -1.0), Vec3::new(0.5, 0.5, 1.0));
        let t = segment_triangle(&seg, &tri).unwrap();
        assert_relative_eq!(t, 0.5, epsilon = 1e-6);

        let outside = Segment::new(Vec3::new(1.5, 1.5, -1.0), Vec3::new(1.5, 1.5, 1.0));
        assert!(segment_triangle(&outside, &tri).is_none());

        let too_short = Segment::new(Vec3::new(0.5, 0.5, -2.0), Vec3::new(0.5, 0.5, -1.0));
        assert!(!tri.intersects(&too_short));
    }

    #[test]
    fn test_point_on_triangle() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let on = Vec3::new(0.25, 0.25, 0.0);
        let off = Vec3::new(0.25, 0.25, 0.5);
        assert!(tri.intersects(&Segment::new(on, on)));
        assert!(!tri.intersects(&Segment::new(off, off)));
    }
}
