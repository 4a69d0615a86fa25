//! Solids that can stand in the way of a navigation edge
//!
//! Boxes and spheres are the usual stand-ins for crates, pillars and
//! doors; triangles cover wall geometry taken straight from a mesh.

use crate::vector::Vec3;

/// Box aligned with the world axes, given by opposite corners
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    /// Inverted box that contains nothing; growing it by a point yields
    /// the point itself
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full size around `centre`
    pub fn around(centre: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(centre - half, centre + half)
    }

    /// Smallest box holding every point (EMPTY for no points)
    pub fn enclosing(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |acc, &p| Self::new(acc.min.min(p), acc.max.max(p)))
    }

    /// True when min exceeds max on some axis
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min.axis(axis) > self.max.axis(axis))
    }

    /// Inclusive of the faces
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        (0..3).all(|axis| {
            let v = point.axis(axis);
            v >= self.min.axis(axis) && v <= self.max.axis(axis)
        })
    }

    /// `point` clamped into the box
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.max(self.min).min(self.max)
    }

    /// Zero for points inside
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        point.distance_squared(self.closest_point(point))
    }
}

/// Ball given by centre and radius
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive of the surface
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// A flat triangle, e.g. one polygon of a wall
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unnormalized normal, following the a -> b -> c winding
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Surface area
    #[inline]
    pub fn area(&self) -> f32 {
        self.normal().length() * 0.5
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_around() {
        let aabb = AABB::around(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 4.0, 2.0));
        assert_eq!(aabb.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 3.0, 2.0));
        assert!(aabb.contains_point(Vec3::new(1.0, 2.9, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(1.0, 3.1, 0.5)));
    }

    #[test]
    fn test_aabb_enclosing() {
        let aabb = AABB::enclosing(&[Vec3::new(1.0, -1.0, 0.0), Vec3::new(-2.0, 3.0, 1.0)]);
        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 1.0));
        assert!(AABB::EMPTY.is_empty());
        assert!(AABB::enclosing(&[]).is_empty());
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_aabb_distance() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.distance_squared_to_point(Vec3::new(0.5, 0.5, 0.5)), 0.0);
        assert_relative_eq!(aabb.distance_squared_to_point(Vec3::new(3.0, 0.5, 0.5)), 4.0);
        assert_eq!(aabb.closest_point(Vec3::new(-1.0, 2.0, 0.5)), Vec3::new(0.0, 1.0, 0.5));
    }

    #[test]
    fn test_sphere_contains() {
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        assert!(sphere.contains_point(Vec3::new(0.0, 2.0, 0.0)));
        assert!(!sphere.contains_point(Vec3::new(0.8, 1.8, 0.0)));
    }

    #[test]
    fn test_triangle_area() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(tri.area(), 2.0);
        assert_relative_eq!(tri.centroid().x, 2.0 / 3.0);
    }
}
