//! # wayfind_math - Geometry for Navigation
//!
//! Small geometry kernel used by the navigation graphs:
//! - `Vec3` positions and directions
//! - Bounding volumes (`AABB`, `Sphere`) and `Triangle`
//! - Line `Segment`s and segment/shape intersection through
//!   the `LineIntersectable` capability

pub mod vector;
pub mod bounds;
pub mod segment;
pub mod intersect;

pub use vector::*;
pub use bounds::*;
pub use segment::*;
pub use intersect::*;

/// Common math constants
pub mod consts {
    pub const EPSILON: f32 = 1e-6;
    /// Tolerance used when testing whether a point lies on a shape boundary
    pub const CONTACT_EPSILON: f32 = 1e-4;
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

pub mod prelude {
    pub use crate::vector::Vec3;
    pub use crate::bounds::{AABB, Sphere, Triangle};
    pub use crate::segment::Segment;
    pub use crate::intersect::{
        LineIntersectable, segment_aabb, segment_sphere, segment_triangle,
    };
    pub use crate::clamp;
}
