//! Glint math types.
//!
//! Double-precision value types shared by the renderer: vectors (re-exported
//! from glam), intervals, bounding boxes, rays and orthonormal frames.

// Re-export glam for convenience
pub use glam::{DMat3, DVec2, DVec3};

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat3Ext;

/// 3D vector.
pub type Vec3 = DVec3;

/// A position in world or object space.
pub type Point3 = DVec3;

/// Linear RGB color.
pub type Color = DVec3;
