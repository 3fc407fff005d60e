// Transform utilities for DMat3
//
// Extends glam::DMat3 with bounding-box helpers for object-space wrappers.
// glam already provides mul_vec3() and transpose().

use crate::{Aabb, Point3};
use glam::DMat3;

/// Extension trait for DMat3 to provide additional transform utilities
pub trait Mat3Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for DMat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        // Infinite corners would turn into NaN under rotation
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let corners = aabb.corners();
        let first = self.mul_vec3(corners[0]);

        let (result_min, result_max) = corners[1..].iter().fold(
            (first, first),
            |(lo, hi): (Point3, Point3), &corner| {
                let p = self.mul_vec3(corner);
                (lo.min(p), hi.max(p))
            },
        );

        Aabb::from_points(result_min, result_max)
    }
}
