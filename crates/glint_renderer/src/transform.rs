//! Object-space wrappers that place a shared hittable in the world.
//!
//! Both wrappers move the incoming ray into the wrapped object's frame,
//! delegate, and move the result back. Ray time is always passed through
//! unchanged so moving geometry stays consistent under instancing.

use crate::hittable::{HitRecord, Hittable};
use glint_math::{Aabb, DMat3, Interval, Mat3Ext, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Translation of a wrapped object by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Move the ray backwards by the offset
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        // Move the intersection point forwards by the offset
        let mut rec = self.object.hit(&offset_ray, ray_t)?;
        rec.p += self.offset;

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn can_sample(&self) -> bool {
        self.object.can_sample()
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// Rotation of a wrapped object about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    /// Object space to world space
    rotation: DMat3,
    /// World space to object space
    inverse: DMat3,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `angle` degrees counter-clockwise about +Y.
    pub fn new(object: Arc<dyn Hittable>, angle: f64) -> Self {
        let rotation = DMat3::from_rotation_y(angle.to_radians());
        // Orthonormal, so the transpose is the inverse
        let inverse = rotation.transpose();
        let bbox = rotation.transform_aabb(&object.bounding_box());

        Self {
            object,
            rotation,
            inverse,
            bbox,
        }
    }

    /// Map an object-space point or direction into world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.rotation.mul_vec3(v)
    }

    /// Map a world-space point or direction into object space.
    #[inline]
    pub fn to_object(&self, v: Vec3) -> Vec3 {
        self.inverse.mul_vec3(v)
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Transform the ray from world space to object space
        let rotated_ray = Ray::new(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        // Determine whether an intersection exists in object space
        let mut rec = self.object.hit(&rotated_ray, ray_t)?;

        // Transform the intersection from object space back to world space.
        // Rotation preserves dot products, so front_face carries over.
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn can_sample(&self) -> bool {
        self.object.can_sample()
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        self.object
            .pdf_value(self.to_object(origin), self.to_object(direction))
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(self.object.random(self.to_object(origin), rng))
    }
}
