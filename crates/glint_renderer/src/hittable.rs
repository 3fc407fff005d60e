//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use glint_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("u", &self.u)
            .field("v", &self.v)
            .field("t", &self.t)
            .field("front_face", &self.front_face)
            .finish_non_exhaustive()
    }
}

/// Trait for objects that can be hit by rays.
///
/// Scenes are built once and then shared read-only between render threads.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `ray` whose parameter lies strictly inside
    /// `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Get the axis-aligned bounding box of this object, covering the whole
    /// [0, 1] time range.
    fn bounding_box(&self) -> Aabb;

    /// Whether [`Hittable::pdf_value`] and [`Hittable::random`] describe a
    /// real density. When false the integrator samples the material alone.
    fn can_sample(&self) -> bool {
        false
    }

    /// Solid-angle density of sampling `direction` from `origin` with
    /// [`Hittable::random`]. Surfaces that cannot be sampled report 0.
    fn pdf_value(&self, _origin: Point3, _direction: Vec3) -> f64 {
        0.0
    }

    /// Sample a direction from `origin` towards this surface.
    fn random(&self, _origin: Point3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}
