//! Planar parallelogram primitive and the box built from six of them.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f64,
    HittableList, Material,
};
use glint_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A parallelogram spanned by edges `u` and `v` from corner `q`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `n / (n·n)` with the unnormalized normal, for planar coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: normal·x = d
    d: f64,
    area: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    /// Create a new quad.
    ///
    /// Parallel edges give a zero normal; such a quad never reports a hit.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let n_len_sq = n.length_squared();
        let normal = n.normalize_or_zero();
        let w = if n_len_sq > 0.0 { n / n_len_sq } else { Vec3::ZERO };
        let d = normal.dot(q);

        // Bounding box of both diagonals
        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);
        let bbox = Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            area: n_len_sq.sqrt(),
            material,
            bbox,
        }
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Given planar coordinates, is the hit point inside the primitive?
    fn is_interior(alpha: f64, beta: f64) -> bool {
        let unit_interval = Interval::new(0.0, 1.0);
        unit_interval.contains(alpha) && unit_interval.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        // No hit if the ray is parallel to the plane (or the quad is degenerate)
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let intersection = ray.at(t);
        let planar_hitpt_vector = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt_vector.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt_vector));

        if !Self::is_interior(alpha, beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (alpha, beta), self.material.as_ref()))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn can_sample(&self) -> bool {
        self.area > 0.0
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        let Some(rec) = self.hit(
            &Ray::new_simple(origin, direction),
            Interval::new(0.001, f64::INFINITY),
        ) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + (gen_f64(rng) * self.u) + (gen_f64(rng) * self.v);
        p - origin
    }
}

/// Closed box with opposite corners `a` and `b`, as six quads sharing one
/// material.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Point3::new(min.x, min.y, max.z), dx, dy),  // front
        (Point3::new(max.x, min.y, max.z), -dz, dy), // right
        (Point3::new(max.x, min.y, min.z), -dx, dy), // back
        (Point3::new(min.x, min.y, min.z), dz, dy),  // left
        (Point3::new(min.x, max.y, max.z), dx, -dz), // top
        (Point3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];
    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, Arc::clone(&material))));
    }

    sides
}
