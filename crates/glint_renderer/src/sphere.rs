//! Sphere primitive, optionally moving linearly over the shutter interval.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::{cos_theta_max, random_to_sphere, random_unit_vector},
    Material,
};
use glint_math::{Aabb, Interval, Onb, Point3, Ray, Vec3};
use rand::RngCore;
use std::f64::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
///
/// The center is stored as a ray: position at time 0 plus velocity, so a
/// stationary sphere is simply one with zero velocity.
pub struct Sphere {
    center: Ray,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere. Negative radii are clamped to 0.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self::moving(center, center, radius, material)
    }

    /// Create a sphere moving from `center0` at time 0 to `center1` at time 1.
    pub fn moving(
        center0: Point3,
        center1: Point3,
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let radius = radius.max(0.0);
        let center = Ray::new_simple(center0, center1 - center0);

        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center.at(0.0) - rvec, center.at(0.0) + rvec);
        let box1 = Aabb::from_points(center.at(1.0) - rvec, center.at(1.0) + rvec);
        let bbox = Aabb::surrounding(&box0, &box1);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Center at the given time.
    #[inline]
    pub fn center_at(&self, time: f64) -> Point3 {
        self.center.at(time)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        // A zero radius only reaches here for a grazing hit on its center
        let outward_normal = ((p - current_center) / self.radius).normalize_or_zero();
        let uv = Self::get_sphere_uv(outward_normal);

        Some(HitRecord::new(ray, root, outward_normal, uv, self.material.as_ref()))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn can_sample(&self) -> bool {
        self.radius > 0.0
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        // Light queries are made at time 0
        let distance_squared = (self.center.at(0.0) - origin).length_squared();

        // From inside, every direction reaches the sphere
        if distance_squared <= self.radius * self.radius {
            return 1.0 / (4.0 * PI);
        }

        if self
            .hit(&Ray::new_simple(origin, direction), Interval::new(0.001, f64::INFINITY))
            .is_none()
        {
            return 0.0;
        }

        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max(self.radius, distance_squared));

        1.0 / solid_angle
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center.at(0.0) - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return random_unit_vector(rng);
        }
        let uvw = Onb::new(direction);

        uvw.transform(random_to_sphere(self.radius, distance_squared, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit_unit_sphere() {
        let sphere = Sphere::new(Point3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray through the center must hit");

        assert!((rec.t - 4.0).abs() < 1e-12);
        assert!((rec.p - Point3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!((rec.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_roots_symmetric_about_center() {
        let sphere = Sphere::new(Point3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let near = sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        // Exclude the near root: the far one must come back
        let far = sphere.hit(&ray, Interval::new(4.5, f64::INFINITY)).unwrap();

        assert!((near.t - 4.0).abs() < 1e-12);
        assert!((far.t - 6.0).abs() < 1e-12);
        assert!(((near.t + far.t) / 2.0 - 5.0).abs() < 1e-12);
        assert!(!far.front_face);
        // Normal still faces the ray when leaving the sphere
        assert!(far.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());

        // Both roots outside the interval
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.4)).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let sphere = Sphere::new(Point3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Point3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let rec = sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();

        // +X on the equator
        assert!((rec.u - 0.5).abs() < 1e-12);
        assert!((rec.v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_radius_clamped() {
        let sphere = Sphere::new(Point3::ZERO, -2.0, gray());
        assert_eq!(sphere.radius(), 0.0);
    }

    #[test]
    fn test_moving_sphere_bbox_covers_motion() {
        let c0 = Point3::new(0.0, 0.0, 0.0);
        let c1 = Point3::new(3.0, 1.0, 0.0);
        let sphere = Sphere::moving(c0, c1, 0.5, gray());
        let bbox = sphere.bounding_box();

        for i in 0..=10 {
            let time = i as f64 / 10.0;
            let center = sphere.center_at(time);
            for offset in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
                assert!(bbox.contains(center + 0.5 * offset));
            }
        }
    }

    #[test]
    fn test_moving_sphere_hit_depends_on_time() {
        let sphere = Sphere::moving(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            1.0,
            gray(),
        );
        let early = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let late = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::Z, 1.0);
        let interval = Interval::new(0.001, f64::INFINITY);

        assert!(sphere.hit(&early, interval).is_some());
        assert!(sphere.hit(&late, interval).is_none());

        let rec = sphere
            .hit(&Ray::new(Point3::new(10.0, 0.0, -5.0), Vec3::Z, 1.0), interval)
            .unwrap();
        assert!((rec.p - Point3::new(10.0, 0.0, -1.0)).length() < 1e-9);
    }

    #[test]
    fn test_sphere_pdf_matches_cone_solid_angle() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, 4.0), 1.0, gray());
        let origin = Point3::ZERO;

        let cos_max = (1.0 - 1.0 / 16.0_f64).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_max));

        assert!((sphere.pdf_value(origin, Vec3::Z) - expected).abs() < 1e-9);
        assert_eq!(sphere.pdf_value(origin, Vec3::NEG_Z), 0.0);
    }

    #[test]
    fn test_sphere_random_directions_hit_sphere() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 6.0), 1.5, gray());
        let origin = Point3::new(-1.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let dir = sphere.random(origin, &mut rng);
            assert!(sphere.pdf_value(origin, dir) > 0.0);
        }
    }

    #[test]
    fn test_sphere_pdf_from_inside_is_uniform() {
        let sphere = Sphere::new(Point3::new(0.0, 1.0, 0.0), 2.0, gray());
        let mut rng = StdRng::seed_from_u64(5);

        for origin in [Point3::new(0.0, 1.0, 0.0), Point3::new(0.5, 0.0, 0.3)] {
            for _ in 0..200 {
                let dir = sphere.random(origin, &mut rng);
                assert!(dir.is_finite());
                assert!((dir.length() - 1.0).abs() < 1e-9);
                assert!((sphere.pdf_value(origin, dir) - 1.0 / (4.0 * PI)).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_can_sample_needs_radius() {
        assert!(Sphere::new(Point3::ZERO, 1.0, gray()).can_sample());
        assert!(!Sphere::new(Point3::ZERO, -1.0, gray()).can_sample());
    }
}
