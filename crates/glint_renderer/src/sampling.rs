//! Random sampling helpers shared by the camera, materials and PDFs.
//!
//! Everything takes `&mut dyn RngCore` so each render worker can thread its
//! own deterministic stream through the call graph.

use glint_math::Vec3;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, UnitDisc, UnitSphere};
use std::f64::consts::PI;

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
pub(crate) fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

/// Sample a random point in the unit disk (z = 0).
pub(crate) fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    let [x, y]: [f64; 2] = UnitDisc.sample(rng);
    Vec3::new(x, y, 0.0)
}

/// Uniformly distributed unit vector.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::from_array(UnitSphere.sample(rng))
}

/// Cosine-weighted direction about +Z; density is `z / π`.
pub(crate) fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f64(rng);
    let r2 = gen_f64(rng);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(x, y, z)
}

/// Direction uniform in solid angle within the cone subtended by a sphere of
/// `radius` whose center lies on +Z at squared distance `distance_squared`.
pub(crate) fn random_to_sphere(radius: f64, distance_squared: f64, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f64(rng);
    let r2 = gen_f64(rng);
    let z = 1.0 + r2 * (cos_theta_max(radius, distance_squared) - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
    let x = phi.cos() * sin_theta;
    let y = phi.sin() * sin_theta;

    Vec3::new(x, y, z)
}

/// Cosine of the half-angle of the cone a sphere subtends. Clamped to 0 when
/// the viewpoint is inside the sphere.
#[inline]
pub(crate) fn cos_theta_max(radius: f64, distance_squared: f64) -> f64 {
    (1.0 - radius * radius / distance_squared).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f64_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = gen_f64(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_disk_and_sphere() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let d = random_in_unit_disk(&mut rng);
            assert!(d.length_squared() <= 1.0);
            assert_eq!(d.z, 0.0);

            let s = random_unit_vector(&mut rng);
            assert!((s.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cosine_direction_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let d = random_cosine_direction(&mut rng);
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_to_sphere_stays_in_cone() {
        let mut rng = StdRng::seed_from_u64(5);
        let (radius, dist_sq) = (1.0, 16.0);
        let cos_max = cos_theta_max(radius, dist_sq);
        for _ in 0..1000 {
            let d = random_to_sphere(radius, dist_sq, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-9);
            assert!(d.z >= cos_max - 1e-12);
        }
    }

    #[test]
    fn test_cos_theta_max_inside_sphere() {
        assert_eq!(cos_theta_max(2.0, 1.0), 0.0);
    }
}
