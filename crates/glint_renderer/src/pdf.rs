//! Direction sampling strategies for importance sampling.
//!
//! Every strategy pairs `generate` with a `value` that returns the density of
//! the generated directions, measured in solid angle.

use crate::{
    hittable::Hittable,
    sampling::{gen_f64, random_cosine_direction, random_unit_vector},
};
use glint_math::{Onb, Point3, Vec3};
use rand::RngCore;
use std::f64::consts::PI;

/// A probability density over directions.
pub trait Pdf {
    /// Density of `direction`.
    fn value(&self, direction: Vec3) -> f64;

    /// Draw a direction distributed according to `value`.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Uniform density over the whole sphere of directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f64 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Cosine-weighted hemisphere about a normal: `max(0, cosθ) / π`.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::new(w) }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f64 {
        let cosine_theta = direction.normalize().dot(self.uvw.w());
        (cosine_theta / PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.transform(random_cosine_direction(rng))
    }
}

/// Samples directions towards a hittable from a fixed origin.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Point3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Point3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f64 {
        self.objects.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random(self.origin, rng)
    }
}

/// Equal-weight mixture of two densities.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f64 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f64(rng) < 0.5 {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Material, Quad, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_cosine_pdf_histogram_matches_cosine() {
        // Bin cosθ of generated directions. For density cosθ/π the CDF of
        // cosθ is 1 - cos²θ, so bin [a, b) should get b² - a² of the mass.
        let normal = Vec3::new(0.3, 1.0, -0.2);
        let pdf = CosinePdf::new(normal);
        let n_hat = normal.normalize();
        let mut rng = StdRng::seed_from_u64(2024);

        const N: usize = 100_000;
        const BINS: usize = 5;
        let mut counts = [0usize; BINS];
        for _ in 0..N {
            let d = pdf.generate(&mut rng);
            let cos = d.normalize().dot(n_hat);
            assert!(cos >= -1e-12);
            let bin = ((cos * BINS as f64) as usize).min(BINS - 1);
            counts[bin] += 1;
        }

        for (i, &count) in counts.iter().enumerate() {
            let a = i as f64 / BINS as f64;
            let b = (i + 1) as f64 / BINS as f64;
            let expected = (b * b - a * a) * N as f64;
            let rel = (count as f64 - expected).abs() / expected;
            assert!(rel < 0.05, "bin {i}: got {count}, expected {expected:.0}");
        }
    }

    #[test]
    fn test_cosine_pdf_value() {
        let pdf = CosinePdf::new(Vec3::Z);

        assert!((pdf.value(Vec3::Z) - 1.0 / PI).abs() < 1e-12);
        assert!((pdf.value(Vec3::new(0.0, 1.0, 1.0)) - (0.5_f64).sqrt() / PI).abs() < 1e-12);
        assert_eq!(pdf.value(Vec3::NEG_Z), 0.0);
    }

    #[test]
    fn test_cosine_pdf_integrates_to_one() {
        // Uniform-sphere Monte Carlo estimate of ∫ p(ω) dω
        let pdf = CosinePdf::new(Vec3::new(1.0, -1.0, 0.5));
        let uniform = SpherePdf;
        let mut rng = StdRng::seed_from_u64(99);

        const N: usize = 200_000;
        let sum: f64 = (0..N)
            .map(|_| {
                let d = uniform.generate(&mut rng);
                pdf.value(d) / uniform.value(d)
            })
            .sum();

        assert!((sum / N as f64 - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_generated_directions_have_positive_density() {
        let light = Sphere::new(Point3::new(0.0, 5.0, 0.0), 1.0, gray());
        let light_pdf = HittablePdf::new(&light, Point3::ZERO);
        let cosine = CosinePdf::new(Vec3::Y);
        let mixture = MixturePdf::new(&light_pdf, &cosine);
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..2000 {
            assert!(cosine.value(cosine.generate(&mut rng)) > 0.0);
            assert!(light_pdf.value(light_pdf.generate(&mut rng)) > 0.0);
            assert!(mixture.value(mixture.generate(&mut rng)) > 0.0);
        }
    }

    #[test]
    fn test_mixture_value_is_mean() {
        let light = Quad::new(Point3::new(-1.0, 4.0, -1.0), 2.0 * Vec3::X, 2.0 * Vec3::Z, gray());
        let light_pdf = HittablePdf::new(&light, Point3::ZERO);
        let cosine = CosinePdf::new(Vec3::new(0.2, 1.0, 0.0));
        let mixture = MixturePdf::new(&light_pdf, &cosine);
        let mut rng = StdRng::seed_from_u64(31);

        for _ in 0..1000 {
            let d = mixture.generate(&mut rng);
            let expected = (light_pdf.value(d) + cosine.value(d)) / 2.0;
            assert!((mixture.value(d) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mixture_picks_both_components() {
        let up = CosinePdf::new(Vec3::Y);
        let down = CosinePdf::new(Vec3::NEG_Y);
        let mixture = MixturePdf::new(&up, &down);
        let mut rng = StdRng::seed_from_u64(4);

        let ups = (0..10_000)
            .filter(|_| mixture.generate(&mut rng).y > 0.0)
            .count();
        assert!((4_700..5_300).contains(&ups));
    }

    #[test]
    fn test_sphere_pdf() {
        let pdf = SpherePdf;
        let mut rng = StdRng::seed_from_u64(0);
        let d = pdf.generate(&mut rng);

        assert!((d.length() - 1.0).abs() < 1e-9);
        assert!((pdf.value(d) - 1.0 / (4.0 * PI)).abs() < 1e-15);
    }
}
