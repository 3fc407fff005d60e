//! Material trait for surface scattering.

use crate::{
    hittable::HitRecord,
    pdf::{CosinePdf, Pdf},
    sampling::random_unit_vector,
};
use glint_math::{Color, Point3, Ray, Vec3};
use rand::RngCore;
use std::f64::consts::PI;

/// How a scattered ray leaves the surface.
pub enum ScatterKind {
    /// Direction drawn from a density; the integrator may mix it with light
    /// sampling and weights the result by `scattering_pdf / pdf`.
    Sampled(Box<dyn Pdf>),
    /// A single deterministic (or fuzzed) direction, followed as-is with no
    /// density weighting.
    Specular(Ray),
}

/// Result of a successful scatter.
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are immutable and shared between many surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _rec: &HitRecord, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }

    /// Density with which this material's own sampling would choose
    /// `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        0.0
    }
}

/// Lambertian (diffuse) material.
///
/// `attenuation` is the reflectance; combined with `scattering_pdf`
/// (`cosθ / π`) it gives the BSDF term `reflectance / π · cosθ`.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Sampled(Box::new(CosinePdf::new(rec.normal))),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        let cos_theta = rec.normal.dot(scattered.direction().normalize());
        if cos_theta < 0.0 {
            0.0
        } else {
            cos_theta / PI
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction(), rec.normal).normalize();
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz can push the ray below the surface; absorb it
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Specular(Ray::new(rec.p, scattered_dir, ray_in.time())),
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    // Both faces emit; emission does not depend on direction
    fn emitted(&self, _rec: &HitRecord, _u: f64, _v: f64, _p: Point3) -> Color {
        self.emit
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
