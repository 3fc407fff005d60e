//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Light sampling mixed with material sampling
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{
    bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE},
    pdf::{HittablePdf, MixturePdf, Pdf},
    Camera, Hittable, ScatterKind,
};
use glint_math::{Color, Interval, Point3, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// Rays start this far along their direction to avoid self-intersection.
const RAY_EPSILON: f64 = 0.001;

/// Sampling densities at or below this are treated as degenerate.
const MIN_PDF: f64 = 1e-12;

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and accumulating
/// emitted light. When `lights` is given, diffuse bounces sample half of
/// their directions towards it.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(RAY_EPSILON, f64::INFINITY)) else {
        return background;
    };

    let color_from_emission = rec.material.emitted(&rec, rec.u, rec.v, rec.p);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return color_from_emission;
    };

    let surface_pdf = match srec.kind {
        ScatterKind::Specular(specular_ray) => {
            let bounced = ray_color(&specular_ray, world, lights, depth - 1, background, rng);
            return color_from_emission + srec.attenuation * bounced;
        }
        ScatterKind::Sampled(pdf) => pdf,
    };

    // Only lights with a density of their own join the mixture
    let (scattered, pdf_value) = match lights.filter(|lights| lights.can_sample()) {
        Some(lights) => {
            let light_pdf = HittablePdf::new(lights, rec.p);
            let mixture = MixturePdf::new(&light_pdf, surface_pdf.as_ref());
            sample_direction(&mixture, rec.p, ray, rng)
        }
        None => sample_direction(surface_pdf.as_ref(), rec.p, ray, rng),
    };

    // A vanishing density would blow the estimate up; drop the bounce
    if !(pdf_value > MIN_PDF && pdf_value.is_finite()) {
        return color_from_emission;
    }

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    if scattering_pdf <= 0.0 {
        return color_from_emission;
    }

    let sample_color = ray_color(&scattered, world, lights, depth - 1, background, rng);
    let color_from_scatter = (srec.attenuation * scattering_pdf * sample_color) / pdf_value;

    color_from_emission + color_from_scatter
}

/// Draw a scattered ray from `pdf` and return it with its density.
fn sample_direction(
    pdf: &dyn Pdf,
    origin: Point3,
    ray_in: &Ray,
    rng: &mut dyn RngCore,
) -> (Ray, f64) {
    let direction = pdf.generate(rng);
    let scattered = Ray::new(origin, direction, ray_in.time());
    (scattered, pdf.value(direction))
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let intensity = Interval::new(0.000, 0.999);
    let to_byte = |c: f64| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Zero out non-finite components so one bad sample cannot poison a pixel.
#[inline]
fn sanitize(color: Color) -> Color {
    Color::new(
        if color.x.is_finite() { color.x } else { 0.0 },
        if color.y.is_finite() { color.y } else { 0.0 },
        if color.z.is_finite() { color.z } else { 0.0 },
    )
}

/// Deterministic random stream for one pixel.
pub(crate) fn pixel_rng(seed: u64, x: u32, y: u32, width: u32) -> StdRng {
    let index = y as u64 * width as u64 + x as u64;
    StdRng::seed_from_u64(seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render a single pixel with multi-sampling, returning the linear average.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = camera.samples_per_pixel();
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        let sample = ray_color(&ray, world, lights, camera.max_depth(), camera.background(), rng);
        pixel_color += sanitize(sample);
    }

    // Average the samples
    pixel_color / samples as f64
}

/// Image buffer of linear colors, row-major, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-corrected RGB bytes in raster order.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            let rgba = color_to_rgba(*color);
            bytes.extend_from_slice(&rgba[..3]);
        }
        bytes
    }

    /// Gamma-corrected RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets are rendered in parallel; every pixel uses its own seeded random
/// stream, so the result does not depend on thread scheduling.
pub fn render(camera: &Camera, world: &dyn Hittable, lights: Option<&dyn Hittable>) -> ImageBuffer {
    let never = AtomicBool::new(false);
    render_cancellable(camera, world, lights, &never)
        .unwrap_or_else(|| ImageBuffer::new(camera.image_width(), camera.image_height()))
}

/// Like [`render`], but polls `cancel` between buckets and returns `None`
/// if it was raised before the image completed.
pub fn render_cancellable(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    cancel: &AtomicBool,
) -> Option<ImageBuffer> {
    let width = camera.image_width();
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);
    let total = buckets.len();
    let finished = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} buckets",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        total
    );
    let start = Instant::now();

    let results: Vec<_> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let result = render_bucket(bucket, camera, world, lights);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
            Some(result)
        })
        .collect();

    if cancel.load(Ordering::Relaxed) {
        log::warn!(
            "Render cancelled after {}/{} buckets ({:?})",
            results.len(),
            total,
            start.elapsed()
        );
        return None;
    }

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            image.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Some(image)
}
