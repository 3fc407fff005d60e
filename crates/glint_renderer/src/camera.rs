//! Camera configuration and primary ray generation.

use crate::sampling::{gen_f64, random_in_unit_disk, sample_square};
use glint_math::{Color, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid camera configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("image_width must be at least 1")]
    ZeroWidth,

    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("aspect_ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f64),

    #[error("vfov must be in (0, 180) degrees, got {0}")]
    InvalidFov(f64),

    #[error("defocus_angle must be finite and non-negative, got {0}")]
    InvalidDefocusAngle(f64),

    #[error("look_from, look_at and vup must be finite, and look_from must differ from look_at")]
    DegenerateView,

    #[error("vup must not be parallel to the view direction")]
    DegenerateUp,
}

/// User-facing camera and render settings.
///
/// Every field has a default so partial JSON documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces into the scene
    pub max_depth: u32,
    /// Scene background color
    pub background: Color,

    /// Vertical view angle (field of view) in degrees
    pub vfov: f64,
    /// Point camera is looking from
    pub look_from: Point3,
    /// Point camera is looking at
    pub look_at: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees. 0 disables
    /// depth of field.
    pub defocus_angle: f64,

    /// Base seed for the per-pixel random streams
    pub seed: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            vfov: 90.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            seed: 0,
        }
    }
}

impl CameraConfig {
    /// Set image width and aspect ratio.
    pub fn with_image(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Distance from camera to the plane of perfect focus.
    pub fn focus_dist(&self) -> f64 {
        (self.look_from - self.look_at).length()
    }

    /// Image height derived from width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    /// Check the configuration for values that would produce no image or a
    /// degenerate camera frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFov(self.vfov));
        }
        if !(self.defocus_angle.is_finite() && self.defocus_angle >= 0.0) {
            return Err(ConfigError::InvalidDefocusAngle(self.defocus_angle));
        }
        let finite = self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite();
        if !finite || self.focus_dist() <= 0.0 {
            return Err(ConfigError::DegenerateView);
        }
        let w = (self.look_from - self.look_at).normalize();
        if self.vup.cross(w).length_squared() < 1e-12 {
            return Err(ConfigError::DegenerateUp);
        }
        Ok(())
    }
}

/// Camera for generating rays into the scene.
///
/// Built from a validated [`CameraConfig`]; all derived frame values are
/// computed once up front.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    image_height: u32,

    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Validate `config` and precompute the camera frame.
    pub fn new(config: &CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let image_width = config.image_width;
        let image_height = config.image_height();
        let center = config.look_from;
        let focus_dist = config.focus_dist();

        // Determine viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        // Calculate the u,v,w unit basis vectors for the camera coordinate frame
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        // Horizontal and vertical delta vectors from pixel to pixel
        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        // Location of the upper left pixel
        let viewport_upper_left = center - focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Camera defocus disk basis vectors
        let defocus_radius = focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Ok(Self {
            config: config.clone(),
            image_height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    pub fn background(&self) -> Color {
        self.config.background
    }

    /// Camera frame `(u, v, w)`: right, up, and backwards.
    pub fn frame(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray originates on the defocus disk, points at a random spot in
    /// the pixel footprint, and carries a random shutter time.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}
