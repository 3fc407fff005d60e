//! Glint - CPU Path Tracing
//!
//! A Monte Carlo path tracer with importance sampling: surfaces that can be
//! sampled as lights, materials that report their own scattering density,
//! and an integrator that mixes the two.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod hittable_list;
mod material;
mod pdf;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraConfig, ConfigError};
pub use hittable::{HitRecord, Hittable};
pub use hittable_list::HittableList;
pub use material::{DiffuseLight, Lambertian, Material, Metal, ScatterKind, ScatterRecord};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use quad::{make_box, Quad};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render, render_cancellable, render_pixel,
    ImageBuffer,
};
pub use sampling::gen_f64;
pub use sphere::Sphere;
pub use transform::{RotateY, Translate};

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Color, Interval, Onb, Point3, Ray, Vec3};
