//! Linear-scan aggregate of shared hittables.

use crate::hittable::{HitRecord, Hittable};
use glint_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// A list of hittable objects.
///
/// Members are reference counted so one surface can be placed in several
/// lists (for example the scene and the light list). As a light, the list
/// samples only the members that support it.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    /// Indices of members that can be sampled as lights
    sampleable: Vec<usize>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            sampleable: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Create a list holding a single object.
    pub fn from_object(object: Arc<dyn Hittable>) -> Self {
        let mut list = Self::new();
        list.add(object);
        list
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        if object.can_sample() {
            self.sampleable.push(self.objects.len());
        }
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.sampleable.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn can_sample(&self) -> bool {
        !self.sampleable.is_empty()
    }

    /// Equal-weight mixture of the sampleable members' densities.
    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        if self.sampleable.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.sampleable.len() as f64;
        self.sampleable
            .iter()
            .map(|&i| weight * self.objects[i].pdf_value(origin, direction))
            .sum()
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        if self.sampleable.is_empty() {
            return Vec3::X;
        }

        let index = self.sampleable[rng.gen_range(0..self.sampleable.len())];
        self.objects[index].random(origin, rng)
    }
}
