//! Built-in scenes.

use glint_renderer::{
    make_box, BvhNode, CameraConfig, Color, DiffuseLight, Hittable, HittableList, Lambertian,
    Material, Metal, Point3, Quad, RotateY, Sphere, Translate, Vec3,
};
use std::sync::Arc;

/// A world, the surfaces to sample as lights, and a default camera.
pub struct Scene {
    pub world: HittableList,
    pub lights: HittableList,
    pub camera: CameraConfig,
}

impl Scene {
    /// Replace the world's top-level list with a BVH over the same objects.
    pub fn world_bvh(&self) -> BvhNode {
        BvhNode::new(self.world.objects().to_vec())
    }
}

/// The classic Cornell box: five walls, a ceiling lamp and two rotated boxes.
pub fn cornell_box() -> Scene {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut world = HittableList::new();

    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Arc::clone(&white),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        Arc::clone(&white),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Arc::clone(&white),
    )));

    // Same surface in both lists
    let lamp: Arc<dyn Hittable> = Arc::new(Quad::new(
        Point3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    ));
    world.add(Arc::clone(&lamp));

    let tall = make_box(Point3::ZERO, Point3::new(165.0, 330.0, 165.0), Arc::clone(&white));
    let tall = Arc::new(RotateY::new(Arc::new(tall), 15.0));
    world.add(Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0))));

    let short = make_box(Point3::ZERO, Point3::new(165.0, 165.0, 165.0), white);
    let short = Arc::new(RotateY::new(Arc::new(short), -18.0));
    world.add(Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0))));

    let camera = CameraConfig::default()
        .with_image(600, 1.0)
        .with_quality(64, 50)
        .with_background(Color::ZERO)
        .with_lens(40.0, 0.0)
        .with_position(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        );

    Scene {
        world,
        lights: HittableList::from_object(lamp),
        camera,
    }
}

/// Diffuse and metal spheres on a ground sphere, lit by a glowing sphere,
/// with motion blur and depth of field.
pub fn spheres() -> Scene {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    let blue: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let orange: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.4, 0.1)));
    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.05));
    let glow: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(8.0)));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground)));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, blue)));
    world.add(Arc::new(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, metal)));
    world.add(Arc::new(Sphere::moving(
        Point3::new(-4.0, 0.6, 0.0),
        Point3::new(-4.0, 1.0, 0.0),
        0.6,
        orange,
    )));

    let lamp: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::new(0.0, 7.0, 2.0), 1.5, glow));
    world.add(Arc::clone(&lamp));

    let camera = CameraConfig::default()
        .with_image(400, 16.0 / 9.0)
        .with_quality(64, 20)
        .with_background(Color::new(0.02, 0.02, 0.04))
        .with_lens(20.0, 0.6)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y);

    Scene {
        world,
        lights: HittableList::from_object(lamp),
        camera,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_renderer::{Camera, Interval, Ray};

    #[test]
    fn test_cornell_box_layout() {
        let scene = cornell_box();
        assert_eq!(scene.world.len(), 8);
        assert_eq!(scene.lights.len(), 1);

        let camera = Camera::new(&scene.camera).unwrap();
        assert_eq!((camera.image_width(), camera.image_height()), (600, 600));
        assert_eq!(camera.samples_per_pixel(), 64);
        assert_eq!(camera.max_depth(), 50);
    }

    #[test]
    fn test_cornell_lamp_is_sampleable() {
        let scene = cornell_box();
        let origin = Point3::new(278.0, 100.0, 278.0);
        let dir = Point3::new(278.0, 554.0, 278.0) - origin;
        assert!(scene.lights.pdf_value(origin, dir) > 0.0);
        assert_eq!(scene.lights.pdf_value(origin, -dir), 0.0);
    }

    #[test]
    fn test_bvh_world_sees_the_same_walls() {
        let scene = cornell_box();
        let bvh = scene.world_bvh();
        let ray = Ray::new_simple(Point3::new(278.0, 278.0, -800.0), Vec3::Z);
        let interval = Interval::new(0.001, f64::INFINITY);

        let a = scene.world.hit(&ray, interval).unwrap();
        let b = bvh.hit(&ray, interval).unwrap();
        assert!((a.t - b.t).abs() < 1e-9);
    }

    #[test]
    fn test_spheres_scene_is_valid() {
        let scene = spheres();
        assert_eq!(scene.lights.len(), 1);
        assert!(Camera::new(&scene.camera).is_ok());
    }
}
