//! Scene container: objects, the optional BVH over them, and the light.

use crate::{Bvh, HitRecord, Hittable, Light, RenderResult, SplitAxis};
use whitted_math::{Interval, Ray, Vec3};

/// Offset applied to secondary ray origins and to the lower end of their
/// search range, so a surface does not shadow or reflect itself.
pub const EPSILON: f32 = 1e-4;

/// A static scene.
///
/// Objects are added first, then [`Scene::build`] is called once before
/// rendering. Without a built hierarchy, tracing falls back to a linear scan.
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
    bvh: Option<Bvh>,
    light: Light,
}

impl Scene {
    /// Create an empty scene lit by `light`.
    pub fn new(light: Light) -> Self {
        Self {
            objects: Vec::new(),
            bvh: None,
            light,
        }
    }

    /// Add an object to the scene.
    ///
    /// Adding after [`Scene::build`] discards the hierarchy; call `build` again.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        if self.bvh.take().is_some() {
            log::warn!("Object added after BVH build; BVH discarded until rebuilt");
        }
        self.objects.push(object);
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }

    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// Build the BVH with the default split policy.
    pub fn build(&mut self) -> RenderResult<()> {
        self.build_with(SplitAxis::default())
    }

    /// Build (or rebuild) the BVH with the given split policy.
    pub fn build_with(&mut self, split: SplitAxis) -> RenderResult<()> {
        self.bvh = Some(Bvh::build(&self.objects, split)?);
        Ok(())
    }

    /// Closest hit within `ray_t`, through the BVH when one is built.
    pub fn trace(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let Some(bvh) = &self.bvh else {
            return self.trace_linear(ray, ray_t);
        };

        let mut rec = HitRecord::default();
        bvh.hit(&self.objects, ray, ray_t, &mut rec).then_some(rec)
    }

    /// Closest hit within `ray_t` by testing every object in insertion order.
    ///
    /// Ties on `t` go to the lower object index, as in the BVH.
    pub fn trace_linear(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for (index, object) in self.objects.iter().enumerate() {
            let search = match closest {
                Some(best) => ray_t.with_max(best.t),
                None => ray_t,
            };

            let mut rec = HitRecord::default();
            if object.hit(ray, search, &mut rec) {
                rec.object = index;
                if closest.map_or(true, |best| rec.is_closer_than(&best)) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }

    /// True if anything blocks the segment from `point` toward the light.
    ///
    /// The shadow ray starts `EPSILON` along `light_dir` and searches
    /// `[EPSILON, light_distance]`. Both ends are inclusive, like every shape
    /// test, so an occluder exactly at the light's distance still casts a
    /// shadow. Occlusion is binary: no attenuation.
    pub fn in_shadow(&self, point: Vec3, light_dir: Vec3, light_distance: f32) -> bool {
        let shadow_ray = Ray::new(point + EPSILON * light_dir, light_dir);
        self.trace(&shadow_ray, Interval::new(EPSILON, light_distance))
            .is_some()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Light::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Plane, RenderError, Sphere, PLANE_EXTENT};
    use proptest::prelude::*;

    fn sphere(center: Vec3, radius: f32) -> Box<dyn Hittable> {
        Box::new(Sphere::new(center, radius, Material::default()))
    }

    #[test]
    fn test_build_empty_scene_fails() {
        let mut scene = Scene::default();
        assert!(matches!(scene.build(), Err(RenderError::EmptyScene)));
        assert!(!scene.is_built());
    }

    #[test]
    fn test_trace_without_build_uses_linear_scan() {
        let mut scene = Scene::default();
        scene.add(sphere(Vec3::new(0.0, 0.0, -10.0), 1.0));
        scene.add(sphere(Vec3::new(0.0, 0.0, -4.0), 1.0));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let hit = scene.trace(&ray, Interval::new(EPSILON, f32::INFINITY)).unwrap();
        assert_eq!(hit.object, 1);
        assert!((hit.t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_add_after_build_discards_bvh() {
        let mut scene = Scene::default();
        scene.add(sphere(Vec3::ZERO, 1.0));
        scene.build().unwrap();
        assert!(scene.is_built());

        scene.add(sphere(Vec3::new(0.0, 0.0, 5.0), 1.0));
        assert!(!scene.is_built());

        // New object is still found through the linear scan
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let hit = scene.trace(&ray, Interval::new(EPSILON, f32::INFINITY)).unwrap();
        assert_eq!(hit.object, 1);
    }

    #[test]
    fn test_in_shadow() {
        let mut scene = Scene::default();
        scene.add(sphere(Vec3::new(0.0, 5.0, 0.0), 1.0));
        scene.build().unwrap();

        // Occluder between the point and the light
        assert!(scene.in_shadow(Vec3::ZERO, Vec3::Y, 10.0));
        // Light sits before the occluder
        assert!(!scene.in_shadow(Vec3::ZERO, Vec3::Y, 3.0));
        // Light in another direction
        assert!(!scene.in_shadow(Vec3::ZERO, Vec3::X, 10.0));
    }

    #[test]
    fn test_surface_does_not_shadow_itself() {
        let mut scene = Scene::default();
        scene.add(Box::new(Plane::new(Vec3::ZERO, Vec3::Y, Material::default())));
        scene.build().unwrap();

        let light_dir = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!(!scene.in_shadow(Vec3::new(2.0, 0.0, 3.0), light_dir, 8.0));
    }

    fn colored_sphere(color: Vec3) -> Box<dyn Hittable> {
        Box::new(Sphere::new(Vec3::ZERO, 1.0, Material::diffuse(color)))
    }

    fn all_splits() -> [SplitAxis; 5] {
        [
            SplitAxis::Longest,
            SplitAxis::Random { seed: 7 },
            SplitAxis::Fixed(0),
            SplitAxis::Fixed(1),
            SplitAxis::Fixed(2),
        ]
    }

    #[test]
    fn test_coincident_spheres_tie_goes_to_first_added() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let blue = Vec3::new(0.0, 0.0, 1.0);
        let mut scene = Scene::default();
        scene.add(colored_sphere(red));
        scene.add(colored_sphere(blue));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let range = Interval::new(EPSILON, f32::INFINITY);

        let linear = scene.trace_linear(&ray, range).unwrap();
        assert_eq!(linear.object, 0);
        assert_eq!(linear.material.diffuse, red);

        for split in all_splits() {
            scene.build_with(split).unwrap();
            assert_eq!(scene.trace(&ray, range), Some(linear), "{:?}", split);
        }
    }

    #[test]
    fn test_coplanar_floors_tie_goes_to_first_added() {
        let mut scene = Scene::default();
        for i in 0..3 {
            let material = Material::diffuse(Vec3::splat(0.25 * (i + 1) as f32));
            scene.add(Box::new(Plane::new(Vec3::ZERO, Vec3::Y, material)));
        }

        let ray = Ray::new(Vec3::new(0.3, 5.0, -0.2), -Vec3::Y);
        let range = Interval::new(EPSILON, f32::INFINITY);

        let linear = scene.trace_linear(&ray, range).unwrap();
        assert_eq!(linear.object, 0);
        assert_eq!(linear.material.diffuse, Vec3::splat(0.25));

        for split in all_splits() {
            scene.build_with(split).unwrap();
            assert_eq!(scene.trace(&ray, range), Some(linear), "{:?}", split);
        }
    }

    #[test]
    fn test_occluder_at_light_distance_shadows() {
        let mut scene = Scene::default();
        scene.add(Box::new(Plane::new(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::Y,
            Material::default(),
        )));
        scene.build().unwrap();

        // The shadow ray starts EPSILON up, so the plane sits at t = 5 - EPSILON
        assert!(scene.in_shadow(Vec3::ZERO, Vec3::Y, 5.0 - EPSILON));
        assert!(!scene.in_shadow(Vec3::ZERO, Vec3::Y, 4.9));
    }

    #[derive(Debug, Clone)]
    enum ShapeDesc {
        Sphere { center: Vec3, radius: f32 },
        Plane { point: Vec3, normal: Vec3 },
    }

    fn vec3(range: f32) -> impl Strategy<Value = Vec3> {
        (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn unit_vec3() -> impl Strategy<Value = Vec3> {
        vec3(1.0)
            .prop_filter("non-degenerate", |v| v.length() > 1e-2)
            .prop_map(|v| v.normalize())
    }

    fn shape_desc() -> impl Strategy<Value = ShapeDesc> {
        prop_oneof![
            8 => (vec3(10.0), 0.1f32..2.0)
                .prop_map(|(center, radius)| ShapeDesc::Sphere { center, radius }),
            1 => (vec3(10.0), unit_vec3())
                .prop_map(|(point, normal)| ShapeDesc::Plane { point, normal }),
        ]
    }

    fn scene_from(shapes: &[ShapeDesc]) -> Scene {
        let mut scene = Scene::default();
        for (i, shape) in shapes.iter().enumerate() {
            // Distinct materials so a wrong object would show up in the record
            let material = Material::diffuse(Vec3::splat(i as f32 / shapes.len() as f32));
            match shape {
                ShapeDesc::Sphere { center, radius } => {
                    scene.add(Box::new(Sphere::new(*center, *radius, material)))
                }
                ShapeDesc::Plane { point, normal } => {
                    scene.add(Box::new(Plane::new(*point, *normal, material)))
                }
            }
        }
        scene
    }

    /// Whether `shape` meets the ray `origin + t * dir` for some `t` in `range`,
    /// from the closed-form roots.
    fn meets_segment(shape: &ShapeDesc, origin: Vec3, dir: Vec3, range: Interval) -> bool {
        match *shape {
            ShapeDesc::Sphere { center, radius } => {
                let oc = origin - center;
                let a = dir.dot(dir);
                let b = oc.dot(dir);
                let c = oc.dot(oc) - radius * radius;
                let disc = b * b - a * c;
                if disc < 0.0 {
                    return false;
                }
                let root = disc.sqrt();
                range.contains((-b - root) / a) || range.contains((-b + root) / a)
            }
            ShapeDesc::Plane { point, normal } => {
                let n = normal.normalize_or_zero();
                let denom = n.dot(dir);
                if denom.abs() < 1e-8 {
                    return false;
                }
                let t = (point - origin).dot(n) / denom;
                range.contains(t) && (origin + dir * t).abs().max_element() <= PLANE_EXTENT
            }
        }
    }

    proptest! {
        #[test]
        fn bvh_trace_matches_linear_trace(
            mut shapes in prop::collection::vec(shape_desc(), 1..=50),
            duplicates in 0usize..4,
            rays in prop::collection::vec((vec3(20.0), unit_vec3()), 1..16),
            seed in any::<u64>(),
        ) {
            // Repeated shapes produce exact ties on t
            let repeated: Vec<ShapeDesc> = shapes.iter().take(duplicates).cloned().collect();
            shapes.extend(repeated);

            let mut scene = scene_from(&shapes);
            let range = Interval::new(EPSILON, f32::INFINITY);

            for split in [SplitAxis::Longest, SplitAxis::Random { seed }, SplitAxis::Fixed(2)] {
                scene.build_with(split).unwrap();
                for (origin, direction) in &rays {
                    let ray = Ray::new(*origin, *direction);
                    prop_assert_eq!(scene.trace(&ray, range), scene.trace_linear(&ray, range));
                }
            }
        }

        #[test]
        fn in_shadow_matches_segment_test(
            shapes in prop::collection::vec(shape_desc(), 1..=30),
            queries in prop::collection::vec((vec3(20.0), unit_vec3(), 0.0f32..40.0), 1..16),
        ) {
            let mut scene = scene_from(&shapes);

            for built in [false, true] {
                if built {
                    scene.build().unwrap();
                }
                for (point, dir, distance) in &queries {
                    let origin = *point + EPSILON * *dir;
                    let range = Interval::new(EPSILON, *distance);
                    let expected = shapes
                        .iter()
                        .any(|shape| meets_segment(shape, origin, *dir, range));

                    prop_assert_eq!(scene.in_shadow(*point, *dir, *distance), expected);
                }
            }
        }
    }
}
