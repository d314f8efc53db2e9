//! Recursive Whitted shading.
//!
//! Each hit gets an ambient term, Lambertian diffuse and Phong specular from
//! the scene's single light when the light is visible, and, while depth
//! remains, a mirror reflection weighted by the material's reflectivity.
//! Terms are summed without normalization; the renderer clamps the final
//! pixel.

use crate::scene::EPSILON;
use crate::{Color, HitRecord, Scene};
use whitted_math::{Interval, Ray, Vec3};

/// Fraction of the diffuse color present regardless of lighting.
pub const AMBIENT: f32 = 0.05;

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Color of the surface described by `rec`, seen along `ray`.
///
/// `depth` is the number of mirror bounces still allowed. At zero, or on a
/// non-reflective material, only the local term is returned.
pub fn shade(scene: &Scene, ray: &Ray, rec: &HitRecord, depth: u32) -> Color {
    let material = &rec.material;
    let mut color = AMBIENT * material.diffuse;

    let light = scene.light();
    let to_light = light.position - rec.p;
    let light_distance = to_light.length();
    let light_dir = to_light.normalize_or_zero();

    if !scene.in_shadow(rec.p, light_dir, light_distance) {
        let diffuse_intensity = rec.normal.dot(light_dir).max(0.0) * light.intensity;
        let diffuse = diffuse_intensity * (material.diffuse * light.color);

        let view_dir = (-ray.direction).normalize_or_zero();
        let reflect_dir = (-reflect(light_dir, rec.normal)).normalize_or_zero();
        let spec_angle = view_dir.dot(reflect_dir).max(0.0);
        let specular = spec_angle.powf(material.shininess) * (material.specular * light.intensity);

        color += diffuse + specular;
    }

    if depth == 0 || !material.is_reflective() {
        return color;
    }

    let mirror_dir = reflect(ray.direction, rec.normal).normalize_or_zero();
    let mirror_ray = Ray::new(rec.p + mirror_dir * EPSILON, mirror_dir);
    if let Some(mirror_hit) = scene.trace(&mirror_ray, Interval::new(EPSILON, f32::INFINITY)) {
        color += material.reflectivity * shade(scene, &mirror_ray, &mirror_hit, depth - 1);
    }

    color
}

/// Color seen along a primary ray: shaded hit, or `background` on a miss.
pub fn ray_color(scene: &Scene, ray: &Ray, depth: u32, background: Color) -> Color {
    match scene.trace(ray, Interval::new(EPSILON, f32::INFINITY)) {
        Some(rec) => shade(scene, ray, &rec, depth),
        None => background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Light, Material, Plane, Sphere};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn floor_scene(material: Material) -> Scene {
        let mut scene = Scene::new(Light::new(Vec3::new(0.0, 10.0, 0.0), 1.0));
        scene.add(Box::new(Plane::new(Vec3::ZERO, Vec3::Y, material)));
        scene.build().unwrap();
        scene
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_head_on_phong_terms() {
        let material = Material::new(Vec3::splat(0.5), Vec3::splat(0.25), 16.0, 0.0);
        let scene = floor_scene(material);

        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let color = ray_color(&scene, &ray, 3, Color::ZERO);

        // ambient + full diffuse + full specular
        assert!(approx(color, Vec3::splat(0.05 * 0.5 + 0.5 + 0.25)));
    }

    #[test]
    fn test_sum_may_exceed_one() {
        let material = Material::new(Vec3::ONE, Vec3::ONE, 8.0, 0.0);
        let scene = floor_scene(material);

        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let color = ray_color(&scene, &ray, 0, Color::ZERO);
        assert!(approx(color, Vec3::splat(2.05)));
    }

    #[test]
    fn test_shadowed_point_gets_ambient_only() {
        let material = Material::diffuse(Vec3::new(0.4, 0.6, 0.8));
        let mut scene = Scene::new(Light::new(Vec3::new(0.0, 10.0, 0.0), 1.0));
        scene.add(Box::new(Plane::new(Vec3::ZERO, Vec3::Y, material)));
        scene.add(Box::new(Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0, material)));
        scene.build().unwrap();

        let ray = Ray::new(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, -1.0, -3.0).normalize());
        let color = ray_color(&scene, &ray, 3, Color::ZERO);
        assert!(approx(color, AMBIENT * material.diffuse));
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = floor_scene(Material::default());
        let sky = Color::new(0.2, 0.3, 0.9);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(ray_color(&scene, &ray, 3, sky), sky);
    }

    /// Mirror sphere at the origin seen from +Z, red sphere behind the viewer.
    fn mirror_scene() -> Scene {
        let mut scene = Scene::new(Light::new(Vec3::new(0.0, 3.0, 5.0), 1.0));
        let mirror = Material::new(Vec3::splat(0.2), Vec3::ZERO, 32.0, 1.0);
        let red = Material::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 32.0, 0.0);
        scene.add(Box::new(Sphere::new(Vec3::ZERO, 1.0, mirror)));
        scene.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, red)));
        scene.build().unwrap();
        scene
    }

    #[test]
    fn test_depth_zero_is_local_only() {
        let scene = mirror_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let rec = scene.trace(&ray, Interval::new(EPSILON, f32::INFINITY)).unwrap();
        assert_eq!(rec.object, 0);

        let local = shade(&scene, &ray, &rec, 0);
        let reflected = shade(&scene, &ray, &rec, 1);

        // The red sphere only adds red
        assert!(reflected.x > local.x);
        assert_eq!(reflected.y, local.y);
        assert_eq!(reflected.z, local.z);
    }

    #[test]
    fn test_reflection_into_nothing_adds_nothing() {
        let mut scene = Scene::new(Light::new(Vec3::new(0.0, 3.0, 5.0), 1.0));
        scene.add(Box::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Material::diffuse(Vec3::splat(0.3)).with_reflectivity(1.0),
        )));
        scene.build().unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let rec = scene.trace(&ray, Interval::new(EPSILON, f32::INFINITY)).unwrap();
        assert_eq!(shade(&scene, &ray, &rec, 0), shade(&scene, &ray, &rec, 5));
    }
}
