//! Infinite plane primitive, bounded to a large cube for the BVH.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use whitted_math::{Aabb, Interval, Ray, Vec3};

/// Half-extent of the cube a plane is confined to.
pub const PLANE_EXTENT: f32 = 1e5;

/// Rays whose direction is this close to perpendicular to the normal never hit.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A plane through `point` with the given normal.
///
/// Only the part of the plane inside `[-PLANE_EXTENT, PLANE_EXTENT]^3` is
/// hittable, so the linear scan and the BVH agree on every ray.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Plane {
    /// Create a new plane. The normal is normalized here.
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
            bbox: Aabb::from_points(Vec3::splat(-PLANE_EXTENT), Vec3::splat(PLANE_EXTENT)),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        // Parallel or coincident rays never hit, even from on the plane
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let p = ray.at(t);
        if !(self.bbox.x.contains(p.x) && self.bbox.y.contains(p.y) && self.bbox.z.contains(p.z)) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
