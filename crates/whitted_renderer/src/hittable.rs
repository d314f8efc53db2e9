//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use whitted_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Transient: each traversal overwrites it in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Copy of the material at the intersection point
    pub material: Material,
    /// Index of the hit shape in its scene. Set by the scene, not by shapes.
    pub object: usize,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The stored normal always opposes the incoming ray; `front_face`
    /// records whether that meant flipping it.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    /// Ordering used to pick the closest hit: smaller `t` wins, and on equal
    /// `t` the lower object index wins.
    #[inline]
    pub fn is_closer_than(&self, other: &HitRecord) -> bool {
        self.t < other.t || (self.t == other.t && self.object < other.object)
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval (inclusive).
    ///
    /// Returns true if hit, and fills in the hit record. On a miss the record
    /// must be left untouched: callers carry the closest hit so far in it.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}
