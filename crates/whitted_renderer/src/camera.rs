//! Camera for ray generation.

use whitted_math::{Ray, Vec3};

/// Pinhole camera. Immutable once constructed.
///
/// The image plane sits one unit in front of the eye; `get_ray(s, t)` maps
/// normalized viewport coordinates, `(0, 0)` at the lower left and `(1, 1)`
/// at the upper right, to a ray with a unit-length direction.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a camera at `look_from` facing `look_at`.
    ///
    /// `vfov` is the vertical field of view in degrees and `aspect` is
    /// width / height.
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect: f32) -> Self {
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect * viewport_height;

        // Calculate camera basis vectors
        let w = (look_from - look_at).normalize_or_zero();
        let u = vup.cross(w).normalize_or_zero();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
        }
    }

    /// Ray from the eye through viewport point `(s, t)`.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin, (target - self.origin).normalize_or_zero())
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal basis `(u, v, w)`: right, up, and backward.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}
