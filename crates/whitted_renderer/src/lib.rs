//! whitted - CPU Whitted-style ray tracer.
//!
//! Renders a static scene of spheres and planes lit by a single point light:
//! Phong shading, hard shadows and depth-limited mirror reflection, with a
//! BVH over the scene and rows rendered in parallel.
//!
//! # Example
//!
//! ```no_run
//! use whitted_renderer::{render, write_ppm, Camera, Light, Material, RenderConfig, Scene, Sphere, Vec3};
//!
//! let mut scene = Scene::new(Light::new(Vec3::new(0.0, 0.0, 10.0), 1.0));
//! scene.add(Box::new(Sphere::new(Vec3::ZERO, 1.0, Material::default())));
//! scene.build()?;
//!
//! let config = RenderConfig::default();
//! let camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y, 60.0, config.aspect_ratio());
//! let image = render(&camera, &scene, &config)?;
//! write_ppm(&image, std::io::stdout().lock())?;
//! # Ok::<(), whitted_renderer::RenderError>(())
//! ```

mod band;
mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod plane;
mod ppm;
mod renderer;
mod scene;
mod shading;
mod sphere;

pub use band::{generate_bands, render_band, split_rows, Band};
pub use bvh::{Bvh, BvhNode, SplitAxis};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable};
pub use material::{Color, Light, Material};
pub use plane::{Plane, PLANE_EXTENT};
pub use ppm::write_ppm;
pub use renderer::{clamp_color, color_to_rgb, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{Scene, EPSILON};
pub use shading::{ray_color, reflect, shade, AMBIENT};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from whitted_math
pub use whitted_math::{Aabb, Interval, Ray, Vec3};
