//! Parallel image renderer.
//!
//! One primary ray per pixel through the pixel centre, shaded with
//! [`ray_color`](crate::ray_color) and clamped to [0, 1]. Rows are split
//! into one band per worker thread and the bands run on rayon.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use whitted_math::Interval;

use crate::band::{generate_bands, render_band, split_rows};
use crate::{ray_color, Camera, Color, RenderResult, Scene};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Maximum number of mirror bounces
    pub max_depth: u32,
    /// Worker thread count; `None` uses rayon's global pool
    pub threads: Option<usize>,
    /// Color for primary rays that hit nothing
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            max_depth: 3,
            threads: None,
            background: Color::ZERO,
        }
    }
}

impl RenderConfig {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Clamp each channel to [0, 1].
#[inline]
pub fn clamp_color(color: Color) -> Color {
    Color::new(
        Interval::UNIT.clamp(color.x),
        Interval::UNIT.clamp(color.y),
        Interval::UNIT.clamp(color.z),
    )
}

/// Convert a color to 8-bit RGB: `floor(255.999 * clamp01(c))` per channel.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = clamp_color(color);
    [
        (255.999 * c.x) as u8,
        (255.999 * c.y) as u8,
        (255.999 * c.z) as u8,
    ]
}

/// Render a single pixel. Row 0 is the top of the image.
pub fn render_pixel(camera: &Camera, scene: &Scene, x: u32, y: u32, config: &RenderConfig) -> Color {
    let s = (x as f32 + 0.5) / config.width as f32;
    let t = (y as f32 + 0.5) / config.height as f32;
    let ray = camera.get_ray(s, 1.0 - t);
    clamp_color(ray_color(scene, &ray, config.max_depth, config.background))
}

/// Row-major framebuffer, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }
}

/// Render the scene.
///
/// The scene must be fully assembled (and normally built) beforehand; it is
/// only read during rendering. With `config.threads` set, a dedicated pool of
/// that size runs the bands, otherwise rayon's global pool does.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(config.width, config.height);
    if image.pixels.is_empty() {
        log::warn!("Nothing to render for a {}x{} image", config.width, config.height);
        return Ok(image);
    }

    if !scene.is_built() {
        log::warn!("Rendering without a BVH; every ray scans all {} objects", scene.len());
    }

    log::info!(
        "Rendering {}x{} with {} objects on {} threads",
        config.width,
        config.height,
        scene.len(),
        config.threads.map_or_else(rayon::current_num_threads, |t| t.max(1))
    );

    let start = Instant::now();
    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build()?;
            pool.install(|| render_bands(camera, scene, config, &mut image.pixels));
        }
        None => render_bands(camera, scene, config, &mut image.pixels),
    }

    log::info!(
        "Render complete at depth {} in {:?}",
        config.max_depth,
        start.elapsed()
    );

    Ok(image)
}

/// Fan out one band per thread of the current pool; returns once all are done.
fn render_bands(camera: &Camera, scene: &Scene, config: &RenderConfig, pixels: &mut [Color]) {
    let bands = generate_bands(config.height, rayon::current_num_threads());
    log::debug!("Dispatching {} bands over {} rows", bands.len(), config.height);

    let slices = split_rows(pixels, config.width, &bands);
    bands
        .par_iter()
        .zip(slices)
        .for_each(|(band, slice)| render_band(band, camera, scene, config, slice));
}
