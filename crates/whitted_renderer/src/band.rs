//! Row-band partitioning for parallel rendering.
//!
//! The image is cut into contiguous, non-overlapping bands of rows, one per
//! worker. Each band owns a disjoint slice of the framebuffer, handed out
//! before any worker starts, so workers never share writable memory.

use crate::renderer::render_pixel;
use crate::{Camera, Color, RenderConfig, Scene};

/// A contiguous range of image rows, `start_row..end_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Index of this band (equals the worker that renders it)
    pub index: usize,
    /// First row of the band
    pub start_row: u32,
    /// One past the last row of the band
    pub end_row: u32,
}

impl Band {
    /// Create a new band.
    pub fn new(index: usize, start_row: u32, end_row: u32) -> Self {
        Self {
            index,
            start_row,
            end_row,
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row
    }

    /// True for trailing bands that received no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Get the total number of pixels in this band.
    pub fn pixel_count(&self, width: u32) -> usize {
        self.row_count() as usize * width as usize
    }
}

/// Split `height` rows into `count` bands of `ceil(height / count)` rows.
///
/// Always returns `count.max(1)` bands. When the division is uneven the last
/// non-empty band is shorter and any bands after it are empty.
pub fn generate_bands(height: u32, count: usize) -> Vec<Band> {
    let count = count.max(1);
    let rows_per_band = (height as usize).div_ceil(count);

    (0..count)
        .map(|index| {
            let start = (index * rows_per_band).min(height as usize) as u32;
            let end = (start as usize + rows_per_band).min(height as usize) as u32;
            Band::new(index, start, end)
        })
        .collect()
}

/// Carve `pixels` into one mutable slice per band.
///
/// `bands` must be contiguous from row 0, as produced by [`generate_bands`].
pub fn split_rows<'a, T>(mut pixels: &'a mut [T], width: u32, bands: &[Band]) -> Vec<&'a mut [T]> {
    let mut slices = Vec::with_capacity(bands.len());
    for band in bands {
        let (head, tail) = std::mem::take(&mut pixels).split_at_mut(band.pixel_count(width));
        slices.push(head);
        pixels = tail;
    }
    slices
}

/// Render every pixel of `band` into `pixels`, row-major.
pub fn render_band(
    band: &Band,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    pixels: &mut [Color],
) {
    if band.is_empty() {
        return;
    }

    let width = config.width as usize;
    for (offset, row) in pixels.chunks_mut(width).enumerate() {
        let y = band.start_row + offset as u32;
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = render_pixel(camera, scene, x as u32, y, config);
        }
    }

    log::debug!(
        "Band {} finished rows {}..{}",
        band.index,
        band.start_row,
        band.end_row
    );
}
