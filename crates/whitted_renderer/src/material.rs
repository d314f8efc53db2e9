//! Surface materials and the point light.

use whitted_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Phong material with an optional mirror term.
///
/// Materials are plain values: every shape owns one, and every hit record
/// carries a copy of the material of the surface it hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse (Lambertian) color
    pub diffuse: Color,
    /// Specular highlight color
    pub specular: Color,
    /// Phong exponent
    pub shininess: f32,
    /// Fraction of the mirrored color added on top of local shading, in [0, 1]
    pub reflectivity: f32,
}

impl Material {
    /// Create a new material.
    ///
    /// `reflectivity` is clamped to [0, 1].
    pub fn new(diffuse: Color, specular: Color, shininess: f32, reflectivity: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
            reflectivity: reflectivity.clamp(0.0, 1.0),
        }
    }

    /// Default specular settings with the given diffuse color.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse: color,
            ..Default::default()
        }
    }

    /// Replace the specular color and Phong exponent.
    pub fn with_specular(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Set the mirror fraction, clamped to [0, 1].
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// True if shading spawns a mirror ray for this surface.
    pub fn is_reflective(&self) -> bool {
        self.reflectivity > 0.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::splat(0.8),
            specular: Color::splat(0.5),
            shininess: 32.0,
            reflectivity: 0.0,
        }
    }
}

/// The scene's single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    /// White light of the given intensity.
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color: Color::ONE,
            intensity,
        }
    }

    /// Tint the light with `color`.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}
