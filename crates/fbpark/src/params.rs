//! Parameter groups shared by several obstacles.

use fbpark_kernel::SolidKernel;
use fbpark_texture::{apply_texture, BrickCourses, Sides};
use serde::{Deserialize, Serialize};

/// Brick texture on the vertical faces of an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    /// Cut the texture at all.
    pub enabled: bool,
    /// Brick length along each face (mm).
    pub brick_length: f64,
    /// Course height (mm).
    pub brick_height: f64,
    /// Groove width (mm).
    pub groove: f64,
    /// Ignore the park-wide texture toggle.
    pub lock: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            enabled: true,
            brick_length: 20.0,
            brick_height: 10.0,
            groove: 1.2,
            lock: false,
        }
    }
}

impl TextureParams {
    /// Texture switched off and locked that way.
    pub fn locked_off() -> Self {
        Self {
            enabled: false,
            lock: true,
            ..Self::default()
        }
    }

    /// Course layout for a block of the given extents.
    pub fn courses(&self, length: f64, height: f64, depth: f64, sides: Sides) -> BrickCourses {
        BrickCourses {
            length,
            height,
            depth,
            brick_length: self.brick_length,
            brick_height: self.brick_height,
            groove_width: self.groove,
            sides,
        }
    }

    /// Texture `shape` when enabled, otherwise hand it back.
    pub fn apply<K: SolidKernel>(
        &self,
        kernel: &K,
        shape: K::Solid,
        length: f64,
        height: f64,
        depth: f64,
        sides: Sides,
    ) -> K::Solid {
        if !self.enabled {
            return shape;
        }
        apply_texture(kernel, &shape, &self.courses(length, height, depth, sides))
    }
}

/// A capping slab that overhangs a narrower textured core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabParams {
    /// Build the slab; without it the core takes the full envelope.
    pub enabled: bool,
    /// Slab thickness (mm).
    pub height: f64,
    /// How far the slab sticks out past the core on each side (mm).
    pub overhang: f64,
}

impl SlabParams {
    /// Enabled slab of the given thickness and overhang.
    pub fn new(height: f64, overhang: f64) -> Self {
        Self {
            enabled: true,
            height,
            overhang,
        }
    }
}

impl Default for SlabParams {
    fn default() -> Self {
        Self::new(4.0, 2.0)
    }
}
