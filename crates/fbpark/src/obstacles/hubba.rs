use fbpark_kernel::math::{Point3, Vec3};
use fbpark_kernel::SolidKernel;
use fbpark_texture::Sides;
use serde::{Deserialize, Serialize};

use super::Result;
use crate::params::{SlabParams, TextureParams};

/// Ledge whose top slopes from `height_start` at `x = 0` to `height_end` at
/// `x = length`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hubba {
    /// Extent along X (mm).
    pub length: f64,
    /// Extent along Y (mm).
    pub width: f64,
    /// Height at the top of the slope (mm).
    pub height_start: f64,
    /// Height at the bottom of the slope (mm).
    pub height_end: f64,
    /// Sloped capping slab.
    pub slab: SlabParams,
    /// Brick texture on all four sides of the core.
    pub texture: TextureParams,
}

impl Default for Hubba {
    fn default() -> Self {
        Self {
            length: 150.0,
            width: 30.0,
            height_start: 60.0,
            height_end: 20.0,
            slab: SlabParams::new(4.0, 2.0),
            texture: TextureParams::default(),
        }
    }
}

/// Trapezoid in XZ from `z = bottom_*` up to `z = top_*`.
fn band(length: f64, bottom: (f64, f64), top: (f64, f64)) -> [Point3; 4] {
    [
        Point3::new(0.0, 0.0, bottom.0),
        Point3::new(length, 0.0, bottom.1),
        Point3::new(length, 0.0, top.1),
        Point3::new(0.0, 0.0, top.0),
    ]
}

impl Hubba {
    /// Sloped core, plus a slab band of constant thickness when enabled.
    ///
    /// The texture uses the taller end as its height; courses above the
    /// slope simply find no material.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        let (l, w) = (self.length, self.width);
        let (hs, he) = (self.height_start, self.height_end);
        if !self.slab.enabled {
            let profile = band(l, (0.0, 0.0), (hs, he));
            let body = kernel.extrude_polygon(&profile, &Vec3::new(0.0, w, 0.0))?;
            return Ok(self
                .texture
                .apply(kernel, body, l, hs.max(he), w, Sides::Four));
        }

        let (sh, oh) = (self.slab.height, self.slab.overhang);
        let (core_hs, core_he) = (hs - sh, he - sh);
        let core_w = w - 2.0 * oh;

        let profile = band(l, (0.0, 0.0), (core_hs, core_he));
        let core = kernel.extrude_polygon(&profile, &Vec3::new(0.0, core_w, 0.0))?;
        let core = self
            .texture
            .apply(kernel, core, l, core_hs.max(core_he), core_w, Sides::Four);
        let core = kernel.translate(&core, &Vec3::new(0.0, oh, 0.0));

        let profile = band(l, (core_hs, core_he), (hs, he));
        let slab = kernel.extrude_polygon(&profile, &Vec3::new(0.0, w, 0.0))?;
        Ok(kernel.fuse(&core, &slab)?)
    }
}
