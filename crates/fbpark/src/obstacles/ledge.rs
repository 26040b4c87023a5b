use fbpark_kernel::math::Vec3;
use fbpark_kernel::SolidKernel;
use fbpark_texture::Sides;
use serde::{Deserialize, Serialize};

use super::Result;
use crate::params::{SlabParams, TextureParams};

/// Rectangular grind block, optionally capped by an overhanging slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledge {
    /// Extent along X (mm).
    pub length: f64,
    /// Total height including the slab (mm).
    pub height: f64,
    /// Extent along Y (mm).
    pub width: f64,
    /// Capping slab.
    pub slab: SlabParams,
    /// Brick texture on all four sides of the core.
    pub texture: TextureParams,
}

impl Default for Ledge {
    fn default() -> Self {
        Self {
            length: 120.0,
            height: 35.0,
            width: 50.0,
            slab: SlabParams::new(5.0, 2.0),
            texture: TextureParams::default(),
        }
    }
}

impl Ledge {
    /// Textured core, plus the slab on top when enabled.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        let (l, h, w) = (self.length, self.height, self.width);
        if !self.slab.enabled {
            let block = kernel.make_box(l, w, h);
            return Ok(self.texture.apply(kernel, block, l, h, w, Sides::Four));
        }

        let (sh, oh) = (self.slab.height, self.slab.overhang);
        let (core_l, core_w, core_h) = (l - 2.0 * oh, w - 2.0 * oh, h - sh);
        // textured at the origin so the courses line up with the core's own faces
        let core = kernel.make_box(core_l, core_w, core_h);
        let core = self
            .texture
            .apply(kernel, core, core_l, core_h, core_w, Sides::Four);
        let core = kernel.translate(&core, &Vec3::new(oh, oh, 0.0));

        let slab = kernel.make_box(l, w, sh);
        let slab = kernel.translate(&slab, &Vec3::new(0.0, 0.0, core_h));
        Ok(kernel.fuse(&core, &slab)?)
    }
}
