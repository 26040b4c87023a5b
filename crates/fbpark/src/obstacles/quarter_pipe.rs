use fbpark_kernel::math::{Point3, Vec3};
use fbpark_kernel::SolidKernel;
use fbpark_texture::Sides;
use serde::{Deserialize, Serialize};

use super::{ObstacleError, Result};
use crate::params::TextureParams;

/// Metal coping rod along the lip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coping {
    /// Rod diameter (mm); zero disables the coping.
    pub diameter: f64,
    /// Cut a channel for a real rod instead of modelling the rod.
    pub recessed: bool,
}

impl Default for Coping {
    fn default() -> Self {
        Self {
            diameter: 6.0,
            recessed: true,
        }
    }
}

/// Pocket under the transition for a bent sheet of ramp wood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoodSlot {
    /// Cut the pocket.
    pub enabled: bool,
    /// Sheet thickness (mm).
    pub thickness: f64,
}

impl Default for WoodSlot {
    fn default() -> Self {
        Self {
            enabled: true,
            thickness: 2.0,
        }
    }
}

/// Quarter-circle transition rising along +X, with a flat deck behind the lip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarterPipe {
    /// Transition radius, also the lip height (mm).
    pub radius: f64,
    /// Deck length behind the lip (mm).
    pub platform: f64,
    /// Extent along Y (mm).
    pub width: f64,
    /// Coping along the lip.
    pub coping: Coping,
    /// Pocket for a wooden riding surface.
    pub wood_slot: WoodSlot,
    /// Brick texture on both flanks and the back.
    pub texture: TextureParams,
}

impl Default for QuarterPipe {
    fn default() -> Self {
        Self {
            radius: 120.0,
            platform: 30.0,
            width: 100.0,
            coping: Coping::default(),
            wood_slot: WoodSlot::default(),
            texture: TextureParams::default(),
        }
    }
}

/// Sheet margin kept on each side of the wood slot (mm).
const SLOT_MARGIN: f64 = 2.0;
/// How far the slot trim box reaches below the floor (mm).
const SLOT_UNDERCUT: f64 = 5.0;

impl QuarterPipe {
    /// Total length along X.
    pub fn total_length(&self) -> f64 {
        self.radius + self.platform
    }

    /// Where the wood slot starts: the floor intersection of the wood's
    /// outer surface.
    pub fn slot_start(&self) -> f64 {
        let (wt, r) = (self.wood_slot.thickness, self.radius);
        (2.0 * wt * r - wt * wt).sqrt()
    }

    /// Box minus the transition cylinder, then coping, wood slot and texture.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        let (r, w) = (self.radius, self.width);
        let total = self.total_length();
        let across = Vec3::y();

        let block = kernel.make_box(total, w, r);
        let transition = kernel.make_cylinder(r, w, &Point3::new(0.0, 0.0, r), &across)?;
        let mut shape = kernel.cut(&block, &transition)?;

        if self.coping.diameter > 0.0 {
            let rod = kernel.make_cylinder(
                self.coping.diameter / 2.0,
                w,
                &Point3::new(r + 1.0, 0.0, r - 1.0),
                &across,
            )?;
            shape = if self.coping.recessed {
                kernel.cut(&shape, &rod)?
            } else {
                kernel.fuse(&shape, &rod)?
            };
        }

        if self.wood_slot.enabled {
            let x_s = self.slot_start();
            if !x_s.is_finite() {
                return Err(ObstacleError::InvalidParameter(format!(
                    "wood thickness {} does not fit radius {r}",
                    self.wood_slot.thickness
                )));
            }
            let trim = kernel.make_box(total - x_s, w - 2.0 * SLOT_MARGIN, r + 10.0);
            let trim = kernel.translate(&trim, &Vec3::new(x_s, SLOT_MARGIN, -SLOT_UNDERCUT));
            let sheet = kernel.make_cylinder(
                r + self.wood_slot.thickness,
                w,
                &Point3::new(0.0, 0.0, r),
                &across,
            )?;
            let pocket = kernel.common(&sheet, &trim)?;
            shape = kernel.cut(&shape, &pocket)?;
        }

        Ok(self.texture.apply(kernel, shape, total, r, w, Sides::Three))
    }
}
