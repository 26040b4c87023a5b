use fbpark_kernel::math::{Point3, Vec3};
use fbpark_kernel::SolidKernel;
use fbpark_texture::Sides;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ObstacleError, Result};
use crate::params::{SlabParams, TextureParams};

/// Height of the drilled rail holes (mm).
const RAIL_HOLE_DEPTH: f64 = 20.0;
/// How far a rail hole starts below its tread (mm).
const RAIL_HOLE_SINK: f64 = 15.0;

/// Vertical sockets for a metal handrail, one in the top and one in the
/// bottom tread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailHoles {
    /// Drill the holes.
    pub enabled: bool,
    /// Hole diameter (mm).
    pub diameter: f64,
    /// Distance of both holes from `x = 0` (mm).
    pub distance: f64,
}

impl Default for RailHoles {
    fn default() -> Self {
        Self {
            enabled: false,
            diameter: 6.2,
            distance: 50.0,
        }
    }
}

/// Stair set climbing along +Y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Steps {
    /// Number of steps.
    pub steps: u32,
    /// Height of the top tread (mm); each step rises `total_height / steps`.
    pub total_height: f64,
    /// Tread depth along Y (mm).
    pub step_depth: f64,
    /// Extent along X (mm).
    pub width: f64,
    /// Handrail sockets.
    pub rail_holes: RailHoles,
    /// Tread slabs over textured risers.
    pub slab: SlabParams,
    /// Brick texture on every riser.
    pub texture: TextureParams,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            steps: 3,
            total_height: 45.0,
            step_depth: 30.0,
            width: 100.0,
            rail_holes: RailHoles::default(),
            slab: SlabParams::new(4.0, 2.0),
            texture: TextureParams::default(),
        }
    }
}

impl Steps {
    /// Rise of one step.
    pub fn step_height(&self) -> f64 {
        self.total_height / self.steps as f64
    }

    /// Fuse one block per step, then drill the rail holes.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        if self.steps == 0 {
            return Err(ObstacleError::NoSteps);
        }
        let rise = self.step_height();
        let mut stairs: Option<K::Solid> = None;
        for i in 0..self.steps {
            let step = self.build_step(kernel, i, rise * (i + 1) as f64)?;
            stairs = Some(match stairs {
                Some(acc) => kernel.fuse(&acc, &step)?,
                None => step,
            });
        }
        let stairs = stairs.ok_or(ObstacleError::NoSteps)?;
        debug!(steps = self.steps, rise, "stairs built");

        if !self.rail_holes.enabled {
            return Ok(stairs);
        }
        self.drill_rail_holes(kernel, &stairs, rise)
    }

    fn build_step<K: SolidKernel>(&self, kernel: &K, index: u32, top: f64) -> Result<K::Solid> {
        let d = self.step_depth;
        let y0 = index as f64 * d;

        if !self.slab.enabled {
            let block = kernel.make_box(self.width, d, top);
            let block = self
                .texture
                .apply(kernel, block, self.width, top, d, Sides::Four);
            return Ok(kernel.translate(&block, &Vec3::new(0.0, y0, 0.0)));
        }

        let (sh, oh) = (self.slab.height, self.slab.overhang);
        let riser_h = top - sh;
        let riser_w = self.width - 2.0 * oh;
        let mut riser = kernel.make_box(riser_w, d, riser_h);
        if riser_h > 0.0 {
            riser = self
                .texture
                .apply(kernel, riser, riser_w, riser_h, d, Sides::Four);
        }
        let riser = kernel.translate(&riser, &Vec3::new(oh, y0, 0.0));

        // tread overhangs the riser below it
        let tread = kernel.make_box(self.width, d + oh, sh);
        let tread = kernel.translate(&tread, &Vec3::new(0.0, y0, riser_h));
        Ok(kernel.fuse(&riser, &tread)?)
    }

    fn drill_rail_holes<K: SolidKernel>(
        &self,
        kernel: &K,
        stairs: &K::Solid,
        rise: f64,
    ) -> Result<K::Solid> {
        let d = self.step_depth;
        let radius = self.rail_holes.diameter / 2.0;
        let x = self.rail_holes.distance;
        let top_tread = (self.steps - 1) as f64 * d + d / 2.0;
        let up = Vec3::z();

        let top = kernel.make_cylinder(
            radius,
            RAIL_HOLE_DEPTH,
            &Point3::new(x, top_tread, self.total_height - RAIL_HOLE_SINK),
            &up,
        )?;
        let bottom = kernel.make_cylinder(
            radius,
            RAIL_HOLE_DEPTH,
            &Point3::new(x, d / 2.0, rise - RAIL_HOLE_SINK),
            &up,
        )?;
        let holes = kernel.fuse(&top, &bottom)?;
        Ok(kernel.cut(stairs, &holes)?)
    }
}
