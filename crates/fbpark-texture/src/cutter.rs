//! Groove cutter construction.
//!
//! A cutter is a throwaway solid built at the origin; the pattern planner
//! translates it into place and subtracts it from the target.

use std::f64::consts::SQRT_2;

use fbpark_kernel::math::{Axis, Dir3, Point3, Vec3};
use fbpark_kernel::SolidKernel;
use serde::{Deserialize, Serialize};

/// Cross-section of a groove.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrooveProfile {
    /// Square section turned 45°: a V-groove like a mortar chamfer.
    Diamond,
    /// Rectangular section biting `depth` below the surface.
    FlatBottom {
        /// Groove depth below the surface.
        depth: f64,
    },
}

/// Width and cross-section of a groove.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrooveSpec {
    /// Visible width at the surface; must be positive.
    pub width: f64,
    /// Cross-section shape.
    pub profile: GrooveProfile,
}

impl GrooveSpec {
    /// Diamond groove of the given width.
    pub fn diamond(width: f64) -> Self {
        Self {
            width,
            profile: GrooveProfile::Diamond,
        }
    }

    /// Flat-bottom groove of the given width and depth.
    pub fn flat_bottom(width: f64, depth: f64) -> Self {
        Self {
            width,
            profile: GrooveProfile::FlatBottom { depth },
        }
    }

    /// True when the groove can produce a non-degenerate cutter.
    pub fn is_valid(&self) -> bool {
        let depth_ok = match self.profile {
            GrooveProfile::Diamond => true,
            GrooveProfile::FlatBottom { depth } => depth.is_finite() && depth > 0.0,
        };
        self.width.is_finite() && self.width > 0.0 && depth_ok
    }

    /// Build one cutter of this groove running `length` along `axis`.
    pub fn make_cutter<K: SolidKernel>(&self, kernel: &K, length: f64, axis: Axis) -> K::Solid {
        match self.profile {
            GrooveProfile::Diamond => make_diamond_cutter(kernel, length, self.width, axis),
            GrooveProfile::FlatBottom { depth } => {
                make_rect_cutter(kernel, length, self.width, depth, axis)
            }
        }
    }
}

/// Diamond-section cutter running `length` along `axis`, centred on the axis.
///
/// The square section has side `groove_width / √2`, so after the 45° turn
/// its vertex-to-vertex width is exactly `groove_width`.
pub fn make_diamond_cutter<K: SolidKernel>(
    kernel: &K,
    length: f64,
    groove_width: f64,
    axis: Axis,
) -> K::Solid {
    let side = groove_width / SQRT_2;
    let size = axis.split(length, side);
    let bar = kernel.make_box(size.x, size.y, size.z);
    let centred = kernel.translate(&bar, &axis.split(0.0, -side / 2.0));
    let dir = Dir3::new_unchecked(axis.unit());
    kernel.rotate(&centred, &Point3::origin(), &dir, 45.0)
}

/// Flat-bottom cutter: `length` along `axis`, `width` centred across it,
/// top face at `z = 0` and `depth` below.
///
/// Only X and Y are meaningful running axes; Z is treated as X.
pub fn make_rect_cutter<K: SolidKernel>(
    kernel: &K,
    length: f64,
    width: f64,
    depth: f64,
    axis: Axis,
) -> K::Solid {
    match axis {
        Axis::Y => {
            let bar = kernel.make_box(width, length, depth);
            kernel.translate(&bar, &Vec3::new(-width / 2.0, 0.0, -depth))
        }
        Axis::X | Axis::Z => {
            let bar = kernel.make_box(length, width, depth);
            kernel.translate(&bar, &Vec3::new(0.0, -width / 2.0, -depth))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fbpark_kernel::CsgKernel;

    #[test]
    fn test_diamond_width_matches_groove_on_every_axis() {
        let k = CsgKernel::new();
        for axis in Axis::ALL {
            for width in [0.3, 1.2, 5.0] {
                let cutter = make_diamond_cutter(&k, 50.0, width, axis);
                let size = k.bounding_box(&cutter).size();
                let (a, b) = axis.others();
                assert_relative_eq!(size[a.index()], width, epsilon = 1e-9);
                assert_relative_eq!(size[b.index()], width, epsilon = 1e-9);
                assert_relative_eq!(size[axis.index()], 50.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_diamond_is_centred_on_running_axis() {
        let k = CsgKernel::new();
        let cutter = make_diamond_cutter(&k, 10.0, 2.0, Axis::Z);
        let bb = k.bounding_box(&cutter);
        assert_relative_eq!(bb.min.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(bb.min.z, 0.0, epsilon = 1e-9);
        // vertex on the x axis, no material at the old square corner
        assert!(k.contains(&cutter, &Point3::new(0.95, 0.0, 5.0)));
        assert!(!k.contains(&cutter, &Point3::new(0.6, 0.6, 5.0)));
    }

    #[test]
    fn test_rect_cutter_hangs_below_origin() {
        let k = CsgKernel::new();
        let along_x = k.bounding_box(&make_rect_cutter(&k, 30.0, 1.0, 0.5, Axis::X));
        assert_relative_eq!(along_x.min.y, -0.5, epsilon = 1e-12);
        assert_relative_eq!(along_x.max.x, 30.0, epsilon = 1e-12);
        assert_relative_eq!(along_x.max.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(along_x.min.z, -0.5, epsilon = 1e-12);

        let along_y = k.bounding_box(&make_rect_cutter(&k, 30.0, 1.0, 0.5, Axis::Y));
        assert_relative_eq!(along_y.min.x, -0.5, epsilon = 1e-12);
        assert_relative_eq!(along_y.max.y, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_groove_spec_validity() {
        assert!(GrooveSpec::diamond(1.2).is_valid());
        assert!(!GrooveSpec::diamond(0.0).is_valid());
        assert!(!GrooveSpec::flat_bottom(1.0, 0.0).is_valid());
        assert!(GrooveSpec::flat_bottom(1.0, 0.5).is_valid());
    }
}
