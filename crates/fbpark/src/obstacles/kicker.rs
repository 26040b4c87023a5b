use fbpark_kernel::math::{Point3, Vec3};
use fbpark_kernel::SolidKernel;
use fbpark_texture::Sides;
use serde::{Deserialize, Serialize};

use super::Result;
use crate::params::TextureParams;

/// Wedge ramp rising along +X.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kicker {
    /// Run along X (mm).
    pub length: f64,
    /// Lip height at `x = length` (mm).
    pub height: f64,
    /// Extent along Y (mm).
    pub width: f64,
    /// Brick texture on both flanks and the back.
    pub texture: TextureParams,
}

impl Default for Kicker {
    fn default() -> Self {
        Self {
            length: 150.0,
            height: 40.0,
            width: 100.0,
            texture: TextureParams::default(),
        }
    }
}

impl Kicker {
    /// Right-triangle profile in XZ swept across the width.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        let (l, h, w) = (self.length, self.height, self.width);
        let profile = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(l, 0.0, 0.0),
            Point3::new(l, 0.0, h),
        ];
        let wedge = kernel.extrude_polygon(&profile, &Vec3::new(0.0, w, 0.0))?;
        Ok(self.texture.apply(kernel, wedge, l, h, w, Sides::Three))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fbpark_kernel::CsgKernel;

    #[test]
    fn test_kicker_envelope() {
        let k = CsgKernel::new();
        let kicker = Kicker::default();
        let solid = kicker.build(&k).unwrap();
        let bb = k.bounding_box(&solid);
        assert_relative_eq!(bb.max.x, 150.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 100.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 40.0, epsilon = 1e-9);
        assert_relative_eq!(bb.min.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_kicker_slope() {
        let k = CsgKernel::new();
        let kicker = Kicker {
            texture: TextureParams {
                enabled: false,
                ..TextureParams::default()
            },
            ..Kicker::default()
        };
        let solid = kicker.build(&k).unwrap();
        // halfway up the run the surface is at h / 2
        assert!(k.contains(&solid, &Point3::new(75.0, 50.0, 19.0)));
        assert!(!k.contains(&solid, &Point3::new(75.0, 50.0, 21.0)));
        // sampled volume close to L * H * W / 2
        let v = k.estimate_volume(&solid, 40);
        assert_relative_eq!(v, 300_000.0, max_relative = 0.05);
    }

    #[test]
    fn test_kicker_texture_cuts_the_flank() {
        let k = CsgKernel::new();
        let solid = Kicker::default().build(&k).unwrap();
        // first mortar line on the near flank, under the slope
        assert!(!k.contains(&solid, &Point3::new(120.0, 0.2, 10.0)));
        assert!(k.contains(&solid, &Point3::new(120.0, 50.0, 10.0)));
    }

    #[test]
    fn test_flat_profile_is_rejected() {
        let k = CsgKernel::new();
        let kicker = Kicker {
            height: 0.0,
            ..Kicker::default()
        };
        assert!(kicker.build(&k).is_err());
    }
}
