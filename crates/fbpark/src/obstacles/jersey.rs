use fbpark_kernel::math::{Point3, Vec3};
use fbpark_kernel::SolidKernel;
use fbpark_texture::Sides;
use serde::{Deserialize, Serialize};

use super::Result;
use crate::params::TextureParams;

/// Male key and female slot so barriers lock end to end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointParams {
    /// Add the key and slot.
    pub enabled: bool,
    /// Key depth along Y (mm).
    pub length: f64,
    /// Key width along X (mm).
    pub width: f64,
    /// Key height (mm).
    pub height: f64,
    /// Extra clearance of the slot over the key (mm).
    pub tolerance: f64,
}

impl Default for JointParams {
    fn default() -> Self {
        Self {
            enabled: true,
            length: 3.0,
            width: 5.0,
            height: 60.0,
            tolerance: 0.4,
        }
    }
}

/// Road barrier: flared foot, steep upper wall, flat top; runs along +Y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jersey {
    /// Run along Y (mm).
    pub length: f64,
    /// Overall height (mm).
    pub height: f64,
    /// Foot width along X (mm).
    pub base_width: f64,
    /// Top width (mm).
    pub top_width: f64,
    /// Height of the vertical foot (mm).
    pub base_height: f64,
    /// Height of the shallow slope above the foot (mm).
    pub slope_height: f64,
    /// End-to-end joint.
    pub joint: JointParams,
    /// Brick texture, off and locked by default.
    pub texture: TextureParams,
}

impl Default for Jersey {
    fn default() -> Self {
        Self {
            length: 120.0,
            height: 60.0,
            base_width: 50.0,
            top_width: 20.0,
            base_height: 10.0,
            slope_height: 15.0,
            joint: JointParams::default(),
            texture: TextureParams::locked_off(),
        }
    }
}

impl Jersey {
    /// Cross-section in XZ, symmetric about `x = base_width / 2`.
    pub fn profile(&self) -> [Point3; 8] {
        let (bw, tw, h) = (self.base_width, self.top_width, self.height);
        let knee_z = self.base_height + self.slope_height;
        // the slope breaks a quarter of the way in from the foot
        let knee_x = tw + (bw - tw) * 0.75;
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(bw, 0.0, 0.0),
            Point3::new(bw, 0.0, self.base_height),
            Point3::new(knee_x, 0.0, knee_z),
            Point3::new(bw / 2.0 + tw / 2.0, 0.0, h),
            Point3::new(bw / 2.0 - tw / 2.0, 0.0, h),
            Point3::new(bw - knee_x, 0.0, knee_z),
            Point3::new(0.0, 0.0, self.base_height),
        ]
    }

    /// Extruded profile with the joint, then the optional texture.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        let (l, h, bw) = (self.length, self.height, self.base_width);
        let mut shape = kernel.extrude_polygon(&self.profile(), &Vec3::new(0.0, l, 0.0))?;

        if self.joint.enabled {
            let j = &self.joint;
            let male = kernel.make_box(j.width, j.length, j.height);
            let male = kernel.translate(
                &male,
                &Vec3::new(bw / 2.0 - j.width / 2.0, l, (h - j.height) / 2.0),
            );

            let (sw, sh) = (j.width + j.tolerance, j.height + j.tolerance);
            // one unit longer and starting outside so the slot opens cleanly
            let female = kernel.make_box(sw, j.length + 1.0, sh);
            let female = kernel.translate(
                &female,
                &Vec3::new(bw / 2.0 - sw / 2.0, -1.0, (h - sh) / 2.0),
            );

            shape = kernel.fuse(&shape, &male)?;
            shape = kernel.cut(&shape, &female)?;
        }

        Ok(self.texture.apply(kernel, shape, bw, h, l, Sides::Three))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fbpark_kernel::CsgKernel;

    #[test]
    fn test_profile_points() {
        let p = Jersey::default().profile();
        assert_relative_eq!(p[3].x, 42.5);
        assert_relative_eq!(p[3].z, 25.0);
        assert_relative_eq!(p[4].x, 35.0);
        assert_relative_eq!(p[5].x, 15.0);
        assert_relative_eq!(p[6].x, 7.5);
    }

    #[test]
    fn test_key_sticks_out_of_the_far_end() {
        let k = CsgKernel::new();
        let solid = Jersey::default().build(&k).unwrap();
        let bb = k.bounding_box(&solid);
        assert_relative_eq!(bb.max.y, 123.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 60.0, epsilon = 1e-9);
        assert!(k.contains(&solid, &Point3::new(25.0, 121.5, 30.0)));
        assert!(!k.contains(&solid, &Point3::new(10.0, 121.5, 5.0)));
    }

    #[test]
    fn test_slot_is_cut_into_the_near_end() {
        let k = CsgKernel::new();
        let solid = Jersey::default().build(&k).unwrap();
        // slot is 5.4 wide and 3 deep
        assert!(!k.contains(&solid, &Point3::new(25.0, 1.0, 30.0)));
        assert!(!k.contains(&solid, &Point3::new(27.6, 2.9, 30.0)));
        assert!(k.contains(&solid, &Point3::new(25.0, 3.5, 30.0)));
        assert!(k.contains(&solid, &Point3::new(28.0, 1.0, 30.0)));
    }

    #[test]
    fn test_without_joint_is_a_plain_prism() {
        let k = CsgKernel::new();
        let jersey = Jersey {
            joint: JointParams {
                enabled: false,
                ..JointParams::default()
            },
            ..Jersey::default()
        };
        let solid = jersey.build(&k).unwrap();
        assert_eq!(solid.primitive_count(), 1);
        assert_relative_eq!(k.bounding_box(&solid).max.y, 120.0, epsilon = 1e-9);
        // flare: wide at the foot, narrow near the top
        assert!(k.contains(&solid, &Point3::new(2.0, 60.0, 5.0)));
        assert!(!k.contains(&solid, &Point3::new(10.0, 60.0, 55.0)));
    }
}
