//! Placement of groove cutters on a block.
//!
//! Planning is pure arithmetic: it produces a [`Pattern`] of cutter
//! placements that can be inspected without touching the kernel. Only
//! [`Pattern::instantiate`] builds geometry.

use fbpark_kernel::math::{Axis, Dir3, Point3, Transform, Vec3};
use fbpark_kernel::SolidKernel;
use serde::{Deserialize, Serialize};

use crate::cutter::GrooveSpec;

/// How far horizontal mortar lines overshoot each end of a face.
pub const MORTAR_OVERHANG: f64 = 10.0;

/// How far axis-aligned tile lines overshoot each edge of the top face.
pub const TILE_OVERHANG: f64 = 5.0;

// =============================================================================
// Faces
// =============================================================================

/// A vertical face of the block `[0, length] × [0, depth] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// Long side at `y = 0`.
    NearSide,
    /// Long side at `y = depth`.
    FarSide,
    /// Short side at `x = length`.
    Back,
    /// Short side at `x = 0`.
    Front,
}

impl Face {
    /// Horizontal axis that runs along this face.
    pub fn running_axis(self) -> Axis {
        match self {
            Face::NearSide | Face::FarSide => Axis::X,
            Face::Back | Face::Front => Axis::Y,
        }
    }

    fn plane_offset(self, length: f64, depth: f64) -> Vec3 {
        match self {
            Face::NearSide | Face::Front => Vec3::zeros(),
            Face::FarSide => Vec3::new(0.0, depth, 0.0),
            Face::Back => Vec3::new(length, 0.0, 0.0),
        }
    }

    fn extent(self, length: f64, depth: f64) -> f64 {
        match self.running_axis() {
            Axis::X => length,
            _ => depth,
        }
    }
}

/// Which vertical faces receive brick courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sides {
    /// Both long sides and the back; the front stays smooth.
    #[default]
    Three,
    /// All four sides.
    Four,
}

impl Sides {
    /// Faces in the order their cutters are planned.
    pub fn faces(self) -> &'static [Face] {
        match self {
            Sides::Three => &[Face::NearSide, Face::FarSide, Face::Back],
            Sides::Four => &[Face::NearSide, Face::FarSide, Face::Back, Face::Front],
        }
    }

    /// Four when `count == 4`, three otherwise.
    pub fn from_count(count: u8) -> Self {
        if count == 4 {
            Sides::Four
        } else {
            Sides::Three
        }
    }
}

// =============================================================================
// Placements
// =============================================================================

/// Role of one cutter in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrooveRole {
    /// Horizontal line between two brick courses.
    Mortar,
    /// Vertical joint between two bricks of one course.
    Joint,
    /// Tile grid line running along X.
    GridX,
    /// Tile grid line running along Y.
    GridY,
}

/// One cutter: built at the origin along `axis`, then moved by `offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutterPlacement {
    /// Cross-section of the groove.
    pub groove: GrooveSpec,
    /// Running axis.
    pub axis: Axis,
    /// Extent along the running axis.
    pub length: f64,
    /// Translation applied after construction.
    pub offset: Vec3,
    /// Face the cutter belongs to; `None` for top-face tiles.
    pub face: Option<Face>,
    /// Course index for bricks, grid line index for tiles.
    pub row: usize,
    /// What the groove represents.
    pub role: GrooveRole,
}

impl CutterPlacement {
    /// Build this cutter through the kernel.
    pub fn instantiate<K: SolidKernel>(&self, kernel: &K) -> K::Solid {
        let cutter = self.groove.make_cutter(kernel, self.length, self.axis);
        kernel.translate(&cutter, &self.offset)
    }
}

/// Rigid motion applied to the whole compound of cutters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternFrame {
    /// Rotation about the world Z axis through the origin, applied first.
    pub rotation_deg: f64,
    /// Translation applied after the rotation.
    pub translation: Vec3,
}

impl PatternFrame {
    /// The frame as a single transform.
    pub fn transform(&self) -> Transform {
        let spin =
            Transform::rotation_about_line(&Point3::origin(), &Vec3::z_axis(), self.rotation_deg);
        Transform::translation(&self.translation).then(&spin)
    }
}

/// A planned set of cutters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Cutters in planning order.
    pub placements: Vec<CutterPlacement>,
    /// Optional motion of the assembled compound.
    pub frame: Option<PatternFrame>,
}

impl Pattern {
    /// Number of cutters.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// True when there is nothing to cut.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements with the given role.
    pub fn with_role(&self, role: GrooveRole) -> impl Iterator<Item = &CutterPlacement> {
        self.placements.iter().filter(move |p| p.role == role)
    }

    /// Build every cutter and gather them into one compound.
    ///
    /// Returns `None` for an empty pattern.
    pub fn instantiate<K: SolidKernel>(&self, kernel: &K) -> Option<K::Solid> {
        if self.is_empty() {
            return None;
        }
        let cutters = self
            .placements
            .iter()
            .map(|p| p.instantiate(kernel))
            .collect();
        let mut tool = kernel.make_compound(cutters);
        if let Some(frame) = &self.frame {
            let z: Dir3 = Vec3::z_axis();
            tool = kernel.rotate(&tool, &Point3::origin(), &z, frame.rotation_deg);
            tool = kernel.translate(&tool, &frame.translation);
        }
        Some(tool)
    }
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// `trunc(extent / step) + extra`, floored at zero.
fn line_count(extent: f64, step: f64, extra: i64) -> usize {
    let n = (extent / step).trunc() as i64 + extra;
    n.max(0) as usize
}

// =============================================================================
// Brick courses
// =============================================================================

/// Running-bond brick courses on the vertical faces of an axis-aligned block.
///
/// The block occupies `[0, length] × [0, depth] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickCourses {
    /// Block extent along X.
    pub length: f64,
    /// Block extent along Z.
    pub height: f64,
    /// Block extent along Y.
    pub depth: f64,
    /// Brick length along the face.
    pub brick_length: f64,
    /// Course height.
    pub brick_height: f64,
    /// Groove width.
    pub groove_width: f64,
    /// Faces to texture.
    pub sides: Sides,
}

impl BrickCourses {
    /// Number of courses, counting a partial top course.
    pub fn rows(&self) -> usize {
        if !positive(self.brick_height) {
            return 0;
        }
        line_count(self.height, self.brick_height, 1)
    }

    /// Horizontal shift of the joints in course `row`.
    pub fn row_shift(&self, row: usize) -> f64 {
        if row % 2 == 0 {
            0.0
        } else {
            self.brick_length / 2.0
        }
    }

    /// Plan every mortar line and joint.
    ///
    /// Mortar lines are skipped at or above the top of the block.
    ///
    /// Degenerate brick or groove sizes give an empty pattern.
    pub fn plan(&self) -> Pattern {
        let mut pattern = Pattern::default();
        let sizes = [self.brick_length, self.brick_height, self.groove_width];
        if !sizes.into_iter().all(positive) {
            return pattern;
        }
        for &face in self.sides.faces() {
            self.plan_face(face, &mut pattern.placements);
        }
        pattern
    }

    fn plan_face(&self, face: Face, out: &mut Vec<CutterPlacement>) {
        let groove = GrooveSpec::diamond(self.groove_width);
        let axis = face.running_axis();
        let along = axis.unit();
        let plane = face.plane_offset(self.length, self.depth);
        let extent = face.extent(self.length, self.depth);
        let rows = self.rows();

        for row in 1..rows {
            let z = row as f64 * self.brick_height;
            // never on the top edge
            if z >= self.height {
                continue;
            }
            out.push(CutterPlacement {
                groove,
                axis,
                length: extent + 2.0 * MORTAR_OVERHANG,
                offset: plane - along * MORTAR_OVERHANG + Vec3::z() * z,
                face: Some(face),
                row,
                role: GrooveRole::Mortar,
            });
        }

        let joints = line_count(extent, self.brick_length, 2);
        for row in 0..rows {
            let z = row as f64 * self.brick_height;
            let shift = self.row_shift(row);
            for i in 0..joints {
                let s = i as f64 * self.brick_length + shift;
                out.push(CutterPlacement {
                    groove,
                    axis: Axis::Z,
                    length: self.brick_height,
                    offset: plane + along * s + Vec3::z() * z,
                    face: Some(face),
                    row,
                    role: GrooveRole::Joint,
                });
            }
        }
    }
}

// =============================================================================
// Tile grid
// =============================================================================

/// Square tile grid grooved into a horizontal top face.
///
/// The face spans `[0, length] × [0, width]`; its height is supplied when
/// planning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Face extent along X.
    pub length: f64,
    /// Face extent along Y.
    pub width: f64,
    /// Tile edge length.
    pub tile_size: f64,
    /// Groove width.
    pub groove_width: f64,
    /// Groove depth below the face.
    pub depth: f64,
    /// Run the grid at 45° about the face centre.
    pub rotated: bool,
}

impl TileGrid {
    /// Plan the grid for a top face at `z_top`.
    ///
    /// Degenerate tile or groove sizes give an empty pattern.
    pub fn plan(&self, z_top: f64) -> Pattern {
        let groove = GrooveSpec::flat_bottom(self.groove_width, self.depth);
        if !positive(self.tile_size) || !groove.is_valid() {
            return Pattern::default();
        }
        if self.rotated {
            self.plan_rotated(groove, z_top)
        } else {
            self.plan_aligned(groove, z_top)
        }
    }

    fn plan_aligned(&self, groove: GrooveSpec, z_top: f64) -> Pattern {
        let mut placements = Vec::new();
        let along_x = line_count(self.width, self.tile_size, 1);
        for i in 0..=along_x {
            placements.push(CutterPlacement {
                groove,
                axis: Axis::X,
                length: self.length + 2.0 * TILE_OVERHANG,
                offset: Vec3::new(-TILE_OVERHANG, i as f64 * self.tile_size, z_top),
                face: None,
                row: i,
                role: GrooveRole::GridX,
            });
        }
        let along_y = line_count(self.length, self.tile_size, 1);
        for i in 0..=along_y {
            placements.push(CutterPlacement {
                groove,
                axis: Axis::Y,
                length: self.width + 2.0 * TILE_OVERHANG,
                offset: Vec3::new(i as f64 * self.tile_size, -TILE_OVERHANG, z_top),
                face: None,
                row: i,
                role: GrooveRole::GridY,
            });
        }
        Pattern {
            placements,
            frame: None,
        }
    }

    /// Square grid centred on the origin, large enough to cover the face
    /// after a 45° turn, then moved onto the face centre.
    fn plan_rotated(&self, groove: GrooveSpec, z_top: f64) -> Pattern {
        let diag = self.length.hypot(self.width) + 2.0 * self.tile_size;
        let half = diag / 2.0;
        let lines = line_count(diag, self.tile_size, 2);
        let mut placements = Vec::with_capacity(lines * 2);
        for i in 0..lines {
            let pos = i as f64 * self.tile_size - half;
            placements.push(CutterPlacement {
                groove,
                axis: Axis::X,
                length: diag,
                offset: Vec3::new(-half, pos, 0.0),
                face: None,
                row: i,
                role: GrooveRole::GridX,
            });
            placements.push(CutterPlacement {
                groove,
                axis: Axis::Y,
                length: diag,
                offset: Vec3::new(pos, -half, 0.0),
                face: None,
                row: i,
                role: GrooveRole::GridY,
            });
        }
        Pattern {
            placements,
            frame: Some(PatternFrame {
                rotation_deg: 45.0,
                translation: Vec3::new(self.length / 2.0, self.width / 2.0, z_top),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fbpark_kernel::CsgKernel;

    fn courses(length: f64, height: f64, depth: f64, sides: Sides) -> BrickCourses {
        BrickCourses {
            length,
            height,
            depth,
            brick_length: 20.0,
            brick_height: 10.0,
            groove_width: 1.2,
            sides,
        }
    }

    #[test]
    fn test_row_count_includes_partial_course() {
        assert_eq!(courses(150.0, 40.0, 100.0, Sides::Three).rows(), 5);
        assert_eq!(courses(150.0, 35.0, 100.0, Sides::Three).rows(), 4);
        assert_eq!(courses(150.0, 5.0, 100.0, Sides::Three).rows(), 1);
    }

    #[test]
    fn test_mortar_lines_sit_on_course_boundaries() {
        let pattern = courses(150.0, 40.0, 100.0, Sides::Three).plan();
        let near: Vec<_> = pattern
            .with_role(GrooveRole::Mortar)
            .filter(|p| p.face == Some(Face::NearSide))
            .collect();
        // z = 40 is the top edge
        assert_eq!(near.len(), 3);
        for (k, p) in near.iter().enumerate() {
            assert_relative_eq!(p.offset.z, 10.0 * (k + 1) as f64);
            assert_relative_eq!(p.offset.x, -MORTAR_OVERHANG);
            assert_relative_eq!(p.length, 170.0);
            assert_eq!(p.axis, Axis::X);
        }
    }

    #[test]
    fn test_joints_stagger_by_half_a_brick() {
        let pattern = courses(150.0, 40.0, 100.0, Sides::Three).plan();
        let joint_x = |row: usize| -> Vec<f64> {
            pattern
                .with_role(GrooveRole::Joint)
                .filter(|p| p.face == Some(Face::NearSide) && p.row == row)
                .map(|p| p.offset.x)
                .collect()
        };
        let even = joint_x(0);
        let odd = joint_x(1);
        // trunc(150 / 20) + 2
        assert_eq!(even.len(), 9);
        assert_eq!(odd.len(), 9);
        for (a, b) in even.iter().zip(&odd) {
            assert_relative_eq!(b - a, 10.0);
            assert_relative_eq!(a % 20.0, 0.0);
        }
        assert_eq!(joint_x(2), even);
    }

    #[test]
    fn test_side_count_selects_faces() {
        let three = courses(150.0, 40.0, 100.0, Sides::Three).plan();
        let four = courses(150.0, 40.0, 100.0, Sides::Four).plan();
        assert!(three.placements.iter().all(|p| p.face != Some(Face::Front)));
        assert!(four.placements.iter().any(|p| p.face == Some(Face::Front)));
        // front mirrors the back minus the x offset
        let back = four.placements.iter().filter(|p| p.face == Some(Face::Back)).count();
        let front = four.placements.iter().filter(|p| p.face == Some(Face::Front)).count();
        assert_eq!(back, front);
        assert_eq!(four.len() - three.len(), front);
        assert_eq!(Sides::from_count(4), Sides::Four);
        assert_eq!(Sides::from_count(7), Sides::Three);
    }

    #[test]
    fn test_back_face_runs_along_y() {
        let pattern = courses(150.0, 40.0, 100.0, Sides::Three).plan();
        let back_mortar = pattern
            .with_role(GrooveRole::Mortar)
            .find(|p| p.face == Some(Face::Back))
            .unwrap();
        assert_eq!(back_mortar.axis, Axis::Y);
        assert_relative_eq!(back_mortar.offset.x, 150.0);
        assert_relative_eq!(back_mortar.offset.y, -MORTAR_OVERHANG);
        assert_relative_eq!(back_mortar.length, 120.0);
    }

    #[test]
    fn test_degenerate_bricks_plan_nothing() {
        let mut c = courses(150.0, 40.0, 100.0, Sides::Four);
        c.brick_height = 0.0;
        assert!(c.plan().is_empty());
        c.brick_height = 10.0;
        c.brick_length = f64::NAN;
        assert!(c.plan().is_empty());
        c.brick_length = 20.0;
        c.groove_width = -1.0;
        assert!(c.plan().is_empty());
    }

    fn grid(rotated: bool) -> TileGrid {
        TileGrid {
            length: 200.0,
            width: 150.0,
            tile_size: 50.0,
            groove_width: 1.0,
            depth: 0.5,
            rotated,
        }
    }

    #[test]
    fn test_aligned_grid_line_counts() {
        let pattern = grid(false).plan(8.0);
        // trunc(150 / 50) + 2 lines along X, trunc(200 / 50) + 2 along Y
        assert_eq!(pattern.with_role(GrooveRole::GridX).count(), 5);
        assert_eq!(pattern.with_role(GrooveRole::GridY).count(), 6);
        assert!(pattern.frame.is_none());
        for p in &pattern.placements {
            assert_relative_eq!(p.offset.z, 8.0);
        }
        let last_y = pattern.with_role(GrooveRole::GridY).last().unwrap();
        assert_relative_eq!(last_y.offset.x, 250.0);
    }

    #[test]
    fn test_rotated_grid_is_centred_on_face() {
        let g = grid(true);
        let pattern = g.plan(8.0);
        let frame = pattern.frame.unwrap();
        assert_relative_eq!(frame.rotation_deg, 45.0);
        let centre = frame.transform().apply_point(&Point3::origin());
        assert_relative_eq!(centre.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(centre.y, 75.0, epsilon = 1e-9);
        assert_relative_eq!(centre.z, 8.0, epsilon = 1e-9);

        let diag = 200f64.hypot(150.0) + 100.0;
        let lines = (diag / 50.0).trunc() as usize + 2;
        assert_eq!(pattern.len(), 2 * lines);
        let first = &pattern.placements[0];
        assert_relative_eq!(first.offset.y, -diag / 2.0);
        assert_relative_eq!(first.length, diag);

        // local grid straddles the origin
        let k = CsgKernel::new();
        let mut unframed = pattern.clone();
        unframed.frame = None;
        let bb = k.bounding_box(&unframed.instantiate(&k).unwrap());
        assert!(bb.center().x.abs() < g.tile_size);
        assert!(bb.center().y.abs() < g.tile_size);
    }

    #[test]
    fn test_degenerate_tiles_plan_nothing() {
        let mut g = grid(false);
        g.tile_size = 0.0;
        assert!(g.plan(8.0).is_empty());
        g.tile_size = 50.0;
        g.depth = 0.0;
        assert!(g.plan(8.0).is_empty());
    }

    #[test]
    fn test_empty_pattern_instantiates_to_none() {
        let k = CsgKernel::new();
        assert!(Pattern::default().instantiate(&k).is_none());
    }
}
