use std::cmp::Ordering;
use std::collections::BTreeMap;

use fbpark_kernel::math::{Axis, Tolerance};
use fbpark_kernel::{Edge, SolidKernel};
use fbpark_texture::{apply_horizontal_tiles, TileGrid};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Result;

/// Radii of the four vertical corner edges; zero leaves a corner sharp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerFillets {
    /// Corner at `(0, 0)`.
    pub front_left: f64,
    /// Corner at `(length, 0)`.
    pub front_right: f64,
    /// Corner at `(0, width)`.
    pub back_left: f64,
    /// Corner at `(length, width)`.
    pub back_right: f64,
}

impl Default for CornerFillets {
    fn default() -> Self {
        Self {
            front_left: 20.0,
            front_right: 20.0,
            back_left: 20.0,
            back_right: 20.0,
        }
    }
}

/// Radii of the four top edges; zero leaves an edge sharp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeFillets {
    /// Edge along `y = 0`.
    pub front: f64,
    /// Edge along `y = width`.
    pub back: f64,
    /// Edge along `x = 0`.
    pub left: f64,
    /// Edge along `x = length`.
    pub right: f64,
}

impl Default for EdgeFillets {
    fn default() -> Self {
        Self {
            front: 3.0,
            back: 3.0,
            left: 3.0,
            right: 3.0,
        }
    }
}

/// Tile grid on the top face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileParams {
    /// Cut the tiles.
    pub enabled: bool,
    /// Run the grid diagonally.
    pub rotate45: bool,
    /// Tile edge length (mm).
    pub tile_size: f64,
    /// Groove width (mm).
    pub groove: f64,
    /// Groove depth (mm).
    pub groove_depth: f64,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate45: false,
            tile_size: 50.0,
            groove: 1.0,
            groove_depth: 0.5,
        }
    }
}

/// Floor plate with rounded corners, eased top edges and a tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Base {
    /// Extent along X (mm).
    pub length: f64,
    /// Extent along Y (mm).
    pub width: f64,
    /// Plate thickness (mm).
    pub thickness: f64,
    /// Vertical corner rounds.
    pub corner_fillets: CornerFillets,
    /// Top edge rounds.
    pub top_fillets: EdgeFillets,
    /// Tile grid.
    pub tiles: TileParams,
}

impl Default for Base {
    fn default() -> Self {
        Self {
            length: 200.0,
            width: 150.0,
            thickness: 8.0,
            corner_fillets: CornerFillets::default(),
            top_fillets: EdgeFillets::default(),
            tiles: TileParams::default(),
        }
    }
}

/// Fillet radius usable as an ordered map key.
#[derive(Debug, Clone, Copy)]
struct Radius(f64);

impl PartialEq for Radius {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Radius {}

impl PartialOrd for Radius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Radius {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

type FilletGroups = BTreeMap<Radius, Vec<Edge>>;

fn add_to_group(groups: &mut FilletGroups, radius: f64, edge: &Edge) {
    if radius > 0.0 {
        groups.entry(Radius(radius)).or_default().push(edge.clone());
    }
}

impl Base {
    /// Vertical corner edges of the plate grouped by fillet radius.
    fn corner_groups(&self, edges: &[Edge], tol: &Tolerance) -> FilletGroups {
        let c = &self.corner_fillets;
        let mut groups = FilletGroups::new();
        for edge in edges.iter().filter(|e| e.is_parallel_to(Axis::Z, tol)) {
            let (x, y) = (edge.start.x, edge.start.y);
            let at = |cx: f64, cy: f64| tol.eq(x, cx) && tol.eq(y, cy);
            let radius = if at(0.0, 0.0) {
                c.front_left
            } else if at(self.length, 0.0) {
                c.front_right
            } else if at(0.0, self.width) {
                c.back_left
            } else if at(self.length, self.width) {
                c.back_right
            } else {
                0.0
            };
            add_to_group(&mut groups, radius, edge);
        }
        groups
    }

    /// Edges lying in the top face grouped by fillet radius.
    ///
    /// An edge on two sides at once takes the later of front, back, left,
    /// right.
    fn top_groups(&self, edges: &[Edge], tol: &Tolerance) -> FilletGroups {
        let t = &self.top_fillets;
        let mut groups = FilletGroups::new();
        for edge in edges {
            let mid = edge.midpoint();
            if !tol.eq(mid.z, self.thickness) {
                continue;
            }
            let mut radius = 0.0;
            if tol.is_zero(mid.y) {
                radius = t.front;
            }
            if tol.eq(mid.y, self.width) {
                radius = t.back;
            }
            if tol.is_zero(mid.x) {
                radius = t.left;
            }
            if tol.eq(mid.x, self.length) {
                radius = t.right;
            }
            add_to_group(&mut groups, radius, edge);
        }
        groups
    }

    /// Corner rounds, then top rounds, then tiles.
    ///
    /// Each distinct radius is one kernel fillet call, smallest first. A
    /// failed top round is logged and skipped; a failed corner round is an
    /// error.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        let tol = Tolerance::DEFAULT;
        let mut shape = kernel.make_box(self.length, self.width, self.thickness);

        let corners = self.corner_groups(&kernel.edges(&shape), &tol);
        for (radius, edges) in &corners {
            debug!(radius = radius.0, edges = edges.len(), "rounding corners");
            shape = kernel.fillet(&shape, radius.0, edges)?;
        }
        shape = kernel.remove_splitter(&shape);

        let tops = self.top_groups(&kernel.edges(&shape), &tol);
        for (radius, edges) in &tops {
            match kernel.fillet(&shape, radius.0, edges) {
                Ok(rounded) => shape = rounded,
                Err(err) => warn!(radius = radius.0, %err, "top edge round skipped"),
            }
        }
        shape = kernel.remove_splitter(&shape);

        if self.tiles.enabled {
            let grid = TileGrid {
                length: self.length,
                width: self.width,
                tile_size: self.tiles.tile_size,
                groove_width: self.tiles.groove,
                depth: self.tiles.groove_depth,
                rotated: self.tiles.rotate45,
            };
            shape = apply_horizontal_tiles(kernel, &shape, &grid);
        }
        Ok(kernel.remove_splitter(&shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fbpark_kernel::math::{Aabb3, Dir3, Point3, Vec3};
    use fbpark_kernel::{CsgKernel, CsgSolid, KernelError};
    use std::cell::RefCell;

    /// Reference kernel that records fillet calls and can refuse one radius.
    struct FilletLog {
        inner: CsgKernel,
        calls: RefCell<Vec<(f64, usize)>>,
        refuse: Option<f64>,
    }

    impl FilletLog {
        fn new(refuse: Option<f64>) -> Self {
            Self {
                inner: CsgKernel::new(),
                calls: RefCell::new(Vec::new()),
                refuse,
            }
        }
    }

    impl SolidKernel for FilletLog {
        type Solid = CsgSolid;

        fn make_box(&self, dx: f64, dy: f64, dz: f64) -> CsgSolid {
            self.inner.make_box(dx, dy, dz)
        }
        fn make_cylinder(
            &self,
            radius: f64,
            height: f64,
            base: &Point3,
            axis: &Vec3,
        ) -> fbpark_kernel::Result<CsgSolid> {
            self.inner.make_cylinder(radius, height, base, axis)
        }
        fn extrude_polygon(
            &self,
            profile: &[Point3],
            direction: &Vec3,
        ) -> fbpark_kernel::Result<CsgSolid> {
            self.inner.extrude_polygon(profile, direction)
        }
        fn translate(&self, solid: &CsgSolid, offset: &Vec3) -> CsgSolid {
            self.inner.translate(solid, offset)
        }
        fn rotate(&self, solid: &CsgSolid, pivot: &Point3, axis: &Dir3, degrees: f64) -> CsgSolid {
            self.inner.rotate(solid, pivot, axis, degrees)
        }
        fn make_compound(&self, solids: Vec<CsgSolid>) -> CsgSolid {
            self.inner.make_compound(solids)
        }
        fn fuse(&self, a: &CsgSolid, b: &CsgSolid) -> fbpark_kernel::Result<CsgSolid> {
            self.inner.fuse(a, b)
        }
        fn cut(&self, a: &CsgSolid, b: &CsgSolid) -> fbpark_kernel::Result<CsgSolid> {
            self.inner.cut(a, b)
        }
        fn common(&self, a: &CsgSolid, b: &CsgSolid) -> fbpark_kernel::Result<CsgSolid> {
            self.inner.common(a, b)
        }
        fn edges(&self, solid: &CsgSolid) -> Vec<Edge> {
            self.inner.edges(solid)
        }
        fn fillet(
            &self,
            solid: &CsgSolid,
            radius: f64,
            edges: &[Edge],
        ) -> fbpark_kernel::Result<CsgSolid> {
            self.calls.borrow_mut().push((radius, edges.len()));
            if self.refuse == Some(radius) {
                return Err(KernelError::BooleanFailed("fillet refused".into()));
            }
            self.inner.fillet(solid, radius, edges)
        }
        fn bounding_box(&self, solid: &CsgSolid) -> Aabb3 {
            self.inner.bounding_box(solid)
        }
    }

    fn untiled() -> Base {
        Base {
            tiles: TileParams {
                enabled: false,
                ..TileParams::default()
            },
            ..Base::default()
        }
    }

    #[test]
    fn test_fillets_grouped_by_radius_ascending() {
        let k = FilletLog::new(None);
        let base = Base {
            corner_fillets: CornerFillets {
                front_left: 20.0,
                front_right: 10.0,
                back_left: 20.0,
                back_right: 0.0,
            },
            ..untiled()
        };
        base.build(&k).unwrap();
        assert_eq!(*k.calls.borrow(), vec![(10.0, 1), (20.0, 2), (3.0, 4)]);
    }

    #[test]
    fn test_mixed_top_radii() {
        let k = FilletLog::new(None);
        let base = Base {
            top_fillets: EdgeFillets {
                front: 2.0,
                back: 4.0,
                left: 2.0,
                right: 0.0,
            },
            ..untiled()
        };
        base.build(&k).unwrap();
        assert_eq!(*k.calls.borrow(), vec![(20.0, 4), (2.0, 2), (4.0, 1)]);
    }

    #[test]
    fn test_top_fillet_failure_is_skipped() {
        let k = FilletLog::new(Some(3.0));
        let solid = untiled().build(&k).unwrap();
        // top edge still sharp
        assert!(k.inner.contains(&solid, &Point3::new(100.0, 0.1, 7.9)));
    }

    #[test]
    fn test_corner_fillet_failure_propagates() {
        let k = FilletLog::new(Some(20.0));
        assert!(untiled().build(&k).is_err());
    }

    #[test]
    fn test_rounded_corners_and_edges() {
        let k = CsgKernel::new();
        let solid = untiled().build(&k).unwrap();
        let bb = k.bounding_box(&solid);
        assert_relative_eq!(bb.max.x, 200.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 150.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 8.0, epsilon = 1e-9);
        // sharp corner is gone, the plate next to it is not
        assert!(!k.contains(&solid, &Point3::new(1.0, 1.0, 4.0)));
        assert!(k.contains(&solid, &Point3::new(20.0, 1.0, 4.0)));
        // eased top edge
        assert!(!k.contains(&solid, &Point3::new(100.0, 0.2, 7.8)));
        assert!(k.contains(&solid, &Point3::new(100.0, 5.0, 7.8)));
    }

    #[test]
    fn test_tiles_are_cut_last() {
        let k = CsgKernel::new();
        let solid = Base::default().build(&k).unwrap();
        assert!(!k.contains(&solid, &Point3::new(50.0, 75.0, 7.8)));
        assert!(k.contains(&solid, &Point3::new(25.0, 75.0, 7.8)));
    }
}
