#![warn(missing_docs)]

//! Solid-modeling kernel contract for fbpark.
//!
//! Obstacle builders and the texture engine never construct geometry
//! themselves: they call a [`SolidKernel`]. A host CAD application provides
//! its own implementation; [`CsgKernel`] is a self-contained reference
//! implementation built on implicit CSG trees.
//!
//! # Example
//!
//! ```
//! use fbpark_kernel::{CsgKernel, SolidKernel};
//! use fbpark_kernel::math::Vec3;
//!
//! let kernel = CsgKernel::new();
//! let block = kernel.make_box(10.0, 20.0, 30.0);
//! let moved = kernel.translate(&block, &Vec3::new(5.0, 0.0, 0.0));
//! assert_eq!(kernel.bounding_box(&moved).min.x, 5.0);
//! ```

pub use fbpark_kernel_math as math;

mod classify;
mod csg;

pub use csg::{CsgKernel, CsgSolid};

use fbpark_kernel_math::{Axis, Dir3, Point3, Tolerance, Vec3};
use thiserror::Error;

/// Errors reported by kernel operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A numeric argument was out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A profile could not be turned into a solid.
    #[error("degenerate profile: {0}")]
    DegenerateProfile(String),

    /// The requested edge is not part of the solid.
    #[error("edge not found on solid: {0:?} -> {1:?}")]
    EdgeNotFound(Point3, Point3),

    /// The edge geometry is not supported by this operation.
    #[error("unsupported edge: {0}")]
    UnsupportedEdge(String),

    /// A boolean operation could not produce a valid result.
    #[error("boolean operation failed: {0}")]
    BooleanFailed(String),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

/// A straight edge of a solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Start vertex.
    pub start: Point3,
    /// End vertex.
    pub end: Point3,
    /// Outward normals of the two faces meeting at this edge.
    pub normals: [Vec3; 2],
}

impl Edge {
    /// Vector from start to end.
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// Edge length.
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Midpoint of the edge.
    pub fn midpoint(&self) -> Point3 {
        self.start + self.vector() * 0.5
    }

    /// True if the edge runs parallel to `axis` (within `tol`).
    pub fn is_parallel_to(&self, axis: Axis, tol: &Tolerance) -> bool {
        let v = self.vector();
        let (a, b) = axis.others();
        tol.is_zero(v[a.index()]) && tol.is_zero(v[b.index()]) && !tol.is_zero(v[axis.index()])
    }

    /// True if both edges join the same endpoints, in either direction.
    pub fn same_as(&self, other: &Edge, tol: &Tolerance) -> bool {
        (tol.points_equal(&self.start, &other.start) && tol.points_equal(&self.end, &other.end))
            || (tol.points_equal(&self.start, &other.end)
                && tol.points_equal(&self.end, &other.start))
    }
}

/// The solid-modeling operations fbpark relies on.
///
/// Methods take `&self`: a kernel is a stateless service and solids are
/// immutable values. Constructors and transforms are infallible; booleans,
/// extrusion and filleting may fail.
pub trait SolidKernel {
    /// Opaque solid handle.
    type Solid: Clone + std::fmt::Debug;

    /// Axis-aligned box with one corner at the origin.
    fn make_box(&self, dx: f64, dy: f64, dz: f64) -> Self::Solid;

    /// Cylinder whose bottom cap is centred at `base`, extending `height` along `axis`.
    fn make_cylinder(
        &self,
        radius: f64,
        height: f64,
        base: &Point3,
        axis: &Vec3,
    ) -> Result<Self::Solid>;

    /// Sweep a closed planar polygon along `direction`.
    ///
    /// A repeated closing point is accepted and ignored.
    fn extrude_polygon(&self, profile: &[Point3], direction: &Vec3) -> Result<Self::Solid>;

    /// Translated copy of `solid`.
    fn translate(&self, solid: &Self::Solid, offset: &Vec3) -> Self::Solid;

    /// Copy of `solid` rotated by `degrees` about the line through `pivot` along `axis`.
    fn rotate(&self, solid: &Self::Solid, pivot: &Point3, axis: &Dir3, degrees: f64)
        -> Self::Solid;

    /// Group solids into one aggregate without fusing them.
    fn make_compound(&self, solids: Vec<Self::Solid>) -> Self::Solid;

    /// Boolean union.
    fn fuse(&self, a: &Self::Solid, b: &Self::Solid) -> Result<Self::Solid>;

    /// Boolean subtraction `a − b`.
    fn cut(&self, a: &Self::Solid, b: &Self::Solid) -> Result<Self::Solid>;

    /// Boolean intersection.
    fn common(&self, a: &Self::Solid, b: &Self::Solid) -> Result<Self::Solid>;

    /// Straight edges of `solid`.
    fn edges(&self, solid: &Self::Solid) -> Vec<Edge>;

    /// Round `edges` of `solid` with `radius`.
    fn fillet(&self, solid: &Self::Solid, radius: f64, edges: &[Edge]) -> Result<Self::Solid>;

    /// Axis-aligned extents of `solid`.
    fn bounding_box(&self, solid: &Self::Solid) -> math::Aabb3;

    /// Merge coplanar faces left behind by booleans and fillets.
    fn remove_splitter(&self, solid: &Self::Solid) -> Self::Solid {
        solid.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: [f64; 3], b: [f64; 3]) -> Edge {
        Edge {
            start: Point3::new(a[0], a[1], a[2]),
            end: Point3::new(b[0], b[1], b[2]),
            normals: [Vec3::x(), Vec3::y()],
        }
    }

    #[test]
    fn test_edge_parallel() {
        let tol = Tolerance::DEFAULT;
        let e = edge([0.0, 0.0, 0.0], [0.0, 0.0, 8.0]);
        assert!(e.is_parallel_to(Axis::Z, &tol));
        assert!(!e.is_parallel_to(Axis::X, &tol));
        assert_eq!(e.midpoint(), Point3::new(0.0, 0.0, 4.0));
        assert_eq!(e.length(), 8.0);
    }

    #[test]
    fn test_edge_same_as_reversed() {
        let tol = Tolerance::DEFAULT;
        let a = edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = edge([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let c = edge([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        assert!(a.same_as(&b, &tol));
        assert!(!a.same_as(&c, &tol));
    }
}
