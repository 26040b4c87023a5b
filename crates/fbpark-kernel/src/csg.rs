//! Reference kernel built on implicit CSG trees.
//!
//! Solids are immutable trees of primitives, compounds, booleans and edge
//! rounds. Rigid transforms are pushed down to the primitives, so every leaf
//! carries its full world placement and bounding boxes of transformed boxes
//! stay exact. Membership is decided per point; there is no boundary
//! representation.

use std::sync::Arc;

use fbpark_kernel_math::{Aabb3, Dir3, Point3, Tolerance, Transform, Vec3};
use tracing::debug;

use crate::classify::{EdgeRound, Primitive};
use crate::{Edge, KernelError, Result, SolidKernel};

/// A solid produced by [`CsgKernel`].
#[derive(Debug, Clone)]
pub struct CsgSolid {
    node: Arc<Node>,
    bounds: Aabb3,
}

#[derive(Debug)]
enum Node {
    Leaf {
        primitive: Primitive,
        to_world: Transform,
        to_local: Transform,
    },
    Compound(Vec<CsgSolid>),
    Boolean {
        op: BooleanOp,
        left: CsgSolid,
        right: CsgSolid,
    },
    Rounded {
        child: CsgSolid,
        rounds: Vec<EdgeRound>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

impl CsgSolid {
    fn from_node(node: Node) -> Self {
        let bounds = match &node {
            Node::Leaf {
                primitive,
                to_world,
                ..
            } => {
                let pts: Vec<Point3> = primitive
                    .hull_points()
                    .iter()
                    .map(|p| to_world.apply_point(p))
                    .collect();
                Aabb3::from_points(pts.iter())
            }
            Node::Compound(children) => children
                .iter()
                .fold(Aabb3::empty(), |acc, c| acc.union(&c.bounds)),
            Node::Boolean { op, left, right } => match op {
                BooleanOp::Union => left.bounds.union(&right.bounds),
                BooleanOp::Difference => left.bounds,
                BooleanOp::Intersection => left.bounds.intersection(&right.bounds),
            },
            Node::Rounded { child, .. } => child.bounds,
        };
        Self {
            node: Arc::new(node),
            bounds,
        }
    }

    fn leaf(primitive: Primitive, to_world: Transform, to_local: Transform) -> Self {
        Self::from_node(Node::Leaf {
            primitive,
            to_world,
            to_local,
        })
    }

    /// True if the solid has no extent.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Number of primitives in the tree.
    pub fn primitive_count(&self) -> usize {
        match self.node.as_ref() {
            Node::Leaf { .. } => 1,
            Node::Compound(children) => children.iter().map(CsgSolid::primitive_count).sum(),
            Node::Boolean { left, right, .. } => left.primitive_count() + right.primitive_count(),
            Node::Rounded { child, .. } => child.primitive_count(),
        }
    }

    /// Point membership; boundaries of primitives count as inside.
    pub fn contains(&self, p: &Point3) -> bool {
        if !self.bounds.contains_point(p) {
            return false;
        }
        match self.node.as_ref() {
            Node::Leaf {
                primitive,
                to_local,
                ..
            } => primitive.contains_local(&to_local.apply_point(p)),
            Node::Compound(children) => children.iter().any(|c| c.contains(p)),
            Node::Boolean { op, left, right } => match op {
                BooleanOp::Union => left.contains(p) || right.contains(p),
                BooleanOp::Difference => left.contains(p) && !right.contains(p),
                BooleanOp::Intersection => left.contains(p) && right.contains(p),
            },
            Node::Rounded { child, rounds } => {
                child.contains(p) && !rounds.iter().any(|r| r.removes(p))
            }
        }
    }

    fn transformed(&self, forward: &Transform, inverse: &Transform) -> CsgSolid {
        let node = match self.node.as_ref() {
            Node::Leaf {
                primitive,
                to_world,
                to_local,
            } => Node::Leaf {
                primitive: primitive.clone(),
                to_world: forward.then(to_world),
                to_local: to_local.then(inverse),
            },
            Node::Compound(children) => Node::Compound(
                children
                    .iter()
                    .map(|c| c.transformed(forward, inverse))
                    .collect(),
            ),
            Node::Boolean { op, left, right } => Node::Boolean {
                op: *op,
                left: left.transformed(forward, inverse),
                right: right.transformed(forward, inverse),
            },
            Node::Rounded { child, rounds } => Node::Rounded {
                child: child.transformed(forward, inverse),
                rounds: rounds.iter().map(|r| r.transformed(forward)).collect(),
            },
        };
        CsgSolid::from_node(node)
    }

    fn collect_edges(&self, out: &mut Vec<Edge>) {
        match self.node.as_ref() {
            Node::Leaf {
                primitive,
                to_world,
                ..
            } => {
                if let Some((outline, sweep)) = primitive.sweep_outline() {
                    let outline: Vec<Point3> =
                        outline.iter().map(|p| to_world.apply_point(p)).collect();
                    out.extend(swept_edges(&outline, &to_world.apply_vec(&sweep)));
                }
            }
            Node::Compound(children) => children.iter().for_each(|c| c.collect_edges(out)),
            Node::Boolean { op, left, right } => {
                left.collect_edges(out);
                if *op == BooleanOp::Union {
                    right.collect_edges(out);
                }
            }
            Node::Rounded { child, .. } => child.collect_edges(out),
        }
    }
}

/// Newell normal of a closed polygon; its length is twice the polygon area.
fn newell_normal(points: &[Point3]) -> Vec3 {
    let n = points.len();
    let mut normal = Vec3::zeros();
    for i in 0..n {
        let curr = points[i];
        let next = points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Edges of the prism obtained by sweeping `outline` along `sweep`.
fn swept_edges(outline: &[Point3], sweep: &Vec3) -> Vec<Edge> {
    let n = outline.len();
    let raw = newell_normal(outline);
    if n < 3 || raw.norm() < 1e-15 {
        return Vec::new();
    }
    let normal = raw.normalize();
    let top = if sweep.dot(&normal) >= 0.0 {
        normal
    } else {
        -normal
    };
    let bottom = -top;

    let sides: Vec<Vec3> = (0..n)
        .map(|i| {
            let e = outline[(i + 1) % n] - outline[i];
            let outward = e.cross(&normal);
            let s = e.cross(sweep);
            let len = s.norm();
            if len < 1e-15 {
                return outward.normalize();
            }
            let s = s / len;
            if s.dot(&outward) < 0.0 {
                -s
            } else {
                s
            }
        })
        .collect();

    let mut edges = Vec::with_capacity(3 * n);
    for i in 0..n {
        let j = (i + 1) % n;
        let prev = (i + n - 1) % n;
        edges.push(Edge {
            start: outline[i],
            end: outline[j],
            normals: [bottom, sides[i]],
        });
        edges.push(Edge {
            start: outline[i] + sweep,
            end: outline[j] + sweep,
            normals: [top, sides[i]],
        });
        edges.push(Edge {
            start: outline[i],
            end: outline[i] + sweep,
            normals: [sides[prev], sides[i]],
        });
    }
    edges
}

/// Rotation taking local +Z onto `axis`.
fn align_z(axis: &Dir3) -> Transform {
    let z = Vec3::z();
    let cross = z.cross(axis.as_ref());
    let cos = z.dot(axis.as_ref()).clamp(-1.0, 1.0);
    match Dir3::try_new(cross, 1e-12) {
        Some(pivot_axis) => Transform::rotation_about_axis(&pivot_axis, cos.acos()),
        None if cos > 0.0 => Transform::identity(),
        None => {
            Transform::rotation_about_axis(&Dir3::new_unchecked(Vec3::x()), std::f64::consts::PI)
        }
    }
}

/// Self-contained [`SolidKernel`] backed by implicit CSG trees.
#[derive(Debug, Clone, Default)]
pub struct CsgKernel {
    tolerance: Tolerance,
}

impl CsgKernel {
    /// Kernel with the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel matching edges and profiles with `tolerance`.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Point membership test.
    pub fn contains(&self, solid: &CsgSolid, p: &Point3) -> bool {
        solid.contains(p)
    }

    /// Volume estimated by sampling cell centres of a `resolution³` grid
    /// over the bounding box.
    pub fn estimate_volume(&self, solid: &CsgSolid, resolution: usize) -> f64 {
        let size = solid.bounds.size();
        if resolution == 0 || size.iter().any(|&s| s <= 0.0) {
            return 0.0;
        }
        let cell = size / resolution as f64;
        let mut inside = 0usize;
        for i in 0..resolution {
            for j in 0..resolution {
                for k in 0..resolution {
                    let p = solid.bounds.min
                        + Vec3::new(
                            (i as f64 + 0.5) * cell.x,
                            (j as f64 + 0.5) * cell.y,
                            (k as f64 + 0.5) * cell.z,
                        );
                    if solid.contains(&p) {
                        inside += 1;
                    }
                }
            }
        }
        inside as f64 * cell.x * cell.y * cell.z
    }
}

impl SolidKernel for CsgKernel {
    type Solid = CsgSolid;

    fn make_box(&self, dx: f64, dy: f64, dz: f64) -> CsgSolid {
        CsgSolid::leaf(
            Primitive::Cuboid {
                size: Vec3::new(dx, dy, dz),
            },
            Transform::identity(),
            Transform::identity(),
        )
    }

    fn make_cylinder(
        &self,
        radius: f64,
        height: f64,
        base: &Point3,
        axis: &Vec3,
    ) -> Result<CsgSolid> {
        if radius.is_nan() || height.is_nan() || radius <= 0.0 || height <= 0.0 {
            return Err(KernelError::InvalidParameter(format!(
                "cylinder needs positive radius and height, got r={radius}, h={height}"
            )));
        }
        let dir = Dir3::try_new(*axis, 1e-12).ok_or_else(|| {
            KernelError::InvalidParameter("cylinder axis has zero length".to_string())
        })?;
        let to_world = Transform::translation(&base.coords).then(&align_z(&dir));
        let to_local = to_world.inverse().ok_or_else(|| {
            KernelError::InvalidParameter("cylinder placement is singular".to_string())
        })?;
        Ok(CsgSolid::leaf(
            Primitive::Cylinder { radius, height },
            to_world,
            to_local,
        ))
    }

    fn extrude_polygon(&self, profile: &[Point3], direction: &Vec3) -> Result<CsgSolid> {
        let tol = &self.tolerance;
        let mut points = profile.to_vec();
        if points.len() > 1 && tol.points_equal(&points[0], &points[points.len() - 1]) {
            points.pop();
        }
        if points.len() < 3 {
            return Err(KernelError::DegenerateProfile(format!(
                "need at least 3 distinct points, got {}",
                points.len()
            )));
        }

        let raw_normal = newell_normal(&points);
        if raw_normal.norm() < 1e-12 {
            return Err(KernelError::DegenerateProfile(
                "profile encloses no area".to_string(),
            ));
        }
        let normal = raw_normal.normalize();
        let origin = points[0];
        if points
            .iter()
            .any(|p| !tol.is_zero((p - origin).dot(&normal)))
        {
            return Err(KernelError::DegenerateProfile(
                "profile is not planar".to_string(),
            ));
        }
        if direction.dot(&normal).abs() < 1e-12 {
            return Err(KernelError::DegenerateProfile(
                "extrusion direction lies in the profile plane".to_string(),
            ));
        }

        let u = points
            .iter()
            .map(|p| p - origin)
            .find(|v| v.norm() > 1e-12)
            .map(|v| v.normalize())
            .ok_or_else(|| KernelError::DegenerateProfile("coincident points".to_string()))?;
        let v = normal.cross(&u);
        let polygon: Vec<[f64; 2]> = points
            .iter()
            .map(|p| {
                let d = p - origin;
                [d.dot(&u), d.dot(&v)]
            })
            .collect();

        let to_world = Transform::from_frame(&origin, &u, &v, direction);
        let to_local = to_world.inverse().ok_or_else(|| {
            KernelError::DegenerateProfile("extrusion frame is singular".to_string())
        })?;
        Ok(CsgSolid::leaf(
            Primitive::Prism { polygon },
            to_world,
            to_local,
        ))
    }

    fn translate(&self, solid: &CsgSolid, offset: &Vec3) -> CsgSolid {
        solid.transformed(
            &Transform::translation(offset),
            &Transform::translation(&-offset),
        )
    }

    fn rotate(&self, solid: &CsgSolid, pivot: &Point3, axis: &Dir3, degrees: f64) -> CsgSolid {
        solid.transformed(
            &Transform::rotation_about_line(pivot, axis, degrees),
            &Transform::rotation_about_line(pivot, axis, -degrees),
        )
    }

    fn make_compound(&self, solids: Vec<CsgSolid>) -> CsgSolid {
        CsgSolid::from_node(Node::Compound(solids))
    }

    fn fuse(&self, a: &CsgSolid, b: &CsgSolid) -> Result<CsgSolid> {
        Ok(boolean(BooleanOp::Union, a, b))
    }

    fn cut(&self, a: &CsgSolid, b: &CsgSolid) -> Result<CsgSolid> {
        Ok(boolean(BooleanOp::Difference, a, b))
    }

    fn common(&self, a: &CsgSolid, b: &CsgSolid) -> Result<CsgSolid> {
        Ok(boolean(BooleanOp::Intersection, a, b))
    }

    fn edges(&self, solid: &CsgSolid) -> Vec<Edge> {
        let mut out = Vec::new();
        solid.collect_edges(&mut out);
        out
    }

    fn fillet(&self, solid: &CsgSolid, radius: f64, edges: &[Edge]) -> Result<CsgSolid> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(KernelError::InvalidParameter(format!(
                "fillet radius must be positive, got {radius}"
            )));
        }
        let own = self.edges(solid);
        let mut rounds = Vec::with_capacity(edges.len());
        for wanted in edges {
            let edge = own
                .iter()
                .find(|e| e.same_as(wanted, &self.tolerance))
                .ok_or(KernelError::EdgeNotFound(wanted.start, wanted.end))?;
            let [n0, n1] = edge.normals;
            if n0.dot(&n1).abs() > 1e-9 {
                return Err(KernelError::UnsupportedEdge(
                    "only edges between perpendicular faces can be rounded".to_string(),
                ));
            }
            let length = edge.length();
            if self.tolerance.is_zero(length) {
                return Err(KernelError::UnsupportedEdge("zero-length edge".to_string()));
            }
            rounds.push(EdgeRound {
                start: edge.start,
                along: edge.vector() / length,
                length,
                inward: [-n0, -n1],
                radius,
            });
        }
        debug!(radius, edges = rounds.len(), "rounding edges");
        Ok(CsgSolid::from_node(Node::Rounded {
            child: solid.clone(),
            rounds,
        }))
    }

    fn bounding_box(&self, solid: &CsgSolid) -> Aabb3 {
        solid.bounds
    }
}

fn boolean(op: BooleanOp, a: &CsgSolid, b: &CsgSolid) -> CsgSolid {
    CsgSolid::from_node(Node::Boolean {
        op,
        left: a.clone(),
        right: b.clone(),
    })
}
