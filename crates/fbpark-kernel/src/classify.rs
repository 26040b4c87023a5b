//! Point-membership tests for the reference kernel.
//!
//! Every primitive is classified in its own local frame; the CSG tree maps
//! world points into that frame before calling in here.

use fbpark_kernel_math::{Point3, Transform, Vec3};

/// A primitive in its local frame.
#[derive(Debug, Clone)]
pub(crate) enum Primitive {
    /// `[0, size.x] × [0, size.y] × [0, size.z]`.
    Cuboid { size: Vec3 },
    /// Disk of `radius` about the local Z axis, `z ∈ [0, height]`.
    Cylinder { radius: f64, height: f64 },
    /// Polygon in the local XY plane swept over `z ∈ [0, 1]`.
    Prism { polygon: Vec<[f64; 2]> },
}

impl Primitive {
    pub(crate) fn contains_local(&self, p: &Point3) -> bool {
        match self {
            Primitive::Cuboid { size } => (0..3).all(|i| p[i] >= 0.0 && p[i] <= size[i]),
            Primitive::Cylinder { radius, height } => {
                p.z >= 0.0 && p.z <= *height && p.x * p.x + p.y * p.y <= radius * radius
            }
            Primitive::Prism { polygon } => {
                p.z >= 0.0 && p.z <= 1.0 && point_in_polygon(p.x, p.y, polygon)
            }
        }
    }

    /// Points whose world image bounds the primitive.
    ///
    /// Exact for cuboids and prisms; the cylinder uses its local box.
    pub(crate) fn hull_points(&self) -> Vec<Point3> {
        match self {
            Primitive::Cuboid { size } => {
                let (x, y, z) = (size.x, size.y, size.z);
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(x, 0.0, 0.0),
                    Point3::new(x, y, 0.0),
                    Point3::new(0.0, y, 0.0),
                    Point3::new(0.0, 0.0, z),
                    Point3::new(x, 0.0, z),
                    Point3::new(x, y, z),
                    Point3::new(0.0, y, z),
                ]
            }
            Primitive::Cylinder { radius: r, height: h } => vec![
                Point3::new(-r, -r, 0.0),
                Point3::new(*r, -r, 0.0),
                Point3::new(*r, *r, 0.0),
                Point3::new(-r, *r, 0.0),
                Point3::new(-r, -r, *h),
                Point3::new(*r, -r, *h),
                Point3::new(*r, *r, *h),
                Point3::new(-r, *r, *h),
            ],
            Primitive::Prism { polygon } => polygon
                .iter()
                .flat_map(|&[x, y]| [Point3::new(x, y, 0.0), Point3::new(x, y, 1.0)])
                .collect(),
        }
    }

    /// Bottom outline and sweep vector, for primitives bounded by planar faces only.
    pub(crate) fn sweep_outline(&self) -> Option<(Vec<Point3>, Vec3)> {
        match self {
            Primitive::Cuboid { size } => Some((
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(size.x, 0.0, 0.0),
                    Point3::new(size.x, size.y, 0.0),
                    Point3::new(0.0, size.y, 0.0),
                ],
                Vec3::new(0.0, 0.0, size.z),
            )),
            Primitive::Cylinder { .. } => None,
            Primitive::Prism { polygon } => Some((
                polygon.iter().map(|&[x, y]| Point3::new(x, y, 0.0)).collect(),
                Vec3::z(),
            )),
        }
    }
}

/// Even-odd ray casting test.
pub(crate) fn point_in_polygon(x: f64, y: f64, polygon: &[[f64; 2]]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Material removed by rounding one convex edge between perpendicular faces.
#[derive(Debug, Clone)]
pub(crate) struct EdgeRound {
    pub start: Point3,
    /// Unit vector along the edge.
    pub along: Vec3,
    pub length: f64,
    /// Unit vectors pointing into the material, one per adjacent face.
    pub inward: [Vec3; 2],
    pub radius: f64,
}

impl EdgeRound {
    /// True if `p` is in the sliver between the sharp edge and the round.
    pub(crate) fn removes(&self, p: &Point3) -> bool {
        let d = p - self.start;
        let a = d.dot(&self.along);
        if a < 0.0 || a > self.length {
            return false;
        }
        let s = d.dot(&self.inward[0]);
        let t = d.dot(&self.inward[1]);
        let r = self.radius;
        if s < 0.0 || t < 0.0 || s >= r || t >= r {
            return false;
        }
        (s - r).powi(2) + (t - r).powi(2) > r * r
    }

    pub(crate) fn transformed(&self, transform: &Transform) -> Self {
        Self {
            start: transform.apply_point(&self.start),
            along: transform.apply_vec(&self.along),
            length: self.length,
            inward: [
                transform.apply_vec(&self.inward[0]),
                transform.apply_vec(&self.inward[1]),
            ],
            radius: self.radius,
        }
    }
}
