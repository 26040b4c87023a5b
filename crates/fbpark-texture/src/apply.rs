//! Subtracting planned patterns from a solid.

use fbpark_kernel::SolidKernel;
use tracing::{debug, warn};

use crate::pattern::{BrickCourses, Pattern, TileGrid};
use crate::{Result, TextureError};

fn cut_pattern<K: SolidKernel>(
    kernel: &K,
    shape: &K::Solid,
    pattern: &Pattern,
) -> Result<K::Solid> {
    match pattern.instantiate(kernel) {
        Some(tool) => kernel.cut(shape, &tool).map_err(TextureError::Cut),
        None => Ok(shape.clone()),
    }
}

/// Cut brick courses into the vertical faces of `shape`.
///
/// `shape` is assumed to fill `[0, length] × [0, depth] × [0, height]`.
/// An empty pattern returns `shape` unchanged.
pub fn try_apply_texture<K: SolidKernel>(
    kernel: &K,
    shape: &K::Solid,
    courses: &BrickCourses,
) -> Result<K::Solid> {
    let pattern = courses.plan();
    debug!(
        cutters = pattern.len(),
        rows = courses.rows(),
        sides = ?courses.sides,
        "brick courses planned"
    );
    cut_pattern(kernel, shape, &pattern)
}

/// Like [`try_apply_texture`], but a failed cut logs a warning and returns
/// the untextured shape.
pub fn apply_texture<K: SolidKernel>(
    kernel: &K,
    shape: &K::Solid,
    courses: &BrickCourses,
) -> K::Solid {
    try_apply_texture(kernel, shape, courses).unwrap_or_else(|err| {
        warn!(%err, "brick texture skipped");
        shape.clone()
    })
}

/// Cut a tile grid into the top face of `shape`.
///
/// The grid sits on the top of the shape's bounding box. An empty shape or
/// empty pattern returns `shape` unchanged.
pub fn try_apply_horizontal_tiles<K: SolidKernel>(
    kernel: &K,
    shape: &K::Solid,
    grid: &TileGrid,
) -> Result<K::Solid> {
    let bounds = kernel.bounding_box(shape);
    if bounds.is_empty() {
        return Ok(shape.clone());
    }
    let pattern = grid.plan(bounds.max.z);
    debug!(
        cutters = pattern.len(),
        rotated = grid.rotated,
        z_top = bounds.max.z,
        "tile grid planned"
    );
    cut_pattern(kernel, shape, &pattern)
}

/// Like [`try_apply_horizontal_tiles`], but a failed cut logs a warning and
/// returns the untextured shape.
pub fn apply_horizontal_tiles<K: SolidKernel>(
    kernel: &K,
    shape: &K::Solid,
    grid: &TileGrid,
) -> K::Solid {
    try_apply_horizontal_tiles(kernel, shape, grid).unwrap_or_else(|err| {
        warn!(%err, "tile texture skipped");
        shape.clone()
    })
}
