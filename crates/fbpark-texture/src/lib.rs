#![warn(missing_docs)]

//! Brick and tile textures for fbpark obstacles.
//!
//! Texturing is purely subtractive. A [`BrickCourses`] or [`TileGrid`]
//! plans a [`Pattern`] of groove cutters; the applicator builds them
//! through a [`SolidKernel`](fbpark_kernel::SolidKernel), unions them into
//! one compound, and cuts that compound out of the target shape in a
//! single boolean.
//!
//! # Example
//!
//! ```
//! use fbpark_kernel::{CsgKernel, SolidKernel};
//! use fbpark_texture::{apply_texture, BrickCourses, Sides};
//!
//! let kernel = CsgKernel::new();
//! let block = kernel.make_box(150.0, 100.0, 40.0);
//! let courses = BrickCourses {
//!     length: 150.0,
//!     height: 40.0,
//!     depth: 100.0,
//!     brick_length: 20.0,
//!     brick_height: 10.0,
//!     groove_width: 1.2,
//!     sides: Sides::Three,
//! };
//! let textured = apply_texture(&kernel, &block, &courses);
//! assert_eq!(kernel.bounding_box(&textured), kernel.bounding_box(&block));
//! ```

mod apply;
pub mod cutter;
pub mod pattern;

pub use apply::{
    apply_horizontal_tiles, apply_texture, try_apply_horizontal_tiles, try_apply_texture,
};
pub use cutter::{make_diamond_cutter, make_rect_cutter, GrooveProfile, GrooveSpec};
pub use pattern::{
    BrickCourses, CutterPlacement, Face, GrooveRole, Pattern, PatternFrame, Sides, TileGrid,
};

use fbpark_kernel::KernelError;
use thiserror::Error;

/// Errors from applying a texture.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    /// The kernel rejected the boolean cut.
    #[error("groove cut failed: {0}")]
    Cut(#[from] KernelError),
}

/// Result type for texture operations.
pub type Result<T> = std::result::Result<T, TextureError>;
