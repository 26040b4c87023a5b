#![warn(missing_docs)]

//! Parametric fingerboard skatepark obstacles.
//!
//! Every obstacle is a parameter struct with sensible defaults and a
//! `build` method that drives a [`SolidKernel`](fbpark_kernel::SolidKernel).
//! Brick-textured obstacles share [`TextureParams`]; the [`Base`] plate
//! carries a tile grid instead. A [`Park`] groups named, positioned
//! obstacles and reads and writes them as TOML or JSON.
//!
//! # Example
//!
//! ```
//! use fbpark::{Obstacle, ObstacleKind};
//! use fbpark_kernel::{CsgKernel, SolidKernel};
//!
//! let kernel = CsgKernel::new();
//! let kicker = Obstacle::defaults(ObstacleKind::Kicker);
//! let solid = kicker.build(&kernel).unwrap();
//! assert_eq!(kernel.bounding_box(&solid).max.z, 40.0);
//! ```

pub mod obstacles;
pub mod params;
pub mod park;

pub use fbpark_kernel as kernel;
pub use fbpark_texture as texture;

pub use obstacles::{
    Base, Coping, CornerFillets, EdgeFillets, Hubba, Jersey, JointParams, Kicker, Ledge,
    Obstacle, ObstacleError, ObstacleKind, QuarterPipe, RailHoles, Steps, TileParams, WoodSlot,
};
pub use params::{SlabParams, TextureParams};
pub use park::{BuiltObstacle, Park, ParkEntry, ParkError, ParkFormat};
