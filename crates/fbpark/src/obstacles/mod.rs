//! Obstacle builders.
//!
//! Each obstacle is a plain parameter struct with defaults and a `build`
//! method that drives a [`SolidKernel`]. [`Obstacle`] wraps them all as a
//! `type`-tagged enum for park documents.

mod base;
mod hubba;
mod jersey;
mod kicker;
mod ledge;
mod quarter_pipe;
mod steps;

pub use base::{Base, CornerFillets, EdgeFillets, TileParams};
pub use hubba::Hubba;
pub use jersey::{Jersey, JointParams};
pub use kicker::Kicker;
pub use ledge::Ledge;
pub use quarter_pipe::{Coping, QuarterPipe, WoodSlot};
pub use steps::{RailHoles, Steps};

use std::fmt;
use std::str::FromStr;

use fbpark_kernel::{KernelError, SolidKernel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::TextureParams;

/// Errors from building an obstacle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObstacleError {
    /// A structural kernel operation failed.
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    /// A staircase was asked for with no steps.
    #[error("steps need at least one step")]
    NoSteps,

    /// Parameters describe impossible geometry.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for obstacle builders.
pub type Result<T> = std::result::Result<T, ObstacleError>;

// =============================================================================
// Kinds
// =============================================================================

/// The obstacle types, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Wedge ramp.
    Kicker,
    /// Rectangular grind block.
    Ledge,
    /// Ledge that slopes down alongside a stair set.
    Hubba,
    /// Stair set.
    Steps,
    /// Concrete road barrier.
    Jersey,
    /// Curved transition with a platform deck.
    QuarterPipe,
    /// Filleted floor plate with tiles.
    Base,
}

impl ObstacleKind {
    /// Every kind.
    pub const ALL: [ObstacleKind; 7] = [
        ObstacleKind::Kicker,
        ObstacleKind::Ledge,
        ObstacleKind::Hubba,
        ObstacleKind::Steps,
        ObstacleKind::Jersey,
        ObstacleKind::QuarterPipe,
        ObstacleKind::Base,
    ];

    /// The `type` tag used in park files.
    pub fn name(self) -> &'static str {
        match self {
            ObstacleKind::Kicker => "kicker",
            ObstacleKind::Ledge => "ledge",
            ObstacleKind::Hubba => "hubba",
            ObstacleKind::Steps => "steps",
            ObstacleKind::Jersey => "jersey",
            ObstacleKind::QuarterPipe => "quarter_pipe",
            ObstacleKind::Base => "base",
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObstacleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ObstacleKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| format!("unknown obstacle type: {s}"))
    }
}

// =============================================================================
// Obstacle
// =============================================================================

/// Any obstacle, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Obstacle {
    /// Wedge ramp.
    Kicker(Kicker),
    /// Rectangular grind block.
    Ledge(Ledge),
    /// Sloped ledge.
    Hubba(Hubba),
    /// Stair set.
    Steps(Steps),
    /// Road barrier.
    Jersey(Jersey),
    /// Quarter-pipe.
    QuarterPipe(QuarterPipe),
    /// Floor plate.
    Base(Base),
}

impl Obstacle {
    /// Default parameters for `kind`.
    pub fn defaults(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Kicker => Obstacle::Kicker(Kicker::default()),
            ObstacleKind::Ledge => Obstacle::Ledge(Ledge::default()),
            ObstacleKind::Hubba => Obstacle::Hubba(Hubba::default()),
            ObstacleKind::Steps => Obstacle::Steps(Steps::default()),
            ObstacleKind::Jersey => Obstacle::Jersey(Jersey::default()),
            ObstacleKind::QuarterPipe => Obstacle::QuarterPipe(QuarterPipe::default()),
            ObstacleKind::Base => Obstacle::Base(Base::default()),
        }
    }

    /// Which kind this is.
    pub fn kind(&self) -> ObstacleKind {
        match self {
            Obstacle::Kicker(_) => ObstacleKind::Kicker,
            Obstacle::Ledge(_) => ObstacleKind::Ledge,
            Obstacle::Hubba(_) => ObstacleKind::Hubba,
            Obstacle::Steps(_) => ObstacleKind::Steps,
            Obstacle::Jersey(_) => ObstacleKind::Jersey,
            Obstacle::QuarterPipe(_) => ObstacleKind::QuarterPipe,
            Obstacle::Base(_) => ObstacleKind::Base,
        }
    }

    /// Brick texture settings; `None` for the tiled base.
    pub fn texture(&self) -> Option<&TextureParams> {
        match self {
            Obstacle::Kicker(o) => Some(&o.texture),
            Obstacle::Ledge(o) => Some(&o.texture),
            Obstacle::Hubba(o) => Some(&o.texture),
            Obstacle::Steps(o) => Some(&o.texture),
            Obstacle::Jersey(o) => Some(&o.texture),
            Obstacle::QuarterPipe(o) => Some(&o.texture),
            Obstacle::Base(_) => None,
        }
    }

    /// Mutable brick texture settings; `None` for the tiled base.
    pub fn texture_mut(&mut self) -> Option<&mut TextureParams> {
        match self {
            Obstacle::Kicker(o) => Some(&mut o.texture),
            Obstacle::Ledge(o) => Some(&mut o.texture),
            Obstacle::Hubba(o) => Some(&mut o.texture),
            Obstacle::Steps(o) => Some(&mut o.texture),
            Obstacle::Jersey(o) => Some(&mut o.texture),
            Obstacle::QuarterPipe(o) => Some(&mut o.texture),
            Obstacle::Base(_) => None,
        }
    }

    /// Build the finished solid.
    pub fn build<K: SolidKernel>(&self, kernel: &K) -> Result<K::Solid> {
        match self {
            Obstacle::Kicker(o) => o.build(kernel),
            Obstacle::Ledge(o) => o.build(kernel),
            Obstacle::Hubba(o) => o.build(kernel),
            Obstacle::Steps(o) => o.build(kernel),
            Obstacle::Jersey(o) => o.build(kernel),
            Obstacle::QuarterPipe(o) => o.build(kernel),
            Obstacle::Base(o) => o.build(kernel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbpark_kernel::CsgKernel;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ObstacleKind::ALL {
            assert_eq!(kind.name().parse::<ObstacleKind>().unwrap(), kind);
            assert_eq!(Obstacle::defaults(kind).kind(), kind);
        }
        assert_eq!(
            "Quarter-Pipe".parse::<ObstacleKind>().unwrap(),
            ObstacleKind::QuarterPipe
        );
        assert!("halfpipe".parse::<ObstacleKind>().is_err());
    }

    #[test]
    fn test_tag_matches_kind_name() {
        for kind in ObstacleKind::ALL {
            let json = serde_json::to_value(Obstacle::defaults(kind)).unwrap();
            assert_eq!(json["type"], kind.name());
        }
    }

    #[test]
    fn test_only_base_lacks_brick_texture() {
        for kind in ObstacleKind::ALL {
            let mut o = Obstacle::defaults(kind);
            assert_eq!(o.texture().is_none(), kind == ObstacleKind::Base);
            assert_eq!(o.texture_mut().is_none(), kind == ObstacleKind::Base);
        }
    }

    #[test]
    fn test_every_default_builds() {
        let k = CsgKernel::new();
        for kind in ObstacleKind::ALL {
            let solid = Obstacle::defaults(kind).build(&k).unwrap();
            assert!(!solid.is_empty(), "{kind} built nothing");
        }
    }

    #[test]
    fn test_sparse_toml_fills_defaults() {
        let o: Obstacle = toml::from_str(
            r#"
            type = "ledge"
            length = 200
            [slab]
            enabled = false
            "#,
        )
        .unwrap();
        let Obstacle::Ledge(ledge) = o else {
            panic!("expected a ledge");
        };
        assert_eq!(ledge.length, 200.0);
        assert_eq!(ledge.height, 35.0);
        assert!(!ledge.slab.enabled);
        assert!(ledge.texture.enabled);
    }
}
