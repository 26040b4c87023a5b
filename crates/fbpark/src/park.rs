//! Park documents: named, positioned obstacles stored as TOML or JSON.
//!
//! ```toml
//! name = "backyard"
//!
//! [[obstacle]]
//! name = "entry kicker"
//! type = "kicker"
//! position = [0.0, 0.0, 0.0]
//! height = 30
//!
//! [[obstacle]]
//! name = "floor"
//! type = "base"
//! position = [-20.0, -20.0, -8.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fbpark_kernel::math::Vec3;
use fbpark_kernel::SolidKernel;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::obstacles::{Obstacle, ObstacleError, ObstacleKind};

/// Errors from loading, saving or building a park.
#[derive(Error, Debug)]
pub enum ParkError {
    /// Reading or writing the park file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML text is not a valid park.
    #[error("invalid park TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// The park could not be written as TOML.
    #[error("cannot write park TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The JSON text is not a valid park, or could not be written.
    #[error("park JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported park file extension: {}", .0.display())]
    UnknownFormat(PathBuf),

    /// One obstacle failed to build.
    #[error("obstacle {name:?}: {source}")]
    Obstacle {
        /// Entry name.
        name: String,
        /// Underlying error.
        source: ObstacleError,
    },
}

/// Result type for park operations.
pub type Result<T> = std::result::Result<T, ParkError>;

/// File formats a park can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkFormat {
    /// TOML, the hand-edited format.
    Toml,
    /// JSON.
    Json,
}

impl ParkFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ParkFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ParkFormat::Json),
            _ => Err(ParkError::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// One obstacle placed in the park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkEntry {
    /// Display name.
    pub name: String,
    /// Offset applied to the built solid.
    #[serde(default)]
    pub position: [f64; 3],
    /// Obstacle type and parameters.
    #[serde(flatten)]
    pub obstacle: Obstacle,
}

impl ParkEntry {
    /// Entry at the origin.
    pub fn new(name: impl Into<String>, obstacle: Obstacle) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            obstacle,
        }
    }

    /// Same entry moved to `position`.
    pub fn at(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }
}

/// A whole park.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Park {
    /// Park name.
    #[serde(default)]
    pub name: String,
    /// Obstacles in file order.
    #[serde(default, rename = "obstacle")]
    pub entries: Vec<ParkEntry>,
}

/// A built obstacle.
#[derive(Debug, Clone)]
pub struct BuiltObstacle<S> {
    /// Entry name.
    pub name: String,
    /// Obstacle type.
    pub kind: ObstacleKind,
    /// Finished solid, already moved to its position.
    pub solid: S,
}

impl Park {
    /// Empty park.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Parse TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Parse JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a `.toml` or `.json` park file.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ParkFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| ParkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let park = match format {
            ParkFormat::Toml => Self::from_toml_str(&text)?,
            ParkFormat::Json => Self::from_json(&text)?,
        };
        debug!(path = %path.display(), entries = park.entries.len(), "park loaded");
        Ok(park)
    }

    /// Write the park, choosing the format from the extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = match ParkFormat::from_path(path)? {
            ParkFormat::Toml => self.to_toml_string()?,
            ParkFormat::Json => self.to_json()?,
        };
        fs::write(path, text).map_err(|source| ParkError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Flip brick textures park-wide.
    ///
    /// The new state is the opposite of the first unlocked obstacle's; every
    /// unlocked obstacle gets it. Locked obstacles and the base are left
    /// alone. Returns the new state, or `None` if nothing was eligible.
    pub fn toggle_textures(&mut self) -> Option<bool> {
        let mut new_state = None;
        for entry in &mut self.entries {
            let Some(texture) = entry.obstacle.texture_mut() else {
                continue;
            };
            if texture.lock {
                continue;
            }
            let state = *new_state.get_or_insert(!texture.enabled);
            texture.enabled = state;
        }
        if let Some(state) = new_state {
            info!(enabled = state, "textures toggled");
        }
        new_state
    }

    /// Build every entry and move it into place.
    ///
    /// Stops at the first obstacle that fails.
    pub fn build_all<K: SolidKernel>(&self, kernel: &K) -> Result<Vec<BuiltObstacle<K::Solid>>> {
        let mut built = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let kind = entry.obstacle.kind();
            debug!(name = %entry.name, %kind, "building obstacle");
            let solid = entry
                .obstacle
                .build(kernel)
                .map_err(|source| ParkError::Obstacle {
                    name: entry.name.clone(),
                    source,
                })?;
            let [x, y, z] = entry.position;
            let solid = kernel.translate(&solid, &Vec3::new(x, y, z));
            built.push(BuiltObstacle {
                name: entry.name.clone(),
                kind,
                solid,
            });
        }
        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::{Jersey, Kicker, Steps};
    use crate::params::TextureParams;
    use approx::assert_relative_eq;
    use fbpark_kernel::CsgKernel;

    const SAMPLE: &str = r#"
name = "backyard"

[[obstacle]]
name = "entry kicker"
type = "kicker"
position = [10.0, 0.0, 0.0]
height = 30

[[obstacle]]
name = "barrier"
type = "jersey"

[[obstacle]]
name = "stairs"
type = "steps"
steps = 4

[obstacle.texture]
enabled = false

[[obstacle]]
name = "floor"
type = "base"
"#;

    fn sample() -> Park {
        Park::from_toml_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let park = sample();
        assert_eq!(park.name, "backyard");
        assert_eq!(park.entries.len(), 4);
        let Obstacle::Kicker(kicker) = &park.entries[0].obstacle else {
            panic!("expected a kicker");
        };
        assert_eq!(kicker.height, 30.0);
        assert_eq!(kicker.length, 150.0);
        assert_eq!(park.entries[0].position, [10.0, 0.0, 0.0]);
        let Obstacle::Steps(steps) = &park.entries[2].obstacle else {
            panic!("expected steps");
        };
        assert_eq!(steps.steps, 4);
        assert!(!steps.texture.enabled);
        assert_eq!(park.entries[3].obstacle.kind(), ObstacleKind::Base);
    }

    #[test]
    fn test_toml_and_json_round_trip() {
        let park = sample();
        let again = Park::from_toml_str(&park.to_toml_string().unwrap()).unwrap();
        assert_eq!(again, park);
        let json = Park::from_json(&park.to_json().unwrap()).unwrap();
        assert_eq!(json, park);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Park::from_toml_str(
            r#"
            [[obstacle]]
            name = "bowl"
            type = "bowl"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ParkError::TomlDe(_)));
    }

    #[test]
    fn test_toggle_follows_first_unlocked() {
        let mut park = sample();
        // kicker on, jersey locked off, steps off, base untouched
        assert_eq!(park.toggle_textures(), Some(false));
        let states: Vec<_> = park
            .entries
            .iter()
            .map(|e| e.obstacle.texture().map(|t| t.enabled))
            .collect();
        assert_eq!(states, vec![Some(false), Some(false), Some(false), None]);

        assert_eq!(park.toggle_textures(), Some(true));
        let jersey = park.entries[1].obstacle.texture().unwrap();
        assert!(!jersey.enabled && jersey.lock);
        assert!(park.entries[2].obstacle.texture().unwrap().enabled);
    }

    #[test]
    fn test_toggle_with_nothing_unlocked() {
        let mut park = Park::new("locked");
        park.entries
            .push(ParkEntry::new("j", Obstacle::Jersey(Jersey::default())));
        assert_eq!(park.toggle_textures(), None);
        assert!(!park.entries[0].obstacle.texture().unwrap().enabled);
    }

    #[test]
    fn test_build_all_places_obstacles() {
        let k = CsgKernel::new();
        let mut park = Park::new("test");
        let plain = TextureParams {
            enabled: false,
            ..TextureParams::default()
        };
        park.entries.push(
            ParkEntry::new(
                "k",
                Obstacle::Kicker(Kicker {
                    texture: plain,
                    ..Kicker::default()
                }),
            )
            .at([100.0, 50.0, 0.0]),
        );
        let built = park.build_all(&k).unwrap();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].kind, ObstacleKind::Kicker);
        let bb = k.bounding_box(&built[0].solid);
        assert_relative_eq!(bb.min.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_build_all_names_the_failing_entry() {
        let k = CsgKernel::new();
        let mut park = Park::new("broken");
        park.entries.push(ParkEntry::new(
            "none",
            Obstacle::Steps(Steps {
                steps: 0,
                ..Steps::default()
            }),
        ));
        match park.build_all(&k) {
            Err(ParkError::Obstacle { name, source }) => {
                assert_eq!(name, "none");
                assert_eq!(source, ObstacleError::NoSteps);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ParkFormat::from_path(Path::new("a/park.TOML")).unwrap(),
            ParkFormat::Toml
        );
        assert_eq!(
            ParkFormat::from_path(Path::new("park.json")).unwrap(),
            ParkFormat::Json
        );
        assert!(ParkFormat::from_path(Path::new("park.yaml")).is_err());
    }
}
