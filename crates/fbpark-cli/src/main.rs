//! fbpark CLI - build and edit fingerboard park files
//!
//! Park files are TOML or JSON; see `fbpark::park` for the layout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fbpark::kernel::{CsgKernel, CsgSolid, SolidKernel};
use fbpark::{BuiltObstacle, Obstacle, ObstacleKind, Park};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sample grid used for volume estimates when none is given.
const DEFAULT_RESOLUTION: usize = 48;

#[derive(Parser)]
#[command(name = "fbpark")]
#[command(about = "Parametric fingerboard skatepark obstacles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every obstacle in a park and report its size
    Build {
        /// Park file (.toml or .json)
        park: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Samples per axis for the volume estimate
        #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
        resolution: usize,
    },
    /// Print the default parameters of an obstacle type as TOML
    Defaults {
        /// Obstacle type (kicker, ledge, hubba, steps, jersey, quarter_pipe, base)
        kind: ObstacleKind,
    },
    /// Flip brick textures on every unlocked obstacle
    Toggle {
        /// Park file (.toml or .json)
        park: PathBuf,
        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            park,
            json,
            resolution,
        } => build_park(&park, json, resolution)?,
        Commands::Defaults { kind } => print_defaults(kind)?,
        Commands::Toggle { park, output } => toggle_park(&park, output.as_deref())?,
    }

    Ok(())
}

/// One line of the build report.
#[derive(Debug, Serialize)]
struct ObstacleReport {
    name: String,
    kind: ObstacleKind,
    min: [f64; 3],
    max: [f64; 3],
    volume: f64,
}

/// Whole build report.
#[derive(Debug, Serialize)]
struct ParkReport {
    name: String,
    obstacles: Vec<ObstacleReport>,
}

fn report(
    kernel: &CsgKernel,
    name: &str,
    built: &[BuiltObstacle<CsgSolid>],
    resolution: usize,
) -> ParkReport {
    let obstacles = built
        .iter()
        .map(|b| {
            let bb = kernel.bounding_box(&b.solid);
            ObstacleReport {
                name: b.name.clone(),
                kind: b.kind,
                min: [bb.min.x, bb.min.y, bb.min.z],
                max: [bb.max.x, bb.max.y, bb.max.z],
                volume: kernel.estimate_volume(&b.solid, resolution),
            }
        })
        .collect();
    ParkReport {
        name: name.to_string(),
        obstacles,
    }
}

fn build_park(path: &Path, json: bool, resolution: usize) -> Result<()> {
    let park =
        Park::load(path).with_context(|| format!("failed to load park {}", path.display()))?;
    let kernel = CsgKernel::new();
    let built = park
        .build_all(&kernel)
        .with_context(|| format!("failed to build park {}", path.display()))?;
    info!(obstacles = built.len(), resolution, "park built");

    let report = report(&kernel, &park.name, &built, resolution.max(1));
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let title = if report.name.is_empty() {
        "unnamed"
    } else {
        report.name.as_str()
    };
    println!("park: {} ({} obstacles)", title, report.obstacles.len());
    for (i, o) in report.obstacles.iter().enumerate() {
        println!("  {}: {} [{}]", i + 1, o.name, o.kind);
        println!(
            "     bbox: ({:.1}, {:.1}, {:.1}) .. ({:.1}, {:.1}, {:.1})",
            o.min[0], o.min[1], o.min[2], o.max[0], o.max[1], o.max[2]
        );
        println!("     volume: ~{:.0} mm^3", o.volume);
    }
    Ok(())
}

fn print_defaults(kind: ObstacleKind) -> Result<()> {
    let text = toml::to_string(&Obstacle::defaults(kind))
        .with_context(|| format!("failed to write defaults for {kind}"))?;
    print!("{text}");
    Ok(())
}

fn toggle_park(path: &Path, output: Option<&Path>) -> Result<()> {
    let mut park =
        Park::load(path).with_context(|| format!("failed to load park {}", path.display()))?;
    let Some(enabled) = park.toggle_textures() else {
        println!("no unlocked obstacles; nothing changed");
        return Ok(());
    };

    let target = output.unwrap_or(path);
    park.save(target)
        .with_context(|| format!("failed to write park {}", target.display()))?;
    let state = if enabled { "on" } else { "off" };
    println!("textures {state}: {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fbpark::ParkEntry;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["fbpark", "defaults", "quarter-pipe"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Defaults {
                kind: ObstacleKind::QuarterPipe
            }
        ));

        let cli = Cli::try_parse_from(["fbpark", "build", "park.toml", "--json"]).unwrap();
        match cli.command {
            Commands::Build {
                json, resolution, ..
            } => {
                assert!(json);
                assert_eq!(resolution, DEFAULT_RESOLUTION);
            }
            _ => panic!("expected build"),
        }

        assert!(Cli::try_parse_from(["fbpark", "defaults", "bowl"]).is_err());
    }

    #[test]
    fn test_report_uses_placed_bounds() {
        let kernel = CsgKernel::new();
        let mut park = Park::new("r");
        park.entries.push(
            ParkEntry::new("floor", Obstacle::defaults(ObstacleKind::Base)).at([0.0, 0.0, -8.0]),
        );
        let built = park.build_all(&kernel).unwrap();
        let report = report(&kernel, &park.name, &built, 16);
        assert_eq!(report.obstacles.len(), 1);
        let floor = &report.obstacles[0];
        assert_eq!(floor.kind, ObstacleKind::Base);
        assert_relative_eq!(floor.min[2], -8.0, epsilon = 1e-9);
        assert_relative_eq!(floor.max[0], 200.0, epsilon = 1e-9);
        assert!(floor.volume > 0.0);
    }

    #[test]
    fn test_defaults_are_valid_toml() {
        let obstacle = Obstacle::defaults(ObstacleKind::Steps);
        let text = toml::to_string(&obstacle).unwrap();
        assert!(text.contains("type = \"steps\""));
        let back: Obstacle = toml::from_str(&text).unwrap();
        assert_eq!(back, obstacle);
    }
}
