use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{OctreeError, Result};

/// Octree subdivision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Nodes whose volume falls below this value are never split; targets
    /// reaching them are filed there instead.
    pub min_subdividable_volume: f64,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            min_subdividable_volume: 1.0,
        }
    }
}

impl OctreeConfig {
    /// The floor must be positive, otherwise a degenerate box would split forever.
    pub fn validate(&self) -> Result<()> {
        let v = self.min_subdividable_volume;
        if !v.is_finite() || v <= 0.0 {
            return Err(OctreeError::Validation(format!(
                "min_subdividable_volume must be a finite value > 0, got {v}"
            )));
        }
        Ok(())
    }
}

/// Fully resolved run configuration (constructed from CLI args).
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub scene: PathBuf,
    pub output: Option<PathBuf>,
    pub min_volume: Option<f64>,
    pub dump: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "scene-octree",
    about = "Build an octree over a scene description and run box queries",
    version
)]
pub struct CliArgs {
    /// Scene description (JSON)
    #[arg(short = 's', long)]
    pub scene: PathBuf,

    /// Write a JSON report of query results to this file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Minimum node volume that may still be subdivided (overrides the scene)
    #[arg(long)]
    pub min_volume: Option<f64>,

    /// Print the indented tree dump after building
    #[arg(long)]
    pub dump: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count for queries (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Emit log lines as JSON objects
    #[arg(long)]
    pub log_json: bool,
}

impl From<CliArgs> for RunConfig {
    fn from(args: CliArgs) -> Self {
        RunConfig {
            scene: args.scene,
            output: args.output,
            min_volume: args.min_volume,
            dump: args.dump,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}
