use std::fs;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{OctreeError, Result};
use crate::scene::{self, Scene, SceneTarget};
use crate::spatial::{OctreeStats, SpatialOctree};
use crate::types::Box3d;

/// Hits for one named query box.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub name: String,
    pub bounds: Box3d,
    /// Names of matching scene nodes, sorted.
    pub hits: Vec<String>,
}

/// Summary of a completed run.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub inserted: usize,
    pub queries: Vec<QueryReport>,
    pub stats: OctreeStats,
    #[serde(skip)]
    pub duration: Duration,
}

/// Run orchestrator: load, build, query, report.
pub struct Pipeline;

impl Pipeline {
    /// Run the full load → build → query pipeline.
    pub fn run(config: &RunConfig) -> Result<RunResult> {
        let start = Instant::now();

        info!(scene = %config.scene.display(), "Starting run");

        info!("Stage 1/3: Loading scene");
        let scene = scene::load_scene(&config.scene)?;

        info!("Stage 2/3: Building octree");
        let tree = Self::build(config, &scene)?;
        let stats = tree.stats();
        info!(
            inserted = tree.len(),
            nodes = stats.nodes,
            leaves = stats.leaves,
            max_depth = stats.max_depth,
            target_entries = stats.target_entries,
            "Octree built"
        );

        if config.dump {
            print!("{}", tree.dump(""));
        }

        info!("Stage 3/3: Running queries");
        let queries = Self::query(&tree, &scene)?;
        print_query_summary(&queries);

        let result = RunResult {
            inserted: tree.len(),
            queries,
            stats,
            duration: start.elapsed(),
        };

        if let Some(output) = &config.output {
            info!(output = %output.display(), "Writing report");
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| OctreeError::Output(format!("Failed to serialize report: {e}")))?;
            fs::write(output, json).map_err(|e| {
                OctreeError::Output(format!("Failed to write {}: {e}", output.display()))
            })?;
        }

        info!(
            queries = result.queries.len(),
            elapsed = ?result.duration,
            "Run complete"
        );
        Ok(result)
    }

    /// Insert every scene node. The CLI floor, if given, overrides the scene's.
    pub fn build(config: &RunConfig, scene: &Scene) -> Result<SpatialOctree<SceneTarget>> {
        let mut octree_config = scene.octree;
        if let Some(min_volume) = config.min_volume {
            octree_config.min_subdividable_volume = min_volume;
        }

        let mut tree = SpatialOctree::with_config(scene.bounds, octree_config)?;
        for (target, bounds) in scene.targets() {
            debug!(node = %target, bounds = %bounds, "Inserting scene node");
            let name = target.name.clone();
            tree.insert(target, bounds).map_err(|e| with_node_context(e, &name))?;
        }
        Ok(tree)
    }

    /// Run every scene query against a built tree. Queries only read the tree,
    /// so they run in parallel.
    pub fn query(tree: &SpatialOctree<SceneTarget>, scene: &Scene) -> Result<Vec<QueryReport>> {
        scene
            .queries
            .par_iter()
            .map(|q| {
                let mut hits: Vec<String> = tree
                    .query(&q.bounds)?
                    .into_iter()
                    .map(|t| t.name.to_string())
                    .collect();
                hits.sort();
                debug!(query = %q.name, hits = hits.len(), "Query answered");
                Ok(QueryReport {
                    name: q.name.clone(),
                    bounds: q.bounds,
                    hits,
                })
            })
            .collect()
    }
}

/// Prefix placement errors with the offending scene node.
fn with_node_context(e: OctreeError, name: &str) -> OctreeError {
    match e {
        OctreeError::Validation(msg) => OctreeError::Validation(format!("scene node {name}: {msg}")),
        OctreeError::OutOfBounds(msg) => {
            OctreeError::OutOfBounds(format!("scene node {name}: {msg}"))
        }
        other => other,
    }
}

/// Print one line per query with its matching scene nodes.
fn print_query_summary(queries: &[QueryReport]) {
    println!("=== Queries ===");
    if queries.is_empty() {
        println!("  (none)");
    }
    for q in queries {
        let hits = if q.hits.is_empty() {
            "<none>".to_string()
        } else {
            q.hits.join(", ")
        };
        println!("  {} {}: {}", q.name, q.bounds, hits);
    }
}
