use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::OctreeConfig;
use crate::error::{OctreeError, Result};
use crate::types::Box3d;

/// Handle for a scene node stored in the octree.
///
/// Identity is the numeric id alone; the name only serves output.
#[derive(Debug, Clone)]
pub struct SceneTarget {
    pub id: u32,
    pub name: Arc<str>,
}

impl PartialEq for SceneTarget {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SceneTarget {}

impl Hash for SceneTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SceneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A named box, used for both scene nodes and queries.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedBox {
    pub name: String,
    pub bounds: Box3d,
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    bounds: Option<Box3d>,
    extents: Option<[f64; 3]>,
    #[serde(default)]
    octree: OctreeConfig,
    #[serde(default)]
    nodes: Vec<NamedBox>,
    #[serde(default)]
    queries: Vec<NamedBox>,
}

/// A loaded and validated scene description.
#[derive(Debug, Clone)]
pub struct Scene {
    pub bounds: Box3d,
    pub octree: OctreeConfig,
    pub nodes: Vec<NamedBox>,
    pub queries: Vec<NamedBox>,
}

impl Scene {
    /// Parse a scene description from a JSON string.
    ///
    /// World bounds come from `bounds`, else from `extents` anchored at the
    /// origin, else from the union of every node and query box.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SceneFile = serde_json::from_str(json)?;

        if file.bounds.is_some() && file.extents.is_some() {
            return Err(OctreeError::Input(
                "scene must give either `bounds` or `extents`, not both".into(),
            ));
        }

        let bounds = match (file.bounds, file.extents) {
            (Some(bounds), _) => bounds,
            (None, Some([w, h, d])) => Box3d::from_size(w, h, d),
            (None, None) => file
                .nodes
                .iter()
                .chain(&file.queries)
                .map(|n| n.bounds)
                .reduce(|acc, b| acc.merge(&b))
                .ok_or_else(|| {
                    OctreeError::Input("scene has no bounds and no boxes to derive them from".into())
                })?,
        };
        bounds.validate()?;

        let mut names = HashSet::new();
        for node in &file.nodes {
            if node.name.is_empty() {
                return Err(OctreeError::Input("scene node with empty name".into()));
            }
            if !names.insert(node.name.as_str()) {
                return Err(OctreeError::Input(format!(
                    "duplicate scene node name: {}",
                    node.name
                )));
            }
        }

        debug!(
            nodes = file.nodes.len(),
            queries = file.queries.len(),
            bounds = %bounds,
            "Parsed scene"
        );

        Ok(Scene {
            bounds,
            octree: file.octree,
            nodes: file.nodes,
            queries: file.queries,
        })
    }

    /// Target handles for every scene node, ids in file order.
    pub fn targets(&self) -> impl Iterator<Item = (SceneTarget, Box3d)> + '_ {
        self.nodes.iter().zip(0u32..).map(|(node, id)| {
            (
                SceneTarget {
                    id,
                    name: Arc::from(node.name.as_str()),
                },
                node.bounds,
            )
        })
    }
}

/// Load a scene description from disk.
pub fn load_scene(path: &Path) -> Result<Scene> {
    if !path.exists() {
        return Err(OctreeError::Input(format!(
            "Scene file not found: {}",
            path.display()
        )));
    }
    let json = fs::read_to_string(path)?;
    let scene = Scene::from_json(&json)?;
    info!(
        path = %path.display(),
        nodes = scene.nodes.len(),
        queries = scene.queries.len(),
        "Loaded scene"
    );
    Ok(scene)
}
