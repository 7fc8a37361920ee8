use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, trace};

use super::node::OctreeNode;
use super::span::Span;
use crate::config::OctreeConfig;
use crate::error::{OctreeError, Result};
use crate::types::Box3d;

/// Shape summary of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OctreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
    /// Target references across all nodes; a spanning target counts once per node.
    pub target_entries: usize,
}

/// Octree over a fixed root box, mapping boxes to caller-supplied target handles.
///
/// `insert` needs `&mut self` and `query` only `&self`. The tree holds no
/// locks; share it across threads behind a `RwLock` if inserts and queries
/// interleave.
#[derive(Debug, Clone)]
pub struct SpatialOctree<T> {
    root: OctreeNode<T>,
    config: OctreeConfig,
    len: usize,
}

impl<T> SpatialOctree<T> {
    /// Tree over `bounds` with the default subdivision floor.
    pub fn new(bounds: Box3d) -> Result<Self> {
        Self::with_config(bounds, OctreeConfig::default())
    }

    /// Tree spanning from the origin to `(width, height, depth)`.
    pub fn with_extents(width: f64, height: f64, depth: f64) -> Result<Self> {
        Self::new(Box3d::from_size(width, height, depth))
    }

    pub fn with_config(bounds: Box3d, config: OctreeConfig) -> Result<Self> {
        bounds.validate()?;
        config.validate()?;
        Ok(Self {
            root: OctreeNode::new(bounds),
            config,
            len: 0,
        })
    }

    pub fn root(&self) -> &OctreeNode<T> {
        &self.root
    }

    pub fn bounds(&self) -> &Box3d {
        &self.root.bounds
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Number of successful inserts.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats::default();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.target_entries += node.targets.len();
            stats.max_depth = stats.max_depth.max(depth);
            match node.children() {
                Some(children) => stack.extend(children.iter().map(|c| (c, depth + 1))),
                None => stats.leaves += 1,
            }
        }
        stats
    }

    /// Reject boxes the traversal cannot place: malformed, or not inside the root.
    fn check_box(&self, bounds: &Box3d) -> Result<()> {
        bounds.validate()?;
        if !self.root.bounds.contains_box(bounds) {
            return Err(OctreeError::OutOfBounds(format!(
                "box {bounds} is not contained in root {}",
                self.root.bounds
            )));
        }
        Ok(())
    }
}

impl<T: Clone + Eq + Hash> SpatialOctree<T> {
    /// File `target` under every node its box resolves to.
    ///
    /// The box is split across octants while descending. A piece stops at the
    /// node whose bounds it equals exactly, or at a leaf too small to subdivide.
    /// Leaves above the volume floor are split on the way down.
    pub fn insert(&mut self, target: T, bounds: Box3d) -> Result<()> {
        self.check_box(&bounds)?;

        let min_volume = self.config.min_subdividable_volume;
        let mut filed = 0usize;
        let mut stack: Vec<(&mut OctreeNode<T>, Box3d)> = vec![(&mut self.root, bounds)];

        while let Some((node, working)) = stack.pop() {
            if node.bounds == working {
                node.targets.push(target.clone());
                filed += 1;
                continue;
            }

            if node.is_leaf() && !node.is_subdividable(min_volume) {
                node.targets.push(target.clone());
                filed += 1;
                continue;
            }

            let span = Span::classify(&node.bounds, &working);
            trace!(
                node = %node.bounds,
                working = %working,
                class = ?span.class(),
                octants = span.class().octant_count(),
                "Descending"
            );

            let children = node.children_or_subdivide();
            for (octant, child) in children.iter_mut().enumerate() {
                if span.contains(octant) {
                    let clipped = span.clip(&working, &child.bounds, octant);
                    stack.push((child, clipped));
                }
            }
        }

        self.len += 1;
        debug!(bounds = %bounds, nodes = filed, "Inserted target");
        Ok(())
    }

    /// Every target filed along the descent of `bounds`, without duplicates.
    ///
    /// Targets stored at any visited node are reported, including ancestors of
    /// where the descent ends. Boxes are closed: a query touching a target's
    /// face reports it, even when the face lies on a split plane. When a piece of the query equals a node's bounds
    /// exactly, that node's whole subtree is reported. Result order is
    /// unspecified.
    pub fn query(&self, bounds: &Box3d) -> Result<Vec<T>> {
        self.check_box(bounds)?;

        let mut seen: HashSet<&T> = HashSet::new();
        let mut found = Vec::new();
        let mut visited = 0usize;
        let mut stack = vec![(&self.root, *bounds)];

        while let Some((node, working)) = stack.pop() {
            visited += 1;
            for target in &node.targets {
                if seen.insert(target) {
                    found.push(target.clone());
                }
            }

            let Some(children) = node.children() else {
                continue;
            };

            if node.bounds == working {
                // The query covers this node, so it covers every descendant too.
                stack.extend(children.iter().map(|child| (child, child.bounds)));
                continue;
            }

            let span = Span::classify_closed(&node.bounds, &working);
            for octant in span.octants() {
                let child = &children[octant];
                stack.push((child, span.clip(&working, &child.bounds, octant)));
            }
        }

        trace!(bounds = %bounds, visited, hits = found.len(), "Query complete");
        Ok(found)
    }
}
