use std::array;

use tracing::trace;

use crate::types::{Box3d, Coordinate3};

/// Lifecycle state of a node. `Subdivided` is terminal: children are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Empty,
    Occupied,
    Subdivided,
}

/// A node in the octree spatial hierarchy.
///
/// Owns either no children or exactly eight, created together the first time
/// an insert needs to descend below this node.
#[derive(Debug, Clone)]
pub struct OctreeNode<T> {
    pub(crate) bounds: Box3d,
    pub(crate) children: Option<Box<[OctreeNode<T>; 8]>>,
    pub(crate) targets: Vec<T>,
}

impl<T> OctreeNode<T> {
    pub(crate) fn new(bounds: Box3d) -> Self {
        Self {
            bounds,
            children: None,
            targets: Vec::new(),
        }
    }

    /// The region this node governs.
    pub fn bounds(&self) -> &Box3d {
        &self.bounds
    }

    /// The eight octants, indexed by [`octant_index`] layout, if subdivided.
    pub fn children(&self) -> Option<&[OctreeNode<T>; 8]> {
        self.children.as_deref()
    }

    /// Targets filed at this node, in insertion order.
    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// Whether this node is a leaf (no children).
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn state(&self) -> NodeState {
        match (&self.children, self.targets.is_empty()) {
            (Some(_), _) => NodeState::Subdivided,
            (None, true) => NodeState::Empty,
            (None, false) => NodeState::Occupied,
        }
    }

    /// Whether the node is big enough to be split into octants.
    ///
    /// A node whose center coincides with a face on every axis cannot be split
    /// into anything smaller, whatever its volume.
    pub fn is_subdividable(&self, min_volume: f64) -> bool {
        self.bounds.volume() >= min_volume && self.splits()
    }

    /// Whether halving shrinks the node on at least one axis.
    fn splits(&self) -> bool {
        let center = self.bounds.center();
        (self.bounds.min_point().cmplt(center) & center.cmplt(self.bounds.max_point())).any()
    }

    /// Count total nodes in the subtree (including self).
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(|c| c.node_count()).sum::<usize>())
            .unwrap_or(0)
    }

    /// The child array, generating the eight octants on first use.
    pub(crate) fn children_or_subdivide(&mut self) -> &mut [OctreeNode<T>; 8] {
        let bounds = self.bounds;
        self.children.get_or_insert_with(|| {
            trace!(bounds = %bounds, "Subdividing octree node");
            Box::new(array::from_fn(|octant| {
                OctreeNode::new(child_bounds(&bounds, octant))
            }))
        })
    }
}

/// Compute the octant index (0..7) for a point relative to the center of a bounding box.
///
/// Octant layout (bit pattern: z_hi | y_hi | x_hi):
///   0 = (lo, lo, lo), 1 = (hi, lo, lo), 2 = (lo, hi, lo), 3 = (hi, hi, lo)
///   4 = (lo, lo, hi), 5 = (hi, lo, hi), 6 = (lo, hi, hi), 7 = (hi, hi, hi)
///
/// A coordinate equal to the center goes to the upper half. Use this for the
/// min corner of a box.
pub(crate) fn octant_index(center: Coordinate3, point: Coordinate3) -> usize {
    point.cmpge(center).bitmask() as usize
}

/// Same layout as [`octant_index`], but a coordinate equal to the center stays
/// in the lower half. Use this for the max corner of a box.
pub(crate) fn upper_octant_index(center: Coordinate3, point: Coordinate3) -> usize {
    point.cmpgt(center).bitmask() as usize
}

/// Compute the child bounding box for a given octant index.
pub(crate) fn child_bounds(parent: &Box3d, octant: usize) -> Box3d {
    let c = parent.center().to_array();
    let mut min = parent.min;
    let mut max = parent.max;
    for axis in 0..3 {
        if octant & (1 << axis) != 0 {
            min[axis] = c[axis];
        } else {
            max[axis] = c[axis];
        }
    }
    Box3d { min, max }
}
