use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{OctreeError, Result};

/// A single point in 3-D space.
pub type Coordinate3 = DVec3;

/// Axis-aligned bounding box in 3-D.
///
/// `min` holds `(x1, y1, z1)` and `max` holds `(x2, y2, z2)`. Equality is
/// exact on all six scalars, which is what the octree uses to decide that a
/// working box has reached a node's own region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3d {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Box3d {
    pub const fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Build a box from its six scalar bounds.
    pub const fn from_extents(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Self {
            min: [x1, y1, z1],
            max: [x2, y2, z2],
        }
    }

    /// Box anchored at the origin with the given width, height and depth.
    pub const fn from_size(width: f64, height: f64, depth: f64) -> Self {
        Self {
            min: [0.0, 0.0, 0.0],
            max: [width, height, depth],
        }
    }

    pub fn min_point(&self) -> Coordinate3 {
        DVec3::from_array(self.min)
    }

    pub fn max_point(&self) -> Coordinate3 {
        DVec3::from_array(self.max)
    }

    /// Centre point of the box.
    pub fn center(&self) -> Coordinate3 {
        // Halve before adding so extreme finite bounds do not overflow.
        self.min_point() * 0.5 + self.max_point() * 0.5
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Coordinate3 {
        self.max_point() - self.min_point()
    }

    pub fn volume(&self) -> f64 {
        self.size().element_product()
    }

    /// Whether a point lies inside (or on the boundary of) the box.
    pub fn contains_point(&self, p: Coordinate3) -> bool {
        p.cmpge(self.min_point()).all() && p.cmple(self.max_point()).all()
    }

    /// Whether `other` lies entirely inside this box (boundaries included).
    pub fn contains_box(&self, other: &Box3d) -> bool {
        self.contains_point(other.min_point()) && self.contains_point(other.max_point())
    }

    /// Whether the two boxes share at least one point.
    pub fn intersects(&self, other: &Box3d) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    /// The overlapping region of the two boxes, if any.
    pub fn intersection(&self, other: &Box3d) -> Option<Box3d> {
        if !self.intersects(other) {
            return None;
        }
        Some(Box3d {
            min: self.min_point().max(other.min_point()).to_array(),
            max: self.max_point().min(other.max_point()).to_array(),
        })
    }

    /// Return the smallest box that contains both `self` and `other`.
    pub fn merge(&self, other: &Box3d) -> Box3d {
        Box3d {
            min: self.min_point().min(other.min_point()).to_array(),
            max: self.max_point().max(other.max_point()).to_array(),
        }
    }

    /// Reject boxes with non-finite bounds or a min corner past the max corner.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_point().is_finite() && self.max_point().is_finite()) {
            return Err(OctreeError::Validation(format!(
                "box {self} has non-finite bounds"
            )));
        }
        const AXES: [&str; 3] = ["x", "y", "z"];
        for (axis, name) in AXES.iter().enumerate() {
            if self.min[axis] > self.max[axis] {
                return Err(OctreeError::Validation(format!(
                    "box {self} has {name}1 > {name}2"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Box3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}) -> ({}, {}, {})",
            self.min[0], self.min[1], self.min[2], self.max[0], self.max[1], self.max[2]
        )
    }
}
