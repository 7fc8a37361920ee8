//! Classification of a working box against a node's eight octants.
//!
//! A box inside a node either fits one octant, or straddles the node's split
//! plane on one, two or three axes. Straddling boxes are cut along the split
//! planes so that each overlapped child receives only the part it governs.

use super::node::{octant_index, upper_octant_index};
use crate::types::Box3d;

/// Shape of a box relative to the octants of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanClass {
    /// Fits in a single octant.
    Single,
    X,
    Y,
    Z,
    XY,
    XZ,
    YZ,
    /// Straddles the center on every axis.
    XYZ,
}

impl SpanClass {
    fn from_axes(axes: usize) -> Self {
        match axes {
            0 => SpanClass::Single,
            1 => SpanClass::X,
            2 => SpanClass::Y,
            3 => SpanClass::XY,
            4 => SpanClass::Z,
            5 => SpanClass::XZ,
            6 => SpanClass::YZ,
            _ => SpanClass::XYZ,
        }
    }

    /// Number of octants a box of this class overlaps (1, 2, 4 or 8).
    pub fn octant_count(self) -> usize {
        match self {
            SpanClass::Single => 1,
            SpanClass::X | SpanClass::Y | SpanClass::Z => 2,
            SpanClass::XY | SpanClass::XZ | SpanClass::YZ => 4,
            SpanClass::XYZ => 8,
        }
    }
}

/// Octants touched by a working box inside a node.
///
/// Stores the octant of the box's min corner and of its max corner. Every other
/// corner takes each axis from one of those two, so they are enough to know
/// which corners land in different octants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    low: usize,
    high: usize,
}

impl Span {
    /// Classify `working`, which must lie inside `node`.
    ///
    /// Min-side coordinates on a split plane belong to the upper half and
    /// max-side ones to the lower half, so a box that only touches a plane is
    /// not cut into a zero-thickness sliver. A flat box lying on the plane goes
    /// to the upper half.
    pub fn classify(node: &Box3d, working: &Box3d) -> Self {
        let center = node.center();
        let low = octant_index(center, working.min_point());
        let high = low | upper_octant_index(center, working.max_point());
        Self { low, high }
    }

    /// Classify `working` treating both halves as closed: a coordinate on a
    /// split plane reaches the octants on either side.
    ///
    /// Queries use this so a box touching a target on a split plane still
    /// finds it. Pieces clipped into the far half have zero thickness.
    pub fn classify_closed(node: &Box3d, working: &Box3d) -> Self {
        let center = node.center();
        let low = upper_octant_index(center, working.min_point());
        let high = low | octant_index(center, working.max_point());
        Self { low, high }
    }

    /// Bitmask of the axes on which the box straddles the split plane.
    pub fn axes(&self) -> usize {
        self.low ^ self.high
    }

    pub fn class(&self) -> SpanClass {
        SpanClass::from_axes(self.axes())
    }

    /// Octant containing the given corner of the box (corner bits use the octant layout).
    fn corner_octant(&self, corner: usize) -> usize {
        (self.low & !corner) | (self.high & corner)
    }

    /// Distinct octants overlapped by the box, in ascending order.
    pub fn octants(&self) -> impl Iterator<Item = usize> + use<> {
        let span = *self;
        let axes = self.axes();
        (0..8)
            .filter(move |corner| corner & !axes == 0)
            .map(move |corner| span.corner_octant(corner))
    }

    pub fn contains(&self, octant: usize) -> bool {
        octant & !self.axes() == self.low
    }

    /// Part of `working` that falls inside the child occupying `octant`.
    ///
    /// Uses the child's bound on each straddled axis and the working box's own
    /// bounds elsewhere.
    pub fn clip(&self, working: &Box3d, child: &Box3d, octant: usize) -> Box3d {
        let axes = self.axes();
        let mut clipped = *working;
        for axis in 0..3 {
            let bit = 1 << axis;
            if axes & bit == 0 {
                continue;
            }
            if octant & bit != 0 {
                clipped.min[axis] = child.min[axis];
            } else {
                clipped.max[axis] = child.max[axis];
            }
        }
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::super::node::child_bounds;
    use super::*;

    fn root() -> Box3d {
        Box3d::from_size(100.0, 100.0, 100.0)
    }

    #[test]
    fn single_octant() {
        let span = Span::classify(&root(), &Box3d::from_extents(60.0, 10.0, 70.0, 90.0, 40.0, 80.0));
        assert_eq!(span.class(), SpanClass::Single);
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn exact_octant_is_single() {
        let span = Span::classify(&root(), &Box3d::from_extents(0.0, 0.0, 0.0, 50.0, 50.0, 50.0));
        assert_eq!(span.class(), SpanClass::Single);
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![0]);

        let span = Span::classify(&root(), &Box3d::from_extents(50.0, 50.0, 50.0, 100.0, 100.0, 100.0));
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn every_class_reachable() {
        let cases = [
            (Box3d::from_extents(40.0, 10.0, 10.0, 60.0, 20.0, 20.0), SpanClass::X, vec![0, 1]),
            (Box3d::from_extents(10.0, 40.0, 10.0, 20.0, 60.0, 20.0), SpanClass::Y, vec![0, 2]),
            (Box3d::from_extents(10.0, 10.0, 40.0, 20.0, 20.0, 60.0), SpanClass::Z, vec![0, 4]),
            (Box3d::from_extents(40.0, 40.0, 70.0, 60.0, 60.0, 80.0), SpanClass::XY, vec![4, 5, 6, 7]),
            (Box3d::from_extents(40.0, 70.0, 40.0, 60.0, 80.0, 60.0), SpanClass::XZ, vec![2, 3, 6, 7]),
            (Box3d::from_extents(70.0, 40.0, 40.0, 80.0, 60.0, 60.0), SpanClass::YZ, vec![1, 3, 5, 7]),
            (Box3d::from_extents(25.0, 25.0, 25.0, 75.0, 75.0, 75.0), SpanClass::XYZ, (0..8).collect()),
        ];
        for (working, class, octants) in cases {
            let span = Span::classify(&root(), &working);
            assert_eq!(span.class(), class, "class of {working}");
            assert_eq!(span.class().octant_count(), octants.len());
            assert_eq!(span.octants().collect::<Vec<_>>(), octants, "octants of {working}");
            for o in 0..8 {
                assert_eq!(span.contains(o), octants.contains(&o));
            }
        }
    }

    #[test]
    fn corner_octants_match_point_lookup() {
        let working = Box3d::from_extents(10.0, 40.0, 30.0, 70.0, 45.0, 90.0);
        let span = Span::classify(&root(), &working);
        assert_eq!(span.class(), SpanClass::XZ);
        // min corner (10,40,30) → 0; x-max corner (70,40,30) → 1; z-max corner (10,40,90) → 4
        assert_eq!(span.corner_octant(0), 0);
        assert_eq!(span.corner_octant(1), 1);
        assert_eq!(span.corner_octant(2), 0);
        assert_eq!(span.corner_octant(4), 4);
        assert_eq!(span.corner_octant(7), 5);
    }

    #[test]
    fn touching_split_plane_stays_low() {
        // Max corner exactly on the center plane along x.
        let span = Span::classify(&root(), &Box3d::from_extents(10.0, 10.0, 10.0, 50.0, 20.0, 20.0));
        assert_eq!(span.class(), SpanClass::Single);
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn flat_box_on_split_plane_goes_high() {
        let span = Span::classify(&root(), &Box3d::from_extents(50.0, 10.0, 10.0, 50.0, 20.0, 20.0));
        assert_eq!(span.class(), SpanClass::Single);
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn closed_classification_reaches_both_sides_of_the_plane() {
        // Face on the x plane, from below.
        let span = Span::classify_closed(&root(), &Box3d::from_extents(40.0, 10.0, 10.0, 50.0, 20.0, 20.0));
        assert_eq!(span.class(), SpanClass::X);
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![0, 1]);

        // Face on the x plane, from above.
        let span = Span::classify_closed(&root(), &Box3d::from_extents(50.0, 10.0, 10.0, 60.0, 20.0, 20.0));
        assert_eq!(span.octants().collect::<Vec<_>>(), vec![0, 1]);

        // A point at the center touches every octant.
        let span = Span::classify_closed(&root(), &Box3d::from_extents(50.0, 50.0, 50.0, 50.0, 50.0, 50.0));
        assert_eq!(span.class(), SpanClass::XYZ);

        // Off the planes both rules agree.
        let working = Box3d::from_extents(60.0, 10.0, 70.0, 90.0, 40.0, 80.0);
        assert_eq!(Span::classify_closed(&root(), &working), Span::classify(&root(), &working));
    }

    #[test]
    fn closed_clip_gives_zero_thickness_far_piece() {
        let parent = root();
        let working = Box3d::from_extents(40.0, 10.0, 10.0, 50.0, 20.0, 20.0);
        let span = Span::classify_closed(&parent, &working);

        let lower = span.clip(&working, &child_bounds(&parent, 0), 0);
        let upper = span.clip(&working, &child_bounds(&parent, 1), 1);
        assert_eq!(lower, working);
        assert_eq!(upper, Box3d::from_extents(50.0, 10.0, 10.0, 50.0, 20.0, 20.0));
        assert!(child_bounds(&parent, 1).contains_box(&upper));
    }

    #[test]
    fn clip_pieces_tile_the_working_box() {
        let parent = root();
        let working = Box3d::from_extents(25.0, 30.0, 35.0, 75.0, 80.0, 85.0);
        let span = Span::classify(&parent, &working);
        assert_eq!(span.class(), SpanClass::XYZ);

        let pieces: Vec<Box3d> = span
            .octants()
            .map(|o| span.clip(&working, &child_bounds(&parent, o), o))
            .collect();

        let total: f64 = pieces.iter().map(|p| p.volume()).sum();
        assert!((total - working.volume()).abs() < 1e-9);

        for (o, piece) in span.octants().zip(&pieces) {
            assert!(child_bounds(&parent, o).contains_box(piece), "piece {piece} outside octant {o}");
            assert!(working.contains_box(piece));
        }

        assert_eq!(pieces[0], Box3d::from_extents(25.0, 30.0, 35.0, 50.0, 50.0, 50.0));
        assert_eq!(pieces[7], Box3d::from_extents(50.0, 50.0, 50.0, 75.0, 80.0, 85.0));
    }

    #[test]
    fn clip_keeps_unsplit_axes() {
        let parent = root();
        let working = Box3d::from_extents(10.0, 40.0, 60.0, 20.0, 70.0, 90.0);
        let span = Span::classify(&parent, &working);
        assert_eq!(span.class(), SpanClass::Y);

        let lower = span.clip(&working, &child_bounds(&parent, 4), 4);
        let upper = span.clip(&working, &child_bounds(&parent, 6), 6);
        assert_eq!(lower, Box3d::from_extents(10.0, 40.0, 60.0, 20.0, 50.0, 90.0));
        assert_eq!(upper, Box3d::from_extents(10.0, 50.0, 60.0, 20.0, 70.0, 90.0));
    }
}
