pub mod bounds;

pub use bounds::{Box3d, Coordinate3};
