mod dump;
pub mod node;
pub mod octree;
pub mod span;

pub use node::{NodeState, OctreeNode};
pub use octree::{OctreeStats, SpatialOctree};
pub use span::{Span, SpanClass};
