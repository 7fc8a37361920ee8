pub mod config;
pub mod error;
pub mod pipeline;
pub mod scene;
pub mod spatial;
pub mod types;

pub use config::{OctreeConfig, RunConfig};
pub use error::{OctreeError, Result};
pub use pipeline::Pipeline;
pub use spatial::{OctreeNode, SpatialOctree};
pub use types::{Box3d, Coordinate3};
