#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Axis-aligned bounding volumes and padding policies.
pub mod bounds;

/// Error types for the geom module.
pub mod error;

/// 3x3 matrix and vector helpers.
pub mod linalg;

/// Binary PLY point reading.
pub mod ply;

/// Point cloud container.
pub mod pointcloud;

/// Rotation conversions and point set transforms.
pub mod transforms;

/// Point voxelization for sparse convolution grids.
pub mod voxelize;

pub use crate::bounds::{Aabb, PaddingMode};
pub use crate::error::GeomError;
pub use crate::pointcloud::PointCloud;
