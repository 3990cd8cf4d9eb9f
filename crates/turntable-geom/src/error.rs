/// An error type for the geom module.
#[derive(thiserror::Error, Debug)]
pub enum GeomError {
    /// Error when the geometry file does not exist.
    #[error("Geometry file does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to read a geometry file.
    #[error("Failed to read the geometry file. {0}")]
    Io(#[from] std::io::Error),

    /// Error when a PLY file is not in a supported layout.
    #[error("Unsupported PLY file: {0}")]
    UnsupportedPly(String),

    /// Error when an operation needs at least one point.
    #[error("Point set is empty")]
    EmptyPointSet,

    /// Error when a rotation axis has zero length.
    #[error("Cannot build a rotation from a zero axis")]
    ZeroRotationAxis,

    /// Error when a voxel size is not strictly positive.
    #[error("Voxel size must be positive in all dimensions, got {0:?}")]
    InvalidVoxelSize([f64; 3]),
}
