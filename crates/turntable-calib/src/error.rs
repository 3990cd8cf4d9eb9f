/// An error type for the calib module.
#[derive(thiserror::Error, Debug)]
pub enum CalibError {
    /// Error when the annotation file does not exist.
    #[error("Annotation file does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open or read the annotation file.
    #[error("Failed to read the annotation file. {0}")]
    Io(#[from] std::io::Error),

    /// Error to parse the annotation file.
    #[error("Failed to parse the annotation file. {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Error when the per-camera tables disagree in length.
    #[error("Camera tables have inconsistent lengths (K: {0}, D: {1}, R: {2}, T: {3})")]
    InconsistentCameraCount(usize, usize, usize, usize),

    /// Error when an intrinsic matrix cannot be inverted.
    #[error("Intrinsic matrix is singular")]
    SingularIntrinsic,
}
