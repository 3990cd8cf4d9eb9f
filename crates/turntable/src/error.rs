/// An error type for the turntable module.
#[derive(thiserror::Error, Debug)]
pub enum SamplerError {
    /// Error from the calibration layer.
    #[error(transparent)]
    Calib(#[from] turntable_calib::CalibError),

    /// Error from the geometry layer.
    #[error(transparent)]
    Geom(#[from] turntable_geom::GeomError),

    /// Error from the image processing layer.
    #[error(transparent)]
    Imgproc(#[from] turntable_imgproc::ImgprocError),

    /// Error when the parameter file does not exist.
    #[error("Parameter file does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to read a parameter file.
    #[error("Failed to read the parameter file. {0}")]
    Io(#[from] std::io::Error),

    /// Error to parse a parameter file.
    #[error("Failed to parse the parameter file. {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Error when the annotation has no camera for a configured view.
    #[error("Training view {0} is out of range for a rig of {1} cameras")]
    ViewOutOfRange(usize, usize),

    /// Error when a frame index is outside the configured frame window.
    #[error("Frame {0} is out of range for a window of {1} frames")]
    FrameOutOfRange(usize, usize),

    /// Error when an angle index exceeds the synthetic angle set.
    #[error("Angle index {0} is out of range, the sampler has {1} angles")]
    AngleOutOfRange(usize, usize),

    /// Error when the annotation contains no cameras at all.
    #[error("The annotation contains no cameras")]
    EmptyRig,
}
