/// An error type for the imgproc module.
#[derive(thiserror::Error, Debug)]
pub enum ImgprocError {
    /// Error when the mask file does not exist.
    #[error("Mask file does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open or read a mask file.
    #[error("Failed to read the mask file. {0}")]
    Io(#[from] std::io::Error),

    /// Error to decode the png image.
    #[error("Failed to decode the png image. {0}")]
    PngDecode(#[from] png::DecodingError),

    /// Error when a png uses a bit depth other than eight.
    #[error("Unsupported png bit depth: {0:?}")]
    UnsupportedBitDepth(png::BitDepth),

    /// Error when two masks do not share a shape.
    #[error("Mask shapes do not match: {0}x{1} vs {2}x{3}")]
    ShapeMismatch(usize, usize, usize, usize),

    /// Error when mask data does not fit its declared shape.
    #[error("Invalid shape")]
    InvalidShape(#[from] ndarray::ShapeError),

    /// Error to encode the png image.
    #[error("Failed to encode the png image. {0}")]
    PngEncode(String),
}
