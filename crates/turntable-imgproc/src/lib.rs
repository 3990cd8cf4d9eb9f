#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the imgproc module.
pub mod error;

/// Segmentation mask decoding and fusion.
pub mod mask;

/// Morphological operations on binary masks.
pub mod morphology;

/// Nearest-neighbor mask resizing.
pub mod resize;

/// Mask undistortion through a polynomial lens model.
pub mod undistort;

pub use crate::error::ImgprocError;
