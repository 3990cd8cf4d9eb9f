#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Capture annotation loading.
pub mod annotation;

/// Pinhole camera parameter types.
pub mod camera;

/// Polynomial lens distortion model.
pub mod distortion;

/// Error types for the calib module.
pub mod error;

pub use crate::annotation::Annotation;
pub use crate::camera::{center_ray_direction, Camera, Extrinsics, Intrinsics};
pub use crate::distortion::{distort_point, Distortion};
pub use crate::error::CalibError;
