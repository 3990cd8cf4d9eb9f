#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Sampler configuration.
pub mod config;

/// Error types for the turntable module.
pub mod error;

/// Per-pixel ray generation against a bounding volume.
pub mod rays;

/// The per-query output bundle.
pub mod sample;

/// The rotation sampler.
pub mod sampler;

/// SMPL body parameter loading.
pub mod smpl;

pub use crate::config::SamplerConfig;
pub use crate::error::SamplerError;
pub use crate::rays::{image_rays, RayBundle};
pub use crate::sample::RotationSample;
pub use crate::sampler::{RotationSampler, ANGLE_STEP, FULL_TURN_STEPS};
pub use crate::smpl::SmplParams;

pub use turntable_calib as calib;
pub use turntable_geom as geom;
pub use turntable_imgproc as imgproc;
