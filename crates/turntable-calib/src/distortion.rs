use serde::Deserialize;

use crate::camera::Intrinsics;

/// Polynomial lens distortion coefficients, OpenCV ordering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "Vec<f64>")]
pub struct Distortion {
    /// The first radial distortion coefficient.
    pub k1: f64,
    /// The second radial distortion coefficient.
    pub k2: f64,
    /// The first tangential distortion coefficient.
    pub p1: f64,
    /// The second tangential distortion coefficient.
    pub p2: f64,
    /// The third radial distortion coefficient.
    pub k3: f64,
}

impl From<Vec<f64>> for Distortion {
    /// Build from the flat `[k1, k2, p1, p2, k3]` layout; missing trailing
    /// coefficients default to zero.
    fn from(coeffs: Vec<f64>) -> Self {
        let at = |i: usize| coeffs.get(i).copied().unwrap_or(0.0);
        Self {
            k1: at(0),
            k2: at(1),
            p1: at(2),
            p2: at(3),
            k3: at(4),
        }
    }
}

/// Distort a pixel coordinate through the polynomial model.
///
/// # Arguments
///
/// * `x` - The x coordinate of the ideal (undistorted) pixel.
/// * `y` - The y coordinate of the ideal (undistorted) pixel.
/// * `intrinsics` - The intrinsic parameters of the camera.
/// * `distortion` - The distortion parameters of the camera.
///
/// # Returns
///
/// The pixel coordinate in the distorted image.
pub fn distort_point(
    x: f64,
    y: f64,
    intrinsics: &Intrinsics,
    distortion: &Distortion,
) -> (f64, f64) {
    let (fx, fy, cx, cy) = (
        intrinsics.fx(),
        intrinsics.fy(),
        intrinsics.cx(),
        intrinsics.cy(),
    );
    let Distortion { k1, k2, p1, p2, k3 } = *distortion;

    // normalize the coordinates
    let x = (x - cx) / fx;
    let y = (y - cy) / fy;

    let r2 = x * x + y * y;

    // radial distortion
    let kr = 1.0 + k1 * r2 + k2 * r2 * r2 + k3 * r2 * r2 * r2;

    // tangential distortion
    let xd = x * kr + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
    let yd = y * kr + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;

    // denormalize the coordinates
    (fx * xd + cx, fy * yd + cy)
}
