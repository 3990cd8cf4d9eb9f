use ndarray::{Array2, Zip};

use turntable_calib::{distort_point, Distortion, Intrinsics};

/// Undistort a mask through the polynomial lens model.
///
/// Inverse-map remap: every destination pixel is pushed through the
/// distortion model and the source is sampled nearest-neighbor at the
/// distorted location. Pixels that map outside the source become zero.
///
/// # Arguments
///
/// * `src` - The distorted mask.
/// * `intrinsics` - The intrinsics matching the mask resolution.
/// * `distortion` - The lens distortion coefficients.
///
/// # Returns
///
/// The undistorted mask with the same shape as the input.
pub fn undistort_mask(
    src: &Array2<u8>,
    intrinsics: &Intrinsics,
    distortion: &Distortion,
) -> Array2<u8> {
    let (height, width) = src.dim();
    let mut dst = Array2::<u8>::zeros((height, width));

    Zip::indexed(&mut dst).par_for_each(|(y, x), out| {
        let (u, v) = distort_point(x as f64, y as f64, intrinsics, distortion);
        let (u, v) = (u.round() as i64, v.round() as i64);
        *out = if u >= 0 && v >= 0 && (u as usize) < width && (v as usize) < height {
            src[[v as usize, u as usize]]
        } else {
            0
        };
    });

    dst
}
