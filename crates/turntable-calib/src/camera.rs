use serde::Deserialize;

use crate::distortion::Distortion;
use crate::error::CalibError;

/// Pinhole intrinsic matrix of a camera.
///
/// The matrix is stored row major as
///
/// ```text
/// [ fx  0  cx ]
/// [  0 fy  cy ]
/// [  0  0   1 ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Intrinsics {
    /// The 3x3 intrinsic matrix.
    pub matrix: [[f64; 3]; 3],
}

impl Intrinsics {
    /// The focal length in the x direction.
    #[inline]
    pub fn fx(&self) -> f64 {
        self.matrix[0][0]
    }

    /// The focal length in the y direction.
    #[inline]
    pub fn fy(&self) -> f64 {
        self.matrix[1][1]
    }

    /// The x coordinate of the principal point.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.matrix[0][2]
    }

    /// The y coordinate of the principal point.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.matrix[1][2]
    }

    /// Scale the first two rows of the matrix by `ratio`.
    ///
    /// This is the adjustment that maps the intrinsics to an image plane
    /// whose resolution was multiplied by `ratio`.
    pub fn scaled(&self, ratio: f64) -> Self {
        let mut matrix = self.matrix;
        for row in matrix.iter_mut().take(2) {
            for v in row.iter_mut() {
                *v *= ratio;
            }
        }
        Self { matrix }
    }

    /// Compute the inverse of the intrinsic matrix.
    ///
    /// # Errors
    ///
    /// Returns [`CalibError::SingularIntrinsic`] when the matrix is not
    /// invertible (zero focal length).
    pub fn inverse(&self) -> Result<[[f64; 3]; 3], CalibError> {
        let (fx, fy) = (self.fx(), self.fy());
        if fx.abs() < 1e-12 || fy.abs() < 1e-12 {
            return Err(CalibError::SingularIntrinsic);
        }
        // closed form for an upper triangular calibration matrix
        let skew = self.matrix[0][1];
        Ok([
            [1.0 / fx, -skew / (fx * fy), (skew * self.cy() - self.cx() * fy) / (fx * fy)],
            [0.0, 1.0 / fy, -self.cy() / fy],
            [0.0, 0.0, 1.0],
        ])
    }
}

/// World-to-camera extrinsic parameters of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrinsics {
    /// The rotation matrix of the camera, 3x3 row major.
    pub rotation: [[f64; 3]; 3],
    /// The translation vector of the camera.
    pub translation: [f64; 3],
}

impl Extrinsics {
    /// Build the 4x4 homogeneous world-to-camera matrix.
    pub fn to_homogeneous(&self) -> [[f64; 4]; 4] {
        let r = &self.rotation;
        let t = &self.translation;
        [
            [r[0][0], r[0][1], r[0][2], t[0]],
            [r[1][0], r[1][1], r[1][2], t[1]],
            [r[2][0], r[2][1], r[2][2], t[2]],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    /// The camera center in world coordinates, `-Rᵀ·t`.
    pub fn camera_center(&self) -> [f64; 3] {
        let r = &self.rotation;
        let t = &self.translation;
        [
            -(r[0][0] * t[0] + r[1][0] * t[1] + r[2][0] * t[2]),
            -(r[0][1] * t[0] + r[1][1] * t[1] + r[2][1] * t[2]),
            -(r[0][2] * t[0] + r[1][2] * t[1] + r[2][2] * t[2]),
        ]
    }
}

/// A fully calibrated camera view.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The intrinsic matrix.
    pub intrinsics: Intrinsics,
    /// The lens distortion coefficients.
    pub distortion: Distortion,
    /// The world-to-camera extrinsics.
    pub extrinsics: Extrinsics,
}

/// Compute the unit world-space direction of the ray through the image center.
///
/// Used to rank cameras by viewing direction similarity.
///
/// # Arguments
///
/// * `intrinsics` - The intrinsic matrix matching the image plane resolution.
/// * `world_to_camera` - The homogeneous world-to-camera matrix.
/// * `width` - The image plane width in pixels.
/// * `height` - The image plane height in pixels.
pub fn center_ray_direction(
    intrinsics: &Intrinsics,
    world_to_camera: &[[f64; 4]; 4],
    width: f64,
    height: f64,
) -> Result<[f64; 3], CalibError> {
    let k_inv = intrinsics.inverse()?;
    let pixel = [width / 2.0, height / 2.0, 1.0];
    let mut dir_cam = [0.0; 3];
    for (i, row) in k_inv.iter().enumerate() {
        dir_cam[i] = row[0] * pixel[0] + row[1] * pixel[1] + row[2] * pixel[2];
    }
    // world direction is Rᵀ·d for a world-to-camera rotation R
    let mut dir = [0.0; 3];
    for (j, d) in dir.iter_mut().enumerate() {
        *d = world_to_camera[0][j] * dir_cam[0]
            + world_to_camera[1][j] * dir_cam[1]
            + world_to_camera[2][j] * dir_cam[2];
    }
    let norm = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
    Ok([dir[0] / norm, dir[1] / norm, dir[2] / norm])
}
