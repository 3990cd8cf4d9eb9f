use glam::{DMat3, DQuat, DVec3};

use crate::error::GeomError;
use crate::linalg::{add3, mat3_mul_vec, sub3};

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix, row major.
///
/// Example:
///
/// ```
/// use turntable_geom::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [1.0, 0.0, 0.0];
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!((rotation[1][2] - (-1.0)).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], GeomError> {
    // normalize the vector
    let axis_norm = {
        let magnitude = (axis[0].powi(2) + axis[1].powi(2) + axis[2].powi(2)).sqrt();
        match magnitude < 1e-10 {
            true => return Err(GeomError::ZeroRotationAxis),
            false => [
                axis[0] / magnitude,
                axis[1] / magnitude,
                axis[2] / magnitude,
            ],
        }
    };

    let x = axis_norm[0];
    let y = axis_norm[1];
    let z = axis_norm[2];

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    let m00 = c + x * x * t;
    let m11 = c + y * y * t;
    let m22 = c + z * z * t;

    let tmp1 = x * y * t;
    let tmp2 = z * s;

    let m10 = tmp1 + tmp2;
    let m01 = tmp1 - tmp2;

    let tmp3 = x * z * t;
    let tmp4 = y * s;

    let m20 = tmp3 - tmp4;
    let m02 = tmp3 + tmp4;

    let tmp5 = y * z * t;
    let tmp6 = x * s;

    let m12 = tmp5 - tmp6;
    let m21 = tmp5 + tmp6;

    Ok([[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]])
}

/// Convert a rotation vector (axis scaled by angle) to a rotation matrix.
///
/// A near-zero vector maps to the identity.
pub fn rotation_vector_to_matrix(rv: &[f64; 3]) -> [[f64; 3]; 3] {
    let angle = (rv[0] * rv[0] + rv[1] * rv[1] + rv[2] * rv[2]).sqrt();
    if angle < 1e-10 {
        return crate::linalg::mat3_identity();
    }
    let axis = [rv[0] / angle, rv[1] / angle, rv[2] / angle];
    // the axis is unit length here, the error branch is unreachable
    axis_angle_to_rotation_matrix(&axis, angle)
        .unwrap_or_else(|_| crate::linalg::mat3_identity())
}

/// Convert a rotation matrix to a rotation vector with angle in `[0, π]`.
///
/// Goes through a quaternion to stay stable near zero and near half-turn
/// rotations.
pub fn rotation_matrix_to_vector(m: &[[f64; 3]; 3]) -> [f64; 3] {
    // glam stores columns, our matrices store rows
    let mat = DMat3::from_cols(
        DVec3::new(m[0][0], m[1][0], m[2][0]),
        DVec3::new(m[0][1], m[1][1], m[2][1]),
        DVec3::new(m[0][2], m[1][2], m[2][2]),
    );
    let quat = DQuat::from_mat3(&mat).normalize();
    let (axis, angle) = quat.to_axis_angle();
    let (axis, angle) = if angle > std::f64::consts::PI {
        (-axis, 2.0 * std::f64::consts::PI - angle)
    } else {
        (axis, angle)
    };
    if angle < 1e-10 {
        return [0.0; 3];
    }
    (axis * angle).to_array()
}

/// Rotation about the vertical axis by `angle` radians.
///
/// Captures are z-up, so the turntable rotation happens in the x/y plane.
pub fn rotation_about_up_axis(angle: f64) -> [[f64; 3]; 3] {
    let (s, c) = angle.sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

/// Rotate a point set in place about a fixed center.
///
/// Every point becomes `center + R·(p - center)`.
pub fn rotate_about_center(points: &mut [[f64; 3]], rotation: &[[f64; 3]; 3], center: &[f64; 3]) {
    for p in points.iter_mut() {
        *p = add3(&mat3_mul_vec(rotation, &sub3(p, center)), center);
    }
}
