use ndarray::{Array1, Array2};

use turntable_calib::Intrinsics;
use turntable_geom::bounds::Aabb;

use crate::error::SamplerError;

/// Per-pixel rays of one camera against a bounding volume.
///
/// `ray_o` and `ray_d` cover every pixel of the image plane in row-major
/// order; `near` and `far` hold one entry per pixel whose ray intersects the
/// volume, in the same order. `mask_at_box` flags those pixels.
#[derive(Debug, Clone)]
pub struct RayBundle {
    /// Ray origins, `(H·W, 3)`.
    pub ray_o: Array2<f32>,
    /// Ray directions (not normalized), `(H·W, 3)`.
    pub ray_d: Array2<f32>,
    /// Entry distance per intersecting pixel, in ray-direction parameter units.
    pub near: Array1<f32>,
    /// Exit distance per intersecting pixel.
    pub far: Array1<f32>,
    /// The midpoint of the bounding volume.
    pub center: [f64; 3],
    /// The largest side length of the bounding volume.
    pub scale: f64,
    /// Per pixel, whether its ray intersects the volume.
    pub mask_at_box: Array1<bool>,
}

// direction components this small are clamped before the slab division
const MIN_DIR_COMPONENT: f64 = 1e-5;

fn slab_intersect(origin: &[f64; 3], dir: &[f64; 3], bounds: &Aabb) -> (f64, f64) {
    let norm = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
    let mut near = f64::NEG_INFINITY;
    let mut far = f64::INFINITY;
    for k in 0..3 {
        let mut vd = dir[k] / norm;
        if vd.abs() < MIN_DIR_COMPONENT {
            vd = if vd < 0.0 {
                -MIN_DIR_COMPONENT
            } else {
                MIN_DIR_COMPONENT
            };
        }
        let t_min = (bounds.min[k] - origin[k]) / vd;
        let t_max = (bounds.max[k] - origin[k]) / vd;
        near = near.max(t_min.min(t_max));
        far = far.min(t_min.max(t_max));
    }
    // convert metric distances to parameters of the unnormalized direction
    (near / norm, far / norm)
}

/// Generate one ray per pixel of the image plane and intersect each with a
/// bounding volume.
///
/// # Arguments
///
/// * `world_to_camera` - The homogeneous world-to-camera matrix.
/// * `intrinsics` - The intrinsics matching `height` x `width`.
/// * `bounds` - The volume rays are clipped against.
/// * `height` - Image plane height in pixels.
/// * `width` - Image plane width in pixels.
pub fn image_rays(
    world_to_camera: &[[f64; 4]; 4],
    intrinsics: &Intrinsics,
    bounds: &Aabb,
    height: usize,
    width: usize,
) -> Result<RayBundle, SamplerError> {
    let k_inv = intrinsics.inverse().map_err(SamplerError::Calib)?;
    let w2c = world_to_camera;

    // camera center in world coordinates, -Rᵀ·t
    let mut origin = [0.0f64; 3];
    for (j, o) in origin.iter_mut().enumerate() {
        *o = -(w2c[0][j] * w2c[0][3] + w2c[1][j] * w2c[1][3] + w2c[2][j] * w2c[2][3]);
    }

    let n_pixels = height * width;
    let mut ray_o = Array2::<f32>::zeros((n_pixels, 3));
    let mut ray_d = Array2::<f32>::zeros((n_pixels, 3));
    let mut mask_at_box = Array1::<bool>::from_elem(n_pixels, false);
    let mut near = Vec::new();
    let mut far = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let pixel = [x as f64, y as f64, 1.0];
            // back-project to a camera-space direction
            let mut dir_cam = [0.0f64; 3];
            for (i, row) in k_inv.iter().enumerate() {
                dir_cam[i] = row[0] * pixel[0] + row[1] * pixel[1] + row[2] * pixel[2];
            }
            // rotate into world space, Rᵀ·d
            let mut dir = [0.0f64; 3];
            for (j, d) in dir.iter_mut().enumerate() {
                *d = w2c[0][j] * dir_cam[0] + w2c[1][j] * dir_cam[1] + w2c[2][j] * dir_cam[2];
            }

            for k in 0..3 {
                ray_o[[idx, k]] = origin[k] as f32;
                ray_d[[idx, k]] = dir[k] as f32;
            }

            let (t_near, t_far) = slab_intersect(&origin, &dir, bounds);
            if t_near < t_far {
                mask_at_box[idx] = true;
                near.push(t_near as f32);
                far.push(t_far as f32);
            }
        }
    }

    Ok(RayBundle {
        ray_o,
        ray_d,
        near: Array1::from_vec(near),
        far: Array1::from_vec(far),
        center: bounds.center(),
        scale: bounds.max_extent(),
        mask_at_box,
    })
}
