use ndarray::{Array1, Array2};

use turntable_calib::Intrinsics;
use turntable_geom::bounds::Aabb;

/// Everything one turntable query produces.
///
/// Returned fresh per query; nothing is cached or persisted.
#[derive(Debug, Clone)]
pub struct RotationSample {
    /// Per-point feature rows: body-centric position plus placeholder
    /// normal, `(N, 6)`.
    pub feature: Array2<f32>,
    /// Per-point voxel indices in depth-height-width order, `(N, 3)`.
    pub coord: Array2<i32>,
    /// Voxel grid shape per axis, each a positive multiple of 32.
    pub out_sh: [i32; 3],
    /// Ray origins over the image plane, `(H·W, 3)`.
    pub ray_o: Array2<f32>,
    /// Ray directions over the image plane, `(H·W, 3)`.
    pub ray_d: Array2<f32>,
    /// Entry distance per box-intersecting pixel.
    pub near: Array1<f32>,
    /// Exit distance per box-intersecting pixel.
    pub far: Array1<f32>,
    /// Per pixel, whether its ray intersects the rotated bounding volume.
    pub mask_at_box: Array1<bool>,
    /// Body-centric bounding volume.
    pub bounds: Aabb,
    /// Combined global body rotation as a 3x3 matrix.
    pub r: [[f64; 3]; 3],
    /// Global body translation after rotation.
    pub th: [f64; 3],
    /// Coarse per-frame latent index, clamped to the frame window.
    pub latent_index: usize,
    /// The queried synthetic angle index.
    pub angle_index: usize,
    /// The mask base frame index within the frame window.
    pub frame_index: usize,
    /// Fused ground-truth masks, one per training view, reduced resolution.
    pub masks: Vec<Array2<u8>>,
    /// Ratio-scaled intrinsics of the training views.
    pub ks: Vec<Intrinsics>,
    /// World-to-camera matrices of the training views, translations in meters.
    pub rt: Vec<[[f64; 4]; 4]>,
}
