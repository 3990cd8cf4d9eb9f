use ndarray::Array2;

use crate::bounds::Aabb;
use crate::error::GeomError;

/// Sparse convolution grids want shapes aligned to a multiple of 32.
const SHAPE_ALIGNMENT: i32 = 32;

/// Integer voxel coordinates and the aligned output grid shape for a point
/// set, in depth-height-width axis order.
#[derive(Debug, Clone)]
pub struct VoxelizedPoints {
    /// Per point, the integer grid index as `(depth, height, width)`.
    pub coords: Array2<i32>,
    /// The output grid shape per axis, each a positive multiple of 32.
    pub out_shape: [i32; 3],
}

fn round_up_to_alignment(n: i32) -> i32 {
    (n | (SHAPE_ALIGNMENT - 1)) + 1
}

/// Bucket a point set into a voxel grid anchored at the volume minimum.
///
/// Points and bounds are given in x/y/z order and reordered internally to
/// depth-height-width (z, y, x). Coordinates are `round((p - min) / size)`;
/// the grid shape is `ceil((max - min) / size)` rounded up to the next
/// multiple of 32 per axis.
///
/// # Arguments
///
/// * `points` - The point set in x/y/z order.
/// * `bounds` - The (already padded) volume enclosing the points.
/// * `voxel_size` - The voxel edge lengths in x/y/z order.
pub fn voxelize(
    points: &[[f64; 3]],
    bounds: &Aabb,
    voxel_size: &[f64; 3],
) -> Result<VoxelizedPoints, GeomError> {
    if voxel_size.iter().any(|&s| s <= 0.0) {
        return Err(GeomError::InvalidVoxelSize(*voxel_size));
    }

    // reorder x/y/z to depth-height-width
    let dhw = |p: &[f64; 3]| [p[2], p[1], p[0]];
    let min_dhw = dhw(&bounds.min);
    let max_dhw = dhw(&bounds.max);
    let size_dhw = dhw(voxel_size);

    let mut coords = Array2::<i32>::zeros((points.len(), 3));
    for (i, p) in points.iter().enumerate() {
        let p = dhw(p);
        for k in 0..3 {
            coords[[i, k]] = ((p[k] - min_dhw[k]) / size_dhw[k]).round() as i32;
        }
    }

    let mut out_shape = [0i32; 3];
    for k in 0..3 {
        let cells = ((max_dhw[k] - min_dhw[k]) / size_dhw[k]).ceil() as i32;
        out_shape[k] = round_up_to_alignment(cells);
    }

    Ok(VoxelizedPoints { coords, out_shape })
}
