use ndarray::Array2;

/// Resize a mask with nearest-neighbor sampling.
///
/// Nearest-neighbor keeps label values intact, which is what segmentation
/// masks need; interpolating would invent labels along boundaries.
///
/// # Arguments
///
/// * `src` - The input mask.
/// * `new_height` - The output height in pixels.
/// * `new_width` - The output width in pixels.
pub fn resize_nearest(src: &Array2<u8>, new_height: usize, new_width: usize) -> Array2<u8> {
    let (height, width) = src.dim();
    if (height, width) == (new_height, new_width) {
        return src.clone();
    }
    let scale_y = height as f64 / new_height as f64;
    let scale_x = width as f64 / new_width as f64;

    Array2::from_shape_fn((new_height, new_width), |(y, x)| {
        let src_y = (((y as f64 + 0.5) * scale_y - 0.5).round().max(0.0) as usize).min(height - 1);
        let src_x = (((x as f64 + 0.5) * scale_x - 0.5).round().max(0.0) as usize).min(width - 1);
        src[[src_y, src_x]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn identity_resize_is_a_copy() {
        let src = array![[1u8, 2], [3, 4]];
        assert_eq!(resize_nearest(&src, 2, 2), src);
    }

    #[test]
    fn downscale_by_two_keeps_block_values() {
        let src = array![
            [1u8, 1, 2, 2],
            [1, 1, 2, 2],
            [3, 3, 4, 4],
            [3, 3, 4, 4],
        ];
        let dst = resize_nearest(&src, 2, 2);
        assert_eq!(dst, array![[1u8, 2], [3, 4]]);
    }

    #[test]
    fn upscale_repeats_pixels() {
        let src = array![[0u8, 1]];
        let dst = resize_nearest(&src, 1, 4);
        assert_eq!(dst, array![[0u8, 0, 1, 1]]);
    }

    #[test]
    fn output_shape_matches_request() {
        let src = Array2::<u8>::zeros((7, 5));
        let dst = resize_nearest(&src, 3, 11);
        assert_eq!(dst.dim(), (3, 11));
    }
}
