use ndarray::{Array2, Zip};

/// Dilate a mask with an all-ones square structuring element.
///
/// Every output pixel becomes the maximum over the `kernel_size` x
/// `kernel_size` neighborhood centered on it, clipped at the image border.
///
/// # Arguments
///
/// * `src` - The input mask.
/// * `kernel_size` - The structuring element side length; an even value is
///   treated as the next odd one (center anchored).
pub fn dilate(src: &Array2<u8>, kernel_size: usize) -> Array2<u8> {
    let (height, width) = src.dim();
    let radius = (kernel_size / 2) as i64;
    let mut dst = Array2::<u8>::zeros((height, width));

    Zip::indexed(&mut dst).par_for_each(|(y, x), out| {
        let (y, x) = (y as i64, x as i64);
        let y0 = (y - radius).max(0) as usize;
        let y1 = ((y + radius) as usize).min(height - 1);
        let x0 = (x - radius).max(0) as usize;
        let x1 = ((x + radius) as usize).min(width - 1);
        let mut acc = 0u8;
        for yy in y0..=y1 {
            for xx in x0..=x1 {
                acc = acc.max(src[[yy, xx]]);
            }
        }
        *out = acc;
    });

    dst
}
