use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::Array2;

use crate::error::ImgprocError;

/// Read a segmentation mask from a PNG file as a single-channel array.
///
/// Multi-channel images are collapsed by keeping the first channel; label
/// masks store the class id in every channel so this is lossless for them.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// The mask pixels as a `(height, width)` array.
pub fn read_mask_png(file_path: impl AsRef<Path>) -> Result<Array2<u8>, ImgprocError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(ImgprocError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let decoder = png::Decoder::new(std::io::BufReader::new(File::open(file_path)?));
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImgprocError::UnsupportedBitDepth(info.bit_depth));
    }

    let channels = info.color_type.samples();
    let (height, width) = (info.height as usize, info.width as usize);
    buf.truncate(info.buffer_size());

    let data = buf.chunks_exact(channels).map(|px| px[0]).collect();
    log::trace!(
        "read {}x{} mask ({} channels) from {}",
        width,
        height,
        channels,
        file_path.display()
    );
    Ok(Array2::from_shape_vec((height, width), data)?)
}

/// Write a single-channel mask as an 8-bit grayscale PNG file.
pub fn write_mask_png(file_path: impl AsRef<Path>, mask: &Array2<u8>) -> Result<(), ImgprocError> {
    let (height, width) = mask.dim();
    let file = File::create(file_path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| ImgprocError::PngEncode(e.to_string()))?;
    let data: Vec<u8> = mask.iter().copied().collect();
    writer
        .write_image_data(&data)
        .map_err(|e| ImgprocError::PngEncode(e.to_string()))?;
    Ok(())
}

/// Map every nonzero pixel to one, everything else to zero.
pub fn binarize(mask: &Array2<u8>) -> Array2<u8> {
    mask.mapv(|v| u8::from(v != 0))
}

/// Fuse two binary masks by elementwise logical OR.
///
/// # Errors
///
/// The masks must share a shape; a mismatch is an error.
pub fn fuse(a: &Array2<u8>, b: &Array2<u8>) -> Result<Array2<u8>, ImgprocError> {
    if a.dim() != b.dim() {
        let (ah, aw) = a.dim();
        let (bh, bw) = b.dim();
        return Err(ImgprocError::ShapeMismatch(ah, aw, bh, bw));
    }
    let mut out = a.clone();
    out.zip_mut_with(b, |x, &y| *x |= y);
    Ok(out)
}
