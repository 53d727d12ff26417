use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// A deterministic, reasonably detailed RGB test pattern.
pub fn pattern(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let r = ((x * 255) / width.max(1)) as u8;
        let g = ((y * 255) / height.max(1)) as u8;
        let b = ((x ^ y) & 0xff) as u8;
        Rgb([r, g, b])
    }))
}

/// Write the test pattern to `path` in `format`.
pub fn write_sample(path: &Path, width: u32, height: u32, format: ImageFormat) {
    pattern(width, height)
        .save_with_format(path, format)
        .expect("writing sample image");
}

/// Encode the test pattern in memory.
pub fn sample_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    pattern(width, height)
        .write_to(&mut buf, format)
        .expect("encoding sample image");
    buf.into_inner()
}
