// src/processing/codec.rs

//! Thin decode/encode helpers over the `image` crate.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::errors::{BenchError, Result};
use crate::fs::FileSystem;

/// An image together with the container format it was read from.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    let format = image::guess_format(bytes)?;
    let image = image::load_from_memory_with_format(bytes, format)?;
    Ok(Decoded { image, format })
}

/// Encode `image` as `format`.
///
/// `jpeg_quality` only applies to JPEG output; `None` uses the encoder
/// default. JPEG has no alpha channel, and the WebP and GIF encoders want
/// 8-bit RGBA, so the pixel layout is converted first where needed.
pub fn encode(image: &DynamicImage, format: ImageFormat, jpeg_quality: Option<u8>) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            match jpeg_quality {
                Some(q) => rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, q))?,
                None => rgb.write_to(&mut buf, ImageFormat::Jpeg)?,
            }
        }
        ImageFormat::WebP | ImageFormat::Gif => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buf, format)?;
        }
        other => image.write_to(&mut buf, other)?,
    }
    Ok(buf.into_inner())
}

/// Read `path`, hand the decoded image to `op`, and write whatever bytes it
/// returns back to the same path. Runs on the blocking pool.
pub(crate) async fn transcode_in_place<F>(
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    op: F,
) -> Result<()>
where
    F: FnOnce(Decoded) -> Result<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<()> {
        let bytes = fs.read(&path)?;
        let decoded = decode(&bytes)?;
        let encoded = op(decoded)?;
        fs.write(&path, &encoded)?;
        Ok(())
    })
    .await
    .map_err(|e| BenchError::Other(anyhow::Error::from(e)))?
}
