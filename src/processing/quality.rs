// src/processing/quality.rs

use std::path::PathBuf;
use std::sync::Arc;

use image::ImageFormat;
use tracing::trace;

use crate::fs::FileSystem;

use super::codec::{encode, transcode_in_place};
use super::{ProcessFuture, Processor};

/// Map a quality factor in (0, 1] onto a JPEG quality of 1..=100.
pub fn jpeg_quality_for(factor: f64) -> u8 {
    (factor * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Re-encode in place at a lower quality.
///
/// Only JPEG has a quality setting; any other format is decoded and written
/// back with its encoder defaults.
#[derive(Debug, Clone, Copy)]
pub struct Quality {
    factor: f64,
}

impl Quality {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl Processor for Quality {
    fn name(&self) -> String {
        format!("quality({})", jpeg_quality_for(self.factor))
    }

    fn process(&self, fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        let quality = jpeg_quality_for(self.factor);
        Box::pin(async move {
            transcode_in_place(fs, path, move |decoded| {
                let jpeg_quality = (decoded.format == ImageFormat::Jpeg).then_some(quality);
                trace!(format = ?decoded.format, ?jpeg_quality, "re-encoding");
                encode(&decoded.image, decoded.format, jpeg_quality)
            })
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_factor_mapping() {
        assert_eq!(jpeg_quality_for(0.5), 50);
        assert_eq!(jpeg_quality_for(1.0), 100);
        assert_eq!(jpeg_quality_for(0.001), 1);
        assert_eq!(jpeg_quality_for(3.0), 100);
    }
}
