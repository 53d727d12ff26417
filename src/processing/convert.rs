// src/processing/convert.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::ImageFormat;
use serde::Deserialize;

use crate::fs::FileSystem;

use super::codec::{encode, transcode_in_place};
use super::{ProcessFuture, Processor};

/// Encodable target formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Webp => ImageFormat::WebP,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// Re-encode every file into `format`, keeping its path.
///
/// The file name extension is left alone; only the bytes change, which is all
/// the size comparison looks at.
#[derive(Debug, Clone, Copy)]
pub struct Convert {
    format: OutputFormat,
    quality: Option<u8>,
}

impl Convert {
    pub fn new(format: OutputFormat, quality: Option<u8>) -> Self {
        Self { format, quality }
    }
}

impl Processor for Convert {
    fn name(&self) -> String {
        match self.quality {
            Some(q) => format!("convert({}, q{})", self.format, q),
            None => format!("convert({})", self.format),
        }
    }

    fn process(&self, fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        let Convert { format, quality } = *self;
        Box::pin(async move {
            transcode_in_place(fs, path, move |decoded| {
                encode(&decoded.image, format.image_format(), quality)
            })
            .await
        })
    }
}
