// src/perf/contenders.rs

//! The built-in suites and the contenders they time.
//!
//! Naming follows `<variant>-<source>-<sink>`: `buffer` means the image is
//! decoded from / encoded to memory, `file` means it is read from / written
//! to the fixtures directory on every iteration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use tracing::warn;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::processing::codec::{decode, encode};
use crate::processing::ResizeFilter;

use super::suite::Suite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SuiteKind {
    Jpeg,
    Png,
    Webp,
    Kernels,
    Quality,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 5] = [
        SuiteKind::Jpeg,
        SuiteKind::Png,
        SuiteKind::Webp,
        SuiteKind::Kernels,
        SuiteKind::Quality,
    ];
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuiteKind::Jpeg => "jpeg",
            SuiteKind::Png => "png",
            SuiteKind::Webp => "webp",
            SuiteKind::Kernels => "kernels",
            SuiteKind::Quality => "quality",
        };
        f.write_str(s)
    }
}

/// Target dimensions and encoder settings shared by the suites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfSettings {
    pub width: u32,
    pub height: u32,
    /// JPEG quality used by the resize suites.
    pub resize_quality: u8,
    /// JPEG quality used by the quality suite.
    pub quality: u8,
}

/// Well-known file names inside the fixtures directory.
#[derive(Debug, Clone)]
pub struct Fixtures {
    dir: PathBuf,
}

impl Fixtures {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn input(&self, format: ImageFormat) -> PathBuf {
        self.dir.join(format!("input.{}", extension(format)))
    }

    pub fn output(&self, format: ImageFormat) -> PathBuf {
        self.dir.join(format!("output.{}", extension(format)))
    }
}

fn extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        _ => "jpg",
    }
}

/// Build the suite for `kind`, or `None` when its fixture is missing.
pub fn build_suite(
    kind: SuiteKind,
    fs: &Arc<dyn FileSystem>,
    fixtures: &Fixtures,
    settings: PerfSettings,
) -> Result<Option<Suite>> {
    let format = match kind {
        SuiteKind::Png => ImageFormat::Png,
        SuiteKind::Webp => ImageFormat::WebP,
        SuiteKind::Jpeg | SuiteKind::Kernels | SuiteKind::Quality => ImageFormat::Jpeg,
    };
    let input = fixtures.input(format);
    if !fs.is_file(&input) {
        warn!(suite = %kind, fixture = %input.display(), "Excluding suite: fixture not found");
        return Ok(None);
    }

    let io = SuiteIo {
        fs: Arc::clone(fs),
        buffer: Arc::new(fs.read(&input)?),
        input,
        output: fixtures.output(format),
        format,
    };

    let suite = match kind {
        SuiteKind::Jpeg => resize_suite("jpeg", &io, settings, Some(settings.resize_quality))
            .add("thumbnail-buffer-buffer", {
                let io = io.clone();
                move || {
                    let image = decode(&io.buffer)?.image;
                    let thumb = image.thumbnail(settings.width, settings.height);
                    encode(&thumb, io.format, Some(settings.resize_quality)).map(drop)
                }
            }),
        SuiteKind::Png => resize_suite("png", &io, settings, None)
            .add("lanczos3-best-compression", {
                let io = io.clone();
                move || {
                    png_with(&io.buffer, settings, CompressionType::Best, PngFilter::Adaptive)
                }
            })
            .add("lanczos3-without-adaptive-filtering", {
                let io = io.clone();
                move || png_with(&io.buffer, settings, CompressionType::Default, PngFilter::Sub)
            }),
        SuiteKind::Webp => resize_suite("webp", &io, settings, None),
        SuiteKind::Kernels => {
            let mut suite = Suite::new("kernels");
            for filter in ResizeFilter::ALL {
                let io = io.clone();
                suite = suite.add(filter.to_string(), move || {
                    resize_bytes(&io.buffer, settings, filter, io.format, Some(settings.resize_quality))
                        .map(drop)
                });
            }
            suite
        }
        SuiteKind::Quality => {
            let q = settings.quality;
            Suite::new("quality")
                .add(format!("q{q}-file-file"), {
                    let io = io.clone();
                    move || {
                        let image = decode(&io.fs.read(&io.input)?)?.image;
                        let bytes = encode(&image, ImageFormat::Jpeg, Some(q))?;
                        io.fs.write(&io.output, &bytes)?;
                        Ok(())
                    }
                })
                .add(format!("q{q}-buffer-buffer"), {
                    let io = io.clone();
                    move || {
                        let image = decode(&io.buffer)?.image;
                        encode(&image, ImageFormat::Jpeg, Some(q)).map(drop)
                    }
                })
                .add(format!("q{q}-lanczos3-same-width-file-file"), {
                    let io = io.clone();
                    move || {
                        let image = decode(&io.fs.read(&io.input)?)?.image;
                        let same = image.resize(
                            image.width(),
                            u32::MAX,
                            ResizeFilter::Lanczos3.filter_type(),
                        );
                        let bytes = encode(&same, ImageFormat::Jpeg, Some(q))?;
                        io.fs.write(&io.output, &bytes)?;
                        Ok(())
                    }
                })
        }
    };

    Ok(Some(suite))
}

/// Inputs and outputs a suite's contenders share.
#[derive(Debug, Clone)]
struct SuiteIo {
    fs: Arc<dyn FileSystem>,
    buffer: Arc<Vec<u8>>,
    input: PathBuf,
    output: PathBuf,
    format: ImageFormat,
}

/// Resize to `width x height` with the triangle and lanczos3 filters, from
/// and to buffers and files.
fn resize_suite(name: &str, io: &SuiteIo, settings: PerfSettings, quality: Option<u8>) -> Suite {
    let mut suite = Suite::new(name);
    for filter in [ResizeFilter::Triangle, ResizeFilter::Lanczos3] {
        suite = suite
            .add(format!("{filter}-buffer-buffer"), {
                let io = io.clone();
                move || resize_bytes(&io.buffer, settings, filter, io.format, quality).map(drop)
            })
            .add(format!("{filter}-buffer-file"), {
                let io = io.clone();
                move || {
                    let bytes = resize_bytes(&io.buffer, settings, filter, io.format, quality)?;
                    io.fs.write(&io.output, &bytes)?;
                    Ok(())
                }
            })
            .add(format!("{filter}-file-file"), {
                let io = io.clone();
                move || {
                    let input = io.fs.read(&io.input)?;
                    let bytes = resize_bytes(&input, settings, filter, io.format, quality)?;
                    io.fs.write(&io.output, &bytes)?;
                    Ok(())
                }
            });
    }
    suite
}

fn resize_bytes(
    bytes: &[u8],
    settings: PerfSettings,
    filter: ResizeFilter,
    format: ImageFormat,
    quality: Option<u8>,
) -> Result<Vec<u8>> {
    let image = decode(bytes)?.image;
    let resized = image.resize_exact(settings.width, settings.height, filter.filter_type());
    encode(&resized, format, quality)
}

fn png_with(
    bytes: &[u8],
    settings: PerfSettings,
    compression: CompressionType,
    filter: PngFilter,
) -> Result<()> {
    let image = decode(bytes)?.image;
    let resized: DynamicImage = image.resize_exact(
        settings.width,
        settings.height,
        ResizeFilter::Lanczos3.filter_type(),
    );
    let mut out = Vec::new();
    resized.write_with_encoder(PngEncoder::new_with_quality(&mut out, compression, filter))?;
    Ok(())
}
