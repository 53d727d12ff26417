// src/processing/resize.rs

//! Resize by a scale factor, keeping the source container format.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use image::imageops::FilterType;
use serde::Deserialize;
use tracing::debug;

use crate::fs::FileSystem;

use super::codec::{encode, transcode_in_place};
use super::{ProcessFuture, Processor};

/// Resampling filter, mapped onto `image::imageops::FilterType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    #[value(name = "catmullrom")]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    pub const ALL: [ResizeFilter; 5] = [
        ResizeFilter::Nearest,
        ResizeFilter::Triangle,
        ResizeFilter::CatmullRom,
        ResizeFilter::Gaussian,
        ResizeFilter::Lanczos3,
    ];

    pub fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Triangle => "triangle",
            ResizeFilter::CatmullRom => "catmullrom",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Lanczos3 => "lanczos3",
        };
        f.write_str(s)
    }
}

/// Scale width and height by `factor`, then re-encode in place.
#[derive(Debug, Clone)]
pub struct Resize {
    factor: f64,
    filter: ResizeFilter,
}

impl Resize {
    pub fn new(factor: f64, filter: ResizeFilter) -> Self {
        Self { factor, filter }
    }

    /// Target size for a `width x height` source; never below 1x1.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((f64::from(v) * self.factor).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

impl Processor for Resize {
    fn name(&self) -> String {
        format!("resize({}, {})", self.factor, self.filter)
    }

    fn process(&self, fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        let this = self.clone();
        Box::pin(async move {
            transcode_in_place(fs, path, move |decoded| {
                let (w, h) = this.target_dimensions(decoded.image.width(), decoded.image.height());
                debug!(
                    from_w = decoded.image.width(),
                    from_h = decoded.image.height(),
                    to_w = w,
                    to_h = h,
                    filter = %this.filter,
                    "resizing"
                );
                let resized = decoded
                    .image
                    .resize_exact(w, h, this.filter.filter_type());
                encode(&resized, decoded.format, None)
            })
            .await
        })
    }
}
