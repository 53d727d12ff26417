// src/processing/mod.rs

//! Per-file processing functions.
//!
//! The scenario driver treats each [`Processor`] as an opaque function from a
//! file to a completion signal or error:
//!
//! - [`Resize`] scales width and height by a factor.
//! - [`Quality`] re-encodes JPEGs at a lower quality.
//! - [`Convert`] re-encodes into another container format.
//! - [`ExternalCommand`] hands the file to an encoder program.
//!
//! Codec work is delegated to the `image` crate ([`codec`]).

pub mod codec;
pub mod command;
pub mod convert;
pub mod quality;
pub mod resize;

use std::fmt::Debug;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::Result;
use crate::fs::FileSystem;

pub use command::ExternalCommand;
pub use convert::{Convert, OutputFormat};
pub use quality::{jpeg_quality_for, Quality};
pub use resize::{Resize, ResizeFilter};

pub type ProcessFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A processing function applied to one file of the working set, in place.
pub trait Processor: Send + Sync + Debug {
    /// Short human-readable label used in logs and dry-run output.
    fn name(&self) -> String;

    fn process(&self, fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_>;
}

/// Declarative form of a processor, as written in `[[scenario]].steps`.
///
/// ```toml
/// steps = [
///   { op = "resize", factor = 0.5, filter = "lanczos3" },
///   { op = "quality", factor = 0.8 },
///   { op = "convert", format = "webp" },
///   { op = "command", program = "jpegtran", args = ["-optimize", "-outfile", "{file}", "{file}"] },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ProcessorSpec {
    Resize {
        factor: f64,
        #[serde(default)]
        filter: ResizeFilter,
    },
    Quality {
        factor: f64,
    },
    Convert {
        format: OutputFormat,
        #[serde(default)]
        quality: Option<u8>,
    },
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl ProcessorSpec {
    pub fn build(&self) -> Arc<dyn Processor> {
        match self {
            ProcessorSpec::Resize { factor, filter } => Arc::new(Resize::new(*factor, *filter)),
            ProcessorSpec::Quality { factor } => Arc::new(Quality::new(*factor)),
            ProcessorSpec::Convert { format, quality } => Arc::new(Convert::new(*format, *quality)),
            ProcessorSpec::Command { program, args } => {
                Arc::new(ExternalCommand::new(program.clone(), args.clone()))
            }
        }
    }
}
