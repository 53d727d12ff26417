// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("no files to measure in {0:?}; an average size of an empty set is undefined")]
    EmptyDirectory(PathBuf),

    #[error("scratch directory {0:?} already exists; remove it or choose another with --scratch")]
    ScratchExists(PathBuf),

    #[error("setup of scenario '{scenario}' failed: {source}")]
    Setup {
        scenario: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("teardown of scenario '{scenario}' failed: {source}")]
    Teardown {
        scenario: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("step #{index} dropped its continuation without signalling completion")]
    StepAbandoned { index: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
