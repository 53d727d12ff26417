// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::perf::SuiteKind;
use crate::processing::ResizeFilter;

/// Command-line arguments for `imgbench`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "imgbench",
    version,
    about = "Benchmark image resize, quality and encoder settings by file size and speed.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Imgbench.toml` in the current working directory is used
    /// when present; otherwise built-in defaults apply.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `IMGBENCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run every configured scenario and report after/before size ratios.
    Filesize {
        /// Directory holding the sample images.
        input: PathBuf,

        /// Scratch directory used while processing (overrides config).
        #[arg(long, value_name = "DIR")]
        scratch: Option<PathBuf>,

        /// Print the scenario plan without touching any file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Single scenario: resize every image by FACTOR.
    Resize {
        /// Directory holding the sample images.
        input: PathBuf,

        /// Scale factor applied to width and height (e.g. 0.5).
        factor: f64,

        /// Resampling filter.
        #[arg(long, value_enum, default_value_t = ResizeFilter::Triangle)]
        filter: ResizeFilter,
    },

    /// Single scenario: re-encode every JPEG at quality FACTOR * 100.
    Quality {
        /// Directory holding the sample images.
        input: PathBuf,

        /// Quality factor in (0, 1].
        factor: f64,
    },

    /// Run the timing suites against a fixtures directory.
    Perf {
        /// Directory containing `input.jpg`, `input.png` and `input.webp`.
        fixtures: PathBuf,

        /// Restrict the run to these suites (repeatable).
        #[arg(long = "suite", value_enum, value_name = "NAME")]
        suites: Vec<SuiteKind>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
