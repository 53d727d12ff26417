// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::perf::SuiteKind;
use crate::processing::{ProcessorSpec, ResizeFilter};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// scratch_dir = "test_temp"
/// max_concurrent_files = 4
///
/// [perf]
/// width = 200
/// height = 200
///
/// [[scenario]]
/// name = "resize-50%"
/// steps = [{ op = "resize", factor = 0.5 }]
/// ```
///
/// All sections are optional; without `[[scenario]]` entries the default
/// plan is used.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub perf: PerfSection,

    /// Scenarios in execution order.
    #[serde(default)]
    pub scenario: Vec<ScenarioConfig>,
}

/// Validated configuration. Construct through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub perf: PerfSection,
    pub scenario: Vec<ScenarioConfig>,
}

impl ConfigFile {
    /// Create a new `ConfigFile` without validation.
    ///
    /// Used internally by `TryFrom` after checks pass.
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        perf: PerfSection,
        scenario: Vec<ScenarioConfig>,
    ) -> Self {
        Self {
            config,
            perf,
            scenario,
        }
    }
}

impl Default for ConfigFile {
    /// Built-in plan: halve the dimensions, then re-encode at quality 50.
    fn default() -> Self {
        Self::new_unchecked(
            ConfigSection::default(),
            PerfSection::default(),
            default_scenarios(),
        )
    }
}

pub fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig {
            name: "resize-50%".to_string(),
            steps: vec![ProcessorSpec::Resize {
                factor: 0.5,
                filter: ResizeFilter::default(),
            }],
        },
        ScenarioConfig {
            name: "qf-50".to_string(),
            steps: vec![ProcessorSpec::Quality { factor: 0.5 }],
        },
    ]
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Scratch working area, created and deleted once per scenario.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Upper bound on files processed concurrently; 0 means unbounded.
    #[serde(default)]
    pub max_concurrent_files: usize,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("test_temp")
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            max_concurrent_files: 0,
        }
    }
}

/// `[perf]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PerfSection {
    #[serde(default = "default_dimension")]
    pub width: u32,

    #[serde(default = "default_dimension")]
    pub height: u32,

    /// JPEG quality used when the resize suites encode.
    #[serde(default = "default_resize_quality")]
    pub resize_quality: u8,

    /// JPEG quality of the quality suite.
    #[serde(default = "default_quality_factor")]
    pub quality_factor: u8,

    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    #[serde(default = "default_min_time_ms")]
    pub min_time_ms: u64,

    /// Contender prefix the summary compares the winners against.
    #[serde(default = "default_reference")]
    pub reference: Option<String>,

    #[serde(default = "default_suites")]
    pub suites: Vec<SuiteKind>,
}

fn default_dimension() -> u32 {
    200
}

fn default_resize_quality() -> u8 {
    100
}

fn default_quality_factor() -> u8 {
    50
}

fn default_min_samples() -> usize {
    5
}

fn default_max_samples() -> usize {
    100
}

fn default_min_time_ms() -> u64 {
    1000
}

fn default_reference() -> Option<String> {
    Some("lanczos3".to_string())
}

fn default_suites() -> Vec<SuiteKind> {
    SuiteKind::ALL.to_vec()
}

impl Default for PerfSection {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            resize_quality: default_resize_quality(),
            quality_factor: default_quality_factor(),
            min_samples: default_min_samples(),
            max_samples: default_max_samples(),
            min_time_ms: default_min_time_ms(),
            reference: default_reference(),
            suites: default_suites(),
        }
    }
}

/// `[[scenario]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,

    /// Processors applied to every file, in order. Empty means identity.
    #[serde(default)]
    pub steps: Vec<ProcessorSpec>,
}
