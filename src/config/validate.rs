// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, PerfSection, RawConfigFile, ScenarioConfig};
use crate::errors::{BenchError, Result};
use crate::processing::ProcessorSpec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = BenchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.perf, raw.scenario))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_perf(&cfg.perf)?;
    validate_scenarios(&cfg.scenario)?;
    Ok(())
}

fn config_err(msg: impl Into<String>) -> BenchError {
    BenchError::ConfigError(msg.into())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.scratch_dir.as_os_str().is_empty() {
        return Err(config_err("[config].scratch_dir must not be empty"));
    }
    Ok(())
}

fn validate_perf(perf: &PerfSection) -> Result<()> {
    if perf.width == 0 || perf.height == 0 {
        return Err(config_err(format!(
            "[perf] width and height must be >= 1 (got {}x{})",
            perf.width, perf.height
        )));
    }
    for (key, q) in [
        ("resize_quality", perf.resize_quality),
        ("quality_factor", perf.quality_factor),
    ] {
        if !(1..=100).contains(&q) {
            return Err(config_err(format!("[perf].{key} must be in 1..=100 (got {q})")));
        }
    }
    if perf.min_samples == 0 {
        return Err(config_err("[perf].min_samples must be >= 1 (got 0)"));
    }
    if perf.max_samples < perf.min_samples {
        return Err(config_err(format!(
            "[perf].max_samples ({}) must be >= min_samples ({})",
            perf.max_samples, perf.min_samples
        )));
    }
    Ok(())
}

/// Scenario names must be unique and non-empty; see [`validate_step`] for the
/// per-processor rules.
pub fn validate_scenarios(scenarios: &[ScenarioConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for scenario in scenarios {
        if scenario.name.trim().is_empty() {
            return Err(config_err("every [[scenario]] needs a non-empty name"));
        }
        if !seen.insert(scenario.name.as_str()) {
            return Err(config_err(format!(
                "scenario '{}' is defined more than once",
                scenario.name
            )));
        }
        for step in &scenario.steps {
            validate_step(&scenario.name, step)?;
        }
    }
    Ok(())
}

pub fn validate_step(scenario: &str, step: &ProcessorSpec) -> Result<()> {
    match step {
        ProcessorSpec::Resize { factor, .. } => {
            if !factor.is_finite() || *factor <= 0.0 {
                return Err(config_err(format!(
                    "scenario '{scenario}': resize factor must be a positive number (got {factor})"
                )));
            }
        }
        ProcessorSpec::Quality { factor } => {
            if !factor.is_finite() || *factor <= 0.0 || *factor > 1.0 {
                return Err(config_err(format!(
                    "scenario '{scenario}': quality factor must be in (0, 1] (got {factor})"
                )));
            }
        }
        ProcessorSpec::Convert { quality, .. } => {
            if let Some(q) = quality {
                if !(1..=100).contains(q) {
                    return Err(config_err(format!(
                        "scenario '{scenario}': convert quality must be in 1..=100 (got {q})"
                    )));
                }
            }
        }
        ProcessorSpec::Command { program, .. } => {
            if program.trim().is_empty() {
                return Err(config_err(format!(
                    "scenario '{scenario}': command step needs a program"
                )));
            }
        }
    }
    Ok(())
}
