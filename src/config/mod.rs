// src/config/mod.rs

//! Configuration loading and validation for imgbench.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate scenario and perf settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve};
pub use model::{ConfigFile, ConfigSection, PerfSection, RawConfigFile, ScenarioConfig};
pub use validate::{validate_scenarios, validate_step};
