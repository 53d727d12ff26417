// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{default_scenarios, ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// A file without any `[[scenario]]` entry gets the default plan.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let mut raw_config = load_from_path(&path)?;
    if raw_config.scenario.is_empty() {
        debug!("no [[scenario]] entries; using the default plan");
        raw_config.scenario = default_scenarios();
    }
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the config to use: an explicit path must exist; otherwise
/// `Imgbench.toml` is read when present, and built-in defaults apply when
/// it is not.
pub fn resolve(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let default = default_config_path();
            if default.is_file() {
                debug!(path = %default.display(), "using config from working directory");
                load_and_validate(default)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Default config path: `Imgbench.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Imgbench.toml")
}
