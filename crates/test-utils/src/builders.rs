use std::path::PathBuf;

use imgbench::config::{ConfigFile, ConfigSection, PerfSection, RawConfigFile, ScenarioConfig};
use imgbench::processing::{OutputFormat, ProcessorSpec, ResizeFilter};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                perf: PerfSection::default(),
                scenario: Vec::new(),
            },
        }
    }

    pub fn with_scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.config.scenario.push(scenario);
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.config.scratch_dir = dir.into();
        self
    }

    pub fn with_max_concurrent_files(mut self, n: usize) -> Self {
        self.config.config.max_concurrent_files = n;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ScenarioConfig`.
pub struct ScenarioBuilder {
    scenario: ScenarioConfig,
}

impl ScenarioBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            scenario: ScenarioConfig {
                name: name.to_string(),
                steps: vec![],
            },
        }
    }

    pub fn resize(mut self, factor: f64) -> Self {
        self.scenario.steps.push(ProcessorSpec::Resize {
            factor,
            filter: ResizeFilter::Triangle,
        });
        self
    }

    pub fn resize_with(mut self, factor: f64, filter: ResizeFilter) -> Self {
        self.scenario
            .steps
            .push(ProcessorSpec::Resize { factor, filter });
        self
    }

    pub fn quality(mut self, factor: f64) -> Self {
        self.scenario.steps.push(ProcessorSpec::Quality { factor });
        self
    }

    pub fn convert(mut self, format: OutputFormat) -> Self {
        self.scenario.steps.push(ProcessorSpec::Convert {
            format,
            quality: None,
        });
        self
    }

    pub fn command(mut self, program: &str, args: &[&str]) -> Self {
        self.scenario.steps.push(ProcessorSpec::Command {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> ScenarioConfig {
        self.scenario
    }
}
