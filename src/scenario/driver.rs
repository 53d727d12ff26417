// src/scenario/driver.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{BenchError, Result};
use crate::fs::FileSystem;
use crate::processing::Processor;
use crate::report::{print_scenario, ScenarioReport};
use crate::runner::TaskRunner;

use super::measure_step::measure;
use super::scratch::ScratchArea;

/// A named benchmark: the processors applied, in order, to every file.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub processors: Vec<Arc<dyn Processor>>,
}

/// Settings shared by every scenario of one driver run.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub input_dir: PathBuf,
    pub scratch_dir: PathBuf,
    /// Upper bound on files processed at once; 0 means unbounded.
    pub max_concurrent_files: usize,
    /// Print each scenario's timing and ratio lines as soon as it is measured.
    pub print_reports: bool,
}

/// Composes setup / measure / teardown for each scenario and runs them in
/// sequence on a [`TaskRunner`].
#[derive(Debug)]
pub struct BenchmarkDriver {
    fs: Arc<dyn FileSystem>,
    options: DriverOptions,
    scenarios: Vec<Scenario>,
    scratch: ScratchArea,
}

impl BenchmarkDriver {
    pub fn new(fs: Arc<dyn FileSystem>, options: DriverOptions) -> Self {
        let scratch = ScratchArea::new(
            Arc::clone(&fs),
            options.input_dir.clone(),
            options.scratch_dir.clone(),
        );
        Self {
            fs,
            options,
            scenarios: Vec::new(),
            scratch,
        }
    }

    /// Register a scenario. An empty processor list measures the identity.
    pub fn add_scenario(&mut self, name: impl Into<String>, processors: Vec<Arc<dyn Processor>>) {
        self.scenarios.push(Scenario {
            name: name.into(),
            processors,
        });
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Handle on the scratch area shared with the scheduled steps; it only
    /// removes the directory once a setup step has created it.
    pub fn scratch(&self) -> ScratchArea {
        self.scratch.clone()
    }

    /// Build the step sequence: three steps per scenario.
    pub fn into_runner(self) -> TaskRunner<ScenarioReport> {
        let mut runner = TaskRunner::new();
        let scratch = self.scratch();

        for scenario in self.scenarios {
            let name = scenario.name.clone();

            // setup
            {
                let scratch = scratch.clone();
                let name = name.clone();
                runner.register_task(move || async move {
                    tokio::task::spawn_blocking(move || scratch.prepare(&name))
                        .await
                        .map_err(|e| BenchError::Other(anyhow::Error::from(e)))??;
                    Ok(None)
                });
            }

            // measure
            {
                let scratch = scratch.clone();
                let fs = Arc::clone(&self.fs);
                let limit = self.options.max_concurrent_files;
                let print = self.options.print_reports;
                runner.register_task(move || async move {
                    let measured =
                        measure(fs, scratch.path(), &scenario.name, &scenario.processors, limit)
                            .await;
                    match measured {
                        Ok(report) => {
                            if print {
                                print_scenario(&report);
                            }
                            Ok(Some(report))
                        }
                        Err(err) => {
                            // The run stops here, so teardown will not get a turn.
                            if let Err(cleanup) = scratch.remove() {
                                warn!(error = %cleanup, "could not remove scratch area after failure");
                            }
                            Err(err)
                        }
                    }
                });
            }

            // teardown
            {
                let scratch = scratch.clone();
                runner.register_task(move || async move {
                    let removed = tokio::task::spawn_blocking(move || scratch.remove())
                        .await
                        .map_err(|e| BenchError::Other(anyhow::Error::from(e)))?;
                    removed.map_err(|source| BenchError::Teardown {
                        scenario: name,
                        source,
                    })?;
                    Ok(None)
                });
            }
        }

        runner
    }

    /// Run every registered scenario in order, then call `on_complete` with
    /// the reports.
    pub async fn run_all<F, R>(self, on_complete: F) -> Result<R>
    where
        F: FnOnce(Vec<ScenarioReport>) -> R,
    {
        info!(
            scenarios = self.scenarios.len(),
            input = %self.options.input_dir.display(),
            scratch = %self.options.scratch_dir.display(),
            "starting benchmark run"
        );
        self.into_runner().run(on_complete).await
    }
}
