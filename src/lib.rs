// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod measure;
pub mod perf;
pub mod processing;
pub mod report;
pub mod runner;
pub mod scenario;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{validate_scenarios, ConfigFile, ScenarioConfig};
use crate::errors::{BenchError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::perf::{Fixtures, PerfPlan, PerfSettings, SuiteOptions};
use crate::processing::ProcessorSpec;
use crate::report::ScenarioReport;
use crate::scenario::{BenchmarkDriver, DriverOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file or built-in defaults) and CLI overrides
/// - the scenario driver or the perf suites
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(args.config.as_deref())?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command {
        Command::Filesize {
            input,
            scratch,
            dry_run,
        } => {
            let scratch = scratch.unwrap_or_else(|| cfg.config.scratch_dir.clone());
            let driver = build_driver(fs, &cfg, input, scratch, &cfg.scenario);
            if dry_run {
                print_dry_run(&driver);
                return Ok(());
            }
            run_driver(driver).await.map(drop)
        }
        Command::Resize {
            input,
            factor,
            filter,
        } => {
            let scenario = ScenarioConfig {
                name: format!("resize-{}%", percent(factor)),
                steps: vec![ProcessorSpec::Resize { factor, filter }],
            };
            run_single(fs, &cfg, input, scenario).await
        }
        Command::Quality { input, factor } => {
            let scenario = ScenarioConfig {
                name: format!("qf-{}", percent(factor)),
                steps: vec![ProcessorSpec::Quality { factor }],
            };
            run_single(fs, &cfg, input, scenario).await
        }
        Command::Perf { fixtures, suites } => {
            let plan = perf_plan(&cfg, fixtures, suites);
            perf::run_suites(fs, plan).await?;
            Ok(())
        }
    }
}

fn percent(factor: f64) -> String {
    format!("{}", (factor * 100.0 * 100.0).round() / 100.0)
}

async fn run_single(
    fs: Arc<dyn FileSystem>,
    cfg: &ConfigFile,
    input: PathBuf,
    scenario: ScenarioConfig,
) -> Result<()> {
    let scenarios = [scenario];
    validate_scenarios(&scenarios)?;
    let driver = build_driver(fs, cfg, input, cfg.config.scratch_dir.clone(), &scenarios);
    run_driver(driver).await.map(drop)
}

/// Build a driver over `scenarios`, with the processors instantiated from
/// their `ProcessorSpec` entries.
pub fn build_driver(
    fs: Arc<dyn FileSystem>,
    cfg: &ConfigFile,
    input: PathBuf,
    scratch: PathBuf,
    scenarios: &[ScenarioConfig],
) -> BenchmarkDriver {
    let options = DriverOptions {
        input_dir: input,
        scratch_dir: scratch,
        max_concurrent_files: cfg.config.max_concurrent_files,
        print_reports: true,
    };
    let mut driver = BenchmarkDriver::new(fs, options);
    for scenario in scenarios {
        let processors = scenario.steps.iter().map(ProcessorSpec::build).collect();
        driver.add_scenario(scenario.name.clone(), processors);
    }
    driver
}

/// Run all scenarios; on Ctrl-C, abandon the run and remove the scratch area
/// if this run created it.
async fn run_driver(driver: BenchmarkDriver) -> Result<Vec<ScenarioReport>> {
    let scratch = driver.scratch();

    tokio::select! {
        outcome = driver.run_all(|reports| {
            println!("done");
            reports
        }) => outcome,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            warn!(
                scratch = %scratch.path().display(),
                owned = scratch.is_owned(),
                "interrupted; removing scratch area"
            );
            if let Err(e) = scratch.remove() {
                warn!(error = %e, "could not remove scratch area");
            }
            Err(BenchError::Other(anyhow!("interrupted")))
        }
    }
}

fn perf_plan(cfg: &ConfigFile, fixtures: PathBuf, suites: Vec<perf::SuiteKind>) -> PerfPlan {
    let perf = &cfg.perf;
    let suites = if suites.is_empty() {
        perf.suites.clone()
    } else {
        suites
    };
    PerfPlan {
        fixtures: Fixtures::new(fixtures),
        settings: PerfSettings {
            width: perf.width,
            height: perf.height,
            resize_quality: perf.resize_quality,
            quality: perf.quality_factor,
        },
        options: SuiteOptions {
            min_samples: perf.min_samples,
            max_samples: perf.max_samples,
            min_time: Duration::from_millis(perf.min_time_ms),
        },
        suites,
        reference: perf.reference.clone().filter(|r| !r.is_empty()),
        print: true,
    }
}

/// Simple dry-run output: print the scenario plan.
fn print_dry_run(driver: &BenchmarkDriver) {
    let options = driver.options();
    println!("imgbench dry-run");
    println!("  input = {}", options.input_dir.display());
    println!("  scratch = {}", options.scratch_dir.display());
    if options.max_concurrent_files > 0 {
        println!("  max_concurrent_files = {}", options.max_concurrent_files);
    }
    println!();

    println!("scenarios ({}):", driver.scenarios().len());
    for scenario in driver.scenarios() {
        println!("  - {}", scenario.name);
        if scenario.processors.is_empty() {
            println!("      (identity)");
        }
        for processor in &scenario.processors {
            println!("      {}", processor.name());
        }
    }

    debug!("dry-run complete (no execution)");
}
