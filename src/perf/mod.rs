// src/perf/mod.rs

//! Execution-time suites.
//!
//! Every suite times a handful of contender variants of the same operation
//! against a fixture image and ranks them. Suites run in series on the
//! sequential [`TaskRunner`](crate::runner::TaskRunner).

pub mod contenders;
pub mod stats;
pub mod suite;

use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::runner::TaskRunner;

pub use contenders::{build_suite, Fixtures, PerfSettings, SuiteKind};
pub use stats::Stats;
pub use suite::{ContenderOutcome, ContenderResult, Suite, SuiteOptions, SuiteResult};

/// Everything one `perf` invocation needs.
#[derive(Debug, Clone)]
pub struct PerfPlan {
    pub fixtures: Fixtures,
    pub settings: PerfSettings,
    pub options: SuiteOptions,
    pub suites: Vec<SuiteKind>,
    /// Contender name prefix the summary compares against.
    pub reference: Option<String>,
    /// Print cycle lines and the summary to stdout.
    pub print: bool,
}

/// Run the planned suites one after another and return their results.
///
/// Suites whose fixture is missing are skipped.
pub async fn run_suites(fs: Arc<dyn FileSystem>, plan: PerfPlan) -> Result<Vec<SuiteResult>> {
    let mut runner = TaskRunner::new();

    for kind in plan.suites.iter().copied() {
        let fs = Arc::clone(&fs);
        let fixtures = plan.fixtures.clone();
        let settings = plan.settings;
        let options = plan.options.clone();
        let print = plan.print;
        runner.register_task(move || async move {
            let Some(suite) = build_suite(kind, &fs, &fixtures, settings)? else {
                return Ok(None);
            };
            info!(suite = %kind, contenders = suite.contender_names().count(), "running suite");
            let result = suite
                .run(&options, |suite, cycle| {
                    if print {
                        println!("{suite} {cycle}");
                    }
                })
                .await?;
            Ok(Some(result))
        });
    }

    let reference = plan.reference.clone();
    let print = plan.print;
    runner
        .run(move |results| {
            if print {
                for line in summary_lines(&results, reference.as_deref()) {
                    println!("{line}");
                }
            }
            results
        })
        .await
}

/// The fastest contender of each suite, plus a note for every suite where
/// the `reference` contender was not the fastest.
pub fn summary_lines(results: &[SuiteResult], reference: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    for result in results {
        match result.fastest.first() {
            Some(fastest) => {
                lines.push(format!("{}: fastest is {}", result.name, result.fastest.join(", ")));
                if let Some(reference) = reference {
                    if !fastest.starts_with(reference) {
                        lines.push(format!(
                            "{reference} was slower than {fastest} for {}",
                            result.name
                        ));
                    }
                }
            }
            None => lines.push(format!("{}: no contender completed", result.name)),
        }
    }
    lines
}
