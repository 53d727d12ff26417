// src/perf/suite.rs

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::{BenchError, Result};

use super::stats::Stats;

/// The timed operation of a contender. Runs on the blocking pool.
pub type Job = Arc<dyn Fn() -> Result<()> + Send + Sync>;

pub struct Contender {
    pub name: String,
    job: Job,
}

impl fmt::Debug for Contender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contender").field("name", &self.name).finish()
    }
}

/// Sampling limits for one contender.
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub min_samples: usize,
    pub max_samples: usize,
    /// Keep sampling until this much time was spent (bounded by
    /// `max_samples`).
    pub min_time: Duration,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            min_samples: 5,
            max_samples: 100,
            min_time: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContenderOutcome {
    Measured(Stats),
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContenderResult {
    pub name: String,
    pub outcome: ContenderOutcome,
}

impl ContenderResult {
    pub fn stats(&self) -> Option<&Stats> {
        match &self.outcome {
            ContenderOutcome::Measured(stats) => Some(stats),
            ContenderOutcome::Errored(_) => None,
        }
    }
}

impl fmt::Display for ContenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ContenderOutcome::Measured(s) => write!(
                f,
                "{} x {:.2} ops/sec \u{b1}{:.2}% ({} runs sampled)",
                self.name,
                s.ops_per_sec(),
                s.rme,
                s.samples
            ),
            ContenderOutcome::Errored(err) => write!(f, "{} errored: {}", self.name, err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteResult {
    pub name: String,
    pub results: Vec<ContenderResult>,
    /// Contenders statistically tied for fastest, fastest first.
    pub fastest: Vec<String>,
}

/// A named set of contenders timed one after another.
#[derive(Debug)]
pub struct Suite {
    name: String,
    contenders: Vec<Contender>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contenders: Vec::new(),
        }
    }

    pub fn add<F>(mut self, name: impl Into<String>, job: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.contenders.push(Contender {
            name: name.into(),
            job: Arc::new(job),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contender_names(&self) -> impl Iterator<Item = &str> {
        self.contenders.iter().map(|c| c.name.as_str())
    }

    /// Time every contender; `on_cycle` is called as each one finishes.
    ///
    /// A contender whose job fails is reported as errored and left out of the
    /// ranking; the others still run.
    pub async fn run<C>(self, options: &SuiteOptions, mut on_cycle: C) -> Result<SuiteResult>
    where
        C: FnMut(&str, &ContenderResult),
    {
        let mut results = Vec::with_capacity(self.contenders.len());

        for contender in self.contenders {
            let job = Arc::clone(&contender.job);
            let opts = options.clone();
            let sampled = tokio::task::spawn_blocking(move || sample(job.as_ref(), &opts))
                .await
                .map_err(|e| BenchError::Other(anyhow::Error::from(e)))?;

            let outcome = match sampled {
                Ok(samples) => match Stats::from_samples(&samples) {
                    Some(stats) => ContenderOutcome::Measured(stats),
                    None => ContenderOutcome::Errored("no samples collected".to_string()),
                },
                Err(err) => {
                    warn!(suite = %self.name, contender = %contender.name, error = %err, "contender failed");
                    ContenderOutcome::Errored(err.to_string())
                }
            };

            let result = ContenderResult {
                name: contender.name,
                outcome,
            };
            on_cycle(&self.name, &result);
            results.push(result);
        }

        let fastest = fastest(&results);
        debug!(suite = %self.name, ?fastest, "suite complete");
        Ok(SuiteResult {
            name: self.name,
            results,
            fastest,
        })
    }
}

/// One untimed warm-up call, then timed calls until both the sample and the
/// time minimums are met.
fn sample(job: &(dyn Fn() -> Result<()> + Send + Sync), options: &SuiteOptions) -> Result<Vec<f64>> {
    job()?;

    let min_samples = options.min_samples.max(1);
    let max_samples = options.max_samples.max(min_samples);
    let started = Instant::now();
    let mut samples = Vec::with_capacity(min_samples);

    while samples.len() < min_samples
        || (started.elapsed() < options.min_time && samples.len() < max_samples)
    {
        let t = Instant::now();
        job()?;
        samples.push(t.elapsed().as_secs_f64());
    }
    Ok(samples)
}

/// Names of the contenders whose confidence interval overlaps the one with
/// the lowest mean time, ordered fastest first.
pub fn fastest(results: &[ContenderResult]) -> Vec<String> {
    let mut measured: Vec<(&str, &Stats)> = results
        .iter()
        .filter_map(|r| r.stats().map(|s| (r.name.as_str(), s)))
        .collect();
    measured.sort_by(|a, b| a.1.mean.total_cmp(&b.1.mean));

    let Some(&(_, best)) = measured.first() else {
        return Vec::new();
    };
    let upper = best.mean + best.moe;
    measured
        .into_iter()
        .filter(|(_, s)| s.mean - s.moe <= upper)
        .map(|(name, _)| name.to_string())
        .collect()
}
