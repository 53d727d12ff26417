// src/scenario/measure_step.rs

//! The measurement step: size the working set, fan the processors out over
//! every file, join, and size it again.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::{BenchError, Result};
use crate::fs::FileSystem;
use crate::measure::{file_sizes, mean, SizeRatio};
use crate::processing::Processor;
use crate::report::{FileFailure, ScenarioReport};

/// Apply `processors` to every file in `dir` and report the size ratio.
///
/// Files are processed concurrently (at most `max_concurrent` at a time when
/// non-zero); the processors of a single file run in order. Files whose chain
/// fails are excluded from both the before and the after mean.
pub async fn measure(
    fs: Arc<dyn FileSystem>,
    dir: &Path,
    name: &str,
    processors: &[Arc<dyn Processor>],
    max_concurrent: usize,
) -> Result<ScenarioReport> {
    let before = sizes_of(&fs, dir).await?;
    if before.is_empty() {
        return Err(BenchError::EmptyDirectory(dir.to_path_buf()));
    }
    debug!(scenario = name, files = before.len(), "measured working set");

    let limit = (max_concurrent > 0).then(|| Arc::new(Semaphore::new(max_concurrent)));
    let started = Instant::now();

    let mut set = JoinSet::new();
    for (path, _) in &before {
        let fs = Arc::clone(&fs);
        let processors = processors.to_vec();
        let path = path.clone();
        let limit = limit.clone();
        set.spawn(async move {
            let _permit = match limit {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            apply_chain(fs, &processors, path).await
        });
    }

    let mut failures = Vec::new();
    while let Some(joined) = set.join_next().await {
        let outcome = joined.map_err(|e| BenchError::Other(anyhow::Error::from(e)))?;
        if let Err(failure) = outcome {
            warn!(
                scenario = name,
                file = %failure.path.display(),
                processor = %failure.processor,
                error = %failure.error,
                "processing failed; file excluded from averages"
            );
            failures.push(failure);
        }
    }
    let elapsed = started.elapsed();

    let after: HashMap<PathBuf, u64> = sizes_of(&fs, dir).await?.into_iter().collect();

    let mut failed: HashSet<PathBuf> = failures.iter().map(|f| f.path.clone()).collect();
    let mut before_sizes = Vec::new();
    let mut after_sizes = Vec::new();
    for (path, size) in &before {
        if failed.contains(path) {
            continue;
        }
        match after.get(path) {
            Some(&after_size) => {
                before_sizes.push(*size);
                after_sizes.push(after_size);
            }
            None => {
                warn!(scenario = name, file = %path.display(), "file disappeared during processing");
                failed.insert(path.clone());
                failures.push(FileFailure {
                    path: path.clone(),
                    processor: "<scenario>".to_string(),
                    error: "file no longer present after processing".to_string(),
                });
            }
        }
    }
    failures.sort_by(|a, b| a.path.cmp(&b.path));

    let sizes = match (mean(&before_sizes), mean(&after_sizes)) {
        (Some(b), Some(a)) => {
            if b == 0.0 {
                warn!(scenario = name, "processed files were all empty; ratio undefined");
            }
            Some(SizeRatio::from_means(b, a))
        }
        _ => {
            warn!(scenario = name, "no file processed successfully; ratio undefined");
            None
        }
    };

    let report = ScenarioReport {
        name: name.to_string(),
        elapsed,
        files: before.len(),
        failures,
        sizes,
    };
    info!(
        scenario = name,
        elapsed_ms = report.elapsed.as_millis() as u64,
        ratio = ?report.ratio(),
        failed = report.failures.len(),
        "scenario measured"
    );
    Ok(report)
}

async fn sizes_of(fs: &Arc<dyn FileSystem>, dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let fs = Arc::clone(fs);
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || file_sizes(fs.as_ref(), &dir))
        .await
        .map_err(|e| BenchError::Other(anyhow::Error::from(e)))?
}

/// Run every processor over one file, in order, stopping at the first error.
async fn apply_chain(
    fs: Arc<dyn FileSystem>,
    processors: &[Arc<dyn Processor>],
    path: PathBuf,
) -> std::result::Result<(), FileFailure> {
    for processor in processors {
        if let Err(err) = processor.process(Arc::clone(&fs), path.clone()).await {
            return Err(FileFailure {
                path,
                processor: processor.name(),
                error: err.to_string(),
            });
        }
    }
    Ok(())
}
