// src/measure/size.rs

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::errors::{BenchError, Result};
use crate::fs::FileSystem;

/// Sizes of the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories are skipped.
pub fn file_sizes(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let mut sizes = Vec::new();
    for path in fs.read_dir(dir)? {
        if !fs.is_file(&path) {
            trace!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        let size = fs.file_size(&path)?;
        sizes.push((path, size));
    }
    sizes.sort();
    Ok(sizes)
}

/// Arithmetic mean of byte sizes; `None` for an empty set.
pub fn mean(sizes: &[u64]) -> Option<f64> {
    if sizes.is_empty() {
        return None;
    }
    let total: u128 = sizes.iter().map(|&s| u128::from(s)).sum();
    Some(total as f64 / sizes.len() as f64)
}

/// Mean file size of `dir`. An empty directory is an error, never NaN.
pub fn average_file_size(fs: &dyn FileSystem, dir: &Path) -> Result<f64> {
    let sizes: Vec<u64> = file_sizes(fs, dir)?.into_iter().map(|(_, s)| s).collect();
    mean(&sizes).ok_or_else(|| BenchError::EmptyDirectory(dir.to_path_buf()))
}

/// Before/after mean sizes of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRatio {
    pub before: f64,
    pub after: f64,
}

impl SizeRatio {
    pub fn from_means(before: f64, after: f64) -> Self {
        Self { before, after }
    }

    /// `after / before`. `None` when the before mean is zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.before == 0.0 {
            None
        } else {
            Some(self.after / self.before)
        }
    }
}
