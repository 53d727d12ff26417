// src/scenario/scratch.rs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::errors::{BenchError, Result};
use crate::fs::FileSystem;

/// The scratch working area a scenario copies its inputs into.
///
/// Only one scenario may use it at a time; the task runner's strict
/// sequencing guarantees that. Clones share the record of whether the
/// directory was created by [`ScratchArea::prepare`], and only such a
/// directory is ever removed.
#[derive(Debug, Clone)]
pub struct ScratchArea {
    fs: Arc<dyn FileSystem>,
    input: PathBuf,
    path: PathBuf,
    created: Arc<AtomicBool>,
}

impl ScratchArea {
    pub fn new(fs: Arc<dyn FileSystem>, input: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            input: input.into(),
            path: path.into(),
            created: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the directory currently on disk was created by this area.
    pub fn is_owned(&self) -> bool {
        self.created.load(Ordering::SeqCst)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Create the area and copy the top-level regular files of the input
    /// directory into it. Returns the number of files copied.
    ///
    /// An existing scratch directory is never reused.
    pub fn prepare(&self, scenario: &str) -> Result<usize> {
        let setup_err = |source: anyhow::Error| BenchError::Setup {
            scenario: scenario.to_string(),
            source,
        };

        if !self.fs.is_dir(&self.input) {
            return Err(setup_err(anyhow!(
                "input directory {:?} does not exist",
                self.input
            )));
        }
        if self.fs.exists(&self.path) {
            return Err(BenchError::ScratchExists(self.path.clone()));
        }

        self.fs.create_dir_all(&self.path).map_err(setup_err)?;
        self.created.store(true, Ordering::SeqCst);

        match self.copy_inputs() {
            Ok(copied) => {
                info!(scenario, copied, scratch = %self.path.display(), "scratch area ready");
                Ok(copied)
            }
            Err(err) => {
                if let Err(cleanup) = self.remove() {
                    warn!(error = %cleanup, "could not remove partially filled scratch area");
                }
                Err(setup_err(err))
            }
        }
    }

    fn copy_inputs(&self) -> anyhow::Result<usize> {
        let mut copied = 0;
        for entry in self.fs.read_dir(&self.input)? {
            if !self.fs.is_file(&entry) {
                debug!(entry = %entry.display(), "not copying non-file input entry");
                continue;
            }
            let Some(name) = entry.file_name() else {
                continue;
            };
            self.fs.copy_file(&entry, &self.path.join(name))?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Delete the area if [`ScratchArea::prepare`] created it. A directory
    /// this area did not create is left alone, and a missing one is not an
    /// error.
    pub fn remove(&self) -> anyhow::Result<()> {
        if !self.is_owned() {
            debug!(scratch = %self.path.display(), "scratch area not created by this run; leaving it");
            return Ok(());
        }
        if self.fs.exists(&self.path) {
            self.fs.remove_dir_all(&self.path)?;
            debug!(scratch = %self.path.display(), "scratch area removed");
        }
        self.created.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn prepare_copies_files_only() {
        let mock = MockFileSystem::new();
        mock.add_file("in/a.jpg", vec![1u8; 4]);
        mock.add_file("in/b.png", vec![2u8; 8]);
        mock.add_file("in/nested/c.jpg", vec![3u8; 2]);
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());

        let area = ScratchArea::new(fs, "in", "tmp");
        assert_eq!(area.prepare("s").unwrap(), 2);
        assert_eq!(mock.file_size(Path::new("tmp/b.png")).unwrap(), 8);
        assert!(!mock.exists(Path::new("tmp/nested")));

        area.remove().unwrap();
        assert!(!mock.exists(Path::new("tmp")));
        area.remove().unwrap();
    }

    #[test]
    fn existing_scratch_is_refused() {
        let mock = MockFileSystem::new();
        mock.add_file("in/a.jpg", vec![1u8; 4]);
        mock.add_dir("tmp");
        let area = ScratchArea::new(Arc::new(mock.clone()), "in", "tmp");

        assert!(matches!(area.prepare("s"), Err(BenchError::ScratchExists(_))));
        assert!(!area.is_owned());
        area.remove().unwrap();
        assert!(mock.is_dir(Path::new("tmp")));
    }

    #[test]
    fn missing_input_is_a_setup_error() {
        let area = ScratchArea::new(Arc::new(MockFileSystem::new()), "nope", "tmp");
        match area.prepare("qf-50") {
            Err(BenchError::Setup { scenario, .. }) => assert_eq!(scenario, "qf-50"),
            other => panic!("expected setup error, got {other:?}"),
        }
    }
}
