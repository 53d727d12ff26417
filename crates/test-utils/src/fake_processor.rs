use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use imgbench::fs::FileSystem;
use imgbench::processing::{ProcessFuture, Processor};
use tracing::debug;

/// Truncates every file to half its length (rounded down).
#[derive(Debug, Default)]
pub struct HalvingProcessor;

impl Processor for HalvingProcessor {
    fn name(&self) -> String {
        "halve".to_string()
    }

    fn process(&self, fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        Box::pin(async move {
            let bytes = fs.read(&path)?;
            debug!(file = %path.display(), from = bytes.len(), to = bytes.len() / 2, "halving");
            fs.write(&path, &bytes[..bytes.len() / 2])?;
            Ok(())
        })
    }
}

/// Fails for every file whose name contains `needle`; leaves the others
/// untouched.
#[derive(Debug)]
pub struct FailingProcessor {
    needle: String,
}

impl FailingProcessor {
    pub fn matching(needle: &str) -> Self {
        Self {
            needle: needle.to_string(),
        }
    }
}

impl Processor for FailingProcessor {
    fn name(&self) -> String {
        format!("fail-on({})", self.needle)
    }

    fn process(&self, _fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        Box::pin(async move {
            if path.to_string_lossy().contains(&self.needle) {
                debug!(file = %path.display(), needle = %self.needle, "failing on purpose");
                return Err(anyhow!("refusing to process {:?}", path).into());
            }
            Ok(())
        })
    }
}

/// Records `(label, path)` for every call, in call order.
#[derive(Debug)]
pub struct RecordingProcessor {
    label: String,
    calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl RecordingProcessor {
    pub fn new(label: &str, calls: Arc<Mutex<Vec<(String, PathBuf)>>>) -> Self {
        Self {
            label: label.to_string(),
            calls,
        }
    }
}

impl Processor for RecordingProcessor {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn process(&self, _fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.calls
                .lock()
                .unwrap()
                .push((self.label.clone(), path));
            Ok(())
        })
    }
}
