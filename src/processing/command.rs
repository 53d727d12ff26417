// src/processing/command.rs

//! External encoder programs (mozjpeg's `cjpeg`, `jpegtran`, `guetzli`, ...)
//! run once per file through `tokio::process::Command`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::{debug, info};

use crate::fs::FileSystem;

use super::{ProcessFuture, Processor};

/// Placeholder replaced by the file path in every argument.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Runs `program args...` for each file.
///
/// The program is expected to rewrite the file in place. If no argument
/// contains [`FILE_PLACEHOLDER`], the path is appended as the last argument.
/// The path is handed to the program as-is, so this processor only makes
/// sense over the real filesystem.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Arguments with the placeholder substituted for `path`.
    pub fn args_for(&self, path: &Path) -> Vec<String> {
        let file = path.to_string_lossy();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(FILE_PLACEHOLDER, &file))
            .collect();
        if !self.args.iter().any(|a| a.contains(FILE_PLACEHOLDER)) {
            args.push(file.into_owned());
        }
        args
    }
}

impl Processor for ExternalCommand {
    fn name(&self) -> String {
        self.program.clone()
    }

    fn process(&self, _fs: Arc<dyn FileSystem>, path: PathBuf) -> ProcessFuture<'_> {
        Box::pin(async move {
            let args = self.args_for(&path);
            debug!(program = %self.program, ?args, "spawning encoder");

            let output = Command::new(&self.program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| format!("spawning '{}' for {:?}", self.program, path))?;

            if !output.stdout.is_empty() {
                debug!(
                    program = %self.program,
                    "stdout: {}",
                    String::from_utf8_lossy(&output.stdout).trim_end()
                );
            }

            if !output.status.success() {
                let code = output.status.code().unwrap_or(-1);
                return Err(anyhow!(
                    "'{}' exited with code {} for {:?}: {}",
                    self.program,
                    code,
                    path,
                    String::from_utf8_lossy(&output.stderr).trim_end()
                )
                .into());
            }

            info!(program = %self.program, file = %path.display(), "encoder finished");
            Ok(())
        })
    }
}
