// src/report.rs

//! Result types printed to stdout.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::measure::SizeRatio;

/// A file whose processing chain failed; it is left out of both averages.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub processor: String,
    pub error: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed on {}: {}",
            self.processor,
            self.path.display(),
            self.error
        )
    }
}

/// Outcome of one scenario's measurement step.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    /// Wall time spent applying the processors to the working set.
    pub elapsed: Duration,
    /// Number of files in the working set before processing.
    pub files: usize,
    pub failures: Vec<FileFailure>,
    /// Means over the files that were processed successfully; `None` when
    /// none were.
    pub sizes: Option<SizeRatio>,
}

impl ScenarioReport {
    pub fn processed(&self) -> usize {
        self.files - self.failures.len()
    }

    pub fn ratio(&self) -> Option<f64> {
        self.sizes.and_then(|s| s.ratio())
    }

    /// `<name>: <ms>ms`
    pub fn timing_line(&self) -> String {
        format!("{}: {:.3}ms", self.name, self.elapsed.as_secs_f64() * 1000.0)
    }

    /// `ratio: <after/before>`
    pub fn ratio_line(&self) -> String {
        match (self.sizes, self.ratio()) {
            (_, Some(r)) => format!("ratio: {r}"),
            (Some(_), None) => "ratio: n/a (before mean is 0 bytes)".to_string(),
            (None, None) => format!(
                "ratio: n/a ({} of {} files processed)",
                self.processed(),
                self.files
            ),
        }
    }
}

/// Print the timing and ratio lines of a scenario.
pub fn print_scenario(report: &ScenarioReport) {
    println!("{}", report.timing_line());
    println!("{}", report.ratio_line());
    for failure in &report.failures {
        println!("  skipped: {failure}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(sizes: Option<SizeRatio>, failures: usize) -> ScenarioReport {
        ScenarioReport {
            name: "resize-50%".to_string(),
            elapsed: Duration::from_micros(12_345),
            files: 3,
            failures: (0..failures)
                .map(|i| FileFailure {
                    path: PathBuf::from(format!("f{i}.jpg")),
                    processor: "resize(0.5, triangle)".to_string(),
                    error: "bad data".to_string(),
                })
                .collect(),
            sizes,
        }
    }

    #[test]
    fn lines_for_a_measured_scenario() {
        let r = report(Some(SizeRatio::from_means(200.0, 100.0)), 0);
        assert_eq!(r.timing_line(), "resize-50%: 12.345ms");
        assert_eq!(r.ratio_line(), "ratio: 0.5");
    }

    #[test]
    fn ratio_line_without_measurements_is_explicit() {
        let r = report(None, 3);
        assert_eq!(r.processed(), 0);
        assert_eq!(r.ratio_line(), "ratio: n/a (0 of 3 files processed)");
    }

    #[test]
    fn ratio_line_for_empty_files_names_the_cause() {
        let r = report(Some(SizeRatio::from_means(0.0, 0.0)), 0);
        assert_eq!(r.ratio(), None);
        assert_eq!(r.ratio_line(), "ratio: n/a (before mean is 0 bytes)");
    }
}
