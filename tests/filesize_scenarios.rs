// tests/filesize_scenarios.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use imgbench::errors::BenchError;
use imgbench::fs::mock::MockFileSystem;
use imgbench::fs::FileSystem;
use imgbench::processing::Processor;
use imgbench::scenario::{BenchmarkDriver, DriverOptions};
use imgbench_test_utils::fake_processor::{FailingProcessor, HalvingProcessor, RecordingProcessor};
use imgbench_test_utils::{init_tracing, with_timeout};

fn driver_over(mock: &MockFileSystem) -> BenchmarkDriver {
    let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());
    BenchmarkDriver::new(
        fs,
        DriverOptions {
            input_dir: PathBuf::from("in"),
            scratch_dir: PathBuf::from("scratch"),
            max_concurrent_files: 0,
            print_reports: false,
        },
    )
}

/// Delegates to a `MockFileSystem` but refuses to copy one source file.
#[derive(Debug)]
struct FailingCopyFs {
    inner: MockFileSystem,
    broken: PathBuf,
}

impl FileSystem for FailingCopyFs {
    fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.inner.read(path)
    }
    fn write(&self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        self.inner.write(path, contents)
    }
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
    fn is_file(&self, path: &Path) -> bool {
        self.inner.is_file(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }
    fn file_size(&self, path: &Path) -> anyhow::Result<u64> {
        self.inner.file_size(path)
    }
    fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.inner.read_dir(path)
    }
    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        self.inner.create_dir_all(path)
    }
    fn copy_file(&self, from: &Path, to: &Path) -> anyhow::Result<u64> {
        if from == self.broken.as_path() {
            return Err(anyhow!("disk full"));
        }
        self.inner.copy_file(from, to)
    }
    fn remove_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        self.inner.remove_dir_all(path)
    }
}

fn sample_set() -> MockFileSystem {
    let mock = MockFileSystem::new();
    mock.add_file("in/a.jpg", vec![1u8; 100]);
    mock.add_file("in/b.jpg", vec![2u8; 200]);
    mock
}

#[tokio::test]
async fn halving_processor_reports_half_ratio() {
    init_tracing();
    let mock = sample_set();
    let mut driver = driver_over(&mock);
    driver.add_scenario("halve", vec![Arc::new(HalvingProcessor) as Arc<dyn Processor>]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.name, "halve");
    assert_eq!(report.files, 2);
    assert!(report.failures.is_empty());
    let sizes = report.sizes.unwrap();
    assert_eq!(sizes.before, 150.0);
    assert_eq!(sizes.after, 75.0);
    assert_eq!(report.ratio(), Some(0.5));
    assert_eq!(report.ratio_line(), "ratio: 0.5");
}

#[tokio::test]
async fn scenarios_start_from_pristine_inputs_and_clean_up() {
    let mock = sample_set();
    let mut driver = driver_over(&mock);
    driver.add_scenario("halve", vec![Arc::new(HalvingProcessor) as Arc<dyn Processor>]);
    driver.add_scenario("identity", vec![]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();

    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["halve", "identity"]);
    assert_eq!(reports[0].ratio(), Some(0.5));
    assert_eq!(reports[1].ratio(), Some(1.0));

    // Inputs are never touched; the scratch area is gone after teardown.
    assert_eq!(mock.file_size(Path::new("in/a.jpg")).unwrap(), 100);
    assert_eq!(mock.file_size(Path::new("in/b.jpg")).unwrap(), 200);
    assert!(!mock.exists(Path::new("scratch")));
}

#[tokio::test]
async fn failed_files_are_left_out_of_both_means() {
    let mock = MockFileSystem::new();
    mock.add_file("in/a.jpg", vec![0u8; 100]);
    mock.add_file("in/bad.jpg", vec![0u8; 1000]);
    mock.add_file("in/c.jpg", vec![0u8; 300]);

    let mut driver = driver_over(&mock);
    driver.add_scenario(
        "fail-then-halve",
        vec![
            Arc::new(FailingProcessor::matching("bad")) as Arc<dyn Processor>,
            Arc::new(HalvingProcessor),
        ],
    );

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();
    let report = &reports[0];

    assert_eq!(report.files, 3);
    assert_eq!(report.processed(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, PathBuf::from("scratch/bad.jpg"));
    assert_eq!(report.failures[0].processor, "fail-on(bad)");

    let sizes = report.sizes.unwrap();
    assert_eq!(sizes.before, 200.0);
    assert_eq!(sizes.after, 100.0);
    assert_eq!(report.ratio(), Some(0.5));
}

#[tokio::test]
async fn every_file_failing_leaves_ratio_undefined() {
    let mock = sample_set();
    let mut driver = driver_over(&mock);
    driver.add_scenario(
        "always-fails",
        vec![Arc::new(FailingProcessor::matching("jpg")) as Arc<dyn Processor>],
    );

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();
    let report = &reports[0];

    assert_eq!(report.ratio(), None);
    assert_eq!(report.ratio_line(), "ratio: n/a (0 of 2 files processed)");
    assert!(!mock.exists(Path::new("scratch")));
}

#[tokio::test]
async fn processors_run_in_order_for_each_file() {
    let mock = sample_set();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut driver = driver_over(&mock);
    driver.add_scenario(
        "recorded",
        vec![
            Arc::new(RecordingProcessor::new("first", Arc::clone(&calls))) as Arc<dyn Processor>,
            Arc::new(RecordingProcessor::new("second", Arc::clone(&calls))),
        ],
    );

    with_timeout(driver.run_all(|_| ())).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 4);
    for file in ["scratch/a.jpg", "scratch/b.jpg"] {
        let order: Vec<&str> = calls
            .iter()
            .filter(|(_, path)| path == Path::new(file))
            .map(|(label, _)| label.as_str())
            .collect();
        assert_eq!(order, vec!["first", "second"], "order for {file}");
    }
}

#[tokio::test]
async fn bounded_concurrency_still_processes_everything() {
    let mock = MockFileSystem::new();
    for i in 0..8 {
        mock.add_file(format!("in/{i}.png"), vec![0u8; 10 * (i + 1)]);
    }
    let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());
    let mut driver = BenchmarkDriver::new(
        fs,
        DriverOptions {
            input_dir: PathBuf::from("in"),
            scratch_dir: PathBuf::from("scratch"),
            max_concurrent_files: 2,
            print_reports: false,
        },
    );
    driver.add_scenario("halve", vec![Arc::new(HalvingProcessor) as Arc<dyn Processor>]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();
    assert_eq!(reports[0].files, 8);
    assert_eq!(reports[0].ratio(), Some(0.5));
}

#[tokio::test]
async fn empty_input_directory_is_an_error_and_cleans_up() {
    let mock = MockFileSystem::new();
    mock.add_dir("in");
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);

    let err = with_timeout(driver.run_all(|reports| reports)).await.unwrap_err();

    assert!(matches!(err, BenchError::EmptyDirectory(ref p) if p == Path::new("scratch")));
    assert!(!mock.exists(Path::new("scratch")));
}

#[tokio::test]
async fn existing_scratch_directory_is_refused() {
    let mock = sample_set();
    mock.add_file("scratch/keep.txt", b"precious".to_vec());
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);

    let err = with_timeout(driver.run_all(|reports| reports)).await.unwrap_err();

    assert!(matches!(err, BenchError::ScratchExists(ref p) if p == Path::new("scratch")));
    // Someone else's directory is never deleted.
    assert!(mock.exists(Path::new("scratch/keep.txt")));
}

#[tokio::test]
async fn missing_input_directory_fails_setup() {
    let mock = MockFileSystem::new();
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);

    let err = with_timeout(driver.run_all(|reports| reports)).await.unwrap_err();

    match err {
        BenchError::Setup { scenario, .. } => assert_eq!(scenario, "identity"),
        other => panic!("Expected Setup error, got: {:?}", other),
    }
}

#[tokio::test]
async fn no_scenarios_completes_with_no_reports() {
    let mock = sample_set();
    let driver = driver_over(&mock);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();
    assert!(reports.is_empty());
}

#[tokio::test]
async fn single_file_without_processing_has_unit_ratio() {
    let mock = MockFileSystem::new();
    mock.add_file("in/only.jpg", vec![7u8; 1234]);
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].files, 1);
    assert_eq!(reports[0].ratio(), Some(1.0));
    assert_eq!(reports[0].ratio_line(), "ratio: 1");
}

#[tokio::test]
async fn failed_copy_removes_the_partial_scratch_area() {
    let mock = sample_set();
    let flaky: Arc<dyn FileSystem> = Arc::new(FailingCopyFs {
        inner: mock.clone(),
        broken: PathBuf::from("in/b.jpg"),
    });
    let mut driver = BenchmarkDriver::new(
        flaky,
        DriverOptions {
            input_dir: PathBuf::from("in"),
            scratch_dir: PathBuf::from("scratch"),
            max_concurrent_files: 0,
            print_reports: false,
        },
    );
    driver.add_scenario("identity", vec![]);

    let err = with_timeout(driver.run_all(|reports| reports)).await.unwrap_err();

    match &err {
        BenchError::Setup { scenario, source } => {
            assert_eq!(scenario, "identity");
            assert!(source.to_string().contains("disk full"));
        }
        other => panic!("Expected Setup error, got: {:?}", other),
    }
    assert!(!mock.exists(Path::new("scratch")));
    assert!(!mock.exists(Path::new("scratch/a.jpg")));

    // A later run on a healthy filesystem is not blocked by leftovers.
    let mut retry = driver_over(&mock);
    retry.add_scenario("identity", vec![]);
    let reports = with_timeout(retry.run_all(|reports| reports)).await.unwrap();
    assert_eq!(reports[0].ratio(), Some(1.0));
}

#[tokio::test]
async fn empty_files_report_an_undefined_ratio() {
    let mock = MockFileSystem::new();
    mock.add_file("in/a.jpg", Vec::new());
    mock.add_file("in/b.jpg", Vec::new());
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();
    let report = &reports[0];

    assert_eq!(report.processed(), 2);
    assert!(report.sizes.is_some());
    assert_eq!(report.ratio(), None);
    assert_eq!(report.ratio_line(), "ratio: n/a (before mean is 0 bytes)");
}

#[tokio::test]
async fn interrupt_cleanup_spares_a_directory_the_run_did_not_create() {
    let mock = sample_set();
    mock.add_file("scratch/keep.txt", b"precious".to_vec());
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);
    let scratch = driver.scratch();

    let err = with_timeout(driver.run_all(|reports| reports)).await.unwrap_err();
    assert!(matches!(err, BenchError::ScratchExists(_)));

    // The Ctrl-C handler calls this on the shared handle.
    assert!(!scratch.is_owned());
    scratch.remove().unwrap();
    assert!(mock.exists(Path::new("scratch/keep.txt")));
}

#[tokio::test]
async fn writes_after_teardown_do_not_recreate_the_scratch_area() {
    let mock = sample_set();
    let mut driver = driver_over(&mock);
    driver.add_scenario("identity", vec![]);
    let scratch = driver.scratch();

    with_timeout(driver.run_all(|_| ())).await.unwrap();
    assert!(!scratch.is_owned());

    // A transcode still running on the blocking pool would finish with a
    // write into the removed directory.
    let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());
    assert!(fs.write(Path::new("scratch/a.jpg"), b"late").is_err());
    assert!(!mock.exists(Path::new("scratch")));
}
