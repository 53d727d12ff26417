// tests/image_processing.rs

use std::path::PathBuf;
use std::sync::Arc;

use image::{GenericImageView, ImageFormat};
use tempfile::tempdir;

use imgbench::fs::{FileSystem, RealFileSystem};
use imgbench::processing::{
    Convert, OutputFormat, Processor, ProcessorSpec, Quality, Resize, ResizeFilter,
};
use imgbench::scenario::{BenchmarkDriver, DriverOptions};
use imgbench_test_utils::images::write_sample;
use imgbench_test_utils::{init_tracing, with_timeout};

fn real_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}

#[tokio::test]
async fn resize_halves_dimensions_and_keeps_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("photo.png");
    write_sample(&path, 64, 31, ImageFormat::Png);

    Resize::new(0.5, ResizeFilter::Lanczos3)
        .process(real_fs(), path.clone())
        .await
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let resized = image::load_from_memory(&bytes).unwrap();
    assert_eq!(resized.dimensions(), (32, 16));
}

#[tokio::test]
async fn lower_jpeg_quality_shrinks_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    write_sample(&path, 128, 128, ImageFormat::Jpeg);
    let before = std::fs::metadata(&path).unwrap().len();

    Quality::new(0.1).process(real_fs(), path.clone()).await.unwrap();

    let after = std::fs::metadata(&path).unwrap().len();
    assert!(after < before, "expected {after} < {before}");
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}

#[tokio::test]
async fn convert_rewrites_the_container_in_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    write_sample(&path, 16, 16, ImageFormat::Jpeg);

    Convert::new(OutputFormat::Png, None)
        .process(real_fs(), path.clone())
        .await
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
}

#[test]
fn real_write_does_not_create_missing_directories() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("scratch");

    let result = RealFileSystem.write(&gone.join("a.jpg"), b"late");

    assert!(result.is_err());
    assert!(!gone.exists());
}

#[tokio::test]
async fn undecodable_file_is_a_processing_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.jpg");
    std::fs::write(&path, b"definitely not an image").unwrap();

    let result = Quality::new(0.5).process(real_fs(), path.clone()).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read(&path).unwrap(), b"definitely not an image");
}

/// Full run over a real directory: one bad file is skipped, the rest are
/// resized, and the scratch area is removed afterwards.
#[tokio::test]
async fn driver_over_real_directory() {
    init_tracing();
    let root = tempdir().unwrap();
    let input = root.path().join("images");
    std::fs::create_dir(&input).unwrap();
    write_sample(&input.join("a.jpg"), 96, 64, ImageFormat::Jpeg);
    write_sample(&input.join("b.png"), 48, 48, ImageFormat::Png);
    std::fs::write(input.join("broken.jpg"), b"garbage").unwrap();
    std::fs::create_dir(input.join("nested")).unwrap();
    write_sample(&input.join("nested").join("skipped.png"), 8, 8, ImageFormat::Png);

    let scratch: PathBuf = root.path().join("scratch");
    let mut driver = BenchmarkDriver::new(
        real_fs(),
        DriverOptions {
            input_dir: input.clone(),
            scratch_dir: scratch.clone(),
            max_concurrent_files: 2,
            print_reports: false,
        },
    );
    let resize = ProcessorSpec::Resize {
        factor: 0.5,
        filter: ResizeFilter::Triangle,
    };
    driver.add_scenario("resize-50%", vec![resize.build()]);
    driver.add_scenario("qf-50", vec![ProcessorSpec::Quality { factor: 0.5 }.build()]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();

    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.files, 3, "nested directories are not copied");
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("broken.jpg"));
    }
    let resized = reports[0].ratio().unwrap();
    assert!(resized > 0.0 && resized < 1.0, "ratio {resized}");

    assert!(!scratch.exists());
    assert!(input.join("a.jpg").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn external_command_rewrites_each_file() {
    let root = tempdir().unwrap();
    let input = root.path().join("images");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("a.jpg"), vec![0u8; 100]).unwrap();
    std::fs::write(input.join("b.jpg"), vec![0u8; 300]).unwrap();

    let mut driver = BenchmarkDriver::new(
        real_fs(),
        DriverOptions {
            input_dir: input,
            scratch_dir: root.path().join("scratch"),
            max_concurrent_files: 0,
            print_reports: false,
        },
    );
    let shrink = ProcessorSpec::Command {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            "printf 0123456789 > \"$0\"".to_string(),
            "{file}".to_string(),
        ],
    };
    driver.add_scenario("shrink", vec![shrink.build()]);

    let reports = with_timeout(driver.run_all(|reports| reports)).await.unwrap();

    assert!(reports[0].failures.is_empty());
    assert_eq!(reports[0].ratio(), Some(10.0 / 200.0));
}
