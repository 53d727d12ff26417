// tests/measure_properties.rs

use std::path::Path;

use proptest::prelude::*;

use imgbench::fs::mock::MockFileSystem;
use imgbench::measure::{average_file_size, mean, SizeRatio};
use imgbench::processing::{jpeg_quality_for, Resize, ResizeFilter};

proptest! {
    #[test]
    fn mean_lies_between_min_and_max(sizes in proptest::collection::vec(0u64..10_000_000, 1..64)) {
        let m = mean(&sizes).unwrap();
        let min = *sizes.iter().min().unwrap() as f64;
        let max = *sizes.iter().max().unwrap() as f64;
        prop_assert!(m >= min && m <= max);
    }

    #[test]
    fn average_matches_directory_contents(sizes in proptest::collection::vec(0usize..4096, 1..16)) {
        let fs = MockFileSystem::new();
        for (i, size) in sizes.iter().enumerate() {
            fs.add_file(format!("dir/{i:02}.bin"), vec![0u8; *size]);
        }
        // Subdirectories never count towards the average.
        fs.add_file("dir/sub/ignored.bin", vec![0u8; 99_999]);

        let avg = average_file_size(&fs, Path::new("dir")).unwrap();
        let expected = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
        prop_assert!((avg - expected).abs() < 1e-9);
    }

    #[test]
    fn identical_means_give_unit_ratio(before in 1u64..1_000_000) {
        let ratio = SizeRatio::from_means(before as f64, before as f64).ratio();
        prop_assert_eq!(ratio, Some(1.0));
    }

    #[test]
    fn resize_targets_are_never_empty(
        w in 1u32..5000,
        h in 1u32..5000,
        factor in 0.0001f64..4.0,
    ) {
        let (tw, th) = Resize::new(factor, ResizeFilter::Triangle).target_dimensions(w, h);
        prop_assert!(tw >= 1 && th >= 1);
    }

    #[test]
    fn quality_always_in_jpeg_range(factor in 0.0f64..10.0) {
        let q = jpeg_quality_for(factor);
        prop_assert!((1..=100).contains(&q));
    }
}

#[test]
fn empty_directory_has_no_average() {
    let fs = MockFileSystem::new();
    fs.add_dir("empty");
    assert!(average_file_size(&fs, Path::new("empty")).is_err());
    assert_eq!(mean(&[]), None);
}
