// src/measure/mod.rs

//! File-size measurement over a working directory.

pub mod size;

pub use size::{average_file_size, file_sizes, mean, SizeRatio};
