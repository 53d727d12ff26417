// src/scenario/mod.rs

//! File-size benchmark driver.
//!
//! Each scenario becomes three steps on the sequential runner:
//!
//! 1. setup: copy the input images into the scratch area ([`scratch`]);
//! 2. measure: size, process, size again ([`measure_step`]);
//! 3. teardown: delete the scratch area.

pub mod driver;
pub mod measure_step;
pub mod scratch;

pub use driver::{BenchmarkDriver, DriverOptions, Scenario};
pub use measure_step::measure;
pub use scratch::ScratchArea;
