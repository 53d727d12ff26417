// src/runner/mod.rs

//! Sequential task runner.
//!
//! Steps are registered in order and executed one at a time. Each step gets a
//! [`Next`] continuation; the runner moves on only when that continuation is
//! invoked. Both the scenario driver and the perf suites are expressed as
//! step sequences on top of this.

pub mod continuation;
pub mod sequence;

pub use continuation::Next;
pub use sequence::{Step, StepFuture, TaskRunner};
