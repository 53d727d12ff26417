// src/runner/sequence.rs

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info, warn};

use crate::errors::{BenchError, Result};

use super::continuation::{Next, Signal};

pub type StepFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A unit of work: receives its continuation and returns the future that
/// drives it.
pub type Step<T> = Box<dyn FnOnce(Next<T>) -> StepFuture + Send>;

/// Ordered queue of asynchronous steps executed strictly one after another.
///
/// Step `i + 1` is dispatched only once step `i` has fired its continuation
/// and its future has finished. Values passed through
/// [`Next::proceed_with`] are collected in step order and handed to the
/// completion callback.
pub struct TaskRunner<T> {
    steps: Vec<Step<T>>,
}

impl<T: Send + 'static> TaskRunner<T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step to the queue.
    pub fn register<F, Fut>(&mut self, step: F)
    where
        F: FnOnce(Next<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.steps
            .push(Box::new(move |next: Next<T>| -> StepFuture { Box::pin(step(next)) }));
    }

    /// Append a fallible step whose continuation is driven by its result:
    /// `Ok(value)` proceeds (optionally with an output), `Err` aborts the run.
    pub fn register_task<F, Fut>(&mut self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Option<T>>> + Send + 'static,
    {
        self.register(move |next: Next<T>| async move {
            match task().await {
                Ok(Some(value)) => next.proceed_with(value),
                Ok(None) => next.proceed(),
                Err(err) => next.fail(err),
            }
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drain the queue and call `on_complete` with the collected outputs.
    ///
    /// With no steps registered, `on_complete` runs immediately. If a step
    /// fails (or abandons its continuation) the run stops there and
    /// `on_complete` is not called.
    pub async fn run<F, R>(self, on_complete: F) -> Result<R>
    where
        F: FnOnce(Vec<T>) -> R,
    {
        let total = self.steps.len();
        let mut outputs = Vec::new();

        for (index, step) in self.steps.into_iter().enumerate() {
            debug!(index, total, "dispatching step");
            let (next, signal_rx) = Next::new(index);
            step(next).await;

            match signal_rx.await {
                Ok(Signal::Proceed(output)) => {
                    debug!(index, with_output = output.is_some(), "step completed");
                    outputs.extend(output);
                }
                Ok(Signal::Fail(err)) => {
                    warn!(index, error = %err, "step failed; aborting run");
                    return Err(err);
                }
                Err(_) => {
                    warn!(index, "step dropped its continuation");
                    return Err(BenchError::StepAbandoned { index });
                }
            }
        }

        info!(steps = total, "all steps completed");
        Ok(on_complete(outputs))
    }

    /// Drain the queue and return the collected outputs.
    pub async fn run_to_end(self) -> Result<Vec<T>> {
        self.run(|outputs| outputs).await
    }
}

impl<T: Send + 'static> Default for TaskRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outputs_follow_registration_order() {
        let mut runner = TaskRunner::new();
        runner.register(|next| async move { next.proceed_with("first") });
        runner.register(|next| async move { next.proceed() });
        runner.register(|next| async move { next.proceed_with("third") });
        assert_eq!(runner.len(), 3);

        let outputs = runner.run_to_end().await.unwrap();
        assert_eq!(outputs, vec!["first", "third"]);
    }

    #[tokio::test]
    async fn continuation_may_fire_from_spawned_task() {
        let mut runner = TaskRunner::new();
        runner.register(|next| async move {
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                next.proceed_with(7u32);
            });
        });

        assert_eq!(runner.run_to_end().await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn register_task_error_aborts() {
        let mut runner: TaskRunner<()> = TaskRunner::new();
        runner.register_task(|| async {
            Err(BenchError::ConfigError("boom".to_string()))
        });

        let err = runner.run_to_end().await.unwrap_err();
        assert!(matches!(err, BenchError::ConfigError(ref m) if m == "boom"));
    }
}
