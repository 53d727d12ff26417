// src/runner/continuation.rs

use tokio::sync::oneshot;

use crate::errors::BenchError;

/// What a step reported through its continuation.
#[derive(Debug)]
pub(crate) enum Signal<T> {
    Proceed(Option<T>),
    Fail(BenchError),
}

/// Continuation handed to every step.
///
/// Exactly one of [`Next::proceed`], [`Next::proceed_with`] or [`Next::fail`]
/// must be called; each consumes the handle. Dropping it without calling any
/// of them makes the runner stop with [`BenchError::StepAbandoned`].
#[derive(Debug)]
pub struct Next<T> {
    index: usize,
    tx: oneshot::Sender<Signal<T>>,
}

impl<T> Next<T> {
    pub(crate) fn new(index: usize) -> (Self, oneshot::Receiver<Signal<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self { index, tx }, rx)
    }

    /// Position of the step this continuation belongs to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Signal completion without an output.
    pub fn proceed(self) {
        self.send(Signal::Proceed(None));
    }

    /// Signal completion and hand `value` to the completion callback.
    pub fn proceed_with(self, value: T) {
        self.send(Signal::Proceed(Some(value)));
    }

    /// Abort the whole run with `err`. Later steps never start.
    pub fn fail(self, err: impl Into<BenchError>) {
        self.send(Signal::Fail(err.into()));
    }

    fn send(self, signal: Signal<T>) {
        // The receiver only goes away if the run itself was dropped.
        let _ = self.tx.send(signal);
    }
}
