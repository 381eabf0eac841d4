//! Progress reporting for the search engines.
//!
//! Engines never write to a global stream. Callers hand an [`Observer`]
//! to the runner and receive structured [`ProgressEvent`]s instead; the
//! runners call it once per generation / iteration and once on exit.

use std::time::Duration;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The generation / iteration budget was exhausted.
    MaxIterations,
    /// The wall-clock budget was exceeded.
    TimeLimit,
    /// Too many consecutive rounds without improving the best cost.
    Stagnation,
    /// The caller raised the cancellation flag.
    Cancelled,
}

/// A structured progress notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A BRKGA generation finished.
    Generation {
        generation: usize,
        best_fitness: f64,
        elapsed: Duration,
    },
    /// A GRASP iteration (construct + local search) finished on `worker`.
    Iteration {
        worker: usize,
        iteration: usize,
        best_cost: f64,
        elapsed: Duration,
    },
    /// A run ended.
    Finished { reason: StopReason, best: f64 },
}

/// Receives progress events from a running engine.
///
/// Implementations must be cheap: the hook runs on the search thread
/// (and, for parallel GRASP, concurrently from several workers).
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events to the `log` facade.
///
/// Per-round events go to `debug`, termination to `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Generation {
                generation,
                best_fitness,
                elapsed,
            } => log::debug!(
                "generation {generation} | best fitness {best_fitness} | {:.2?}",
                elapsed
            ),
            ProgressEvent::Iteration {
                worker,
                iteration,
                best_cost,
                elapsed,
            } => log::debug!(
                "worker {worker} iteration {iteration} | best cost {best_cost} | {:.2?}",
                elapsed
            ),
            ProgressEvent::Finished { reason, best } => {
                log::info!("search finished ({reason:?}) with best {best}")
            }
        }
    }
}

impl<O: Observer + ?Sized> Observer for &O {
    fn on_event(&self, event: &ProgressEvent) {
        (**self).on_event(event)
    }
}
