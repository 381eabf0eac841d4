//! GRASP execution engine.
//!
//! # Algorithm
//!
//! 1. Construct a solution with randomized greedy choices (`alfa`)
//! 2. Improve it with local search
//! 3. Keep it if it beats the best cost so far
//! 4. Repeat until the iteration budget, the time budget or the
//!    stagnation limit is hit
//!
//! The parallel variant runs independent copies of this loop on the
//! rayon pool, each with its own random stream and `⌈max_iterations /
//! workers⌉` iterations, and keeps the cheapest result (fork-join,
//! min-reduce). Workers share the problem read-only.

use super::config::GraspConfig;
use super::types::GraspProblem;
use crate::error::Result;
use crate::observer::{NoopObserver, Observer, ProgressEvent, StopReason};
use crate::random::{create_rng, derive_seed};
use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a GRASP run.
#[derive(Debug, Clone)]
pub struct GraspResult<S: Clone> {
    /// Best solution found.
    pub best: S,
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Iterations executed, summed over all workers.
    pub iterations: usize,
    /// Worker that produced `best` (0 for the sequential runner).
    pub worker: usize,
    /// Why the winning worker stopped.
    pub stop_reason: StopReason,
    /// Best cost after each iteration of the winning worker.
    pub cost_history: Vec<f64>,
}

/// GRASP runner.
pub struct GraspRunner;

impl GraspRunner {
    /// Executes sequential GRASP with the full iteration budget.
    pub fn run<P: GraspProblem>(problem: &P, config: &GraspConfig) -> Result<GraspResult<P::Solution>> {
        Self::run_with_observer(problem, config, &NoopObserver, None)
    }

    /// Sequential GRASP with progress reporting and cancellation.
    pub fn run_with_observer<P: GraspProblem, O: Observer>(
        problem: &P,
        config: &GraspConfig,
        observer: &O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GraspResult<P::Solution>> {
        config.validate()?;
        let mut rng = create_rng(config.seed.unwrap_or_else(rand::random));
        let search = Search {
            config,
            budget: config.max_iterations,
            start: Instant::now(),
            cancel: cancel.as_deref(),
        };
        let outcome = search.run(problem, 0, &mut rng, observer);
        observer.on_event(&ProgressEvent::Finished {
            reason: outcome.stop_reason,
            best: outcome.best_cost,
        });
        Ok(outcome.into_result(0))
    }

    /// Executes `config.workers` independent restarts concurrently.
    pub fn run_parallel<P: GraspProblem>(
        problem: &P,
        config: &GraspConfig,
    ) -> Result<GraspResult<P::Solution>> {
        Self::run_parallel_with_observer(problem, config, &NoopObserver, None)
    }

    /// Parallel GRASP with progress reporting and cancellation.
    pub fn run_parallel_with_observer<P: GraspProblem, O: Observer>(
        problem: &P,
        config: &GraspConfig,
        observer: &O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GraspResult<P::Solution>> {
        config.validate()?;
        let base_seed = config.seed.unwrap_or_else(rand::random);
        let search = Search {
            config,
            budget: config.iterations_per_worker(),
            start: Instant::now(),
            cancel: cancel.as_deref(),
        };

        let outcomes: Vec<WorkerOutcome<P::Solution>> = (0..config.workers)
            .into_par_iter()
            .map(|worker| {
                let mut rng = create_rng(derive_seed(base_seed, worker as u64));
                search.run(problem, worker, &mut rng, observer)
            })
            .collect();

        let total_iterations: usize = outcomes.iter().map(|o| o.iterations).sum();
        // Ties go to the lowest worker index so a seeded run is reproducible.
        let (worker, winner) = outcomes
            .into_iter()
            .enumerate()
            .reduce(|a, b| if b.1.best_cost < a.1.best_cost { b } else { a })
            .ok_or_else(|| crate::Error::InvalidConfig("workers must be at least 1".into()))?;

        log::debug!(
            "parallel grasp: worker {worker} won with cost {} after {total_iterations} total iterations",
            winner.best_cost
        );
        observer.on_event(&ProgressEvent::Finished {
            reason: winner.stop_reason,
            best: winner.best_cost,
        });

        let mut result = winner.into_result(worker);
        result.iterations = total_iterations;
        Ok(result)
    }
}

/// Shared, read-only parameters of one search loop.
struct Search<'a> {
    config: &'a GraspConfig,
    budget: usize,
    start: Instant,
    cancel: Option<&'a AtomicBool>,
}

struct WorkerOutcome<S> {
    best: S,
    best_cost: f64,
    iterations: usize,
    stop_reason: StopReason,
    cost_history: Vec<f64>,
}

impl<S: Clone> WorkerOutcome<S> {
    fn into_result(self, worker: usize) -> GraspResult<S> {
        GraspResult {
            best: self.best,
            best_cost: self.best_cost,
            iterations: self.iterations,
            worker,
            stop_reason: self.stop_reason,
            cost_history: self.cost_history,
        }
    }
}

impl Search<'_> {
    fn iterate<P: GraspProblem, R: Rng>(&self, problem: &P, rng: &mut R) -> (P::Solution, f64) {
        let (constructed, _) = problem.construct(self.config.alfa, rng);
        problem.local_search(constructed)
    }

    /// Iterate-and-keep-best. Termination is checked after every
    /// iteration, so at least one solution is always produced.
    fn run<P: GraspProblem, R: Rng, O: Observer>(
        &self,
        problem: &P,
        worker: usize,
        rng: &mut R,
        observer: &O,
    ) -> WorkerOutcome<P::Solution> {
        let time_limit = self.config.time_limit_ms.map(Duration::from_millis);

        let (mut best, mut best_cost) = self.iterate(problem, rng);
        let mut cost_history = vec![best_cost];
        let mut iterations = 1usize;
        let mut no_improve = 0usize;
        self.report(observer, worker, iterations, best_cost);

        let stop_reason = loop {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break StopReason::Cancelled;
            }
            if iterations >= self.budget {
                break StopReason::MaxIterations;
            }
            if time_limit.is_some_and(|limit| self.start.elapsed() > limit) {
                break StopReason::TimeLimit;
            }
            if self.config.stagnation_limit > 0 && no_improve > self.config.stagnation_limit {
                break StopReason::Stagnation;
            }

            let (candidate, cost) = self.iterate(problem, rng);
            iterations += 1;
            if cost < best_cost {
                best = candidate;
                best_cost = cost;
                no_improve = 0;
            } else {
                no_improve += 1;
            }
            cost_history.push(best_cost);
            self.report(observer, worker, iterations, best_cost);
        };

        WorkerOutcome {
            best,
            best_cost,
            iterations,
            stop_reason,
            cost_history,
        }
    }

    fn report<O: Observer>(&self, observer: &O, worker: usize, iteration: usize, best_cost: f64) {
        observer.on_event(&ProgressEvent::Iteration {
            worker,
            iteration,
            best_cost,
            elapsed: self.start.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grasp::{GraspConfig, GraspProblem};
    use std::sync::Mutex;

    // ---- Subset cover toy: pick numbers from 1..=9 summing to >= 20 ----
    //
    // Construction draws from an RCL of the largest remaining numbers;
    // local search drops any number that is not needed to stay >= 20.
    // Cost is the number of picks.

    struct SumCover;

    impl GraspProblem for SumCover {
        type Solution = Vec<u32>;

        fn construct<R: Rng>(&self, alfa: f64, rng: &mut R) -> (Vec<u32>, f64) {
            let mut pool: Vec<u32> = (1..=9).collect();
            let mut picked = Vec::new();
            while picked.iter().sum::<u32>() < 20 {
                let best = *pool.iter().max().unwrap() as f64;
                let worst = *pool.iter().min().unwrap() as f64;
                let threshold = best - alfa * (best - worst);
                let rcl: Vec<usize> = (0..pool.len())
                    .filter(|&i| pool[i] as f64 >= threshold)
                    .collect();
                let pick = rcl[rng.random_range(0..rcl.len())];
                picked.push(pool.swap_remove(pick));
            }
            let cost = picked.len() as f64;
            (picked, cost)
        }

        fn local_search(&self, mut solution: Vec<u32>) -> (Vec<u32>, f64) {
            solution.sort_unstable();
            let mut i = 0;
            while i < solution.len() {
                let total: u32 = solution.iter().sum();
                if total - solution[i] >= 20 {
                    solution.remove(i);
                } else {
                    i += 1;
                }
            }
            let cost = solution.len() as f64;
            (solution, cost)
        }
    }

    #[test]
    fn test_grasp_greedy_finds_optimum() {
        // 9 + 8 + 7 = 24 >= 20: three picks are optimal.
        let config = GraspConfig::default()
            .with_alfa(0.0)
            .with_max_iterations(5)
            .with_seed(42);
        let result = GraspRunner::run(&SumCover, &config).unwrap();
        assert_eq!(result.best_cost, 3.0);
        assert!(result.best.iter().sum::<u32>() >= 20);
    }

    #[test]
    fn test_grasp_randomized_still_feasible() {
        let config = GraspConfig::default()
            .with_alfa(1.0)
            .with_max_iterations(30)
            .with_seed(7);
        let result = GraspRunner::run(&SumCover, &config).unwrap();
        assert!(result.best.iter().sum::<u32>() >= 20);
        assert!(result.best_cost <= 5.0);
        for window in result.cost_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_grasp_stagnation_stops_early() {
        let config = GraspConfig::default()
            .with_alfa(0.0)
            .with_max_iterations(1000)
            .with_stagnation_limit(3)
            .with_seed(1);
        let result = GraspRunner::run(&SumCover, &config).unwrap();
        assert_eq!(result.stop_reason, StopReason::Stagnation);
        // First iteration hits the optimum, then 4 non-improving ones.
        assert_eq!(result.iterations, 5);
    }

    #[test]
    fn test_grasp_time_limit() {
        let config = GraspConfig::default()
            .with_max_iterations(usize::MAX)
            .with_stagnation_limit(0)
            .with_time_limit_ms(10)
            .with_seed(3);
        let result = GraspRunner::run(&SumCover, &config).unwrap();
        assert_eq!(result.stop_reason, StopReason::TimeLimit);
    }

    #[test]
    fn test_grasp_parallel_splits_budget() {
        let config = GraspConfig::default()
            .with_max_iterations(10)
            .with_stagnation_limit(0)
            .with_workers(4)
            .with_seed(11);
        let result = GraspRunner::run_parallel(&SumCover, &config).unwrap();
        // ceil(10 / 4) = 3 iterations on each of 4 workers.
        assert_eq!(result.iterations, 12);
        assert!(result.worker < 4);
        assert_eq!(result.cost_history.len(), 3);
        assert!(result.best.iter().sum::<u32>() >= 20);
    }

    #[test]
    fn test_grasp_parallel_reproducible() {
        let config = GraspConfig::default()
            .with_alfa(0.6)
            .with_max_iterations(16)
            .with_workers(4)
            .with_seed(5);
        let a = GraspRunner::run_parallel(&SumCover, &config).unwrap();
        let b = GraspRunner::run_parallel(&SumCover, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.worker, b.worker);
    }

    #[test]
    fn test_grasp_cancelled_before_second_iteration() {
        let config = GraspConfig::default().with_max_iterations(100).with_seed(2);
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            GraspRunner::run_with_observer(&SumCover, &config, &NoopObserver, Some(cancel)).unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.iterations, 1);
    }

    struct IterationLog(Mutex<Vec<(usize, usize)>>);

    impl Observer for IterationLog {
        fn on_event(&self, event: &ProgressEvent) {
            if let ProgressEvent::Iteration {
                worker, iteration, ..
            } = event
            {
                self.0.lock().unwrap().push((*worker, *iteration));
            }
        }
    }

    #[test]
    fn test_grasp_parallel_observer_sees_every_worker() {
        let config = GraspConfig::default()
            .with_max_iterations(6)
            .with_stagnation_limit(0)
            .with_workers(3)
            .with_seed(8);
        let log = IterationLog(Mutex::new(Vec::new()));
        GraspRunner::run_parallel_with_observer(&SumCover, &config, &log, None).unwrap();

        let mut seen = log.0.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![(0, 1), (0, 2), (1, 1), (1, 2), (2, 1), (2, 2)]);
    }
}
