//! BRKGA evolutionary loop.
//!
//! `Init → {Decode → Select → Reproduce}* → Terminal`. Decoding a
//! generation is an embarrassingly parallel map; selection and
//! reproduction run after every decode of the generation has finished.

use super::config::BrkgaConfig;
use super::types::{BrkgaDecoder, Individual};
use crate::error::Result;
use crate::observer::{NoopObserver, Observer, ProgressEvent, StopReason};
use crate::random::create_rng;
use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a BRKGA optimization run.
#[derive(Debug, Clone)]
pub struct BrkgaResult<S> {
    /// The best random-key chromosome found.
    pub best_keys: Vec<f64>,

    /// The decoded solution of `best_keys`.
    pub best: S,

    /// Fitness of the best solution.
    pub best_fitness: f64,

    /// Number of generations executed (not counting initialization).
    pub generations: usize,

    /// Why the loop stopped.
    pub stop_reason: StopReason,

    /// Best fitness after initialization and after each generation.
    pub cost_history: Vec<f64>,
}

/// Executes the BRKGA algorithm.
pub struct BrkgaRunner;

impl BrkgaRunner {
    /// Runs BRKGA optimization.
    pub fn run<D: BrkgaDecoder>(decoder: &D, config: &BrkgaConfig) -> Result<BrkgaResult<D::Solution>> {
        Self::run_with_observer(decoder, config, &NoopObserver, None)
    }

    /// Runs BRKGA, reporting progress to `observer` and honouring an
    /// optional cancellation token checked once per generation.
    pub fn run_with_observer<D: BrkgaDecoder, O: Observer>(
        decoder: &D,
        config: &BrkgaConfig,
        observer: &O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BrkgaResult<D::Solution>> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let start = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);
        let n = config.chromosome_length;
        let pop_size = config.population_size;
        let (elite_count, mutant_count, crossover_count) = config.partition();

        // Init
        let chromosomes: Vec<Vec<f64>> = (0..pop_size).map(|_| random_keys(n, &mut rng)).collect();
        let mut population = decode_all(decoder, chromosomes, config.parallel)?;
        let mut order = rank(&population);

        let mut best = population[order[0]].clone();
        let mut cost_history = Vec::with_capacity(config.max_generations.min(1024) + 1);
        cost_history.push(best.fitness);

        let mut generation = 0usize;
        let mut stagnation_counter = 0usize;

        let stop_reason = loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }
            if generation >= config.max_generations {
                break StopReason::MaxIterations;
            }
            if time_limit.is_some_and(|limit| start.elapsed() > limit) {
                break StopReason::TimeLimit;
            }
            if config.stagnation_limit > 0 && stagnation_counter > config.stagnation_limit {
                break StopReason::Stagnation;
            }

            // Reproduce: elite copy, biased uniform crossover, mutants.
            let mut offspring: Vec<Vec<f64>> = Vec::with_capacity(crossover_count + mutant_count);
            for _ in 0..crossover_count {
                let elite_parent = &population[order[rng.random_range(0..elite_count)]];
                let other_parent = &population[order[rng.random_range(elite_count..pop_size)]];
                let keys: Vec<f64> = elite_parent
                    .keys
                    .iter()
                    .zip(&other_parent.keys)
                    .map(|(&e, &o)| {
                        if rng.random_range(0.0..1.0) < config.elite_inheritance_prob {
                            e
                        } else {
                            o
                        }
                    })
                    .collect();
                offspring.push(keys);
            }
            for _ in 0..mutant_count {
                offspring.push(random_keys(n, &mut rng));
            }

            // Elites keep their cached decoding.
            let mut next_gen: Vec<Individual<D::Solution>> = Vec::with_capacity(pop_size);
            next_gen.extend(order[..elite_count].iter().map(|&i| population[i].clone()));
            next_gen.extend(decode_all(decoder, offspring, config.parallel)?);

            population = next_gen;
            order = rank(&population);
            generation += 1;

            let gen_best = &population[order[0]];
            if gen_best.fitness < best.fitness {
                best = gen_best.clone();
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            cost_history.push(best.fitness);

            observer.on_event(&ProgressEvent::Generation {
                generation,
                best_fitness: best.fitness,
                elapsed: start.elapsed(),
            });
        };

        observer.on_event(&ProgressEvent::Finished {
            reason: stop_reason,
            best: best.fitness,
        });

        Ok(BrkgaResult {
            best_keys: best.keys,
            best: best.solution,
            best_fitness: best.fitness,
            generations: generation,
            stop_reason,
            cost_history,
        })
    }
}

fn random_keys<R: Rng>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(0.0..1.0)).collect()
}

/// Decodes fresh chromosomes into individuals. Order is preserved.
fn decode_all<D: BrkgaDecoder>(
    decoder: &D,
    chromosomes: Vec<Vec<f64>>,
    parallel: bool,
) -> Result<Vec<Individual<D::Solution>>> {
    if parallel {
        chromosomes
            .into_par_iter()
            .map(|keys| Individual::decode(decoder, keys))
            .collect()
    } else {
        chromosomes
            .into_iter()
            .map(|keys| Individual::decode(decoder, keys))
            .collect()
    }
}

/// Indices of `population` sorted by ascending fitness.
fn rank<S>(population: &[Individual<S>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness
            .partial_cmp(&population[b].fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}
