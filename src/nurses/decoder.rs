//! Random-key decoder for nurse schedules.
//!
//! A chromosome holds one fixed-size block per worker slot:
//!
//! ```text
//! [works, start, chunk_0, chunk_1, ..., chunk_{k-1}]
//! ```
//!
//! - `works < 0.3` leaves the slot idle.
//! - `start` picks the first worked hour from a demand-weighted table and
//!   whether the pattern is mirrored to end of day.
//! - the chunk genes split the worker's hours into runs of at most
//!   `max_consecutive`, separated by single rest hours.
//!
//! Every used slot works exactly [`Instance::effective_max_hours`] hours,
//! so any decoded pattern satisfies the per-worker constraints of a sane
//! instance.

use super::instance::Instance;
use super::pattern::{uncovered, Pattern, Schedule};
use crate::brkga::{BrkgaDecoder, Decoded};
use crate::error::{Error, Result};

/// Slots whose works gene is below this stay idle.
pub const WORKS_THRESHOLD: f64 = 0.3;

/// Cumulative start-hour tables, computed once per instance.
///
/// `first_half[i]` is the cumulative weight of starting at hour `i`;
/// `second_half[i]` is the cumulative weight of a mirrored pattern ending
/// at hour `hours_per_day - 1 - i`. Both are normalised to end at `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderTables {
    /// Probability mass of the first half of the day.
    pub prop_half: f64,
    pub first_half: Vec<f64>,
    pub second_half: Vec<f64>,
}

impl DecoderTables {
    /// Builds the tables from the demand curve.
    ///
    /// Candidate starts are weighted by the demand still unserved once the
    /// earlier starts are accounted for, walking inwards from both ends of
    /// the day at once. Every weight is at least `0.1` so no candidate
    /// start is unreachable.
    pub fn new(instance: &Instance) -> Result<Self> {
        let hours = effective_hours(instance)?;
        let len = instance.hours_per_day();
        let consec = instance.max_consecutive();

        let working_span = instance.max_presence().min(2 * hours - 1).min(len);
        let ratio = hours as f64 / working_span as f64;
        // A pattern with the fewest chunks spans `hours + ceil(hours / consec) - 1`.
        let shortest_span = hours + hours.div_ceil(consec) - 1;
        let last_start = (len + 1 - shortest_span.min(len)).min(len.div_ceil(2));
        let candidates = (len / 2).min(last_start).max(1);

        let mut residual: Vec<f64> = instance.demand().iter().map(|&d| d as f64).collect();
        let mut weight = vec![0.0; len];
        for i in 0..candidates {
            let mirror = len - i - 1;
            weight[i] = residual[i].max(0.1);
            weight[mirror] = residual[mirror].max(0.1);
            for j in (i + 1)..(i + working_span).min(len) {
                residual[j] -= ratio * weight[i];
                residual[len - j - 1] -= ratio * weight[mirror];
            }
        }

        let middle = len.div_ceil(2);
        let first: Vec<f64> = weight[..middle].to_vec();
        let second: Vec<f64> = weight[middle..].iter().rev().copied().collect();
        let sum_first: f64 = first.iter().sum();
        let sum_second: f64 = second.iter().sum();

        Ok(Self {
            prop_half: sum_first / (sum_first + sum_second),
            first_half: normalised_cumulative(&first),
            second_half: normalised_cumulative(&second),
        })
    }

    /// Maps a start gene to `(start_hour, mirrored)`.
    pub fn start(&self, gene: f64) -> (usize, bool) {
        if gene <= self.prop_half || self.second_half.is_empty() {
            let p = if self.prop_half > 0.0 { gene / self.prop_half } else { 0.0 };
            (lookup(&self.first_half, p), false)
        } else {
            let p = (gene - self.prop_half) / (1.0 - self.prop_half);
            (lookup(&self.second_half, p), true)
        }
    }
}

fn normalised_cumulative(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    let mut acc = 0.0;
    weights
        .iter()
        .map(|&w| {
            acc += w;
            if total > 0.0 {
                acc / total
            } else {
                1.0
            }
        })
        .collect()
}

/// First index whose cumulative value reaches `p`.
fn lookup(cumulative: &[f64], p: f64) -> usize {
    cumulative
        .iter()
        .position(|&c| c >= p)
        .unwrap_or(cumulative.len().saturating_sub(1))
}

fn effective_hours(instance: &Instance) -> Result<usize> {
    let hours = instance.effective_max_hours();
    if hours == 0 || instance.max_consecutive() == 0 {
        return Err(Error::InvalidInstance(
            "no worker can be assigned any hour".into(),
        ));
    }
    Ok(hours)
}

/// Number of chunk genes per worker block.
fn chunk_genes(instance: &Instance, hours: usize) -> usize {
    let presence = instance.max_presence().min(instance.hours_per_day());
    (presence - hours + 1).min(2 * hours - 1)
}

/// Chromosome length for `instance`: `nurse_cap` blocks of
/// `chunk_genes + 2` keys.
pub fn chromosome_length(instance: &Instance) -> Result<usize> {
    let hours = effective_hours(instance)?;
    Ok(instance.nurse_cap() * (chunk_genes(instance, hours) + 2))
}

/// Decodes chromosomes into schedules with one slot per block.
///
/// Fitness is lexicographic in (uncovered demand, excess offer, workers):
///
/// ```text
/// uncovered² · F + Σ_{offer > demand + 1} (offer − demand)² + workers
/// ```
///
/// with `F = hours_per_day · nurse_cap² + nurse_cap + 1`, which exceeds
/// any value the last two terms can take.
#[derive(Debug, Clone)]
pub struct NurseDecoder {
    instance: Instance,
    tables: DecoderTables,
    hours: usize,
    chunks: usize,
    penalty: f64,
}

impl NurseDecoder {
    /// # Errors
    /// [`Error::InvalidInstance`] if no worker can be assigned an hour or
    /// the instance allows no worker slot at all.
    pub fn new(instance: &Instance) -> Result<Self> {
        let hours = effective_hours(instance)?;
        if instance.nurse_cap() == 0 {
            return Err(Error::InvalidInstance(
                "a chromosome needs at least one worker slot".into(),
            ));
        }
        let cap = instance.nurse_cap() as f64;
        Ok(Self {
            tables: DecoderTables::new(instance)?,
            hours,
            chunks: chunk_genes(instance, hours),
            penalty: instance.hours_per_day() as f64 * cap * cap + cap + 1.0,
            instance: instance.clone(),
        })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn tables(&self) -> &DecoderTables {
        &self.tables
    }

    /// Keys per worker slot.
    pub fn block_len(&self) -> usize {
        self.chunks + 2
    }

    pub fn chromosome_length(&self) -> usize {
        self.instance.nurse_cap() * self.block_len()
    }

    /// Decodes one worker block.
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] for a block of the wrong length, and
    /// [`Error::DecoderInvariant`] if the hours cannot be spread over the
    /// chunks without exceeding `max_consecutive`.
    pub fn decode_pattern(&self, block: &[f64]) -> Result<Pattern> {
        if block.len() != self.block_len() {
            return Err(Error::InvalidConfig(format!(
                "expected blocks of {} keys, got {}",
                self.block_len(),
                block.len()
            )));
        }
        let len = self.instance.hours_per_day();
        if block[0] < WORKS_THRESHOLD {
            return Ok(Pattern::idle(len));
        }

        let (start, mirrored) = self.tables.start(block[1]);
        let runs = self.chunk_lengths(&block[2..])?;

        let span = runs.iter().sum::<usize>() + runs.len().saturating_sub(1);
        let start = start.min(len.saturating_sub(span));

        let mut hours = vec![false; len];
        let mut hour = start;
        for (i, &run) in runs.iter().enumerate() {
            if i > 0 {
                hour += 1;
            }
            hours[hour..hour + run].fill(true);
            hour += run;
        }
        if mirrored {
            hours.reverse();
        }
        Ok(Pattern::new(hours))
    }

    /// Splits the worker's hours into non-empty runs in gene order.
    fn chunk_lengths(&self, genes: &[f64]) -> Result<Vec<usize>> {
        let consec = self.instance.max_consecutive();
        let hours = self.hours;
        let n = genes.len();

        let total: f64 = genes.iter().sum();
        let mut share: Vec<f64> = if total > 0.0 {
            genes.iter().map(|&g| g / total).collect()
        } else {
            vec![1.0 / n as f64; n]
        };

        let mut chunks = vec![0usize; n];
        for (chunk, s) in chunks.iter_mut().zip(share.iter_mut()) {
            *chunk = consec.min((*s * hours as f64) as usize);
            *s -= *chunk as f64 / hours as f64;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| share[b].total_cmp(&share[a]));

        let mut remaining = hours.saturating_sub(chunks.iter().sum());
        while remaining > 0 {
            let mut placed = false;
            for &j in &order {
                if chunks[j] < consec {
                    chunks[j] += 1;
                    remaining -= 1;
                    placed = true;
                    if remaining == 0 {
                        break;
                    }
                }
            }
            if !placed {
                return Err(Error::DecoderInvariant {
                    remaining,
                    chunks: n,
                });
            }
        }

        Ok(chunks.into_iter().filter(|&c| c > 0).collect())
    }

    /// Decodes a full chromosome into a schedule with `nurse_cap` slots.
    pub fn decode_schedule(&self, keys: &[f64]) -> Result<Schedule> {
        if keys.len() != self.chromosome_length() {
            return Err(Error::InvalidConfig(format!(
                "expected {} keys, got {}",
                self.chromosome_length(),
                keys.len()
            )));
        }
        keys.chunks(self.block_len())
            .take(self.instance.nurse_cap())
            .map(|block| self.decode_pattern(block))
            .collect::<Result<Vec<_>>>()
            .map(Schedule::new)
    }

    /// Lexicographic fitness of `schedule`. Lower is better.
    pub fn fitness(&self, schedule: &Schedule) -> f64 {
        let demand = self.instance.demand();
        let offer = schedule.offer(demand.len());
        let missing = uncovered(demand, &offer) as f64;
        let excess: f64 = offer
            .iter()
            .zip(demand)
            .filter(|&(&o, &d)| o > d + 1)
            .map(|(&o, &d)| ((o - d) as f64).powi(2))
            .sum();
        missing * missing * self.penalty + excess + schedule.cost() as f64
    }
}

impl BrkgaDecoder for NurseDecoder {
    type Solution = Schedule;

    fn decode(&self, keys: &[f64]) -> Result<Decoded<Schedule>> {
        let schedule = self.decode_schedule(keys)?;
        let fitness = self.fitness(&schedule);
        Ok(Decoded {
            solution: schedule,
            fitness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurses::feasibility::check_pattern;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use rand::Rng;

    fn instance() -> Instance {
        Instance::new(24, 4, 8, 4, 10, vec![5; 24], 30).unwrap()
    }

    #[test]
    fn test_chromosome_length() {
        // H = 8, k = min(10 - 8 + 1, 15) = 3, block = 5
        let inst = instance();
        assert_eq!(chromosome_length(&inst).unwrap(), 150);
        let decoder = NurseDecoder::new(&inst).unwrap();
        assert_eq!(decoder.block_len(), 5);
        assert_eq!(decoder.chromosome_length(), 150);
    }

    #[test]
    fn test_tables_are_cumulative() {
        let tables = DecoderTables::new(&instance()).unwrap();
        assert_eq!(tables.first_half.len(), 12);
        assert_eq!(tables.second_half.len(), 12);
        assert!(tables.first_half.windows(2).all(|w| w[0] <= w[1]));
        assert!((tables.first_half[11] - 1.0).abs() < 1e-9);
        assert!((tables.second_half[11] - 1.0).abs() < 1e-9);
        // Symmetric demand splits the mass evenly.
        assert!((tables.prop_half - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tables_odd_day() {
        let inst = Instance::new(7, 2, 3, 2, 5, vec![1; 7], 4).unwrap();
        let tables = DecoderTables::new(&inst).unwrap();
        assert_eq!(tables.first_half.len(), 4);
        assert_eq!(tables.second_half.len(), 3);
        assert!(tables.prop_half > 0.0 && tables.prop_half < 1.0);
    }

    #[test]
    fn test_start_branches() {
        let tables = DecoderTables::new(&instance()).unwrap();
        assert_eq!(tables.start(0.0), (0, false));
        let (_, mirrored) = tables.start(0.99);
        assert!(mirrored);
    }

    #[test]
    fn test_idle_block() {
        let decoder = NurseDecoder::new(&instance()).unwrap();
        let p = decoder.decode_pattern(&[0.29, 0.5, 0.3, 0.3, 0.3]).unwrap();
        assert!(!p.is_used());
        assert_eq!(p.len(), 24);
    }

    #[test]
    fn test_used_block_is_valid() {
        let inst = instance();
        let decoder = NurseDecoder::new(&inst).unwrap();
        let p = decoder.decode_pattern(&[0.9, 0.1, 0.5, 0.0, 0.5]).unwrap();
        assert_eq!(p.worked_hours(), 8);
        assert!(check_pattern(&p, &inst).is_valid(), "{p}");
        // Two runs of four around one rest hour.
        assert_eq!(p.max_consecutive_run(), 4);
        assert_eq!(p.presence_span(), 9);
    }

    #[test]
    fn test_zero_chunk_genes_use_uniform_split() {
        let inst = instance();
        let decoder = NurseDecoder::new(&inst).unwrap();
        let p = decoder.decode_pattern(&[0.5, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(p.worked_hours(), 8);
        assert!(check_pattern(&p, &inst).is_valid(), "{p}");
    }

    #[test]
    fn test_start_clamped_into_day() {
        // Start table on a short day may point past room for the span.
        let inst = Instance::new(8, 4, 6, 3, 8, vec![0, 0, 0, 0, 0, 0, 9, 9], 2).unwrap();
        let decoder = NurseDecoder::new(&inst).unwrap();
        let mut block = vec![0.9; decoder.block_len()];
        for g in [0.0, 0.2, 0.45, 0.5, 0.7, 0.99] {
            block[1] = g;
            let p = decoder.decode_pattern(&block).unwrap();
            assert_eq!(p.len(), 8);
            assert!(check_pattern(&p, &inst).is_valid(), "{p}");
        }
    }

    #[test]
    fn test_invariant_violation_is_an_error() {
        let inst = instance();
        let decoder = NurseDecoder::new(&inst).unwrap();
        // One chunk can hold at most 4 of the 8 hours.
        let err = decoder.chunk_lengths(&[1.0]).unwrap_err();
        assert_eq!(err, Error::DecoderInvariant { remaining: 4, chunks: 1 });
    }

    #[test]
    fn test_fitness_prefers_coverage() {
        let inst = Instance::new(4, 1, 2, 2, 4, vec![1, 1, 1, 1], 3).unwrap();
        let decoder = NurseDecoder::new(&inst).unwrap();
        let covering = Schedule::new(vec![
            Pattern::from_bits(&[1, 1, 0, 0]),
            Pattern::from_bits(&[0, 0, 1, 1]),
            Pattern::from_bits(&[1, 1, 0, 0]),
        ]);
        let short = Schedule::new(vec![
            Pattern::from_bits(&[1, 1, 0, 0]),
            Pattern::idle(4),
            Pattern::idle(4),
        ]);
        assert_eq!(decoder.fitness(&covering), 3.0);
        // uncovered 2: 4 * (4 * 9 + 3 + 1) + 1
        assert_eq!(decoder.fitness(&short), 161.0);
        assert!(decoder.fitness(&covering) < decoder.fitness(&short));
    }

    #[test]
    fn test_excess_penalised_above_one() {
        let inst = Instance::new(2, 1, 1, 1, 1, vec![0, 0], 3).unwrap();
        let decoder = NurseDecoder::new(&inst).unwrap();
        let one = Schedule::new(vec![Pattern::from_bits(&[1, 0])]);
        let three = Schedule::new(vec![Pattern::from_bits(&[1, 0]); 3]);
        assert_eq!(decoder.fitness(&one), 1.0);
        assert_eq!(decoder.fitness(&three), 9.0 + 3.0);
    }

    #[test]
    fn test_decode_is_deterministic_and_pure() {
        let decoder = NurseDecoder::new(&instance()).unwrap();
        let mut rng = create_rng(11);
        let keys: Vec<f64> = (0..decoder.chromosome_length()).map(|_| rng.random()).collect();
        let before = keys.clone();
        let a = decoder.decode(&keys).unwrap();
        let b = decoder.decode(&keys).unwrap();
        assert_eq!(a, b);
        assert_eq!(keys, before);
        assert_eq!(a.solution.len(), 30);
    }

    #[test]
    fn test_rejects_zero_hours() {
        let inst = Instance::new(24, 0, 0, 4, 10, vec![0; 24], 3).unwrap();
        assert!(matches!(NurseDecoder::new(&inst), Err(Error::InvalidInstance(_))));
    }

    proptest! {
        #[test]
        fn prop_decoded_patterns_valid(
            hours_day in 6usize..30,
            consec in 1usize..6,
            seed in any::<u64>(),
        ) {
            let presence = (hours_day * 2 / 3).max(2);
            let max_hours = (presence - presence / (consec + 1)).max(1);
            let min_hours = (max_hours / 2).max(1);
            let mut rng = create_rng(seed);
            let demand: Vec<u32> = (0..hours_day).map(|_| rng.random_range(0..6)).collect();
            let inst = Instance::new(hours_day, min_hours, max_hours, consec, presence, demand, 6).unwrap();
            let decoder = NurseDecoder::new(&inst).unwrap();
            let keys: Vec<f64> = (0..decoder.chromosome_length()).map(|_| rng.random()).collect();

            let decoded = decoder.decode(&keys).unwrap();
            prop_assert_eq!(decoded.solution.len(), 6);
            for p in decoded.solution.patterns() {
                prop_assert_eq!(p.len(), hours_day);
                prop_assert!(check_pattern(p, &inst).is_valid(), "{}", p);
                if p.is_used() {
                    prop_assert_eq!(p.worked_hours(), inst.effective_max_hours());
                }
            }
        }
    }
}
