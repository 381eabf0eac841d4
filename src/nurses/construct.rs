//! Randomized greedy construction of a covering schedule.

use super::catalog::PatternCatalog;
use super::instance::Instance;
use super::pattern::{Pattern, Schedule};
use rand::Rng;

/// Sampling sizes for one construction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionParams {
    /// Catalog shapes drawn per step.
    pub n_elems: usize,
    /// Random offsets tried per drawn shape.
    pub n_pos: usize,
}

impl Default for ConstructionParams {
    fn default() -> Self {
        Self {
            n_elems: 100,
            n_pos: 5,
        }
    }
}

/// A shape placed at an offset, scored against the residual demand.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    shape: usize,
    offset: usize,
    /// Residual demand left uncovered by this candidate alone.
    score: u64,
}

/// Builds a schedule one worker at a time until demand is covered.
///
/// Each step samples `n_elems × n_pos` placed shapes and scores each by
/// `Σ residual[h] · (1 − pattern[h])`. The restricted candidate list
/// keeps the covering candidates scoring within
/// `alfa · (worst − best)` of the best, and one is drawn uniformly.
///
/// When no sample covers any residual hour, every shape is tried at
/// every offset. If that also fails the schedule is padded with idle
/// slots past `nurse_cap` and returned uncovered.
pub fn construct<R: Rng>(
    instance: &Instance,
    catalog: &PatternCatalog,
    params: &ConstructionParams,
    alfa: f64,
    rng: &mut R,
) -> Schedule {
    let len = instance.hours_per_day();
    let mut residual: Vec<u32> = instance.demand().to_vec();
    let mut schedule = Schedule::default();
    let mut candidates = Vec::with_capacity(params.n_elems * params.n_pos);

    loop {
        let remaining: u64 = residual.iter().map(|&r| r as u64).sum();
        if remaining == 0 {
            break;
        }

        sample(catalog, &residual, params, rng, &mut candidates);
        let chosen = match restricted_pick(&candidates, remaining, alfa, rng) {
            Some(c) => c,
            None => match best_anywhere(catalog, &residual) {
                Some(c) if c.score < remaining => c,
                _ => {
                    log::warn!(
                        "construction stuck with {remaining} demand-hours uncovered; padding past the cap"
                    );
                    while schedule.len() <= instance.nurse_cap() {
                        schedule.push(Pattern::idle(len));
                    }
                    break;
                }
            },
        };

        let pattern = catalog.place(chosen.shape, chosen.offset, len);
        for (r, &w) in residual.iter_mut().zip(pattern.hours()) {
            if w {
                *r = r.saturating_sub(1);
            }
        }
        schedule.push(pattern);
    }

    schedule
}

fn score(shape: &Pattern, offset: usize, residual: &[u32], remaining: u64) -> u64 {
    let covered: u64 = shape
        .hours()
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w)
        .map(|(h, _)| residual[offset + h] as u64)
        .sum();
    remaining - covered
}

fn sample<R: Rng>(
    catalog: &PatternCatalog,
    residual: &[u32],
    params: &ConstructionParams,
    rng: &mut R,
    out: &mut Vec<Candidate>,
) {
    out.clear();
    let shapes = catalog.shapes();
    let len = residual.len();
    if shapes.is_empty() {
        return;
    }
    let remaining: u64 = residual.iter().map(|&r| r as u64).sum();
    for _ in 0..params.n_elems {
        let shape = rng.random_range(0..shapes.len());
        let room = len - shapes[shape].len();
        for _ in 0..params.n_pos {
            let offset = rng.random_range(0..=room);
            out.push(Candidate {
                shape,
                offset,
                score: score(&shapes[shape], offset, residual, remaining),
            });
        }
    }
}

/// Uniform pick from the restricted candidate list, restricted to
/// candidates that cover at least one residual hour.
fn restricted_pick<R: Rng>(
    candidates: &[Candidate],
    remaining: u64,
    alfa: f64,
    rng: &mut R,
) -> Option<Candidate> {
    let best = candidates.iter().map(|c| c.score).min()?;
    let worst = candidates.iter().map(|c| c.score).max()?;
    if best >= remaining {
        return None;
    }
    let threshold = best as f64 + alfa * (worst - best) as f64;
    let rcl: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.score < remaining && c.score as f64 <= threshold)
        .collect();
    Some(*rcl[rng.random_range(0..rcl.len())])
}

/// Exhaustive best placement, first found on ties.
fn best_anywhere(catalog: &PatternCatalog, residual: &[u32]) -> Option<Candidate> {
    let len = residual.len();
    let remaining: u64 = residual.iter().map(|&r| r as u64).sum();
    let mut best: Option<Candidate> = None;
    for (shape, pattern) in catalog.shapes().iter().enumerate() {
        for offset in 0..=(len - pattern.len()) {
            let score = score(pattern, offset, residual, remaining);
            if best.map_or(true, |b| score < b.score) {
                best = Some(Candidate {
                    shape,
                    offset,
                    score,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurses::feasibility::check_pattern;
    use crate::random::create_rng;

    fn instance(demand: Vec<u32>, cap: usize) -> Instance {
        Instance::new(demand.len(), 4, 8, 4, 10, demand, cap).unwrap()
    }

    #[test]
    fn test_construct_covers_flat_demand() {
        let inst = instance(vec![5; 24], 30);
        let catalog = PatternCatalog::enumerate(&inst);
        let mut rng = create_rng(42);
        let schedule = construct(&inst, &catalog, &ConstructionParams::default(), 0.1, &mut rng);
        assert_eq!(schedule.uncovered_demand(inst.demand()), 0);
        for p in schedule.patterns() {
            assert!(p.is_used());
            assert!(check_pattern(p, &inst).is_valid(), "{p}");
        }
    }

    #[test]
    fn test_construct_zero_demand_is_empty() {
        let inst = instance(vec![0; 24], 10);
        let catalog = PatternCatalog::enumerate(&inst);
        let mut rng = create_rng(1);
        let schedule = construct(&inst, &catalog, &ConstructionParams::default(), 0.1, &mut rng);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_construct_pure_greedy_and_random() {
        let demand: Vec<u32> = (0..24).map(|i| (i * (24 - i) / 20) as u32).collect();
        let inst = instance(demand, 100);
        let catalog = PatternCatalog::enumerate(&inst);
        for (seed, alfa) in [(3, 0.0), (4, 1.0)] {
            let mut rng = create_rng(seed);
            let schedule = construct(&inst, &catalog, &ConstructionParams::default(), alfa, &mut rng);
            assert_eq!(schedule.uncovered_demand(inst.demand()), 0);
            assert!(schedule.patterns().iter().all(Pattern::is_used));
        }
    }

    #[test]
    fn test_construct_single_sample_falls_back_to_scan() {
        // A single sample per step rarely reaches the last hour.
        let mut demand = vec![0; 24];
        demand[23] = 3;
        let inst = instance(demand, 10);
        let catalog = PatternCatalog::enumerate(&inst);
        let params = ConstructionParams { n_elems: 1, n_pos: 1 };
        let mut rng = create_rng(9);
        let schedule = construct(&inst, &catalog, &params, 0.1, &mut rng);
        assert_eq!(schedule.uncovered_demand(inst.demand()), 0);
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn test_construct_empty_catalog_pads_past_cap() {
        let inst = Instance::new(24, 8, 4, 4, 10, vec![1; 24], 5).unwrap();
        let catalog = PatternCatalog::enumerate(&inst);
        assert!(catalog.is_empty());
        let mut rng = create_rng(0);
        let schedule = construct(&inst, &catalog, &ConstructionParams::default(), 0.1, &mut rng);
        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule.cost(), 0);
        assert!(schedule.uncovered_demand(inst.demand()) > 0);
    }
}
