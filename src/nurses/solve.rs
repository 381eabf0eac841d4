//! One-call solvers over an [`Instance`].
//!
//! Both entry points run the feasibility pre-check first and refuse
//! instances it rules out. A finished run is judged into a
//! [`SolveOutcome`]: solved when the best schedule covers demand within
//! `nurse_cap` workers.

use super::decoder::NurseDecoder;
use super::feasibility::{analyse_feasibility, Feasibility};
use super::instance::Instance;
use super::pattern::Schedule;
use super::problem::NurseGrasp;
use crate::brkga::{BrkgaConfig, BrkgaResult, BrkgaRunner};
use crate::error::{Error, Result};
use crate::grasp::{GraspConfig, GraspResult, GraspRunner};
use crate::observer::Observer;

/// Verdict on the best schedule of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveOutcome {
    /// Demand is covered with `cost <= nurse_cap` workers. The schedule
    /// holds only used workers.
    Solved { cost: usize, schedule: Schedule },
    /// The best schedule left demand uncovered or needed more than
    /// `nurse_cap` workers.
    NoSolution { best_cost: usize },
}

impl SolveOutcome {
    /// Judges `schedule` against `instance`.
    pub fn judge(schedule: &Schedule, instance: &Instance) -> Self {
        let cost = schedule.cost();
        if schedule.uncovered_demand(instance.demand()) == 0 && cost <= instance.nurse_cap() {
            SolveOutcome::Solved {
                cost,
                schedule: schedule.clone().compact(),
            }
        } else {
            SolveOutcome::NoSolution { best_cost: cost }
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }

    /// `(cost, schedule)` of a solved run.
    pub fn solution(&self) -> Option<(usize, &Schedule)> {
        match self {
            SolveOutcome::Solved { cost, schedule } => Some((*cost, schedule)),
            SolveOutcome::NoSolution { .. } => None,
        }
    }
}

fn ensure_not_infeasible(instance: &Instance) -> Result<()> {
    match analyse_feasibility(instance) {
        Feasibility::Infeasible(reason) => {
            log::warn!("refusing to solve: {reason}");
            Err(Error::Infeasible(reason))
        }
        Feasibility::Unknown => Ok(()),
    }
}

/// Runs BRKGA with the nurse decoder.
///
/// `config` supplies the evolutionary parameters; its chromosome length
/// is replaced by the one the instance needs.
pub fn solve_brkga<O: Observer>(
    instance: &Instance,
    config: &BrkgaConfig,
    observer: &O,
) -> Result<(SolveOutcome, BrkgaResult<Schedule>)> {
    ensure_not_infeasible(instance)?;
    let decoder = NurseDecoder::new(instance)?;
    let config = BrkgaConfig {
        chromosome_length: decoder.chromosome_length(),
        ..config.clone()
    };
    log::info!(
        "brkga: {} slots x {} keys, population {}",
        instance.nurse_cap(),
        decoder.block_len(),
        config.population_size
    );

    let result = BrkgaRunner::run_with_observer(&decoder, &config, observer, None)?;
    let outcome = SolveOutcome::judge(&result.best, instance);
    Ok((outcome, result))
}

/// Runs parallel GRASP restarts with the catalog constructor and worker
/// elimination.
pub fn solve_grasp<O: Observer>(
    instance: &Instance,
    config: &GraspConfig,
    observer: &O,
) -> Result<(SolveOutcome, GraspResult<Schedule>)> {
    ensure_not_infeasible(instance)?;
    let problem = NurseGrasp::new(instance);
    log::info!(
        "grasp: {} catalog shapes, {} workers",
        problem.catalog().len(),
        config.workers
    );

    let result = GraspRunner::run_parallel_with_observer(&problem, config, observer, None)?;
    let outcome = SolveOutcome::judge(&result.best, instance);
    Ok((outcome, result))
}
