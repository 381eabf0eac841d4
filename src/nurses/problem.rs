//! The nurse rostering problem as a GRASP plugin.

use super::catalog::PatternCatalog;
use super::construct::{construct, ConstructionParams};
use super::instance::Instance;
use super::local_search::eliminate_workers;
use super::pattern::Schedule;
use crate::grasp::GraspProblem;
use rand::Rng;

/// GRASP plugin: catalog-based construction plus worker elimination.
///
/// Cost is the number of used workers when demand is covered, and
/// `nurse_cap + 1` otherwise, so an uncovered schedule never beats a
/// covering one within the cap.
#[derive(Debug, Clone)]
pub struct NurseGrasp {
    instance: Instance,
    catalog: PatternCatalog,
    params: ConstructionParams,
}

impl NurseGrasp {
    /// Enumerates the pattern catalog for `instance`.
    pub fn new(instance: &Instance) -> Self {
        Self::with_params(instance, ConstructionParams::default())
    }

    pub fn with_params(instance: &Instance, params: ConstructionParams) -> Self {
        Self {
            catalog: PatternCatalog::enumerate(instance),
            instance: instance.clone(),
            params,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Cost of `schedule` as seen by the engine.
    pub fn cost(&self, schedule: &Schedule) -> f64 {
        if schedule.uncovered_demand(self.instance.demand()) > 0 {
            (self.instance.nurse_cap() + 1) as f64
        } else {
            schedule.cost() as f64
        }
    }
}

impl GraspProblem for NurseGrasp {
    type Solution = Schedule;

    fn construct<R: Rng>(&self, alfa: f64, rng: &mut R) -> (Schedule, f64) {
        let schedule = construct(&self.instance, &self.catalog, &self.params, alfa, rng);
        let cost = self.cost(&schedule);
        (schedule, cost)
    }

    fn local_search(&self, solution: Schedule) -> (Schedule, f64) {
        let improved = eliminate_workers(solution, &self.instance);
        let cost = self.cost(&improved);
        (improved, cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grasp::{GraspConfig, GraspRunner};
    use crate::random::create_rng;

    #[test]
    fn test_costs() {
        let inst = Instance::new(24, 4, 8, 4, 10, vec![2; 24], 12).unwrap();
        let problem = NurseGrasp::new(&inst);
        let mut rng = create_rng(8);
        let (built, built_cost) = problem.construct(0.1, &mut rng);
        assert_eq!(built_cost, built.cost() as f64);
        let (improved, cost) = problem.local_search(built);
        assert!(cost <= built_cost);
        assert_eq!(cost, improved.cost() as f64);
    }

    #[test]
    fn test_uncovered_costs_past_cap() {
        let inst = Instance::new(24, 8, 4, 4, 10, vec![1; 24], 5).unwrap();
        let problem = NurseGrasp::new(&inst);
        let mut rng = create_rng(0);
        let (_, cost) = problem.construct(0.1, &mut rng);
        assert_eq!(cost, 6.0);
    }

    #[test]
    fn test_runs_in_engine() {
        let inst = Instance::new(24, 4, 8, 4, 10, vec![3; 24], 18).unwrap();
        let problem = NurseGrasp::new(&inst);
        let config = GraspConfig::default()
            .with_max_iterations(8)
            .with_workers(2)
            .with_seed(21);
        let result = GraspRunner::run_parallel(&problem, &config).unwrap();
        assert_eq!(result.best.uncovered_demand(inst.demand()), 0);
        assert_eq!(result.best_cost, result.best.cost() as f64);
        // 72 demand-hours over at most 8 hours per worker.
        assert!(result.best_cost >= 9.0);
    }
}
