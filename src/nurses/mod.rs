//! Nurse shift rostering.
//!
//! Given an hourly demand curve, find a set of single-day worker
//! patterns that covers demand at every hour with the fewest workers.
//! Every used worker must:
//!
//! - work between `min_hours` and `max_hours` hours
//! - stay at most `max_presence` hours from first to last worked hour
//! - never work more than `max_consecutive` hours in a row
//! - never rest more than one hour in a row inside the shift
//!
//! Two solvers are provided:
//!
//! - [`solve_brkga`]: the generic [`crate::brkga`] engine driven by
//!   [`NurseDecoder`], which maps random keys to patterns using
//!   demand-weighted start tables.
//! - [`solve_grasp`]: the generic [`crate::grasp`] engine driven by
//!   [`NurseGrasp`], which builds schedules from a [`PatternCatalog`] and
//!   removes redundant workers by handing their hours over.
//!
//! # Examples
//!
//! ```
//! use u_nurse::grasp::GraspConfig;
//! use u_nurse::nurses::{check_schedule, solve_grasp, Instance};
//! use u_nurse::observer::NoopObserver;
//!
//! let instance = Instance::new(12, 3, 6, 3, 8, vec![2; 12], 12).unwrap();
//! let config = GraspConfig::default().with_max_iterations(10).with_seed(1);
//! let (outcome, _) = solve_grasp(&instance, &config, &NoopObserver).unwrap();
//!
//! let (cost, schedule) = outcome.solution().unwrap();
//! assert!(cost <= 12);
//! assert!(check_schedule(schedule, &instance).is_satisfied());
//! ```

pub mod catalog;
pub mod construct;
pub mod decoder;
pub mod feasibility;
pub mod instance;
pub mod local_search;
pub mod pattern;
pub mod problem;
pub mod solve;

pub use catalog::PatternCatalog;
pub use construct::ConstructionParams;
pub use decoder::{chromosome_length, DecoderTables, NurseDecoder};
pub use feasibility::{
    analyse_feasibility, check_pattern, check_schedule, ConstraintReport, Feasibility,
    PatternReport,
};
pub use instance::{FieldValue, Instance};
pub use local_search::eliminate_workers;
pub use pattern::{Pattern, Schedule};
pub use problem::NurseGrasp;
pub use solve::{solve_brkga, solve_grasp, SolveOutcome};
