//! Greedy Randomized Adaptive Search Procedure (GRASP).
//!
//! A multi-start metaheuristic: every iteration builds a fresh solution
//! with a randomized greedy constructor (choices drawn from a restricted
//! candidate list controlled by `alfa`) and then improves it with local
//! search. Iterations are independent, so restarts parallelize as a
//! fork-join over workers with private random streams.
//!
//! A problem implements [`GraspProblem`]; the nurse rostering problem
//! lives in [`crate::nurses::problem`].
//!
//! # References
//!
//! - Feo, T. A. & Resende, M. G. C. (1995). "Greedy randomized adaptive
//!   search procedures", *Journal of Global Optimization* 6(2), 109-133.

mod config;
mod runner;
mod types;

pub use config::GraspConfig;
pub use runner::{GraspResult, GraspRunner};
pub use types::GraspProblem;
