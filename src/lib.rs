//! Nurse shift scheduling with metaheuristics.
//!
//! Finds the smallest set of single-day worker patterns that covers an
//! hourly demand curve under per-worker limits on worked hours, presence,
//! consecutive hours and rest.
//!
//! - **BRKGA**: Biased Random-Key Genetic Algorithm. The engine is
//!   generic; a problem implements only a decoder.
//! - **GRASP**: Greedy Randomized Adaptive Search Procedure with
//!   fork-join parallel restarts. A problem implements construction and
//!   local search.
//! - **Nurses**: the rostering domain. Instance, patterns, constraint
//!   checks, the BRKGA decoder, the GRASP constructor and local search,
//!   and one-call solvers.
//!
//! # Architecture
//!
//! The engines in [`brkga`] and [`grasp`] know nothing about nurses;
//! [`nurses`] plugs into them through [`brkga::BrkgaDecoder`] and
//! [`grasp::GraspProblem`]. Progress is reported through an explicit
//! [`observer::Observer`] handle rather than global state.

pub mod brkga;
pub mod grasp;
pub mod nurses;
pub mod observer;
pub mod random;

mod error;

pub use error::{Error, Result};
