//! Core trait for GRASP.

use rand::Rng;

/// Defines a GRASP problem.
///
/// GRASP alternates a randomized greedy construction with a local
/// search; the engine keeps the cheapest result. Both hooks must be
/// callable repeatedly and independently: they may read the problem but
/// must not change anything the next call would observe.
///
/// # Minimization
///
/// GRASP minimizes the returned cost. For maximization, negate the cost.
///
/// # References
///
/// Feo, T. A. & Resende, M. G. C. (1995). "Greedy randomized adaptive
/// search procedures", *Journal of Global Optimization* 6(2), 109-133.
pub trait GraspProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// Builds a solution with randomized greedy choices.
    ///
    /// `alfa` in `[0, 1]` controls the restricted candidate list:
    /// `0` is pure greedy, `1` is uniformly random among all candidates.
    /// Returns the solution and its cost.
    fn construct<R: Rng>(&self, alfa: f64, rng: &mut R) -> (Self::Solution, f64);

    /// Improves a constructed solution. Returns the improved solution
    /// and its cost, which must not exceed the input's cost.
    fn local_search(&self, solution: Self::Solution) -> (Self::Solution, f64);
}
