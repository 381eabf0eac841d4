//! GRASP configuration.

use crate::error::{Error, Result};

/// Configuration parameters for GRASP.
///
/// # Examples
///
/// ```
/// use u_nurse::grasp::GraspConfig;
///
/// let config = GraspConfig::default()
///     .with_max_iterations(50)
///     .with_alfa(0.1)
///     .with_workers(8);
/// assert_eq!(config.iterations_per_worker(), 7);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraspConfig {
    /// Total construct + local search iterations. Split evenly (rounding
    /// up) across workers by the parallel runner.
    pub max_iterations: usize,

    /// Restricted candidate list width in `[0, 1]`.
    pub alfa: f64,

    /// Stop once this many consecutive iterations have passed without
    /// improving the best cost, i.e. when the counter *exceeds* the
    /// limit (0 to disable).
    pub stagnation_limit: usize,

    /// Optional wall-clock budget in milliseconds, checked once per
    /// iteration.
    pub time_limit_ms: Option<u64>,

    /// Number of independent restarts run concurrently.
    pub workers: usize,

    /// Random seed (None for a random one).
    pub seed: Option<u64>,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            alfa: 0.1,
            stagnation_limit: 40,
            time_limit_ms: None,
            workers: rayon::current_num_threads().max(1),
            seed: None,
        }
    }
}

impl GraspConfig {
    /// Sets the total iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the candidate list width.
    pub fn with_alfa(mut self, alfa: f64) -> Self {
        self.alfa = alfa.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the number of parallel restarts.
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Iterations each parallel worker may run: `⌈max_iterations / workers⌉`.
    pub fn iterations_per_worker(&self) -> usize {
        self.max_iterations.div_ceil(self.workers.max(1))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.alfa) {
            return Err(Error::InvalidConfig(format!(
                "alfa ({}) must lie in [0, 1]",
                self.alfa
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraspConfig::default();
        assert_eq!(config.max_iterations, 50);
        assert!((config.alfa - 0.1).abs() < 1e-12);
        assert_eq!(config.stagnation_limit, 40);
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_iterations_per_worker_rounds_up() {
        let config = GraspConfig::default().with_max_iterations(10).with_workers(3);
        assert_eq!(config.iterations_per_worker(), 4);
        let single = config.with_workers(1);
        assert_eq!(single.iterations_per_worker(), 10);
    }

    #[test]
    fn test_alfa_clamped() {
        let config = GraspConfig::default().with_alfa(3.0);
        assert!((config.alfa - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        assert!(GraspConfig::default().with_max_iterations(0).validate().is_err());
        assert!(GraspConfig::default().with_workers(0).validate().is_err());
    }
}
