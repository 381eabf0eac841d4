//! BRKGA configuration.

use crate::error::{Error, Result};

/// Configuration for the BRKGA algorithm.
///
/// # Parameters
///
/// Each generation the population of `population_size` individuals is
/// partitioned as follows:
///
/// - elite: `⌈population_size · elite_fraction⌉`, copied verbatim
/// - mutants: `⌈population_size · mutant_fraction⌉`, fresh random keys
/// - crossover offspring: the remainder
///
/// Elite and mutant counts together must leave at least one non-elite
/// slot.
///
/// # Examples
///
/// ```
/// use u_nurse::brkga::BrkgaConfig;
///
/// let config = BrkgaConfig::new(50) // 50 random keys
///     .with_population_size(200)
///     .with_elite_fraction(0.10)
///     .with_mutant_fraction(0.20)
///     .with_elite_inheritance_prob(0.70);
/// assert_eq!(config.partition(), (20, 40, 140));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrkgaConfig {
    /// Number of random keys per chromosome.
    pub chromosome_length: usize,

    /// Total population size.
    pub population_size: usize,

    /// Fraction of population preserved as elite (0.10–0.25 typical).
    pub elite_fraction: f64,

    /// Fraction of population replaced by random mutants (0.10–0.30 typical).
    pub mutant_fraction: f64,

    /// Probability that offspring inherits the elite parent's allele
    /// during biased uniform crossover (0.55–0.80 typical).
    ///
    /// Must be > 0.5 for the bias toward elite to be meaningful.
    pub elite_inheritance_prob: f64,

    /// Maximum number of generations.
    pub max_generations: usize,

    /// Stop once this many consecutive generations have passed without
    /// improving the best fitness, i.e. when the counter *exceeds* the
    /// limit (0 to disable).
    pub stagnation_limit: usize,

    /// Optional wall-clock budget in milliseconds, checked once per
    /// generation.
    pub time_limit_ms: Option<u64>,

    /// Whether to decode chromosomes in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl BrkgaConfig {
    /// Creates a new configuration with the given chromosome length.
    pub fn new(chromosome_length: usize) -> Self {
        Self {
            chromosome_length,
            population_size: 200,
            elite_fraction: 0.10,
            mutant_fraction: 0.20,
            elite_inheritance_prob: 0.70,
            max_generations: 150,
            stagnation_limit: 50,
            time_limit_ms: None,
            parallel: true,
            seed: None,
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_elite_fraction(mut self, f: f64) -> Self {
        self.elite_fraction = f.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutant_fraction(mut self, f: f64) -> Self {
        self.mutant_fraction = f.clamp(0.0, 1.0);
        self
    }

    pub fn with_elite_inheritance_prob(mut self, p: f64) -> Self {
        self.elite_inheritance_prob = p.clamp(0.5, 1.0);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns `(elite, mutants, crossover)` counts per generation.
    pub fn partition(&self) -> (usize, usize, usize) {
        let n = self.population_size;
        // Tolerance keeps e.g. 30 * 0.1 from rounding up to 4.
        let elite = (n as f64 * self.elite_fraction - 1e-9).ceil().max(0.0) as usize;
        let mutants = (n as f64 * self.mutant_fraction - 1e-9).ceil().max(0.0) as usize;
        let crossover = n.saturating_sub(elite + mutants);
        (elite, mutants, crossover)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chromosome_length == 0 {
            return Err(Error::InvalidConfig(
                "chromosome_length must be at least 1".into(),
            ));
        }
        if self.population_size < 3 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 3".into(),
            ));
        }
        let (elite, mutants, _) = self.partition();
        if elite == 0 {
            return Err(Error::InvalidConfig(
                "elite_fraction too small: no elite individuals".into(),
            ));
        }
        if elite + mutants >= self.population_size {
            return Err(Error::InvalidConfig(format!(
                "elite ({elite}) + mutants ({mutants}) must leave room in a population of {}",
                self.population_size
            )));
        }
        if self.elite_inheritance_prob <= 0.5 {
            return Err(Error::InvalidConfig(
                "elite_inheritance_prob must be > 0.5".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(Error::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrkgaConfig::new(20);
        assert_eq!(config.chromosome_length, 20);
        assert_eq!(config.population_size, 200);
        assert!((config.elite_fraction - 0.10).abs() < 1e-10);
        assert!((config.mutant_fraction - 0.20).abs() < 1e-10);
        assert!((config.elite_inheritance_prob - 0.70).abs() < 1e-10);
        assert_eq!(config.time_limit_ms, None);
    }

    #[test]
    fn test_partition_rounds_up() {
        let config = BrkgaConfig::new(5)
            .with_population_size(25)
            .with_elite_fraction(0.1)
            .with_mutant_fraction(0.2);
        // ceil(2.5) = 3, ceil(5.0) = 5
        assert_eq!(config.partition(), (3, 5, 17));
    }

    #[test]
    fn test_validate_ok() {
        assert!(BrkgaConfig::new(10).validate().is_ok());
    }

    #[test]
    fn test_validate_fractions_sum() {
        let config = BrkgaConfig::new(10)
            .with_elite_fraction(0.6)
            .with_mutant_fraction(0.5);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_zero_chromosome() {
        let config = BrkgaConfig::new(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_elite() {
        let config = BrkgaConfig::new(4).with_elite_fraction(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_inheritance() {
        let config = BrkgaConfig::new(10).with_elite_inheritance_prob(0.3);
        assert!((config.elite_inheritance_prob - 0.5).abs() < 1e-10);
        assert!(config.validate().is_err());
    }
}
