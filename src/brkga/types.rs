//! Core types for BRKGA.

use crate::error::Result;

/// The outcome of decoding one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<S> {
    /// The problem-level solution the keys map to.
    pub solution: S,
    /// Its fitness. Lower is better (minimization).
    pub fitness: f64,
}

/// Decoder trait for BRKGA.
///
/// This is the **only** trait a problem must implement to use BRKGA.
/// It maps a random-key chromosome (a slice of `f64` in `[0, 1)`) to a
/// solution and its fitness.
///
/// Decoding must be pure: the same keys always produce the same
/// [`Decoded`] value, and the keys are never modified. The runner relies
/// on this to decode a generation in parallel and to carry elite
/// individuals over without decoding them again.
///
/// # Examples
///
/// ```
/// use u_nurse::brkga::{BrkgaDecoder, Decoded};
///
/// struct OneMax;
///
/// impl BrkgaDecoder for OneMax {
///     type Solution = Vec<bool>;
///
///     fn decode(&self, keys: &[f64]) -> u_nurse::Result<Decoded<Vec<bool>>> {
///         let bits: Vec<bool> = keys.iter().map(|&k| k > 0.5).collect();
///         let ones = bits.iter().filter(|&&b| b).count();
///         Ok(Decoded { solution: bits, fitness: -(ones as f64) })
///     }
/// }
/// ```
pub trait BrkgaDecoder: Send + Sync {
    /// The decoded solution type.
    type Solution: Clone + Send + Sync;

    /// Decodes a random-key chromosome.
    ///
    /// # Arguments
    /// * `keys` - A slice of `f64` values in `[0.0, 1.0)`.
    ///   Length equals [`super::BrkgaConfig::chromosome_length`].
    ///
    /// # Errors
    /// Only for broken decoder invariants; an unattractive chromosome
    /// should get a poor fitness, not an error.
    fn decode(&self, keys: &[f64]) -> Result<Decoded<Self::Solution>>;
}

/// A decoded member of the population.
///
/// Individuals are created whole (keys plus their decoding) and never
/// mutated afterwards; each generation builds a fresh population vector.
#[derive(Debug, Clone)]
pub struct Individual<S> {
    /// The random keys.
    pub keys: Vec<f64>,
    /// The solution the keys decode to.
    pub solution: S,
    /// Fitness of `solution`.
    pub fitness: f64,
}

impl<S> Individual<S> {
    /// Decodes `keys` into a new individual.
    pub fn decode<D>(decoder: &D, keys: Vec<f64>) -> Result<Self>
    where
        D: BrkgaDecoder<Solution = S>,
    {
        let Decoded { solution, fitness } = decoder.decode(&keys)?;
        Ok(Self {
            keys,
            solution,
            fitness,
        })
    }
}
