//! Worker patterns, schedules and their metrics.
//!
//! Every metric is recomputed from the hourly vector on demand; nothing is
//! cached, so a metric can never disagree with the pattern it describes.

use std::fmt;

/// One worker's day: `true` for every hour worked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern(Vec<bool>);

impl Pattern {
    pub fn new(hours: Vec<bool>) -> Self {
        Self(hours)
    }

    /// A pattern of `hours_per_day` rest hours (an unused worker slot).
    pub fn idle(hours_per_day: usize) -> Self {
        Self(vec![false; hours_per_day])
    }

    /// Builds a pattern from `0`/`1` values; any non-zero is worked.
    ///
    /// ```
    /// use u_nurse::nurses::Pattern;
    ///
    /// let p = Pattern::from_bits(&[0, 1, 1, 0, 1, 0]);
    /// assert_eq!(p.worked_hours(), 3);
    /// assert_eq!(p.presence_span(), 4);
    /// ```
    pub fn from_bits(bits: &[u8]) -> Self {
        Self(bits.iter().map(|&b| b != 0).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn hours(&self) -> &[bool] {
        &self.0
    }

    pub fn works(&self, hour: usize) -> bool {
        self.0.get(hour).copied().unwrap_or(false)
    }

    pub fn set(&mut self, hour: usize, working: bool) {
        self.0[hour] = working;
    }

    /// Whether the worker does at least one hour.
    pub fn is_used(&self) -> bool {
        self.0.iter().any(|&w| w)
    }

    pub fn worked_hours(&self) -> usize {
        self.0.iter().filter(|&&w| w).count()
    }

    pub fn first_hour(&self) -> Option<usize> {
        self.0.iter().position(|&w| w)
    }

    pub fn last_hour(&self) -> Option<usize> {
        self.0.iter().rposition(|&w| w)
    }

    /// Hours from the first to the last worked hour, inclusive.
    /// Zero for an idle pattern.
    pub fn presence_span(&self) -> usize {
        match (self.first_hour(), self.last_hour()) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 0,
        }
    }

    /// Longest run of consecutive worked hours.
    pub fn max_consecutive_run(&self) -> usize {
        longest_run(&self.0, true)
    }

    /// Longest run of rest hours strictly between the first and the last
    /// worked hour. Rest before the shift starts or after it ends does not
    /// count.
    pub fn max_rest_run(&self) -> usize {
        match (self.first_hour(), self.last_hour()) {
            (Some(first), Some(last)) => longest_run(&self.0[first..=last], false),
            _ => 0,
        }
    }
}

fn longest_run(hours: &[bool], value: bool) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &h in hours {
        if h == value {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &h in &self.0 {
            f.write_str(if h { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One pattern per worker slot. Idle patterns mark unused slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    patterns: Vec<Pattern>,
}

impl Schedule {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut [Pattern] {
        &mut self.patterns
    }

    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    /// Number of worker slots, used or not.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of workers with at least one worked hour.
    pub fn cost(&self) -> usize {
        self.patterns.iter().filter(|p| p.is_used()).count()
    }

    /// Workers on duty at each of the `hours_per_day` hours.
    pub fn offer(&self, hours_per_day: usize) -> Vec<u32> {
        let mut offer = vec![0u32; hours_per_day];
        for pattern in &self.patterns {
            for (slot, &working) in offer.iter_mut().zip(pattern.hours()) {
                if working {
                    *slot += 1;
                }
            }
        }
        offer
    }

    /// `Σ max(0, demand[h] − offer[h])`.
    pub fn uncovered_demand(&self, demand: &[u32]) -> u64 {
        uncovered(demand, &self.offer(demand.len()))
    }

    /// Drops idle slots.
    pub fn compact(self) -> Self {
        Self {
            patterns: self.patterns.into_iter().filter(Pattern::is_used).collect(),
        }
    }
}

/// `Σ max(0, demand[h] − offer[h])` for precomputed offer.
pub fn uncovered(demand: &[u32], offer: &[u32]) -> u64 {
    demand
        .iter()
        .zip(offer)
        .map(|(&d, &o)| d.saturating_sub(o) as u64)
        .sum()
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pattern in &self.patterns {
            writeln!(f, "{pattern}")?;
        }
        Ok(())
    }
}

impl FromIterator<Pattern> for Schedule {
    fn from_iter<T: IntoIterator<Item = Pattern>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
