//! Enumeration of every valid single-worker shift shape.

use super::instance::Instance;
use super::pattern::Pattern;

/// All distinct valid shift shapes, anchored at their first worked hour
/// and trimmed after their last one.
///
/// A shape is placed into the day at an offset with [`PatternCatalog::place`].
/// Shapes work between `min_hours` and `max_hours` hours, span at most
/// `max_presence` hours, never run longer than `max_consecutive` and
/// never rest more than one hour in a row.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    shapes: Vec<Pattern>,
}

impl PatternCatalog {
    /// Enumerates the catalog with a depth-first search that places each
    /// next worked hour directly after the previous one or after a single
    /// rest, pruning as soon as a run exceeds `max_consecutive`.
    ///
    /// ```
    /// use u_nurse::nurses::{Instance, PatternCatalog};
    ///
    /// let instance = Instance::new(6, 2, 2, 2, 3, vec![1; 6], 3).unwrap();
    /// let catalog = PatternCatalog::enumerate(&instance);
    /// // "11" and "101"
    /// assert_eq!(catalog.len(), 2);
    /// ```
    pub fn enumerate(instance: &Instance) -> Self {
        let window = instance.max_presence().min(instance.hours_per_day());
        let mut shapes = Vec::new();
        if window == 0 || instance.max_consecutive() == 0 {
            return Self { shapes };
        }

        let mut hours = vec![false; window];
        hours[0] = true;
        for count in instance.min_hours().max(1)..=instance.max_hours() {
            let mut search = Dfs {
                hours: &mut hours,
                max_consecutive: instance.max_consecutive(),
                out: &mut shapes,
            };
            search.extend(1, count - 1, 1);
        }

        log::debug!("pattern catalog: {} shapes in a {window}-hour window", shapes.len());
        Self { shapes }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Pattern] {
        &self.shapes
    }

    /// Shape `index` shifted to start at `offset` in a day of
    /// `hours_per_day` hours.
    pub fn place(&self, index: usize, offset: usize, hours_per_day: usize) -> Pattern {
        let mut hours = vec![false; hours_per_day];
        for (h, &w) in self.shapes[index].hours().iter().enumerate() {
            hours[offset + h] = w;
        }
        Pattern::new(hours)
    }
}

struct Dfs<'a> {
    hours: &'a mut [bool],
    max_consecutive: usize,
    out: &'a mut Vec<Pattern>,
}

impl Dfs<'_> {
    /// `next` is the earliest free hour, `left` the hours still to place
    /// and `run` the length of the run ending just before `next`.
    fn extend(&mut self, next: usize, left: usize, run: usize) {
        if run > self.max_consecutive {
            return;
        }
        if left == 0 {
            self.out.push(Pattern::new(self.hours[..next].to_vec()));
            return;
        }
        let len = self.hours.len();
        let last = (next + 2).min((len + 1).saturating_sub(left));
        for hour in next..last {
            self.hours[hour] = true;
            let run = if hour == next { run + 1 } else { 1 };
            self.extend(hour + 1, left - 1, run);
            self.hours[hour] = false;
        }
    }
}
