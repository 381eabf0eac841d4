//! Worker elimination.
//!
//! A worker can leave the schedule when every hour they work is either
//! over-covered already or can be handed to another worker who is free
//! that hour and stays valid with it. Hand-overs are tentative: if any
//! hour of the worker finds no taker, every hand-over made for that
//! worker is undone before moving on.

use super::feasibility::check_pattern;
use super::instance::Instance;
use super::pattern::{Pattern, Schedule};
use std::collections::BTreeSet;

/// Removes workers until a full pass removes nobody.
///
/// Demand coverage never decreases and every remaining pattern that was
/// valid stays valid. The returned schedule holds no idle slots.
pub fn eliminate_workers(schedule: Schedule, instance: &Instance) -> Schedule {
    let mut patterns = schedule.into_patterns();
    let mut passes = 0usize;
    loop {
        passes += 1;
        let removed = elimination_pass(&mut patterns, instance);
        if removed == 0 {
            break;
        }
        log::trace!("local search pass {passes}: removed {removed} worker(s)");
    }
    Schedule::new(patterns).compact()
}

/// One attempt per worker. Removed workers are taken out of `patterns`;
/// returns how many.
fn elimination_pass(patterns: &mut Vec<Pattern>, instance: &Instance) -> usize {
    let mut extra: Vec<i64> = instance
        .demand()
        .iter()
        .enumerate()
        .map(|(h, &d)| patterns.iter().filter(|p| p.works(h)).count() as i64 - d as i64)
        .collect();

    let mut free = free_workers(patterns, instance);
    let mut deleted = vec![false; patterns.len()];

    for i in 0..patterns.len() {
        let worked: Vec<usize> = patterns[i]
            .hours()
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w)
            .map(|(h, _)| h)
            .collect();

        let mut handovers: Vec<(usize, usize)> = Vec::new();
        let mut removable = true;
        for &h in &worked {
            if extra[h] > 0 {
                continue;
            }
            let taker = free[h].iter().copied().find(|&j| {
                if j == i || deleted[j] {
                    return false;
                }
                patterns[j].set(h, true);
                if check_pattern(&patterns[j], instance).is_valid() {
                    true
                } else {
                    patterns[j].set(h, false);
                    false
                }
            });
            match taker {
                Some(j) => handovers.push((h, j)),
                None => {
                    removable = false;
                    break;
                }
            }
        }

        if removable {
            for &(h, j) in &handovers {
                free[h].remove(&j);
            }
            for set in free.iter_mut() {
                set.remove(&i);
            }
            for &h in &worked {
                if !handovers.iter().any(|&(hh, _)| hh == h) {
                    extra[h] -= 1;
                }
            }
            deleted[i] = true;
        } else {
            for &(h, j) in &handovers {
                patterns[j].set(h, false);
            }
        }
    }

    let removed = deleted.iter().filter(|&&d| d).count();
    let mut flags = deleted.into_iter();
    patterns.retain(|_| !flags.next().unwrap_or(false));
    removed
}

/// For every hour, the workers not working it who would stay valid if
/// they took it.
fn free_workers(patterns: &mut [Pattern], instance: &Instance) -> Vec<BTreeSet<usize>> {
    let mut free = vec![BTreeSet::new(); instance.hours_per_day()];
    for (i, pattern) in patterns.iter_mut().enumerate() {
        for (h, slot) in free.iter_mut().enumerate() {
            if pattern.works(h) {
                continue;
            }
            pattern.set(h, true);
            if check_pattern(pattern, instance).is_valid() {
                slot.insert(i);
            }
            pattern.set(h, false);
        }
    }
    free
}
