//! Constraint checks for schedules and single patterns.
//!
//! Every check is independent and always evaluated, so a failing report
//! says exactly which constraints are broken.

use super::instance::Instance;
use super::pattern::{Pattern, Schedule};

/// Per-constraint verdict for a whole schedule.
///
/// Idle slots are ignored by the per-worker checks, mirroring how a
/// schedule's cost only counts used workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintReport {
    /// Used workers `<= nurse_cap`.
    pub headcount: bool,
    /// Every used worker does between `min_hours` and `max_hours`.
    pub worked_hours: bool,
    /// `offer[h] >= demand[h]` for every hour.
    pub demand: bool,
    /// Every presence span is at most `max_presence`.
    pub presence: bool,
    /// Every consecutive run is at most `max_consecutive`.
    pub consecutive: bool,
    /// No worker rests more than one hour in a row inside the shift.
    pub rest: bool,
}

impl ConstraintReport {
    pub fn is_satisfied(&self) -> bool {
        self.headcount
            && self.worked_hours
            && self.demand
            && self.presence
            && self.consecutive
            && self.rest
    }
}

/// Per-constraint verdict for one worker's pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternReport {
    pub worked_hours: bool,
    pub presence: bool,
    pub consecutive: bool,
    pub rest: bool,
}

impl PatternReport {
    pub fn is_valid(&self) -> bool {
        self.worked_hours && self.presence && self.consecutive && self.rest
    }
}

/// Checks one pattern. An idle pattern passes: it is an unused slot.
pub fn check_pattern(pattern: &Pattern, instance: &Instance) -> PatternReport {
    let worked = pattern.worked_hours();
    PatternReport {
        worked_hours: worked == 0
            || (instance.min_hours() <= worked && worked <= instance.max_hours()),
        presence: pattern.presence_span() <= instance.max_presence(),
        consecutive: pattern.max_consecutive_run() <= instance.max_consecutive(),
        rest: pattern.max_rest_run() <= 1,
    }
}

/// Checks a full schedule against every constraint.
pub fn check_schedule(schedule: &Schedule, instance: &Instance) -> ConstraintReport {
    let reports: Vec<PatternReport> = schedule
        .patterns()
        .iter()
        .filter(|p| p.is_used())
        .map(|p| check_pattern(p, instance))
        .collect();
    let offer = schedule.offer(instance.hours_per_day());

    ConstraintReport {
        headcount: schedule.cost() <= instance.nurse_cap(),
        worked_hours: reports.iter().all(|r| r.worked_hours),
        demand: offer.iter().zip(instance.demand()).all(|(&o, &d)| o >= d),
        presence: reports.iter().all(|r| r.presence),
        consecutive: reports.iter().all(|r| r.consecutive),
        rest: reports.iter().all(|r| r.rest),
    }
}

/// Outcome of the cheap feasibility pre-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feasibility {
    /// Provably infeasible, with the reason.
    Infeasible(String),
    /// Not ruled out. The pre-check never proves feasibility.
    Unknown,
}

/// Rules out instances that cannot have a solution.
///
/// Checks bound sanity and that the aggregate demand fits into
/// `nurse_cap` workers of maximal length.
pub fn analyse_feasibility(instance: &Instance) -> Feasibility {
    if instance.max_hours() == 0 || instance.max_consecutive() == 0 || instance.max_presence() == 0 {
        return Feasibility::Infeasible("max_hours, max_consecutive and max_presence must be positive".into());
    }
    if instance.max_hours() < instance.min_hours() {
        return Feasibility::Infeasible(format!(
            "max_hours ({}) < min_hours ({})",
            instance.max_hours(),
            instance.min_hours()
        ));
    }
    if instance.max_presence() < instance.min_hours() {
        return Feasibility::Infeasible(format!(
            "max_presence ({}) < min_hours ({})",
            instance.max_presence(),
            instance.min_hours()
        ));
    }
    if instance.effective_max_hours() < instance.min_hours() {
        return Feasibility::Infeasible(format!(
            "at most {} hours fit in a presence window of {} with runs of {}, below min_hours ({})",
            instance.effective_max_hours(),
            instance.max_presence(),
            instance.max_consecutive(),
            instance.min_hours()
        ));
    }
    let capacity = instance.nurse_cap() as u64 * instance.effective_max_hours() as u64;
    if instance.total_demand() > capacity {
        return Feasibility::Infeasible(format!(
            "total demand {} exceeds {} workers x {} hours",
            instance.total_demand(),
            instance.nurse_cap(),
            instance.effective_max_hours()
        ));
    }
    Feasibility::Unknown
}
