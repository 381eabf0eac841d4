//! Problem instance.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Immutable nurse rostering instance.
///
/// Bounds are expected to satisfy
/// `min_hours <= max_hours <= max_presence <= hours_per_day`; an instance
/// violating them is still constructible but is reported as infeasible by
/// [`analyse_feasibility`](super::analyse_feasibility). Only structurally
/// broken data (an empty day, a demand curve of the wrong length) is
/// rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    hours_per_day: usize,
    min_hours: usize,
    max_hours: usize,
    max_consecutive: usize,
    max_presence: usize,
    demand: Vec<u32>,
    nurse_cap: usize,
}

impl Instance {
    /// Creates an instance.
    ///
    /// # Errors
    /// [`Error::InvalidInstance`] if `hours_per_day` is zero or `demand`
    /// does not have exactly `hours_per_day` entries.
    pub fn new(
        hours_per_day: usize,
        min_hours: usize,
        max_hours: usize,
        max_consecutive: usize,
        max_presence: usize,
        demand: Vec<u32>,
        nurse_cap: usize,
    ) -> Result<Self> {
        if hours_per_day == 0 {
            return Err(Error::InvalidInstance(
                "hours_per_day must be at least 1".into(),
            ));
        }
        if demand.len() != hours_per_day {
            return Err(Error::InvalidInstance(format!(
                "demand has {} entries but the day has {hours_per_day} hours",
                demand.len()
            )));
        }
        Ok(Self {
            hours_per_day,
            min_hours,
            max_hours,
            max_consecutive,
            max_presence,
            demand,
            nurse_cap,
        })
    }

    /// Builds an instance from named fields: `hoursDay`, `minHours`,
    /// `maxHours`, `maxConsec`, `maxPresence`, `demand` and `nNurses`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use u_nurse::nurses::{FieldValue, Instance};
    ///
    /// let mut fields = BTreeMap::new();
    /// fields.insert("hoursDay".to_string(), FieldValue::Int(4));
    /// fields.insert("minHours".to_string(), FieldValue::Int(1));
    /// fields.insert("maxHours".to_string(), FieldValue::Int(2));
    /// fields.insert("maxConsec".to_string(), FieldValue::Int(2));
    /// fields.insert("maxPresence".to_string(), FieldValue::Int(3));
    /// fields.insert("demand".to_string(), FieldValue::List(vec![1, 2, 2, 1]));
    /// fields.insert("nNurses".to_string(), FieldValue::Int(5));
    ///
    /// let instance = Instance::from_fields(&fields).unwrap();
    /// assert_eq!(instance.total_demand(), 6);
    /// ```
    pub fn from_fields(fields: &BTreeMap<String, FieldValue>) -> Result<Self> {
        let int = |name: &'static str| -> Result<usize> {
            match fields.get(name) {
                Some(FieldValue::Int(v)) => usize::try_from(*v).map_err(|_| Error::FieldType {
                    field: name,
                    expected: "a non-negative integer",
                }),
                Some(FieldValue::List(_)) => Err(Error::FieldType {
                    field: name,
                    expected: "an integer",
                }),
                None => Err(Error::MissingField(name)),
            }
        };
        let demand = match fields.get("demand") {
            Some(FieldValue::List(values)) => values
                .iter()
                .map(|&v| {
                    u32::try_from(v).map_err(|_| Error::FieldType {
                        field: "demand",
                        expected: "a list of non-negative integers",
                    })
                })
                .collect::<Result<Vec<u32>>>()?,
            Some(FieldValue::Int(_)) => {
                return Err(Error::FieldType {
                    field: "demand",
                    expected: "a list of integers",
                })
            }
            None => return Err(Error::MissingField("demand")),
        };

        Self::new(
            int("hoursDay")?,
            int("minHours")?,
            int("maxHours")?,
            int("maxConsec")?,
            int("maxPresence")?,
            demand,
            int("nNurses")?,
        )
    }

    pub fn hours_per_day(&self) -> usize {
        self.hours_per_day
    }

    pub fn min_hours(&self) -> usize {
        self.min_hours
    }

    pub fn max_hours(&self) -> usize {
        self.max_hours
    }

    pub fn max_consecutive(&self) -> usize {
        self.max_consecutive
    }

    pub fn max_presence(&self) -> usize {
        self.max_presence
    }

    /// Required headcount per hour.
    pub fn demand(&self) -> &[u32] {
        &self.demand
    }

    /// Upper bound on the number of workers a schedule may use.
    pub fn nurse_cap(&self) -> usize {
        self.nurse_cap
    }

    pub fn total_demand(&self) -> u64 {
        self.demand.iter().map(|&d| d as u64).sum()
    }

    /// Most hours one worker can do inside a presence window of
    /// `max_presence` hours with runs of at most `max_consecutive`
    /// separated by single rest hours, capped by `max_hours`.
    pub fn effective_max_hours(&self) -> usize {
        let presence = self.max_presence.min(self.hours_per_day);
        let fit = presence - presence / (self.max_consecutive + 1);
        self.max_hours.min(fit)
    }
}

/// A raw value in a named-field instance description.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Int(i64),
    List(Vec<i64>),
}
