//! Salary normalization
//!
//! A vacancy advertises a salary as an optional `[from, to]` range. Everything
//! that compares, averages or sorts vacancies by pay reduces that range to one
//! integer with [`comparable_salary`]. The same function is registered as the
//! `comparable_salary(from, to)` SQL function on every store connection, so
//! aggregates computed by SQLite and comparisons made in Rust always agree.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Shown when neither bound is disclosed
pub const UNSPECIFIED: &str = "не указана";

/// Reduce a salary range to a single comparable value.
///
/// - both bounds: floor of their arithmetic mean
/// - one bound: that bound
/// - neither: `0`
pub fn comparable_salary(from: Option<i64>, to: Option<i64>) -> i64 {
    match (from, to) {
        // i128 keeps the sum exact for any pair of i64 bounds
        (Some(from), Some(to)) => ((from as i128 + to as i128).div_euclid(2)) as i64,
        (Some(from), None) => from,
        (None, Some(to)) => to,
        (None, None) => 0,
    }
}

/// Human-readable salary range.
///
/// A missing currency is left out of the string rather than printed as a
/// placeholder token.
pub fn display_salary(from: Option<i64>, to: Option<i64>, currency: Option<&str>) -> String {
    let amount = match (from, to) {
        (Some(from), Some(to)) => format!("{} - {}", from, to),
        (Some(from), None) => format!("от {}", from),
        (None, Some(to)) => format!("до {}", to),
        (None, None) => return UNSPECIFIED.to_string(),
    };

    match currency {
        Some(currency) if !currency.is_empty() => format!("{} {}", amount, currency),
        _ => amount,
    }
}

/// A salary range as published by the job board.
///
/// Ordering and equality follow [`comparable_salary`]: two salaries compare
/// equal when they reduce to the same value, whatever their currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default, deserialize_with = "crate::record::lenient_amount")]
    pub from: Option<i64>,
    #[serde(default, deserialize_with = "crate::record::lenient_amount")]
    pub to: Option<i64>,
    #[serde(default, deserialize_with = "crate::record::lenient")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "crate::record::lenient")]
    pub gross: Option<bool>,
}

impl Salary {
    pub fn new(from: Option<i64>, to: Option<i64>, currency: Option<&str>) -> Self {
        Self {
            from,
            to,
            currency: currency.map(str::to_string),
            gross: None,
        }
    }

    pub fn comparable(&self) -> i64 {
        comparable_salary(self.from, self.to)
    }

    /// At least one bound is present
    pub fn is_disclosed(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_salary(self.from, self.to, self.currency.as_deref()))
    }
}

impl PartialEq for Salary {
    fn eq(&self, other: &Self) -> bool {
        self.comparable() == other.comparable()
    }
}

impl Eq for Salary {}

impl PartialOrd for Salary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Salary {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparable().cmp(&other.comparable())
    }
}
