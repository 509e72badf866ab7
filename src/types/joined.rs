//! Output rows of the incidence/weather join.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date for which both a weather observation and an incidence value exist.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub date: NaiveDate,
    pub incidence: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_temperature: f64,
    pub precipitation: f64,
    /// 1-based rank of the date within the joined table, see [`DayOrder`].
    pub day: u32,
}

/// Direction in which the `day` sequence number is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayOrder {
    /// The most recent date is day 1 and the count grows into the past.
    #[default]
    NewestFirst,
    /// The oldest date is day 1.
    OldestFirst,
}

impl fmt::Display for DayOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOrder::NewestFirst => write!(f, "newest-first"),
            DayOrder::OldestFirst => write!(f, "oldest-first"),
        }
    }
}
