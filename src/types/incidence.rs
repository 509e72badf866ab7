use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Seven-day incidence per 100k inhabitants reported for one day.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct IncidenceObservation {
    pub date: NaiveDate,
    pub incidence: f64,
}
